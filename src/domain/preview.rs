use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum VideoLookup {
    Found {
        success: bool,
        #[serde(rename = "videoId")]
        video_id: String,
        #[serde(rename = "embedUrl")]
        embed_url: String,
    },
    Failed {
        success: bool,
        error: String,
    },
}

impl VideoLookup {
    pub fn found(video_id: String) -> Self {
        Self::Found {
            embed_url: format!("https://www.youtube.com/embed/{video_id}"),
            video_id,
            success: true,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self::Failed {
            success: false,
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Found { .. })
    }
}
