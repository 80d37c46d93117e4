use crate::domain::{LanguageModel, VideoLookup};
use crate::services::prompt::build_preview_prompt;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info};

const NOT_FOUND: &str = "Could not find a gameplay video.";
const LOOKUP_FAILED: &str = "An error occurred while fetching the video.";

static URL_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:youtube\.com/(?:watch\?(?:[^\s]*&)?v=|embed/|shorts/)|youtu\.be/)([A-Za-z0-9_-]{11})")
        .expect("valid video url pattern")
});
static BARE_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").expect("valid video id pattern"));

#[derive(Deserialize)]
struct PreviewAnswer {
    #[serde(rename = "youtubeVideoId", alias = "videoId")]
    youtube_video_id: Option<String>,
}

/// Pulls a YouTube video id out of the model's answer.
pub fn extract_video_id(text: &str) -> Option<String> {
    let text = text.trim();

    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        if start < end {
            if let Ok(answer) = serde_json::from_str::<PreviewAnswer>(&text[start..=end]) {
                if let Some(id) = answer.youtube_video_id {
                    return extract_video_id(&id);
                }
            }
        }
    }

    if let Some(caps) = URL_ID.captures(text) {
        return Some(caps[1].to_string());
    }

    let bare = text.trim_matches(|c: char| c == '"' || c == '\'' || c == '`');
    BARE_ID.is_match(bare).then(|| bare.to_string())
}

pub struct PreviewService {
    model: Arc<dyn LanguageModel>,
}

impl PreviewService {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        info!("Created new Preview service");
        Self { model }
    }

    /// Never fails; every problem becomes a [`VideoLookup::Failed`].
    pub async fn lookup(&self, title: &str) -> VideoLookup {
        if title.trim().is_empty() {
            return VideoLookup::failed("A game title is required.");
        }

        let prompt = build_preview_prompt(title);
        match self.model.generate(&prompt, false).await {
            Ok(response) => match extract_video_id(&response.text) {
                Some(id) => {
                    info!("Found gameplay video {} for {}", id, title);
                    VideoLookup::found(id)
                }
                None => {
                    info!("No gameplay video found for {}", title);
                    VideoLookup::failed(NOT_FOUND)
                }
            },
            Err(e) => {
                error!("Error retrieving gameplay preview for {}: {}", title, e);
                VideoLookup::failed(LOOKUP_FAILED)
            }
        }
    }
}
