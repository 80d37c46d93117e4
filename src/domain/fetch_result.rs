use crate::domain::game::GameListing;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchResult {
    pub games: Vec<GameListing>,
    pub timestamp: DateTime<Utc>,
    /// Prompt and raw output are kept for the debug panel only.
    pub prompt: String,
    pub raw_output: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl FetchResult {
    pub fn new(
        games: Vec<GameListing>,
        prompt: String,
        raw_output: String,
        model: Option<String>,
    ) -> Self {
        Self {
            games,
            timestamp: Utc::now(),
            prompt,
            raw_output,
            model,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FetchSource {
    #[serde(rename = "API")]
    Computed,
    #[serde(rename = "Cache")]
    Cached,
}

#[derive(Debug, Clone, Serialize)]
pub struct GamesResponse {
    #[serde(flatten)]
    pub result: Arc<FetchResult>,
    pub source: FetchSource,
}
