use crate::config::cli::Args;
use crate::error::{GameError, Result};
use clap::Parser;
use reqwest::Client;
use std::time::Duration;
use tracing::Level;

pub(crate) mod cli;

pub use cli::{Commands, FreshnessMode};

/// Outbound calls to the model can take a while with grounding enabled.
const HTTP_TIMEOUT: Duration = Duration::from_secs(120);

pub struct Config {
    pub args: Args,
    pub http_client: Client,
}

impl Config {
    pub fn new() -> Result<Self> {
        let args = Args::parse();

        if args.gemini_api_key.trim().is_empty() {
            return Err(GameError::Config("GEMINI_API_KEY is empty".to_string()));
        }

        let http_client = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .user_agent(concat!("fastfreegames/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { args, http_client })
    }

    pub fn log_level(&self) -> Level {
        self.args.log_level.parse().unwrap_or(Level::INFO)
    }

    pub fn cache_ttl(&self) -> Option<Duration> {
        match self.args.cache_ttl_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    pub fn freshness_threshold(&self) -> Result<chrono::TimeDelta> {
        threshold_from_secs(self.args.freshness_threshold_secs)
    }

    pub fn max_duration(&self) -> Duration {
        Duration::from_secs(self.args.max_duration_secs)
    }
}

fn threshold_from_secs(secs: u64) -> Result<chrono::TimeDelta> {
    i64::try_from(secs)
        .ok()
        .and_then(chrono::TimeDelta::try_seconds)
        .ok_or_else(|| {
            GameError::Config(format!("freshness threshold of {secs} seconds is out of range"))
        })
}
