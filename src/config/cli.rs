use clap::{Parser, Subcommand, ValueEnum};
use std::net::SocketAddr;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Gemini API key used for both the listing and the preview lookups
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: String,

    /// Gemini model identifier
    #[arg(long, env = "GEMINI_MODEL", default_value = "gemini-2.5-flash")]
    pub model: String,

    /// Base URL of the Generative Language API
    #[arg(
        long,
        env = "GEMINI_API_BASE_URL",
        default_value = "https://generativelanguage.googleapis.com"
    )]
    pub api_base_url: String,

    /// Address the HTTP server binds to
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:3000")]
    pub listen_addr: SocketAddr,

    /// Storefronts to ask about, comma separated
    #[arg(
        long,
        env = "PLATFORMS",
        default_value = "Epic Games Store,Amazon Prime Gaming,GOG,Steam"
    )]
    pub platforms: String,

    /// Seconds a fetched list stays cached; 0 keeps it until cleared
    #[arg(long, env = "CACHE_TTL_SECS", default_value_t = 21600)]
    pub cache_ttl_secs: u64,

    /// Disable Google Search grounding for the listing call
    #[arg(long)]
    pub no_grounding: bool,

    /// How a response is labelled as fresh or cached
    #[arg(long, value_enum, default_value_t = FreshnessMode::Explicit)]
    pub freshness: FreshnessMode,

    /// Age below which `--freshness elapsed` reports a result as fresh
    #[arg(long, default_value_t = 5)]
    pub freshness_threshold_secs: u64,

    /// Upper bound for a single request to the games endpoint
    #[arg(long, default_value_t = 120)]
    pub max_duration_secs: u64,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve,
    /// Fetch the current list once and print it as JSON
    Fetch,
    /// Look up a gameplay video for a single title
    Preview {
        /// Game title to search for
        title: String,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreshnessMode {
    /// Trust the cache's own report of whether it recomputed
    Explicit,
    /// Compare the result timestamp against the current time
    Elapsed,
}
