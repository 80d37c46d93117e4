use crate::api::{app_router, AppState};
use crate::config::{Commands, Config};
use crate::domain::LanguageModel;
use crate::error::Result;
use crate::infrastructure::{GeminiClient, ResultCache};
use crate::services::{GameService, GameServiceSettings, PreviewService};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod domain;
mod error;
mod infrastructure;
mod services;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::new()?;
    tracing_subscriber::fmt()
        .with_max_level(config.log_level())
        .init();

    let model: Arc<dyn LanguageModel> = Arc::new(GeminiClient::new(
        config.http_client.clone(),
        config.args.gemini_api_key.clone(),
        config.args.api_base_url.clone(),
        config.args.model.clone(),
    ));

    let games = GameService::new(
        Arc::clone(&model),
        ResultCache::new(config.cache_ttl()),
        GameServiceSettings {
            platforms: config.args.platforms.clone(),
            grounding: !config.args.no_grounding,
            freshness: config.args.freshness,
            freshness_threshold: config.freshness_threshold()?,
        },
    );
    let previews = PreviewService::new(model);

    match config.args.command.clone().unwrap_or(Commands::Serve) {
        Commands::Serve => serve(&config, games, previews).await?,
        Commands::Fetch => fetch_once(&games).await?,
        Commands::Preview { title } => {
            let lookup = previews.lookup(&title).await;
            info!("Preview lookup for {} succeeded: {}", title, lookup.is_success());
            println!("{}", serde_json::to_string_pretty(&lookup)?);
        }
    }

    Ok(())
}

async fn serve(config: &Config, games: GameService, previews: PreviewService) -> Result<()> {
    let state = Arc::new(AppState {
        games,
        previews,
        max_duration: config.max_duration(),
    });

    let listener = tokio::net::TcpListener::bind(config.args.listen_addr).await?;
    info!("Listening on {}", config.args.listen_addr);
    axum::serve(listener, app_router(state)).await?;
    Ok(())
}

async fn fetch_once(games: &GameService) -> Result<()> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} [{elapsed_precise}] {msg}")
            .map_err(|e| crate::error::GameError::Other(e.to_string()))?,
    );
    spinner.set_message("Asking the model for free games...");
    spinner.enable_steady_tick(Duration::from_millis(120));

    let response = games.get_games().await;
    spinner.finish_and_clear();

    let response = response?;
    info!("Fetched {} games", response.result.games.len());
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
