use crate::config::FreshnessMode;
use crate::domain::{
    FetchResult, FetchSource, GameListing, GamesResponse, LanguageModel, ALLOWED_IMAGE_HOSTNAMES,
};
use crate::error::Result;
use crate::infrastructure::{Cached, ResultCache};
use crate::services::{freshness, image_filter, prompt, sanitize};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};

pub const GAMES_CACHE_TAG: &str = "free-games";

pub struct GameServiceSettings {
    pub platforms: String,
    pub grounding: bool,
    pub freshness: FreshnessMode,
    pub freshness_threshold: chrono::Duration,
}

/// Turns raw model text into validated listings.
pub fn listings_from_output(raw: &str, allowed_hosts: &[&str]) -> Vec<GameListing> {
    let candidates = sanitize::parse_candidates(raw);
    image_filter::filter_by_image_host(candidates, allowed_hosts)
        .into_iter()
        .filter_map(|candidate| {
            let title = candidate.title.clone();
            match GameListing::try_from(candidate) {
                Ok(listing) => Some(listing),
                Err(e) => {
                    debug!("Dropping invalid listing {:?}: {}", title, e);
                    None
                }
            }
        })
        .collect()
}

pub struct GameService {
    model: Arc<dyn LanguageModel>,
    cache: ResultCache<Arc<FetchResult>>,
    settings: GameServiceSettings,
}

impl GameService {
    pub fn new(
        model: Arc<dyn LanguageModel>,
        cache: ResultCache<Arc<FetchResult>>,
        settings: GameServiceSettings,
    ) -> Self {
        info!("Created new Game service for {}", settings.platforms);
        Self {
            model,
            cache,
            settings,
        }
    }

    pub async fn get_games(&self) -> Result<GamesResponse> {
        let model = Arc::clone(&self.model);
        let prompt = prompt::build_games_prompt(&self.settings.platforms, &ALLOWED_IMAGE_HOSTNAMES);
        let grounding = self.settings.grounding;

        let Cached { value, computed } = self
            .cache
            .get_or_compute(&self.settings.platforms, &[GAMES_CACHE_TAG], move || {
                fetch_games(model, prompt, grounding)
            })
            .await?;

        let source = match self.settings.freshness {
            FreshnessMode::Explicit if computed => FetchSource::Computed,
            FreshnessMode::Explicit => FetchSource::Cached,
            FreshnessMode::Elapsed => freshness::classify(
                value.timestamp,
                Utc::now(),
                self.settings.freshness_threshold,
            ),
        };

        Ok(GamesResponse {
            result: value,
            source,
        })
    }

    pub fn clear_cache(&self) -> usize {
        self.cache.invalidate_tag(GAMES_CACHE_TAG)
    }
}

async fn fetch_games(
    model: Arc<dyn LanguageModel>,
    prompt: String,
    grounding: bool,
) -> Result<Arc<FetchResult>> {
    info!("Fetching free games from the model");
    let response = model.generate(&prompt, grounding).await?;
    let games = listings_from_output(&response.text, &ALLOWED_IMAGE_HOSTNAMES);
    info!("Model listed {} usable free games", games.len());

    Ok(Arc::new(FetchResult::new(
        games,
        prompt,
        response.text,
        response.model,
    )))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::{ModelResponse, Platform};
    use crate::error::GameError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Replays canned answers and counts how often it was asked.
    pub(crate) struct ScriptedModel {
        pub answer: Mutex<Result<String>>,
        pub calls: AtomicUsize,
        pub last_grounding: Mutex<Option<bool>>,
        pub delay: Duration,
    }

    impl ScriptedModel {
        pub(crate) fn answering(text: &str) -> Arc<Self> {
            Arc::new(Self {
                answer: Mutex::new(Ok(text.to_string())),
                calls: AtomicUsize::new(0),
                last_grounding: Mutex::new(None),
                delay: Duration::ZERO,
            })
        }

        /// Answers `text` only after `delay` has passed.
        pub(crate) fn slow(text: &str, delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                answer: Mutex::new(Ok(text.to_string())),
                calls: AtomicUsize::new(0),
                last_grounding: Mutex::new(None),
                delay,
            })
        }

        pub(crate) fn failing(message: &str) -> Arc<Self> {
            Arc::new(Self {
                answer: Mutex::new(Err(GameError::Provider(message.to_string()))),
                calls: AtomicUsize::new(0),
                last_grounding: Mutex::new(None),
                delay: Duration::ZERO,
            })
        }

        pub(crate) fn set_answer(&self, text: &str) {
            *self.answer.lock().unwrap() = Ok(text.to_string());
        }
    }

    #[async_trait]
    impl LanguageModel for ScriptedModel {
        async fn generate(&self, _prompt: &str, grounding: bool) -> Result<ModelResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_grounding.lock().unwrap() = Some(grounding);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            match &*self.answer.lock().unwrap() {
                Ok(text) => Ok(ModelResponse {
                    text: text.clone(),
                    model: Some("scripted".to_string()),
                }),
                Err(e) => Err(GameError::Provider(e.to_string())),
            }
        }
    }

    pub(crate) const TWO_GAMES: &str = r#"Here is the data:
[{"title":"Game A","platform":"Steam","dealLink":"https://store.steampowered.com/x","imageURL":"https://cdn.akamai.steamstatic.com/x.jpg"},
 {"title":"Game B","platform":"GOG","dealLink":"https://www.gog.com/b","imageURL":"https://evil.example.com/x.jpg"},
 {"title":"Game C","platform":"Epic Games Store","dealLink":"https://store.epicgames.com/c","imageURL":"https://cdn1.epicgames.com/c.png","endDate":"2026-10-22T15:00:00.000Z","original_price":"$24.99"}]
Enjoy!"#;

    pub(crate) fn service(model: Arc<ScriptedModel>, freshness: FreshnessMode) -> GameService {
        GameService::new(
            model,
            ResultCache::new(None),
            GameServiceSettings {
                platforms: "Epic Games Store,Amazon Prime Gaming,GOG,Steam".to_string(),
                grounding: true,
                freshness,
                freshness_threshold: chrono::Duration::seconds(5),
            },
        )
    }

    #[test]
    fn pipeline_keeps_allowed_valid_listings_in_order() {
        let games = listings_from_output(TWO_GAMES, &ALLOWED_IMAGE_HOSTNAMES);
        let titles: Vec<_> = games.iter().map(|g| g.title.as_str()).collect();
        assert_eq!(titles, vec!["Game A", "Game C"]);
        assert_eq!(games[1].platform, Platform::EpicGamesStore);
        assert_eq!(games[1].original_price.as_deref(), Some("$24.99"));
    }

    #[test]
    fn pipeline_drops_schema_violations_without_failing_batch() {
        let raw = r#"[
            {"title":"No link","platform":"Steam","imageURL":"https://cdn.akamai.steamstatic.com/a.jpg"},
            {"title":"Bad platform","platform":"Origin","dealLink":"https://x.com","imageURL":"https://cdn.akamai.steamstatic.com/b.jpg"},
            {"title":"Fine","platform":"Amazon Prime Gaming","dealLink":"https://gaming.amazon.com/f","imageURL":"https://m.media-amazon.com/f.jpg"}
        ]"#;
        let games = listings_from_output(raw, &ALLOWED_IMAGE_HOSTNAMES);
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].title, "Fine");
    }

    #[tokio::test]
    async fn first_call_computes_then_cache_serves() {
        let model = ScriptedModel::answering(TWO_GAMES);
        let service = service(Arc::clone(&model), FreshnessMode::Explicit);

        let first = service.get_games().await.unwrap();
        assert_eq!(first.source, FetchSource::Computed);
        assert_eq!(first.result.games.len(), 2);
        assert_eq!(first.result.raw_output, TWO_GAMES);
        assert!(first.result.prompt.contains("JSON array"));
        assert_eq!(*model.last_grounding.lock().unwrap(), Some(true));

        let second = service.get_games().await.unwrap();
        assert_eq!(second.source, FetchSource::Cached);
        assert_eq!(second.result.timestamp, first.result.timestamp);
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn clear_cache_triggers_a_new_fetch() {
        let model = ScriptedModel::answering(TWO_GAMES);
        let service = service(Arc::clone(&model), FreshnessMode::Explicit);

        service.get_games().await.unwrap();
        model.set_answer("[]");
        assert_eq!(service.clear_cache(), 1);

        let refreshed = service.get_games().await.unwrap();
        assert_eq!(refreshed.source, FetchSource::Computed);
        assert!(refreshed.result.games.is_empty());
        assert_eq!(model.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn empty_model_output_is_zero_games_not_an_error() {
        let model = ScriptedModel::answering("");
        let service = service(model, FreshnessMode::Explicit);
        let response = service.get_games().await.unwrap();
        assert!(response.result.games.is_empty());
    }

    #[tokio::test]
    async fn provider_errors_propagate_and_are_retried_next_call() {
        let model = ScriptedModel::failing("API key not valid");
        let service = service(Arc::clone(&model), FreshnessMode::Explicit);

        let err = service.get_games().await.unwrap_err();
        assert!(err.to_string().contains("API key not valid"));

        model.set_answer(TWO_GAMES);
        assert!(service.get_games().await.is_ok());
        assert_eq!(model.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn elapsed_mode_labels_young_results_as_computed() {
        let model = ScriptedModel::answering(TWO_GAMES);
        let service = service(model, FreshnessMode::Elapsed);

        service.get_games().await.unwrap();
        // Served from cache, but young enough for the heuristic to call it fresh.
        let second = service.get_games().await.unwrap();
        assert_eq!(second.source, FetchSource::Computed);
    }
}
