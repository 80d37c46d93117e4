mod fetch_result;
mod game;
mod model;
mod preview;

pub use fetch_result::{FetchResult, FetchSource, GamesResponse};
pub use game::{GameCandidate, GameListing, Platform, ALLOWED_IMAGE_HOSTNAMES};
pub use model::{LanguageModel, ModelResponse};
pub use preview::VideoLookup;
