pub(crate) mod freshness;
pub(crate) mod game_service;
pub(crate) mod image_filter;
pub(crate) mod preview;
pub(crate) mod prompt;
pub(crate) mod sanitize;

pub use game_service::{GameService, GameServiceSettings};
pub use preview::PreviewService;
