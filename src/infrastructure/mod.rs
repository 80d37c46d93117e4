mod cache;
mod clients;

pub use cache::result_cache::{Cached, ResultCache};
pub use clients::gemini::GeminiClient;
