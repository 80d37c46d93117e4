use crate::domain::FetchSource;
use chrono::{DateTime, Duration, Utc};

/// Labels a result by its age.
///
/// This only approximates "did this call trigger a fetch": a quick repeat of a
/// miss still looks fresh. Prefer the flag reported by the cache.
pub fn classify(timestamp: DateTime<Utc>, now: DateTime<Utc>, threshold: Duration) -> FetchSource {
    if now.signed_duration_since(timestamp) < threshold {
        FetchSource::Computed
    } else {
        FetchSource::Cached
    }
}
