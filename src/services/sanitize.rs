use crate::domain::GameCandidate;
use serde_json::Value;
use tracing::{debug, warn};

/// Slice from the first `[` to the last `]`, or the whole text if there is none.
pub fn extract_json_array(text: &str) -> &str {
    match (text.find('['), text.rfind(']')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    }
}

/// Reads the model's answer as a list of candidates.
///
/// Never fails: text that does not hold a JSON array yields no candidates, and
/// elements that are not game-shaped objects are skipped one by one.
pub fn parse_candidates(raw: &str) -> Vec<GameCandidate> {
    if raw.trim().is_empty() {
        debug!("Model returned an empty response");
        return Vec::new();
    }

    let candidate = extract_json_array(raw);
    let elements = match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Array(elements)) => elements,
        Ok(other) => {
            warn!("Expected a JSON array from the model, got {}", kind(&other));
            return Vec::new();
        }
        Err(e) => {
            warn!("Failed to parse model output as JSON: {}", e);
            return Vec::new();
        }
    };

    let total = elements.len();
    let candidates: Vec<GameCandidate> = elements
        .into_iter()
        .filter_map(|element| match serde_json::from_value(element) {
            Ok(c) => Some(c),
            Err(e) => {
                debug!("Skipping malformed game object: {}", e);
                None
            }
        })
        .collect();

    if candidates.len() < total {
        warn!(
            "Dropped {} of {} array elements that were not game objects",
            total - candidates.len(),
            total
        );
    }
    candidates
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
