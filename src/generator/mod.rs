//! Template generators for lesson plans, assessments, and resources.
//!
//! Each generator is a pure function of a [`TopicSeed`]. The seeds are
//! recovered from free-form upstream text with [`topic_seeds_from_text`].

pub mod assessment;
pub mod enhancement;
pub mod lesson;

pub use assessment::design_assessment;
pub use enhancement::enhance_lesson;
pub use lesson::plan_lesson;

use crate::models::TopicSeed;
use serde_json::Value;
use tracing::debug;

/// Parse the span from the first `[` to the last `]` of `text` as a JSON array.
pub fn extract_json_array(text: &str) -> Option<Vec<Value>> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    if end < start {
        return None;
    }

    match serde_json::from_str::<Value>(&text[start..=end]) {
        Ok(Value::Array(items)) => Some(items),
        Ok(_) => None,
        Err(e) => {
            debug!("Embedded JSON array did not parse: {}", e);
            None
        }
    }
}

/// Recover topic seeds from upstream output.
///
/// Falls back to a single sample seed when the text holds no non-empty JSON
/// array of objects.
pub fn topic_seeds_from_text(text: &str) -> Vec<TopicSeed> {
    let seeds: Vec<TopicSeed> = extract_json_array(text)
        .unwrap_or_default()
        .iter()
        .filter_map(TopicSeed::from_value)
        .collect();

    if seeds.is_empty() {
        debug!("No topics found in input, using the sample topic");
        vec![TopicSeed::sample()]
    } else {
        seeds
    }
}
