//! Retrieval-augmented topic extraction prompt and response parsing.

use crate::generator::extract_json_array;
use crate::store::ScoredChunk;
use serde_json::Value;
use tracing::{info, warn};

/// Question sent to the chat model, also used as the retrieval query.
pub const TOPIC_EXTRACTION_PROMPT: &str = "Based ONLY on the curriculum documents provided in the context, extract the key topics and their \
associated learning objectives. Do not hallucinate or add information not present in the documents. \
If a topic doesn't have clear objectives, just include what you can find. \
\n\nFormat your response as a valid JSON list with this structure:\n\
[{\"topic\": \"Topic Name\", \"objectives\": [\"Objective 1\", \"Objective 2\"]}, ...]\n\n\
If you cannot find any clear topics or objectives, respond with an empty array: []";

/// Stuff the retrieved chunks and the question into one user prompt.
pub fn build_retrieval_prompt(question: &str, hits: &[ScoredChunk]) -> String {
    let context = hits
        .iter()
        .map(|hit| hit.chunk.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "Use the following pieces of context to answer the question at the end. \
If you don't know the answer, just say that you don't know, don't try to make up an answer.\n\n\
{}\n\nQuestion: {}\nHelpful Answer:",
        context, question
    )
}

/// Turn the model's answer into pretty-printed JSON.
///
/// The answer must be a JSON array, either on its own or embedded in
/// surrounding text. The error string is what the tool reports verbatim.
pub fn parse_topics_response(raw: &str) -> Result<String, String> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => {
            info!("Successfully extracted {} topics", items.len());
            Ok(pretty(&items))
        }
        Ok(other) => Err(format!(
            "Error: Expected a JSON list but got {}. Raw result: {}",
            json_kind(&other),
            raw
        )),
        Err(_) => {
            warn!("Result is not valid JSON, attempting to fix...");
            match extract_json_array(raw) {
                Some(items) => {
                    info!("Recovered {} topics from surrounding text", items.len());
                    Ok(pretty(&items))
                }
                None => Err(format!(
                    "Error: Could not parse the result as JSON. Raw result: {}",
                    raw
                )),
            }
        }
    }
}

fn pretty(items: &[Value]) -> String {
    serde_json::to_string_pretty(items).unwrap_or_else(|_| "[]".to_string())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
