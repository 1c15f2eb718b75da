//! Topic analysis helpers and aggregation of task outputs.

pub mod aggregator;
pub mod topics;

pub use aggregator::collect_artifacts;
pub use topics::{build_retrieval_prompt, parse_topics_response, TOPIC_EXTRACTION_PROMPT};
