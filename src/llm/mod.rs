//! LLM access: chat completions and embeddings.
//!
//! Supports OpenAI-compatible endpoints and a local Ollama server behind a
//! single client type.

pub mod client;

pub use client::{LlmClient, LlmConfig};
