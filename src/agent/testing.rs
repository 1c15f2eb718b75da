//! Shared fixtures for tool and crew tests: a stub Ollama server and
//! executor settings pointing at it.

use super::tools::ToolSettings;
use crate::config::{ModelConfig, Provider};
use crate::ingest::pdf::tests::make_test_pdf;
use crate::llm::{LlmClient, LlmConfig};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

/// Address nothing listens on.
pub(crate) const DEAD_ENDPOINT: &str = "http://127.0.0.1:9";

/// Start a server answering `/api/embed` with one vector per input and
/// `/api/chat` with `chat_reply`.
pub(crate) async fn mock_ollama(chat_reply: &str) -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/embed"))
        .respond_with(|req: &Request| {
            let body: Value = serde_json::from_slice(&req.body).unwrap_or_default();
            let count = body["input"].as_array().map_or(0, Vec::len);
            let embeddings: Vec<Vec<f32>> = (0..count).map(|i| vec![1.0, i as f32]).collect();
            ResponseTemplate::new(200).set_body_json(json!({ "embeddings": embeddings }))
        })
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": { "role": "assistant", "content": chat_reply }
        })))
        .mount(&server)
        .await;

    server
}

/// Ollama client for `base_url` that never retries.
pub(crate) fn ollama_client(base_url: &str, embedding_batch_size: usize) -> LlmClient {
    let model = ModelConfig {
        provider: Provider::Ollama,
        base_url: base_url.to_string(),
        retries: 0,
        embedding_batch_size,
        ..ModelConfig::default()
    };
    LlmClient::new(LlmConfig::from_model_config(&model, None)).unwrap()
}

pub(crate) fn settings(curriculum: PathBuf, persist_dir: PathBuf) -> ToolSettings {
    ToolSettings {
        curriculum,
        persist_dir,
        chunk_size: 500,
        chunk_overlap: 50,
        top_k: 10,
        temperature: 0.2,
        reindex: false,
        show_progress: false,
    }
}

/// Write a one-page curriculum PDF into `dir`.
pub(crate) fn write_curriculum(dir: &Path, text: &str) -> PathBuf {
    let path = dir.join("curriculum.pdf");
    std::fs::write(&path, make_test_pdf(text)).unwrap();
    path
}

/// Requests the server received on `route`.
pub(crate) async fn requests_to(server: &MockServer, route: &str) -> Vec<Request> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.url.path() == route)
        .collect()
}
