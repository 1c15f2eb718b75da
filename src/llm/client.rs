//! HTTP client for chat and embedding requests.

use crate::config::{ModelConfig, Provider};
use futures::stream::{self, StreamExt, TryStreamExt};
use indicatif::ProgressBar;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Environment variable holding the OpenAI API key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Errors returned by [`LlmClient`].
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("OPENAI_API_KEY environment variable is not set!")]
    MissingApiKey,

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Cannot connect to {0}")]
    Connect(String),

    #[error("Failed to send request: {0}")]
    Http(String),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Unexpected response: {0}")]
    InvalidResponse(String),

    #[error("Expected {expected} embeddings but received {received}")]
    EmbeddingCount { expected: usize, received: usize },
}

impl LlmError {
    /// Whether retrying the same request might succeed.
    fn is_transient(&self) -> bool {
        match self {
            LlmError::Timeout(_) | LlmError::Connect(_) => true,
            LlmError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Resolved settings for the client.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub provider: Provider,
    pub base_url: String,
    pub chat_model: String,
    pub embedding_model: String,
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
    pub retries: usize,
    pub embedding_batch_size: usize,
}

impl LlmConfig {
    pub fn from_model_config(model: &ModelConfig, api_key: Option<String>) -> Self {
        Self {
            provider: model.provider,
            base_url: model.effective_base_url().to_string(),
            chat_model: model.effective_chat_model().to_string(),
            embedding_model: model.effective_embedding_model().to_string(),
            api_key,
            timeout_seconds: model.timeout_seconds,
            retries: model.retries,
            embedding_batch_size: model.embedding_batch_size.max(1),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

impl ChatMessage {
    fn new(role: &str, content: &str) -> Self {
        Self {
            role: role.to_string(),
            content: content.to_string(),
        }
    }
}

/// OpenAI chat completion request.
#[derive(Debug, Serialize)]
struct OpenAiChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct OpenAiChatResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct OpenAiEmbeddingResponse {
    data: Vec<OpenAiEmbedding>,
}

#[derive(Debug, Deserialize)]
struct OpenAiEmbedding {
    embedding: Vec<f32>,
    #[serde(default)]
    index: usize,
}

/// Ollama chat API request.
#[derive(Debug, Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct OllamaEmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

/// Client for chat completions and embeddings.
pub struct LlmClient {
    config: LlmConfig,
    http_client: reqwest::Client,
}

impl LlmClient {
    /// Create a client. Fails if the provider needs an API key and none is set.
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        if config.provider.requires_api_key() && config.api_key.is_none() {
            return Err(LlmError::MissingApiKey);
        }

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| LlmError::Http(e.to_string()))?;

        info!(
            "LLM client ready: provider={} chat={} embeddings={}",
            config.provider, config.chat_model, config.embedding_model
        );

        Ok(Self {
            config,
            http_client,
        })
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Send a system + user prompt and return the assistant's text.
    pub async fn chat(&self, system: &str, user: &str, temperature: f32) -> Result<String, LlmError> {
        let messages = vec![
            ChatMessage::new("system", system),
            ChatMessage::new("user", user),
        ];

        debug!(
            "Sending chat request ({} prompt chars) to {}",
            user.len(),
            self.config.chat_model
        );

        match self.config.provider {
            Provider::OpenAi => {
                let url = format!("{}/chat/completions", self.config.base_url);
                let request = OpenAiChatRequest {
                    model: &self.config.chat_model,
                    messages,
                    temperature,
                };
                let response: OpenAiChatResponse = self.post_json(&url, &request).await?;
                response
                    .choices
                    .into_iter()
                    .next()
                    .and_then(|c| c.message.content)
                    .ok_or_else(|| LlmError::InvalidResponse("no choices in completion".to_string()))
            }
            Provider::Ollama => {
                let url = format!("{}/api/chat", self.config.base_url);
                let request = OllamaChatRequest {
                    model: &self.config.chat_model,
                    messages,
                    stream: false,
                    options: OllamaOptions { temperature },
                };
                let response: OllamaChatResponse = self.post_json(&url, &request).await?;
                Ok(response.message.content)
            }
        }
    }

    /// Embed a single query string.
    pub async fn embed_query(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        let input = [text.to_string()];
        self.embed_batch(&input)
            .await?
            .into_iter()
            .next()
            .ok_or(LlmError::EmbeddingCount {
                expected: 1,
                received: 0,
            })
    }

    /// Embed many texts, one batch after another, advancing `progress`.
    pub async fn embed(
        &self,
        texts: &[String],
        progress: &ProgressBar,
    ) -> Result<Vec<Vec<f32>>, LlmError> {
        let batches: Vec<Vec<Vec<f32>>> = stream::iter(texts.chunks(self.config.embedding_batch_size))
            .then(|batch| async move {
                let vectors = self.embed_batch(batch).await?;
                progress.inc(batch.len() as u64);
                Ok::<_, LlmError>(vectors)
            })
            .try_collect()
            .await?;

        Ok(batches.into_iter().flatten().collect())
    }

    async fn embed_batch(&self, batch: &[String]) -> Result<Vec<Vec<f32>>, LlmError> {
        let request = EmbeddingRequest {
            model: &self.config.embedding_model,
            input: batch,
        };

        let vectors = match self.config.provider {
            Provider::OpenAi => {
                let url = format!("{}/embeddings", self.config.base_url);
                let response: OpenAiEmbeddingResponse = self.post_json(&url, &request).await?;
                let mut data = response.data;
                data.sort_by_key(|d| d.index);
                data.into_iter().map(|d| d.embedding).collect::<Vec<_>>()
            }
            Provider::Ollama => {
                let url = format!("{}/api/embed", self.config.base_url);
                let response: OllamaEmbedResponse = self.post_json(&url, &request).await?;
                response.embeddings
            }
        };

        if vectors.len() != batch.len() {
            return Err(LlmError::EmbeddingCount {
                expected: batch.len(),
                received: vectors.len(),
            });
        }

        Ok(vectors)
    }

    /// POST a JSON body, retrying transient failures.
    async fn post_json<B, R>(&self, url: &str, body: &B) -> Result<R, LlmError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let mut attempt = 0;
        loop {
            match self.try_post_json(url, body).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_transient() && attempt < self.config.retries => {
                    attempt += 1;
                    let backoff = Duration::from_millis(500 * attempt as u64);
                    warn!(
                        "Request to {} failed ({}), retry {}/{} in {:?}",
                        url, e, attempt, self.config.retries, backoff
                    );
                    tokio::time::sleep(backoff).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn try_post_json<B, R>(&self, url: &str, body: &B) -> Result<R, LlmError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let mut request = self.http_client.post(url).json(body);
        if let Some(ref key) = self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                LlmError::Timeout(self.config.timeout_seconds)
            } else if e.is_connect() {
                LlmError::Connect(self.config.base_url.clone())
            } else {
                LlmError::Http(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))
    }
}
