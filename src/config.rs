//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.lessoncraft.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".lessoncraft.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Model settings.
    #[serde(default)]
    pub model: ModelConfig,

    /// Curriculum ingestion settings.
    #[serde(default)]
    pub ingest: IngestConfig,

    /// Retrieval settings for topic analysis.
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Path to the curriculum PDF (or a directory of PDFs).
    #[serde(default = "default_curriculum")]
    pub curriculum: String,

    /// Directory holding the persisted vector index.
    #[serde(default = "default_persist_dir")]
    pub persist_dir: String,

    /// Print every step's raw output after the run.
    #[serde(default)]
    pub verbose: bool,

    /// Abort the pipeline on the first failed task.
    #[serde(default)]
    pub strict: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            curriculum: default_curriculum(),
            persist_dir: default_persist_dir(),
            verbose: false,
            strict: false,
        }
    }
}

fn default_curriculum() -> String {
    "./data/sample_curriculum.pdf".to_string()
}

fn default_persist_dir() -> String {
    "./data/vectorstore".to_string()
}

/// LLM backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// OpenAI-compatible HTTP API (requires OPENAI_API_KEY)
    #[default]
    #[value(name = "openai")]
    #[serde(rename = "openai")]
    OpenAi,
    /// Local Ollama server
    Ollama,
}

impl Provider {
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Provider::OpenAi => "https://api.openai.com/v1",
            Provider::Ollama => "http://localhost:11434",
        }
    }

    pub fn default_chat_model(&self) -> &'static str {
        match self {
            Provider::OpenAi => "gpt-3.5-turbo",
            Provider::Ollama => "llama3.2:latest",
        }
    }

    pub fn default_embedding_model(&self) -> &'static str {
        match self {
            Provider::OpenAi => "text-embedding-ada-002",
            Provider::Ollama => "nomic-embed-text",
        }
    }

    pub fn requires_api_key(&self) -> bool {
        matches!(self, Provider::OpenAi)
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::OpenAi => write!(f, "openai"),
            Provider::Ollama => write!(f, "ollama"),
        }
    }
}

/// LLM model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Which API to talk to.
    #[serde(default)]
    pub provider: Provider,

    /// Chat model name. Empty means the provider default.
    #[serde(default)]
    pub chat_model: String,

    /// Embedding model name. Empty means the provider default.
    #[serde(default)]
    pub embedding_model: String,

    /// API base URL. Empty means the provider default.
    #[serde(default)]
    pub base_url: String,

    /// Temperature for topic extraction.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Number of retries on transient failures.
    #[serde(default = "default_retries")]
    pub retries: usize,

    /// Texts sent per embedding request.
    #[serde(default = "default_embedding_batch_size")]
    pub embedding_batch_size: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: Provider::default(),
            chat_model: String::new(),
            embedding_model: String::new(),
            base_url: String::new(),
            temperature: default_temperature(),
            timeout_seconds: default_timeout(),
            retries: default_retries(),
            embedding_batch_size: default_embedding_batch_size(),
        }
    }
}

impl ModelConfig {
    pub fn effective_chat_model(&self) -> &str {
        non_empty_or(&self.chat_model, self.provider.default_chat_model())
    }

    pub fn effective_embedding_model(&self) -> &str {
        non_empty_or(&self.embedding_model, self.provider.default_embedding_model())
    }

    pub fn effective_base_url(&self) -> &str {
        non_empty_or(&self.base_url, self.provider.default_base_url()).trim_end_matches('/')
    }
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

fn default_temperature() -> f32 {
    0.2
}

fn default_timeout() -> u64 {
    120
}

fn default_retries() -> usize {
    3
}

fn default_embedding_batch_size() -> usize {
    64
}

/// Curriculum ingestion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Maximum characters per chunk.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Characters shared between neighbouring chunks.
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
        }
    }
}

fn default_chunk_size() -> usize {
    500
}

fn default_chunk_overlap() -> usize {
    50
}

/// Retrieval settings for topic analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of chunks placed in the analysis context.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

fn default_top_k() -> usize {
    10
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Include the raw output of every task in the Markdown report.
    #[serde(default)]
    pub include_raw_outputs: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            include_raw_outputs: false,
        }
    }
}

fn default_output() -> String {
    "lesson_report.md".to_string()
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings. Only values
    /// the user actually passed override the file.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref curriculum) = args.curriculum {
            self.general.curriculum = curriculum.display().to_string();
        }
        if let Some(ref persist_dir) = args.persist_dir {
            self.general.persist_dir = persist_dir.display().to_string();
        }

        if let Some(provider) = args.provider {
            self.model.provider = provider;
        }
        if let Some(ref model) = args.model {
            self.model.chat_model = model.clone();
        }
        if let Some(ref model) = args.embedding_model {
            self.model.embedding_model = model.clone();
        }
        if let Some(ref url) = args.base_url {
            self.model.base_url = url.clone();
        }
        if let Some(temperature) = args.temperature {
            self.model.temperature = temperature;
        }
        if let Some(timeout) = args.timeout {
            self.model.timeout_seconds = timeout;
        }

        if let Some(size) = args.chunk_size {
            self.ingest.chunk_size = size;
        }
        if let Some(overlap) = args.chunk_overlap {
            self.ingest.chunk_overlap = overlap;
        }
        if let Some(top_k) = args.top_k {
            self.retrieval.top_k = top_k;
        }

        if let Some(ref output) = args.output {
            self.report.output = output.display().to_string();
        }

        // Flags only ever switch behaviour on
        if args.verbose {
            self.general.verbose = true;
        }
        if args.strict {
            self.general.strict = true;
        }
    }

    /// Check values that serde cannot constrain on its own.
    pub fn validate(&self) -> Result<()> {
        if self.ingest.chunk_size == 0 {
            anyhow::bail!("ingest.chunk_size must be at least 1");
        }
        if self.ingest.chunk_overlap > self.ingest.chunk_size {
            anyhow::bail!(
                "ingest.chunk_overlap ({}) must not exceed ingest.chunk_size ({})",
                self.ingest.chunk_overlap,
                self.ingest.chunk_size
            );
        }
        if self.retrieval.top_k == 0 {
            anyhow::bail!("retrieval.top_k must be at least 1");
        }
        if self.model.embedding_batch_size == 0 {
            anyhow::bail!("model.embedding_batch_size must be at least 1");
        }
        if !(0.0..=2.0).contains(&self.model.temperature) {
            anyhow::bail!("model.temperature must be between 0.0 and 2.0");
        }
        Ok(())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.persist_dir, "./data/vectorstore");
        assert_eq!(config.ingest.chunk_size, 500);
        assert_eq!(config.ingest.chunk_overlap, 50);
        assert_eq!(config.retrieval.top_k, 10);
        assert_eq!(config.model.provider, Provider::OpenAi);
        assert_eq!(config.model.effective_chat_model(), "gpt-3.5-turbo");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
curriculum = "syllabus.pdf"
strict = true

[model]
provider = "ollama"
chat_model = "mistral:7b"
temperature = 0.4

[ingest]
chunk_size = 800

[retrieval]
top_k = 4
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.curriculum, "syllabus.pdf");
        assert!(config.general.strict);
        assert_eq!(config.model.provider, Provider::Ollama);
        assert_eq!(config.model.effective_chat_model(), "mistral:7b");
        assert_eq!(config.model.effective_embedding_model(), "nomic-embed-text");
        assert_eq!(config.model.effective_base_url(), "http://localhost:11434");
        assert_eq!(config.ingest.chunk_size, 800);
        assert_eq!(config.ingest.chunk_overlap, 50);
        assert_eq!(config.retrieval.top_k, 4);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let mut config = Config::default();
        config.model.base_url = "http://proxy.local/v1/".to_string();
        assert_eq!(config.model.effective_base_url(), "http://proxy.local/v1");
    }

    #[test]
    fn test_validate_rejects_overlap_larger_than_chunk() {
        let mut config = Config::default();
        config.ingest.chunk_size = 100;
        config.ingest.chunk_overlap = 200;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[model]"));
        assert!(toml_str.contains("[ingest]"));
        assert!(toml_str.contains("provider = \"openai\""));
    }
}
