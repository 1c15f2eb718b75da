//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation. Most flags are optional so that values from
//! `.lessoncraft.toml` survive unless explicitly overridden.

use crate::config::Provider;
use clap::Parser;
use std::path::PathBuf;

/// LessonCraft - turn a curriculum PDF into lesson plans
///
/// Indexes the curriculum, extracts topics and learning objectives with an
/// LLM, then generates lesson plans, assessments, and supplementary
/// resources for every topic.
///
/// Examples:
///   lessoncraft --curriculum ./data/biology.pdf
///   lessoncraft --provider ollama --model llama3.2:latest
///   lessoncraft --curriculum ./syllabi --reindex --format json -o plan.json
///   lessoncraft --dry-run
///   lessoncraft --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Curriculum PDF, or a directory containing PDFs
    ///
    /// Default: ./data/sample_curriculum.pdf
    #[arg(long, value_name = "PATH", env = "LESSONCRAFT_CURRICULUM")]
    pub curriculum: Option<PathBuf>,

    /// Directory for the persisted vector index
    ///
    /// Default: ./data/vectorstore
    #[arg(long, value_name = "DIR")]
    pub persist_dir: Option<PathBuf>,

    /// LLM provider (openai, ollama)
    #[arg(long, value_name = "PROVIDER", env = "LESSONCRAFT_PROVIDER")]
    pub provider: Option<Provider>,

    /// Chat model used for topic analysis
    #[arg(short, long, value_name = "MODEL", env = "LESSONCRAFT_MODEL")]
    pub model: Option<String>,

    /// Embedding model used for indexing and retrieval
    #[arg(long, value_name = "MODEL")]
    pub embedding_model: Option<String>,

    /// API base URL (overrides the provider default)
    #[arg(long, value_name = "URL", env = "LESSONCRAFT_BASE_URL")]
    pub base_url: Option<String>,

    /// Temperature for topic extraction (0.0 - 2.0)
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Number of curriculum chunks retrieved for topic analysis
    #[arg(long, value_name = "K")]
    pub top_k: Option<usize>,

    /// Maximum characters per curriculum chunk
    #[arg(long, value_name = "CHARS")]
    pub chunk_size: Option<usize>,

    /// Characters shared between neighbouring chunks
    #[arg(long, value_name = "CHARS")]
    pub chunk_overlap: Option<usize>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Output file path for the report
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Path to configuration file
    ///
    /// If not specified, looks for .lessoncraft.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Rebuild the vector index even if one already exists
    #[arg(long)]
    pub reindex: bool,

    /// Stop at the first failed step (exit code 2)
    #[arg(long)]
    pub strict: bool,

    /// Dry run: load and chunk the curriculum without calling the LLM
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .lessoncraft.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if let Some(ref url) = self.base_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("Base URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if let Some(temperature) = self.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err("Temperature must be between 0.0 and 2.0".to_string());
            }
        }

        if self.top_k == Some(0) {
            return Err("Top-k must be at least 1".to_string());
        }

        if self.chunk_size == Some(0) {
            return Err("Chunk size must be at least 1".to_string());
        }

        if let (Some(size), Some(overlap)) = (self.chunk_size, self.chunk_overlap) {
            if overlap > size {
                return Err(format!(
                    "Chunk overlap ({}) must not exceed chunk size ({})",
                    overlap, size
                ));
            }
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.timeout == Some(0) {
            return Err("Timeout must be at least 1 second".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            curriculum: Some(PathBuf::from("curriculum.pdf")),
            persist_dir: None,
            provider: None,
            model: None,
            embedding_model: None,
            base_url: None,
            temperature: None,
            top_k: None,
            chunk_size: None,
            chunk_overlap: None,
            timeout: None,
            output: None,
            format: OutputFormat::Markdown,
            config: None,
            verbose: false,
            quiet: false,
            reindex: false,
            strict: false,
            dry_run: false,
            init_config: false,
        }
    }

    #[test]
    fn test_valid_defaults() {
        assert!(make_args().validate().is_ok());
    }

    #[test]
    fn test_validation_invalid_base_url() {
        let mut args = make_args();
        args.base_url = Some("localhost:11434".to_string());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_overlap_exceeds_chunk() {
        let mut args = make_args();
        args.chunk_size = Some(100);
        args.chunk_overlap = Some(150);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_parse_provider_flag() {
        let args = Args::try_parse_from(["lessoncraft", "--provider", "ollama"]).unwrap();
        assert_eq!(args.provider, Some(Provider::Ollama));

        let args = Args::try_parse_from(["lessoncraft", "--provider", "openai"]).unwrap();
        assert_eq!(args.provider, Some(Provider::OpenAi));
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
