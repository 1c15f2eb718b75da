//! Tools owned by the pipeline agents.
//!
//! Every tool takes the previous task's output as free-form input text and
//! returns a [`ToolResult`]. Failures never propagate past this module: they
//! are rendered into human-readable messages so the next task still runs.

use super::roles::AgentRole;
use crate::analysis::{build_retrieval_prompt, parse_topics_response, TOPIC_EXTRACTION_PROMPT};
use crate::generator::{design_assessment, enhance_lesson, plan_lesson, topic_seeds_from_text};
use crate::ingest::{self, IngestError, RecursiveTextSplitter};
use crate::llm::LlmClient;
use crate::store::VectorStore;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info, warn};

/// The five pipeline tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    VectorizePdf,
    AnalyzeTopics,
    PlanLessons,
    DesignAssessments,
    EnhanceLessons,
}

impl Tool {
    pub const ALL: [Tool; 5] = [
        Tool::VectorizePdf,
        Tool::AnalyzeTopics,
        Tool::PlanLessons,
        Tool::DesignAssessments,
        Tool::EnhanceLessons,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Tool::VectorizePdf => "VectorizePDF",
            Tool::AnalyzeTopics => "AnalyzeTopics",
            Tool::PlanLessons => "PlanLessons",
            Tool::DesignAssessments => "DesignAssessments",
            Tool::EnhanceLessons => "EnhanceLessons",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Tool::VectorizePdf => {
                "Loads and vectorizes a PDF document for later retrieval and querying"
            }
            Tool::AnalyzeTopics => {
                "Analyzes the curriculum to extract key topics and learning objectives"
            }
            Tool::PlanLessons => "Generate lesson plans based on curriculum topics and objectives",
            Tool::DesignAssessments => "Create assessments based on lesson plans",
            Tool::EnhanceLessons => "Recommend additional resources for lesson plans",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }
}

/// Result of executing a tool.
#[derive(Debug, Clone, Serialize)]
pub struct ToolResult {
    pub success: bool,
    pub output: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolResult {
    pub fn success(output: String) -> Self {
        Self {
            success: true,
            output,
            error: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            output: String::new(),
            error: Some(message),
        }
    }

    /// The text handed to the next task: output on success, the message otherwise.
    pub fn text(&self) -> &str {
        match self.error {
            Some(ref message) if !self.success => message,
            _ => &self.output,
        }
    }
}

/// Tool failures, worded for the reader of the pipeline output.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("{0}")]
    Curriculum(IngestError),

    #[error("Error loading PDF: {0}")]
    Load(IngestError),

    #[error("No content found in the curriculum PDF. Please check the file.")]
    NoPages,

    #[error("Error splitting documents: {0}")]
    Split(IngestError),

    #[error("PDF loaded, but no documents could be chunked.")]
    NoChunks,

    #[error("Error creating vector store: {0}")]
    Index(String),

    #[error("Error: Vector store not found at {}. Please run the VectorizePDF tool first.", .0.display())]
    StoreMissing(PathBuf),

    #[error("Error: Vector store exists but appears to be empty. Please rerun the curriculum ingestor.")]
    StoreEmpty,

    #[error("Error analyzing topics: {0}")]
    Analysis(String),

    #[error("{0}")]
    Response(String),
}

/// Settings the tools need beyond the LLM client.
#[derive(Debug, Clone)]
pub struct ToolSettings {
    pub curriculum: PathBuf,
    pub persist_dir: PathBuf,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub top_k: usize,
    pub temperature: f32,
    pub reindex: bool,
    pub show_progress: bool,
}

/// Executes tool calls on behalf of the agents.
pub struct ToolExecutor {
    settings: ToolSettings,
    llm: LlmClient,
}

impl ToolExecutor {
    pub fn new(settings: ToolSettings, llm: LlmClient) -> Self {
        Self { settings, llm }
    }

    /// Execute `tool` for `agent` with the given input text.
    pub async fn execute(&self, tool: Tool, input: &str, agent: &AgentRole) -> ToolResult {
        debug!(
            "Running {} for {} with {} chars of input",
            tool.name(),
            agent.role,
            input.len()
        );

        let result = match tool {
            Tool::VectorizePdf => self.vectorize_pdf().await,
            Tool::AnalyzeTopics => self.analyze_topics(agent).await,
            Tool::PlanLessons => Ok(plan_lessons(input)),
            Tool::DesignAssessments => Ok(design_assessments(input)),
            Tool::EnhanceLessons => Ok(enhance_lessons(input)),
        };

        match result {
            Ok(output) => ToolResult::success(output),
            Err(e) => {
                warn!("{} failed: {}", tool.name(), e);
                ToolResult::error(e.to_string())
            }
        }
    }

    /// Load, split, embed, and persist the curriculum.
    async fn vectorize_pdf(&self) -> Result<String, ToolError> {
        let settings = &self.settings;

        std::fs::create_dir_all(&settings.persist_dir)
            .map_err(|e| ToolError::Index(e.to_string()))?;

        if !settings.reindex && VectorStore::has_content(&settings.persist_dir) {
            info!(
                "Vector store already exists at {} and has content.",
                settings.persist_dir.display()
            );
            return Ok(format!(
                "Curriculum is already indexed in {}. Found existing vector store with content.",
                settings.persist_dir.display()
            ));
        }

        let pdfs = ingest::discover_pdfs(&settings.curriculum).map_err(ToolError::Curriculum)?;

        let mut pages = Vec::new();
        for pdf in &pdfs {
            info!("Loading PDF from {}", pdf.display());
            pages.extend(ingest::load_pdf(pdf).map_err(ToolError::Load)?);
        }
        if pages.is_empty() {
            return Err(ToolError::NoPages);
        }

        let splitter = RecursiveTextSplitter::new(settings.chunk_size, settings.chunk_overlap)
            .map_err(ToolError::Split)?;
        let chunks = splitter.split_pages(&pages);
        info!("Split into {} chunks", chunks.len());
        if chunks.is_empty() {
            return Err(ToolError::NoChunks);
        }

        info!("Creating embeddings...");
        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let progress = self.progress_bar(texts.len() as u64);
        let embeddings = self.llm.embed(&texts, &progress).await;
        progress.finish_and_clear();
        let embeddings = embeddings.map_err(|e| ToolError::Index(e.to_string()))?;

        info!("Storing vectors in {}", settings.persist_dir.display());
        let mut store = VectorStore::empty(&settings.persist_dir);
        store
            .add(&chunks, embeddings, &self.llm.config().embedding_model)
            .map_err(|e| ToolError::Index(e.to_string()))?;
        store.persist().map_err(|e| ToolError::Index(e.to_string()))?;

        Ok(format!(
            "Curriculum indexed successfully with {} chunks from {}",
            chunks.len(),
            settings.curriculum.display()
        ))
    }

    /// Retrieve the most relevant chunks and ask the chat model for topics.
    async fn analyze_topics(&self, agent: &AgentRole) -> Result<String, ToolError> {
        let settings = &self.settings;

        if !settings.persist_dir.exists() {
            return Err(ToolError::StoreMissing(settings.persist_dir.clone()));
        }

        let store = VectorStore::open(&settings.persist_dir)
            .map_err(|e| ToolError::Analysis(e.to_string()))?;
        if store.is_empty() {
            return Err(ToolError::StoreEmpty);
        }
        info!("Vector store loaded with {} documents", store.len());

        let embedding_model = &self.llm.config().embedding_model;
        if !store.embedding_model().is_empty() && store.embedding_model() != embedding_model {
            warn!(
                "Index was built with embedding model {} but {} is configured; rerun with --reindex",
                store.embedding_model(),
                embedding_model
            );
        }

        info!("Querying the vector store...");
        let query = self
            .llm
            .embed_query(TOPIC_EXTRACTION_PROMPT)
            .await
            .map_err(|e| ToolError::Analysis(e.to_string()))?;
        let hits = store.search(&query, settings.top_k);
        debug!("Retrieved {} chunks for topic analysis", hits.len());

        let prompt = build_retrieval_prompt(TOPIC_EXTRACTION_PROMPT, &hits);
        let answer = self
            .llm
            .chat(&agent.system_prompt(), &prompt, settings.temperature)
            .await
            .map_err(|e| ToolError::Analysis(e.to_string()))?;

        parse_topics_response(&answer).map_err(ToolError::Response)
    }

    fn progress_bar(&self, len: u64) -> ProgressBar {
        if !self.settings.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(len);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks embedded")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb
    }
}

/// Lesson plans for every topic found in `input`.
pub fn plan_lessons(input: &str) -> String {
    let plans: Vec<_> = topic_seeds_from_text(input).iter().map(plan_lesson).collect();
    to_pretty_json(&plans)
}

/// Assessments for every lesson found in `input`.
pub fn design_assessments(input: &str) -> String {
    let assessments: Vec<_> = topic_seeds_from_text(input)
        .iter()
        .map(design_assessment)
        .collect();
    to_pretty_json(&assessments)
}

/// Resource recommendations for every lesson found in `input`.
pub fn enhance_lessons(input: &str) -> String {
    let enhancements: Vec<_> = topic_seeds_from_text(input)
        .iter()
        .map(enhance_lesson)
        .collect();
    to_pretty_json(&enhancements)
}

fn to_pretty_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "[]".to_string())
}
