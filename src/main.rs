//! LessonCraft - AI-assisted lesson planning from a curriculum PDF
//!
//! A CLI tool that indexes a curriculum document, extracts its topics with
//! an LLM, and turns them into lesson plans, assessments, and resource lists.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (config, missing API key, unwritable output, etc.)
//!   2 - A pipeline step failed while running with --strict

mod agent;
mod analysis;
mod cli;
mod config;
mod generator;
mod ingest;
mod llm;
mod models;
mod report;
mod store;

use agent::{Crew, ToolExecutor, ToolSettings};
use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE_NAME};
use ingest::RecursiveTextSplitter;
use llm::{client::API_KEY_ENV, LlmClient, LlmConfig};
use models::{Report, ReportMetadata};
use std::path::{Path, PathBuf};
use std::time::Instant;
use store::VectorStore;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("LessonCraft v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run_pipeline(args).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Pipeline failed: {}", e);
            eprintln!("\n❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .lessoncraft.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to customize the provider, models, chunking, and more.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Run the complete pipeline. Returns exit code (0 or 2).
async fn run_pipeline(args: Args) -> Result<i32> {
    let start_time = Instant::now();

    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);
    config.validate()?;

    let curriculum = PathBuf::from(&config.general.curriculum);
    let persist_dir = PathBuf::from(&config.general.persist_dir);

    std::fs::create_dir_all("./data").context("Failed to create ./data directory")?;
    std::fs::create_dir_all(&persist_dir).with_context(|| {
        format!(
            "Failed to create vector store directory {}",
            persist_dir.display()
        )
    })?;

    // Handle --dry-run: load and split, no LLM calls
    if args.dry_run {
        return handle_dry_run(&curriculum, &config);
    }

    // Read the API key, looking at .env first
    dotenvy::dotenv().ok();
    let api_key = std::env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty());

    let llm_config = LlmConfig::from_model_config(&config.model, api_key);
    let llm = LlmClient::new(llm_config.clone())?;

    println!("📚 Curriculum: {}", curriculum.display());
    println!("🤖 Provider: {}", llm_config.provider);
    println!("   Chat model: {}", llm_config.chat_model);
    println!("   Embedding model: {}", llm_config.embedding_model);
    println!("   Endpoint: {}", llm_config.base_url);

    let settings = ToolSettings {
        curriculum: curriculum.clone(),
        persist_dir: persist_dir.clone(),
        chunk_size: config.ingest.chunk_size,
        chunk_overlap: config.ingest.chunk_overlap,
        top_k: config.retrieval.top_k,
        temperature: config.model.temperature,
        reindex: args.reindex,
        show_progress: !args.quiet,
    };

    let crew = Crew::new(agent::curriculum_tasks(), ToolExecutor::new(settings, llm))
        .strict(config.general.strict);

    println!("\n🚀 Running {} pipeline steps...\n", crew.tasks().len());
    let output = crew.kickoff().await;

    if config.general.verbose {
        for task in &output.tasks {
            println!("\n--- {} ({}) ---\n{}", task.agent, task.tool, task.raw);
        }
    }

    // Build the report
    println!("\n📝 Generating report...");

    let artifacts = analysis::collect_artifacts(&output.tasks);
    let objective_count = artifacts.objective_count();
    let indexed_chunks = match VectorStore::open(&persist_dir) {
        Ok(store) => store.len(),
        Err(e) => {
            warn!("Could not read vector store for the report: {}", e);
            0
        }
    };

    let duration = start_time.elapsed().as_secs_f64();
    let metadata = ReportMetadata {
        curriculum: curriculum.display().to_string(),
        persist_dir: persist_dir.display().to_string(),
        provider: llm_config.provider.to_string(),
        chat_model: llm_config.chat_model.clone(),
        embedding_model: llm_config.embedding_model.clone(),
        generated_at: Utc::now(),
        indexed_chunks,
        duration_seconds: duration,
    };

    let report = Report {
        metadata,
        tasks: output.tasks,
        topics: artifacts.topics,
        lesson_plans: artifacts.lesson_plans,
        assessments: artifacts.assessments,
        enhancements: artifacts.enhancements,
        result: output.result,
    };

    let rendered = match args.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => {
            report::generate_markdown_report(&report, config.report.include_raw_outputs)
        }
    };

    let output_path = PathBuf::from(&config.report.output);
    report::write_report(&rendered, &output_path)
        .with_context(|| format!("Failed to write report to {}", output_path.display()))?;

    println!("\n=== RESULT ===");
    println!("{}", report.result);

    // Print summary
    println!("\n📊 Pipeline Summary:");
    println!(
        "   Steps: {} run, {} failed",
        report.tasks.len(),
        report.failed_tasks()
    );
    println!("   Indexed chunks: {}", report.metadata.indexed_chunks);
    println!(
        "   Topics: {} ({} objectives) | Lesson plans: {} | Assessments: {}",
        report.topics.len(),
        objective_count,
        report.lesson_plans.len(),
        report.assessments.len()
    );
    println!(
        "   Resources recommended: {}",
        report
            .enhancements
            .iter()
            .map(|e| e.resource_count())
            .sum::<usize>()
    );
    println!("   Duration: {:.1}s", duration);
    println!(
        "\n✅ Pipeline complete! Report saved to: {}",
        output_path.display()
    );

    if let Some(role) = output.halted {
        eprintln!(
            "\n⛔ {} failed and --strict is set. Stopping (exit code 2).",
            role
        );
        return Ok(2);
    }

    Ok(0)
}

/// Handle --dry-run: load and split the curriculum, print what would be indexed.
fn handle_dry_run(curriculum: &Path, config: &Config) -> Result<i32> {
    println!("\n🔍 Dry run: loading and splitting the curriculum (no LLM calls)...\n");

    let splitter = RecursiveTextSplitter::new(config.ingest.chunk_size, config.ingest.chunk_overlap)?;
    let pdfs = ingest::discover_pdfs(curriculum)?;

    let mut total_pages = 0;
    let mut total_chunks = 0;
    for pdf in &pdfs {
        let pages = ingest::load_pdf(pdf)?;
        let chunks = splitter.split_pages(&pages);
        println!(
            "     📄 {} ({} pages, {} chunks)",
            pdf.display(),
            pages.len(),
            chunks.len()
        );
        total_pages += pages.len();
        total_chunks += chunks.len();
    }

    println!(
        "\n   Total: {} files, {} pages, {} chunks",
        pdfs.len(),
        total_pages,
        total_chunks
    );

    println!("\n✅ Dry run complete. No LLM calls were made.");
    Ok(0)
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE_NAME);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
