//! Curriculum ingestion: PDF loading and text splitting.

pub mod pdf;
pub mod splitter;

pub use pdf::{discover_pdfs, load_pdf, Page};
pub use splitter::{Chunk, RecursiveTextSplitter};

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading or splitting curriculum documents.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Curriculum PDF not found at: {}", .0.display())]
    NotFound(PathBuf),

    #[error("File at {} is not a PDF file.", .0.display())]
    NotPdf(PathBuf),

    #[error("No PDF files found in {}", .0.display())]
    EmptyDirectory(PathBuf),

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse PDF {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Invalid splitter settings: {0}")]
    InvalidSplitter(String),
}
