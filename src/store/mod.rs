//! Persisted vector index of curriculum chunks.
//!
//! The index is a single JSON file (`index.json`) inside the persist
//! directory, holding every chunk with its embedding. Search is a brute-force
//! cosine similarity scan, which is plenty for one curriculum.

use crate::ingest::Chunk;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// File name of the index inside the persist directory.
pub const INDEX_FILE: &str = "index.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Vector store I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt vector index {}: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Chunk count ({chunks}) does not match embedding count ({embeddings})")]
    LengthMismatch { chunks: usize, embeddings: usize },

    #[error("Embedding dimension {got} does not match index dimension {expected}")]
    DimensionMismatch { expected: usize, got: usize },
}

/// A chunk stored together with its embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredChunk {
    pub id: String,
    pub source: String,
    pub page: usize,
    pub text: String,
    pub embedding: Vec<f32>,
}

/// A search hit.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredChunk {
    pub chunk: StoredChunk,
    pub score: f32,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct IndexFile {
    #[serde(default)]
    embedding_model: String,
    #[serde(default)]
    chunks: Vec<StoredChunk>,
}

/// Vector index bound to a persist directory.
#[derive(Debug)]
pub struct VectorStore {
    persist_dir: PathBuf,
    index: IndexFile,
}

impl VectorStore {
    /// Open the index in `persist_dir`, starting empty if no index file exists.
    pub fn open(persist_dir: &Path) -> Result<Self, StoreError> {
        let path = persist_dir.join(INDEX_FILE);

        let index = if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;
            serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
                path: path.clone(),
                source,
            })?
        } else {
            IndexFile::default()
        };

        debug!(
            "Opened vector store at {} with {} chunks",
            persist_dir.display(),
            index.chunks.len()
        );

        Ok(Self {
            persist_dir: persist_dir.to_path_buf(),
            index,
        })
    }

    /// A new, empty index for `persist_dir`. Any index already on disk is
    /// ignored and replaced by the next [`persist`](Self::persist).
    pub fn empty(persist_dir: &Path) -> Self {
        Self {
            persist_dir: persist_dir.to_path_buf(),
            index: IndexFile::default(),
        }
    }

    /// Cheap check used before ingestion: does a non-empty index already exist?
    ///
    /// Unreadable or corrupt indexes count as empty.
    pub fn has_content(persist_dir: &Path) -> bool {
        if !persist_dir.join(INDEX_FILE).exists() {
            return false;
        }
        match Self::open(persist_dir) {
            Ok(store) => !store.is_empty(),
            Err(e) => {
                debug!("Error checking vector store: {}", e);
                false
            }
        }
    }

    pub fn len(&self) -> usize {
        self.index.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.chunks.is_empty()
    }

    pub fn embedding_model(&self) -> &str {
        &self.index.embedding_model
    }


    /// Add chunks with their embeddings.
    pub fn add(
        &mut self,
        chunks: &[Chunk],
        embeddings: Vec<Vec<f32>>,
        embedding_model: &str,
    ) -> Result<usize, StoreError> {
        if chunks.len() != embeddings.len() {
            return Err(StoreError::LengthMismatch {
                chunks: chunks.len(),
                embeddings: embeddings.len(),
            });
        }

        let expected = self
            .index
            .chunks
            .first()
            .map(|c| c.embedding.len())
            .or_else(|| embeddings.first().map(Vec::len));
        if let Some(expected) = expected {
            if let Some(bad) = embeddings.iter().find(|e| e.len() != expected) {
                return Err(StoreError::DimensionMismatch {
                    expected,
                    got: bad.len(),
                });
            }
        }

        self.index.embedding_model = embedding_model.to_string();
        for (chunk, embedding) in chunks.iter().zip(embeddings) {
            self.index.chunks.push(StoredChunk {
                id: format!("{}#p{}-c{}", chunk.source, chunk.page, chunk.index),
                source: chunk.source.clone(),
                page: chunk.page,
                text: chunk.text.clone(),
                embedding,
            });
        }

        Ok(chunks.len())
    }

    /// Write the index to disk atomically.
    pub fn persist(&self) -> Result<PathBuf, StoreError> {
        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source: std::io::Error| StoreError::Io { path, source }
        };

        std::fs::create_dir_all(&self.persist_dir).map_err(io_err(&self.persist_dir))?;

        let target = self.persist_dir.join(INDEX_FILE);
        let json = serde_json::to_vec(&self.index).map_err(|source| StoreError::Corrupt {
            path: target.clone(),
            source,
        })?;

        let mut tmp = tempfile::NamedTempFile::new_in(&self.persist_dir)
            .map_err(io_err(&self.persist_dir))?;
        tmp.write_all(&json).map_err(io_err(&target))?;
        tmp.persist(&target)
            .map_err(|e| StoreError::Io {
                path: target.clone(),
                source: e.error,
            })?;

        info!("Persisted {} chunks to {}", self.len(), target.display());
        Ok(target)
    }

    /// Return the `k` chunks most similar to `query`, best first.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<ScoredChunk> {
        let mut scored: Vec<ScoredChunk> = self
            .index
            .chunks
            .iter()
            .map(|chunk| ScoredChunk {
                score: cosine_similarity(query, &chunk.embedding),
                chunk: chunk.clone(),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(k);
        scored
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}
