//! Text embeddings
//!
//! An [`Embedder`] maps text to a fixed-length vector. The production
//! implementation is [`BertEmbedder`], a candle BERT encoder with mean
//! pooling; tests plug in deterministic embedders through the same trait.

pub mod engine;

pub use engine::BertEmbedder;

use crate::errors::Result;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Default sentence encoder (BERT architecture, 384-dim)
pub const DEFAULT_MODEL_ID: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// Default Hub revision
pub const DEFAULT_REVISION: &str = "main";

/// Default token budget per input before truncation
pub const DEFAULT_MAX_LENGTH: usize = 512;

/// Fixed-length vector representation of a text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Embedding(Vec<f32>);

impl Embedding {
    /// The all-zero embedding, used for inputs with no content
    pub fn zeros(dimension: usize) -> Self {
        Self(vec![0.0; dimension])
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Euclidean norm, accumulated in `f64`
    pub fn norm(&self) -> f64 {
        self.0
            .iter()
            .map(|&x| f64::from(x) * f64::from(x))
            .sum::<f64>()
            .sqrt()
    }

    /// Zero or non-finite norm; cosine similarity is undefined for these
    pub fn is_degenerate(&self) -> bool {
        let norm = self.norm();
        norm == 0.0 || !norm.is_finite()
    }
}

impl From<Vec<f32>> for Embedding {
    fn from(values: Vec<f32>) -> Self {
        Self(values)
    }
}

/// Converts text into embeddings.
///
/// Implementations must be deterministic and hold no mutable state across
/// calls, so one instance can be shared by every caller.
pub trait Embedder: Send + Sync {
    /// Embed a single text
    fn embed(&self, text: &str) -> Result<Embedding>;

    /// Embed each text independently, preserving order
    fn embed_many(&self, texts: &[&str]) -> Result<Vec<Embedding>> {
        texts.iter().map(|text| self.embed(text)).collect()
    }

    /// Length of every embedding this embedder produces
    fn dimension(&self) -> usize;
}

impl<E: Embedder + ?Sized> Embedder for Arc<E> {
    fn embed(&self, text: &str) -> Result<Embedding> {
        (**self).embed(text)
    }

    fn embed_many(&self, texts: &[&str]) -> Result<Vec<Embedding>> {
        (**self).embed_many(texts)
    }

    fn dimension(&self) -> usize {
        (**self).dimension()
    }
}

/// Encoder selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Hub model id, or a local directory holding config.json,
    /// tokenizer.json and model.safetensors
    pub model_id: String,
    pub revision: String,
    /// Inputs longer than this many tokens are truncated
    pub max_length: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model_id: DEFAULT_MODEL_ID.to_string(),
            revision: DEFAULT_REVISION.to_string(),
            max_length: DEFAULT_MAX_LENGTH,
        }
    }
}

static SHARED: OnceCell<Arc<BertEmbedder>> = OnceCell::new();

/// Process-wide encoder, loaded on first use.
///
/// The first successful call decides the model; later calls get the same
/// instance whatever config they pass. A failed load leaves the cell empty
/// so the next call tries again.
pub fn shared(config: &EmbeddingConfig) -> Result<Arc<BertEmbedder>> {
    let embedder = SHARED.get_or_try_init(|| BertEmbedder::load(config).map(Arc::new))?;
    if embedder.model_id() != config.model_id {
        tracing::warn!(
            loaded = embedder.model_id(),
            requested = %config.model_id,
            "shared embedder already initialized with a different model"
        );
    }
    Ok(Arc::clone(embedder))
}
