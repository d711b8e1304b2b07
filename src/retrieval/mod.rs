//! Threshold retrieval over a handful of documents
//!
//! Every call embeds the question and each document from scratch and keeps
//! the documents whose cosine similarity to the question is strictly above
//! the threshold, in input order. There is no ranking and no top-k.

pub mod retriever;
pub mod similarity;

pub use retriever::{retrieve, Retriever, ScoredDocument};
pub use similarity::cosine_similarity;

use serde::{Deserialize, Serialize};

/// Similarity a document must exceed to be retrieved
pub const DEFAULT_THRESHOLD: f32 = 0.5;

/// What to do when a single document fails to tokenize
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodingPolicy {
    /// Abort the whole retrieval call
    #[default]
    Fail,
    /// Log the failure and leave the document out
    Skip,
}

/// Retrieval parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub threshold: f32,
    pub on_encoding_error: EncodingPolicy,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            on_encoding_error: EncodingPolicy::Fail,
        }
    }
}
