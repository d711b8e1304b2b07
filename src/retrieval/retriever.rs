// Retriever: embed, compare, filter
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::{cosine_similarity, EncodingPolicy, RetrievalConfig};
use crate::document::Document;
use crate::embedding::{Embedder, Embedding};
use crate::errors::{QaError, Result};

/// A document together with its similarity to the question.
///
/// `similarity` is `None` when it is undefined (degenerate embedding) or
/// when the document was skipped after an encoding failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredDocument {
    pub index: usize,
    pub document: Document,
    pub similarity: Option<f32>,
}

impl ScoredDocument {
    /// Strictly above the threshold; undefined similarity never passes
    pub fn passes(&self, threshold: f32) -> bool {
        passes(self.similarity, threshold)
    }
}

/// Selects the documents relevant to a question
pub struct Retriever<E: Embedder> {
    embedder: Arc<E>,
    config: RetrievalConfig,
}

impl<E: Embedder> Retriever<E> {
    /// Create retriever with the default threshold
    pub fn new(embedder: Arc<E>) -> Self {
        Self::with_config(embedder, RetrievalConfig::default())
    }

    /// Create with custom parameters
    pub fn with_config(embedder: Arc<E>, config: RetrievalConfig) -> Self {
        Self { embedder, config }
    }

    pub fn threshold(&self) -> f32 {
        self.config.threshold
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    pub fn embedder(&self) -> &Arc<E> {
        &self.embedder
    }

    /// Documents whose similarity to `question` exceeds the configured threshold
    pub fn retrieve(&self, question: &str, documents: &[Document]) -> Result<Vec<Document>> {
        self.retrieve_with_threshold(question, documents, self.config.threshold)
    }

    /// Same as [`retrieve`](Self::retrieve) with an explicit threshold
    pub fn retrieve_with_threshold(
        &self,
        question: &str,
        documents: &[Document],
        threshold: f32,
    ) -> Result<Vec<Document>> {
        let similarities = similarities(
            self.embedder.as_ref(),
            question,
            documents,
            self.config.on_encoding_error,
        )?;
        Ok(select(documents, &similarities, threshold))
    }

    /// Every document with its similarity, in input order
    pub fn score(&self, question: &str, documents: &[Document]) -> Result<Vec<ScoredDocument>> {
        let similarities = similarities(
            self.embedder.as_ref(),
            question,
            documents,
            self.config.on_encoding_error,
        )?;
        Ok(documents
            .iter()
            .zip(similarities)
            .enumerate()
            .map(|(index, (document, similarity))| ScoredDocument {
                index,
                document: document.clone(),
                similarity,
            })
            .collect())
    }
}

/// One-shot retrieval against any embedder; encoding errors propagate
pub fn retrieve<E: Embedder + ?Sized>(
    embedder: &E,
    question: &str,
    documents: &[Document],
    threshold: f32,
) -> Result<Vec<Document>> {
    let similarities = similarities(embedder, question, documents, EncodingPolicy::Fail)?;
    Ok(select(documents, &similarities, threshold))
}

fn passes(similarity: Option<f32>, threshold: f32) -> bool {
    matches!(similarity, Some(s) if s > threshold)
}

fn select(documents: &[Document], similarities: &[Option<f32>], threshold: f32) -> Vec<Document> {
    let selected: Vec<Document> = documents
        .iter()
        .zip(similarities)
        .filter(|(_, similarity)| passes(**similarity, threshold))
        .map(|(document, _)| document.clone())
        .collect();

    info!(
        candidates = documents.len(),
        retrieved = selected.len(),
        threshold,
        "retrieval complete"
    );
    selected
}

fn similarities<E: Embedder + ?Sized>(
    embedder: &E,
    question: &str,
    documents: &[Document],
    policy: EncodingPolicy,
) -> Result<Vec<Option<f32>>> {
    if question.trim().is_empty() {
        return Err(QaError::EmptyQuestion);
    }
    if documents.is_empty() {
        return Ok(Vec::new());
    }

    let query = embedder.embed(question)?;
    let embeddings = embed_documents(embedder, documents, policy)?;

    embeddings
        .iter()
        .enumerate()
        .map(|(index, embedding)| {
            let Some(embedding) = embedding else {
                return Ok(None);
            };
            if embedding.len() != query.len() {
                return Err(QaError::DimensionMismatch {
                    expected: query.len(),
                    actual: embedding.len(),
                });
            }
            let similarity = cosine_similarity(query.as_slice(), embedding.as_slice());
            debug!(index, ?similarity, "document scored");
            Ok(similarity)
        })
        .collect()
}

fn embed_documents<E: Embedder + ?Sized>(
    embedder: &E,
    documents: &[Document],
    policy: EncodingPolicy,
) -> Result<Vec<Option<Embedding>>> {
    match policy {
        EncodingPolicy::Fail => {
            let texts: Vec<&str> = documents.iter().map(Document::text).collect();
            Ok(embedder.embed_many(&texts)?.into_iter().map(Some).collect())
        }
        EncodingPolicy::Skip => documents
            .iter()
            .enumerate()
            .map(|(index, document)| match embedder.embed(document.text()) {
                Ok(embedding) => Ok(Some(embedding)),
                Err(QaError::Encoding(reason)) => {
                    warn!(index, %reason, "skipping document that failed to encode");
                    Ok(None)
                }
                Err(err) => Err(err),
            })
            .collect(),
    }
}
