//! Deterministic embedders shared by the integration tests

#![allow(dead_code)]

use docqa::{Document, Embedder, Embedding, Result};

/// Bag of words over a fixed vocabulary; words outside it are ignored
pub struct KeywordEmbedder {
    vocabulary: Vec<String>,
}

impl KeywordEmbedder {
    pub fn new(words: &[&str]) -> Self {
        Self {
            vocabulary: words.iter().map(|w| w.to_lowercase()).collect(),
        }
    }

    /// Vocabulary covering every word in the given texts
    pub fn covering(texts: &[&str]) -> Self {
        let mut words: Vec<String> = texts.iter().flat_map(|t| tokens(t)).collect();
        words.sort();
        words.dedup();
        Self { vocabulary: words }
    }
}

impl Embedder for KeywordEmbedder {
    fn embed(&self, text: &str) -> Result<Embedding> {
        let mut counts = vec![0.0f32; self.vocabulary.len()];
        for token in tokens(text) {
            if let Some(i) = self.vocabulary.iter().position(|w| *w == token) {
                counts[i] += 1.0;
            }
        }
        Ok(Embedding::from(counts))
    }

    fn dimension(&self) -> usize {
        self.vocabulary.len()
    }
}

/// Letter and digit histogram; any other character is ignored
pub struct CharHistogramEmbedder;

impl Embedder for CharHistogramEmbedder {
    fn embed(&self, text: &str) -> Result<Embedding> {
        let mut counts = vec![0.0f32; 36];
        for c in text.chars().map(|c| c.to_ascii_lowercase()) {
            if let Some(i) = bucket(c) {
                counts[i] += 1.0;
            }
        }
        Ok(Embedding::from(counts))
    }

    fn dimension(&self) -> usize {
        36
    }
}

fn bucket(c: char) -> Option<usize> {
    match c {
        'a'..='z' => Some(c as usize - 'a' as usize),
        '0'..='9' => Some(26 + c as usize - '0' as usize),
        _ => None,
    }
}

fn tokens(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

pub fn docs(texts: &[&str]) -> Vec<Document> {
    texts.iter().map(|t| Document::from(*t)).collect()
}

/// True when `sub` appears in `full` in the same relative order
pub fn is_subsequence(sub: &[Document], full: &[Document]) -> bool {
    let mut remaining = full.iter();
    sub.iter().all(|item| remaining.any(|candidate| candidate == item))
}
