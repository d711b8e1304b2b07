//! Tests against the real encoder (downloads the model on first run)

use docqa::{embedding, retrieve, Document, Embedder};
use docqa::embedding::EmbeddingConfig;

#[test]
#[ignore] // Integration test - requires model download
fn test_shared_embedder_is_loaded_once() {
    let config = EmbeddingConfig::default();
    let first = embedding::shared(&config).expect("Failed to load encoder");
    let second = embedding::shared(&config).expect("Failed to load encoder");
    assert!(std::sync::Arc::ptr_eq(&first, &second));
}

#[test]
#[ignore] // Integration test - requires model download
fn test_capital_of_france_with_real_model() {
    let embedder = embedding::shared(&EmbeddingConfig::default()).expect("Failed to load encoder");
    let documents = vec![
        Document::from("Paris is the capital of France."),
        Document::from(""),
    ];

    let result = retrieve(embedder.as_ref(), "What is the capital of France?", &documents, 0.5)
        .expect("retrieval failed");
    assert_eq!(result, vec![documents[0].clone()]);
}

#[test]
#[ignore] // Integration test - requires model download
fn test_embed_many_matches_embed() {
    let embedder = embedding::shared(&EmbeddingConfig::default()).expect("Failed to load encoder");
    let texts = ["Bananas are yellow.", "Paris is the capital of France."];
    let batch = embedder.embed_many(&texts).unwrap();
    for (text, embedding) in texts.iter().zip(&batch) {
        assert_eq!(&embedder.embed(text).unwrap(), embedding);
    }
}
