//! docqa - question answering over an uploaded document
//!
//! A document (txt, pdf or json) and a question are embedded with a BERT
//! encoder; the document is used as context when its cosine similarity to
//! the question exceeds a threshold, and a hosted chat model answers.
//!
//! # Architecture
//!
//! - **embedding**: text to mean-pooled encoder vectors
//! - **retrieval**: cosine-similarity threshold filter
//! - **rag** / **llm**: prompt assembly and the chat-completions client
//! - **document**, **cli**, **repl**, **telemetry**: the application shell

pub mod errors;

pub use errors::{QaError, Result};

pub mod document;
pub mod embedding;
pub mod retrieval;

pub mod llm;
pub mod rag;

pub mod cli;
pub mod repl;
pub mod telemetry;

pub use document::{Document, DocumentFormat};
pub use embedding::{BertEmbedder, Embedder, Embedding};
pub use retrieval::{retrieve, Retriever};
