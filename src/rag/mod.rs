// Retrieval-augmented answering
//
// Components:
// - Context: join retrieved documents and render the prompt
// - Pipeline: retrieve -> prompt -> chat model

pub mod context;
pub mod pipeline;

pub use context::{build_context, PromptTemplate, NO_CONTEXT_PLACEHOLDER};
pub use pipeline::{Answer, QaPipeline};
