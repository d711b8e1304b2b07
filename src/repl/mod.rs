//! Interactive question prompt
//!
//! The document is loaded once; each question runs retrieval against it and
//! then asks the chat model, unless running in retrieve-only mode.

pub mod display;
pub mod input;

pub use display::DisplayManager;
pub use input::{InputHandler, ReplInput};
