//! File loaders for txt, pdf and json uploads
//!
//! Each loader turns a file into a single [`Document`]. Failures carry the
//! offending path.

use super::{Document, DocumentFormat};
use crate::errors::{QaError, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Load a document, dispatching on the given format
pub fn load_document(path: &Path, format: DocumentFormat) -> Result<Document> {
    debug!(path = %path.display(), %format, "loading document");
    match format {
        DocumentFormat::Text => load_text(path),
        DocumentFormat::Pdf => load_pdf(path),
        DocumentFormat::Json => load_json(path),
    }
}

/// Load a plain-text file, falling back to Latin-1 when it is not UTF-8
pub fn load_text(path: &Path) -> Result<Document> {
    ensure_exists(path)?;
    let bytes = fs::read(path).map_err(|e| QaError::document_load(path, e))?;

    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            debug!(path = %path.display(), "not valid UTF-8, decoding as Latin-1");
            decode_latin1(err.as_bytes())
        }
    };

    Ok(Document::from(text))
}

/// Extract the text layer of a PDF
pub fn load_pdf(path: &Path) -> Result<Document> {
    ensure_exists(path)?;
    let text = pdf_extract::extract_text(path).map_err(|e| QaError::document_load(path, e))?;
    Ok(Document::from(text.trim()))
}

/// Load a JSON file and re-serialize it as compact text
pub fn load_json(path: &Path) -> Result<Document> {
    ensure_exists(path)?;
    let contents = fs::read_to_string(path).map_err(|e| QaError::document_load(path, e))?;
    let value: serde_json::Value =
        serde_json::from_str(&contents).map_err(|e| QaError::document_load(path, e))?;
    let text = serde_json::to_string(&value)?;
    Ok(Document::from(text))
}

fn ensure_exists(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(QaError::document_load(path, "file does not exist"))
    }
}

// Latin-1 maps every byte to the code point of the same value.
fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}
