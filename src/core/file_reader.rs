//! File content classification
//!
//! A file is either token-countable text, binary (size only), or unreadable.
//! Binary detection is a single rule: a NUL byte anywhere in the content.
//! Invalid UTF-8 without NUL bytes is still text and is decoded lossily.

use std::fs;
use std::path::Path;

/// Outcome of reading one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContent {
    Text(String),
    Binary,
    Unreadable,
}

impl FileContent {
    pub fn text(&self) -> Option<&str> {
        match self {
            FileContent::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Classify raw bytes
pub fn classify(bytes: Vec<u8>) -> FileContent {
    if bytes.contains(&0) {
        return FileContent::Binary;
    }

    match String::from_utf8(bytes) {
        Ok(text) => FileContent::Text(text),
        Err(e) => FileContent::Text(String::from_utf8_lossy(e.as_bytes()).into_owned()),
    }
}

/// Read and classify a file; read failures never propagate
pub fn read_file(path: &Path) -> FileContent {
    match fs::read(path) {
        Ok(bytes) => {
            let content = classify(bytes);
            if content == FileContent::Binary {
                tracing::debug!(path = %path.display(), "binary content, skipping token count");
            }
            content
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "cannot read file");
            FileContent::Unreadable
        }
    }
}
