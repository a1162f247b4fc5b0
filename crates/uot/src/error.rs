//! Common error types for uot.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::catalog::LanguagePair;

/// Errors that can occur when using uot.
#[derive(Debug, Error)]
pub enum UotError {
    /// Network request failed after all retry attempts.
    #[error("Network error fetching '{url}': {source}")]
    Network {
        url: String,
        #[source]
        source: anyhow::Error,
    },

    /// The remote answered HTTP 404. Never retried.
    #[error("Not found: '{url}' (HTTP 404)")]
    NotFound { url: String },

    /// The package index body could not be parsed.
    #[error("Malformed package index: {reason}")]
    IndexFormat { reason: String },

    /// Reading from or writing to the local model store failed.
    #[error("Storage error at '{}': {source}", .path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// No direct or pivot translation path over the installed models.
    #[error("No translation path from '{from}' to '{to}'. Run 'uot --im' to install models.")]
    NoPath { from: String, to: String },

    /// Language code absent from every installed model.
    #[error("Unknown language code '{code}'. Installed languages: {available}")]
    UnknownLanguage { code: String, available: String },

    /// One hop of the translation chain failed.
    #[error("Translation failed at hop {hop}/{of} ({pair}): {source}")]
    Engine {
        hop: usize,
        of: usize,
        pair: LanguagePair,
        #[source]
        source: anyhow::Error,
    },

    /// There was nothing to translate.
    #[error("No input text to translate")]
    EmptyInput,
}

/// Result type for uot operations.
pub type UotResult<T> = Result<T, UotError>;
