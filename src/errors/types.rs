//! Error type definitions for the poster enrichment run
//!
//! Everything that can abort a run funnels into [`AppError`]. Lookup and
//! refresh failures never reach it: they degrade to data or to a
//! warning.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Filesystem failures while reading or writing guide, cache or log files
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Filesystem failures tied to a specific path
    #[error("I/O error on {path}: {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// XML reader/writer failures
    #[error("XML error in {context}: {message}")]
    Xml { context: String, message: String },

    /// Structurally invalid guide documents
    #[error("Invalid guide document: {message}")]
    Document { message: String },

    /// Poster cache file could not be decoded
    #[error("Poster cache {path} is malformed: {source}")]
    Cache {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// JSON encoding errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Configuration file could not be parsed
    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration file could not be rendered
    #[error("Configuration encode error: {0}")]
    ConfigEncode(#[from] toml::ser::Error),

    /// HTTP client construction errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Convenience methods for creating common error types
impl AppError {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a document structure error
    pub fn document<S: Into<String>>(message: S) -> Self {
        Self::Document {
            message: message.into(),
        }
    }

    /// Wrap an XML reader or writer failure with the place it happened
    pub fn xml<C: Into<String>, E: std::fmt::Display>(context: C, error: E) -> Self {
        Self::Xml {
            context: context.into(),
            message: error.to_string(),
        }
    }

    /// Attach a path to an I/O failure
    pub fn file_access(path: &Path, source: std::io::Error) -> Self {
        Self::FileAccess {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Wrap a cache decode failure
    pub fn cache(path: &Path, source: serde_json::Error) -> Self {
        Self::Cache {
            path: path.to_path_buf(),
            source,
        }
    }
}
