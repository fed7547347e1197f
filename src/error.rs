//! Error handling for the ColorVis-RS application
//!
//! This module defines the crate error type and a Result alias. Most of the
//! color pipeline never fails (malformed readings degrade to default values),
//! so errors here come from the edges: configuration, data sources and file
//! IO.

use thiserror::Error;

/// Main error type for ColorVis-RS operations
#[derive(Error, Debug)]
pub enum ColorVisError {
    /// Errors related to configuration loading/saving/validation
    #[error("Configuration error: {0}")]
    Config(String),

    /// Errors raised by a snapshot source
    #[error("Source error: {0}")]
    Source(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing errors (snapshot documents)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ColorVisError>,
    },
}

impl ColorVisError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ColorVisError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

/// Result type alias for ColorVis-RS operations
pub type Result<T> = std::result::Result<T, ColorVisError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| ColorVisError::from(e).with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| ColorVisError::from(e).with_context(f()))
    }
}
