//! Pipeline-specific error types.

use crate::error::ColorVisError;
use thiserror::Error;

/// Errors that can occur while setting up or feeding the pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Source {source_name} error: {message}")]
    Source {
        source_name: String,
        message: String,
    },

    #[error("Invalid window configuration: {0}")]
    InvalidConfig(String),
}

pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

impl PipelineError {
    pub fn source_error(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        PipelineError::Source {
            source_name: source_name.into(),
            message: message.into(),
        }
    }
}

impl From<PipelineError> for ColorVisError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::InvalidConfig(msg) => ColorVisError::Config(msg),
            source @ PipelineError::Source { .. } => ColorVisError::Source(source.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_crate_error() {
        let err: ColorVisError = PipelineError::InvalidConfig("capacity must be at least 1".into()).into();
        assert!(matches!(err, ColorVisError::Config(ref msg) if msg == "capacity must be at least 1"));

        let err: ColorVisError = PipelineError::source_error("json-file", "unreadable").into();
        assert!(matches!(err, ColorVisError::Source(ref msg) if msg == "Source json-file error: unreadable"));
    }
}
