// bmtk/src/domain/error.rs
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to decode file: {0}")]
    DecodeFailure(String),

    #[error("Schema error: {message}")]
    SchemaError {
        message: String,
        /// Required column names absent from the input, sorted
        missing: Vec<String>,
    },

    #[error("Failed to load bookmarks: {0}")]
    LoadFailure(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Export failed: {0}")]
    Export(String),

    #[error("Morphological analyzer unavailable: {0}")]
    Analyzer(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    pub fn missing_columns(missing: Vec<String>) -> Self {
        DomainError::SchemaError {
            message: format!("Missing required columns: {}", missing.join(", ")),
            missing,
        }
    }

    pub fn schema<S: Into<String>>(message: S) -> Self {
        DomainError::SchemaError {
            message: message.into(),
            missing: Vec::new(),
        }
    }

    /// Prefix the human readable message with the given context
    pub fn context<C: Into<String>>(self, context: C) -> Self {
        let context = context.into();
        match self {
            DomainError::DecodeFailure(msg) => {
                DomainError::DecodeFailure(format!("{}: {}", context, msg))
            }
            DomainError::LoadFailure(msg) => {
                DomainError::LoadFailure(format!("{}: {}", context, msg))
            }
            DomainError::InvalidArgument(msg) => {
                DomainError::InvalidArgument(format!("{}: {}", context, msg))
            }
            DomainError::Export(msg) => DomainError::Export(format!("{}: {}", context, msg)),
            DomainError::SchemaError { message, missing } => DomainError::SchemaError {
                message: format!("{}: {}", context, message),
                missing,
            },
            err => err,
        }
    }
}
