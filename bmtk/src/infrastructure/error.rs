// bmtk/src/infrastructure/error.rs
use crate::domain::error::DomainError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("cannot decode as {encoding}: {message}")]
    Decode { encoding: String, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("File system error: {0}")]
    FileSystem(String),
}

impl InfrastructureError {
    pub fn decode<E: Into<String>, M: Into<String>>(encoding: E, message: M) -> Self {
        InfrastructureError::Decode {
            encoding: encoding.into(),
            message: message.into(),
        }
    }
}

impl From<csv::Error> for InfrastructureError {
    fn from(error: csv::Error) -> Self {
        InfrastructureError::Parse(format!("CSV: {}", error))
    }
}

impl From<serde_json::Error> for InfrastructureError {
    fn from(error: serde_json::Error) -> Self {
        InfrastructureError::Parse(format!("JSON: {}", error))
    }
}

// Implement conversion from infrastructure errors to domain errors
impl From<InfrastructureError> for DomainError {
    fn from(error: InfrastructureError) -> Self {
        match error {
            e @ InfrastructureError::Decode { .. } => DomainError::DecodeFailure(e.to_string()),
            InfrastructureError::Parse(msg) => DomainError::LoadFailure(msg),
            InfrastructureError::Serialization(msg) => DomainError::Export(msg),
            InfrastructureError::FileSystem(msg) => DomainError::LoadFailure(msg),
        }
    }
}
