// bmtk/src/application/error.rs
use crate::domain::error::DomainError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{0}")]
    Other(String),
}

impl ApplicationError {
    pub fn context<C: Into<String>>(self, context: C) -> Self {
        match self {
            ApplicationError::Other(msg) => {
                ApplicationError::Other(format!("{}: {}", context.into(), msg))
            }
            ApplicationError::Domain(err) => ApplicationError::Domain(err.context(context)),
            ApplicationError::Validation(msg) => {
                ApplicationError::Validation(format!("{}: {}", context.into(), msg))
            }
        }
    }
}

impl From<std::io::Error> for ApplicationError {
    fn from(err: std::io::Error) -> Self {
        ApplicationError::Domain(DomainError::Io(err))
    }
}

pub type ApplicationResult<T> = Result<T, ApplicationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_domain_error_when_adding_context_then_domain_message_is_prefixed() {
        let err: ApplicationError = DomainError::InvalidArgument("top_n".into()).into();

        let err = err.context("words");

        assert_eq!(err.to_string(), "Invalid argument: words: top_n");
    }

    #[test]
    fn given_validation_error_when_adding_context_then_message_is_prefixed() {
        let err = ApplicationError::Validation("no years".into()).context("session");

        assert_eq!(err.to_string(), "Validation failed: session: no years");
    }
}
