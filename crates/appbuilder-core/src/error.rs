//! Root error type returned by every public operation of the crate.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::{self, DomainError};

#[derive(Debug, Error, Clone)]
pub enum AppBuilderError {
    /// A rule about names, parameters, identifiers or documents was broken.
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Templates, files or project records could not be used.
    #[error("Application error: {0}")]
    Application(#[from] ApplicationError),

    /// An invariant of this crate did not hold.
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl AppBuilderError {
    /// Hints shown under the error message.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Internal { .. } => vec![
                "This appears to be a bug in AppBuilder".into(),
                "Re-run with -vv and include the log when reporting it".into(),
            ],
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                domain::ErrorCategory::Validation => ErrorCategory::Validation,
                domain::ErrorCategory::Conflict | domain::ErrorCategory::Exhausted => {
                    ErrorCategory::Conflict
                }
                domain::ErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Coarse classification used by front ends to pick exit codes and styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Conflict,
    NotFound,
    Internal,
}

pub type AppBuilderResult<T> = Result<T, AppBuilderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhausted_allocator_is_a_conflict() {
        let err: AppBuilderError = DomainError::IdentifiersExhausted { max: 32767 }.into();
        assert_eq!(err.category(), ErrorCategory::Conflict);
    }

    #[test]
    fn missing_template_is_not_found() {
        let err: AppBuilderError = ApplicationError::TemplateNotFound {
            path: "templates/maven/app".into(),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::NotFound);
        assert!(!err.suggestions().is_empty());
    }

    #[test]
    fn internal_errors_ask_for_a_report() {
        let err = AppBuilderError::Internal {
            message: "allocator returned 1 ids, expected 2".into(),
        };
        assert_eq!(err.category(), ErrorCategory::Internal);
        assert!(err.to_string().contains("This is a bug"));
    }
}
