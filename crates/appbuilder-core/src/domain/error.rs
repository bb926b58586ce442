use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (for retry logic)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },

    #[error("Unsupported {kind}: '{value}'")]
    UnsupportedValue { kind: &'static str, value: String },

    #[error("Invalid service configuration: {reason}")]
    InvalidService { reason: String },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    #[error("Duplicate path in rendered output: {path}")]
    DuplicatePath { path: String },

    // ========================================================================
    // Identifier Errors
    // ========================================================================
    #[error("Malformed factory id '{value}' in {source_file}")]
    MalformedIdentifier { source_file: String, value: String },

    #[error("Exceeded maximum allowable factory id ({max})")]
    IdentifiersExhausted { max: u16 },

    // ========================================================================
    // Build Descriptor Errors
    // ========================================================================
    #[error("Could not find module line for '{module}' in pom.xml")]
    PomAnchorNotFound { module: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::MissingRequiredField { field } => vec![
                format!("Provide a value for '{}'", field),
                "Use --help to see the required options".into(),
            ],
            Self::UnsupportedValue { kind, value } => vec![
                format!("'{}' is not a recognised {}", value, kind),
                "Use --help to list the accepted values".into(),
            ],
            Self::MalformedIdentifier { source_file, value } => vec![
                format!("Fix the factory id '{}' in {}", value, source_file),
                "Factory ids must be integers between 1 and 32767".into(),
            ],
            Self::IdentifiersExhausted { max } => vec![
                format!("All factory ids up to {} are in use", max),
                "Remove unused models to free identifiers".into(),
            ],
            Self::PomAnchorNotFound { module } => vec![
                format!("Add <module>{}</module> to the parent pom.xml", module),
                "The service module is inserted right before the system module".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingRequiredField { .. }
            | Self::UnsupportedValue { .. }
            | Self::InvalidService { .. }
            | Self::AbsolutePathNotAllowed { .. }
            | Self::MalformedIdentifier { .. } => ErrorCategory::Validation,
            Self::DuplicatePath { .. } | Self::PomAnchorNotFound { .. } => ErrorCategory::Conflict,
            Self::IdentifiersExhausted { .. } => ErrorCategory::Exhausted,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Conflict,
    Exhausted,
    Internal,
}
