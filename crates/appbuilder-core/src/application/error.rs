//! Application layer errors.
//!
//! These errors represent failures in orchestration, not business logic.
//! Business logic errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// Template directory missing or empty.
    #[error("Template not found: {path}")]
    TemplateNotFound { path: String },

    /// Template rendering failed.
    #[error("Template rendering failed: {reason}")]
    RenderingFailed { reason: String },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// A document could not be parsed as XML.
    #[error("Failed to parse XML in {file}: {reason}")]
    XmlParse { file: String, reason: String },

    /// A configuration fragment is not well-formed; nothing was merged.
    #[error("Failed to parse configuration fragment {fragment}: {reason}")]
    FragmentParse { fragment: String, reason: String },

    /// Application already exists at target location.
    #[error("An application already exists at {path}")]
    ProjectExists { path: PathBuf },

    /// Target exists but holds no project record.
    #[error("Directory {path} already exists but is not an application")]
    DirectoryExists { path: PathBuf },

    /// No project record at the given root.
    #[error("{path} is not a valid application root")]
    NotAnApplication { path: PathBuf },

    /// A directory the request depends on is missing.
    #[error("Directory does not exist: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Project record present but unreadable.
    #[error("Corrupt project record at {path}: {reason}")]
    CorruptRecord { path: PathBuf, reason: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::TemplateNotFound { path } => vec![
                format!("No template at '{}'", path),
                "Check --templates-dir or APPBUILDER_TEMPLATES_DIR".into(),
                "Omit both to use the built-in templates".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the parent directory exists".into(),
            ],
            Self::XmlParse { file, .. } => vec![
                format!("Fix the XML in {}", file),
                "The file must be well-formed with a single root element".into(),
            ],
            Self::FragmentParse { fragment, .. } => vec![
                format!("Fix the config template {}", fragment),
                "The configuration document was left untouched".into(),
            ],
            Self::ProjectExists { path } => vec![
                format!("Application already exists: {}", path.display()),
                "Use 'appbuilder add-service' to extend it".into(),
                "Or choose a different application name".into(),
            ],
            Self::DirectoryExists { path } => vec![
                format!("Remove or rename {}", path.display()),
                "Or choose a different application name or artifact prefix".into(),
            ],
            Self::NotAnApplication { path } => vec![
                format!("No .rumi record in {}", path.display()),
                "Pass the application root with --app-root".into(),
            ],
            Self::DirectoryNotFound { path } => vec![
                format!("Create {} first", path.display()),
            ],
            _ => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::TemplateNotFound { .. }
            | Self::NotAnApplication { .. }
            | Self::DirectoryNotFound { .. } => ErrorCategory::NotFound,
            Self::FilesystemError { .. } | Self::RenderingFailed { .. } => ErrorCategory::Internal,
            Self::XmlParse { .. } | Self::FragmentParse { .. } | Self::CorruptRecord { .. } => {
                ErrorCategory::Validation
            }
            Self::ProjectExists { .. } | Self::DirectoryExists { .. } => ErrorCategory::Conflict,
        }
    }
}
