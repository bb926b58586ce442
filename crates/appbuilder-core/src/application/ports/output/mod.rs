//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `appbuilder-adapters` crate provides implementations.

use std::path::{Path, PathBuf};

use crate::domain::{AppParams, Element, ProjectStructure, TemplateTree, TokenMap, XmlDocument};
use crate::error::AppBuilderResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `appbuilder_adapters::filesystem::LocalFilesystem` (production)
/// - `appbuilder_adapters::filesystem::MemoryFilesystem` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> AppBuilderResult<()>;

    /// Write content to a file, replacing it if present.
    fn write_file(&self, path: &Path, content: &str) -> AppBuilderResult<()>;

    /// Read a whole file as UTF-8.
    fn read_to_string(&self, path: &Path) -> AppBuilderResult<String>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Every regular file under `root`, recursively, sorted.
    fn list_files(&self, root: &Path) -> AppBuilderResult<Vec<PathBuf>>;
}

/// Port for locating template directories.
///
/// `template_path` is relative to the template root, e.g. `maven/app` or
/// `maven/config/processor/sr`.
///
/// Implemented by:
/// - `appbuilder_adapters::EmbeddedTemplateLoader` (built-in templates)
/// - `appbuilder_adapters::DirectoryTemplateLoader` (templates on disk)
#[cfg_attr(test, mockall::automock)]
pub trait TemplateLoader: Send + Sync {
    /// Load every entry under `template_path`.
    ///
    /// A missing or empty template is `ApplicationError::TemplateNotFound`.
    fn load(&self, template_path: &str) -> AppBuilderResult<TemplateTree>;
}

/// Port for template rendering.
///
/// Implemented by:
/// - `appbuilder_adapters::renderer::TokenRenderer` (delimiter substitution)
#[cfg_attr(test, mockall::automock)]
pub trait TemplateRenderer: Send + Sync {
    /// Substitute tokens in every path and file body of `tree`.
    ///
    /// # Arguments
    ///
    /// * `tree` - The loaded template
    /// * `tokens` - Substitution values
    /// * `output_root` - Root directory for output paths
    fn render(
        &self,
        tree: &TemplateTree,
        tokens: &TokenMap,
        output_root: &Path,
    ) -> AppBuilderResult<ProjectStructure>;
}

/// Port for XML parsing.
///
/// Implemented by:
/// - `appbuilder_adapters::xml::XotParser`
#[cfg_attr(test, mockall::automock)]
pub trait XmlParser: Send + Sync {
    /// Parse `text` into a document, keeping the comments and processing
    /// instructions around the document element. `source` names the input
    /// in error messages.
    fn parse_document(&self, text: &str, source: &str) -> AppBuilderResult<XmlDocument>;

    /// Parse `text` into its document element alone.
    fn parse(&self, text: &str, source: &str) -> AppBuilderResult<Element> {
        self.parse_document(text, source).map(|document| document.root)
    }
}

/// Port for the persisted project record.
///
/// Implemented by:
/// - `appbuilder_adapters::project_record::JsonProjectRecordStore`
#[cfg_attr(test, mockall::automock)]
pub trait ProjectRecordStore: Send + Sync {
    /// True when `app_root` carries a project record.
    fn exists(&self, app_root: &Path) -> bool;

    /// Read the record; `ApplicationError::NotAnApplication` when absent.
    fn read(&self, app_root: &Path) -> AppBuilderResult<AppParams>;

    /// Write (or replace) the record.
    fn write(&self, app_root: &Path, params: &AppParams) -> AppBuilderResult<()>;
}
