//! Infrastructure adapters for AppBuilder.
//!
//! This crate implements the ports defined in `appbuilder-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod builtin_templates;
pub mod filesystem;
pub mod project_record;
pub mod renderer;
pub mod template_loader;
pub mod xml;

// Re-export commonly used adapters
pub use builtin_templates::EmbeddedTemplateLoader;
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use project_record::JsonProjectRecordStore;
pub use renderer::TokenRenderer;
pub use template_loader::{
    DirectoryTemplateLoader, TEMPLATES_DIR_ENV, TemplateSource, resolve_template_loader,
};
pub use xml::XotParser;
