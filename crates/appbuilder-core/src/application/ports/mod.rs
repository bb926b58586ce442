//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `appbuilder-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: File operations
//!   - `TemplateLoader`: Template directory lookup (embedded or on disk)
//!   - `TemplateRenderer`: Token substitution over a template tree
//!   - `XmlParser`: Text → owned `Element` tree
//!   - `ProjectRecordStore`: The `.rumi` project record
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{Filesystem, ProjectRecordStore, TemplateLoader, TemplateRenderer, XmlParser};

#[cfg(test)]
pub use output::{
    MockFilesystem, MockProjectRecordStore, MockTemplateLoader, MockTemplateRenderer,
    MockXmlParser,
};
