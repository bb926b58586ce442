pub mod common;
pub mod insertion_path;
pub mod params;
pub mod project_structure;
pub mod template;
pub mod xml;

pub use crate::domain::DomainError;
pub use insertion_path::InsertionPath;
pub use params::{AppParams, ServiceParams};
pub use project_structure::ProjectStructure;
pub use template::TemplateTree;
pub use xml::{Element, XmlDocument, XmlNode};
