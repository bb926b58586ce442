//! Core domain layer for AppBuilder.
//!
//! Pure logic only: token substitution, naming rules, the owned XML tree and
//! its structural merge, factory-id gap allocation and the project/service
//! parameter model. Parsing XML text, walking template directories and
//! touching the disk all happen behind ports in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **Minimal crates**: std + thiserror + serde derives + tracing events
//! - **Owned trees**: `Element` owns its children, no back-references

pub mod entities;
pub mod error;
pub mod identifiers;
pub mod merge;
pub mod naming;
pub mod pom;
pub mod tokens;
pub mod value_objects;

pub use entities::{
    common::RelativePath,
    insertion_path::InsertionPath,
    params::{AppParams, ServiceParams},
    project_structure::{DirectoryToCreate, FileToWrite, FsEntry, ProjectStructure},
    template::{TemplateNode, TemplateTree},
    xml::{Element, XmlDocument, XmlNode},
};

pub use error::{DomainError, ErrorCategory};
pub use identifiers::{
    MAX_FACTORY_ID, MODEL_NAMESPACE, MODELS_DIR, available_ids, factory_ids, is_model_document,
    parse_factory_id,
};
pub use merge::{ConfigMerger, Fragment, MergeMode, MergeOutcome, MergeReport};
pub use pom::insert_module;
pub use tokens::{TOKEN_PREFIX, TOKEN_SUFFIX, TokenMap, TokenMapBuilder, to_token};
pub use value_objects::{BuildTool, EncodingType, MessagingProvider, ServiceHaModel, ServiceType};
