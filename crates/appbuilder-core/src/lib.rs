//! AppBuilder Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the AppBuilder
//! project scaffolder, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │         appbuilder-cli (CLI)            │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (ScaffoldService, TemplateService,     │
//! │   FactoryIdAllocator, ConfigInjector)   │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Filesystem, TemplateLoader, XmlParser, │
//! │  TemplateRenderer, ProjectRecordStore)  │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │   appbuilder-adapters (Infrastructure)  │
//! │ (LocalFilesystem, XotParser, loaders)   │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │  (TokenMap, Element, ConfigMerger,      │
//! │   identifier allocation, params)        │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use appbuilder_core::prelude::*;
//!
//! let mut config = Element::new("config");
//! let fragment = Fragment::new(
//!     InsertionPath::from_segments(["profiles", "dev"]),
//!     Element::new("app").with_attribute("name", "orders"),
//! );
//!
//! let report = ConfigMerger::new().merge(&mut config, vec![fragment]);
//! assert_eq!(report.injected(), 1);
//! ```

// Domain layer (pure logic, no I/O)
pub mod domain;

// Application layer (ports + orchestration)
pub mod application;

// Root error types
pub mod error;

/// Types most callers need.
pub mod prelude {
    pub use crate::application::{
        ConfigInjector, FactoryIdAllocator, ScaffoldService, TemplateService,
        ports::{Filesystem, ProjectRecordStore, TemplateLoader, TemplateRenderer, XmlParser},
    };
    pub use crate::domain::{
        AppParams, ConfigMerger, Element, Fragment, InsertionPath, MergeMode, MergeOutcome,
        MergeReport, ServiceParams, TokenMap, XmlDocument, XmlNode,
    };
    pub use crate::error::{AppBuilderError, AppBuilderResult};
}
