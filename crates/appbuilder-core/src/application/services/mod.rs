//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "create an application" or "add a service".

pub mod config_service;
pub mod identifier_service;
pub mod scaffold_service;
pub mod template_service;

pub use config_service::ConfigInjector;
pub use identifier_service::FactoryIdAllocator;
pub use scaffold_service::{ScaffoldService, ServiceReport};
pub use template_service::TemplateService;
