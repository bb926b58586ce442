//! Scaffold Service - main application orchestrator.
//!
//! Two use cases:
//!
//! - **create application**: render the application skeleton and write the
//!   project record
//! - **add service**: allocate factory ids, render the service module,
//!   inject its configuration and register it in the parent POM
//!
//! Steps run in order and stop at the first failure. Nothing is rolled back.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, ProjectRecordStore, TemplateLoader, TemplateRenderer, XmlParser},
        services::{ConfigInjector, FactoryIdAllocator, TemplateService},
    },
    domain::{
        AppParams, MergeMode, MergeReport, ServiceParams, insert_module,
        entities::params::{MESSAGE_MODEL_ID_TOKEN, STATE_MODEL_ID_TOKEN},
    },
    error::{AppBuilderError, AppBuilderResult},
};

/// Config document of an application, relative to the system module.
pub const SYSTEM_CONFIG_PATH: &str = "conf/config.xml";

/// Factory ids handed to every new service.
const IDS_PER_SERVICE: usize = 2;

/// What `add_service` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceReport {
    pub artifact_id: String,
    pub state_model_id: u16,
    pub message_model_id: u16,
    pub files_written: usize,
    pub config: MergeReport,
    /// False when the module was already listed in the parent POM.
    pub pom_updated: bool,
}

/// Main scaffolding service.
pub struct ScaffoldService {
    templates: TemplateService,
    allocator: FactoryIdAllocator,
    injector: ConfigInjector,
    filesystem: Arc<dyn Filesystem>,
    records: Arc<dyn ProjectRecordStore>,
}

impl ScaffoldService {
    /// Create a new scaffold service with the given adapters.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use appbuilder_core::application::{ScaffoldService, ports::*};
    ///
    /// let service = ScaffoldService::new(
    ///     loader,     // Arc<dyn TemplateLoader>
    ///     renderer,   // Arc<dyn TemplateRenderer>
    ///     filesystem, // Arc<dyn Filesystem>
    ///     parser,     // Arc<dyn XmlParser>
    ///     records,    // Arc<dyn ProjectRecordStore>
    /// );
    /// ```
    pub fn new(
        loader: Arc<dyn TemplateLoader>,
        renderer: Arc<dyn TemplateRenderer>,
        filesystem: Arc<dyn Filesystem>,
        parser: Arc<dyn XmlParser>,
        records: Arc<dyn ProjectRecordStore>,
    ) -> Self {
        Self {
            templates: TemplateService::new(loader, renderer, filesystem.clone()),
            allocator: FactoryIdAllocator::new(filesystem.clone(), parser.clone()),
            injector: ConfigInjector::new(filesystem.clone(), parser),
            filesystem,
            records,
        }
    }

    /// Use `mode` when merging service configuration.
    pub fn with_merge_mode(mut self, mode: MergeMode) -> Self {
        self.injector = self.injector.with_mode(mode);
        self
    }

    pub fn templates(&self) -> &TemplateService {
        &self.templates
    }

    pub fn allocator(&self) -> &FactoryIdAllocator {
        &self.allocator
    }

    pub fn injector(&self) -> &ConfigInjector {
        &self.injector
    }

    /// Generate a new application under `params.app_dir`.
    ///
    /// Returns the application root.
    #[instrument(skip_all, fields(app = %params.app_name, dir = %params.app_dir.display()))]
    pub fn create_application(&self, params: &AppParams) -> AppBuilderResult<PathBuf> {
        params.validate()?;

        if !self.filesystem.exists(&params.app_dir) {
            return Err(ApplicationError::DirectoryNotFound {
                path: params.app_dir.clone(),
            }
            .into());
        }

        let app_root = params.app_root();
        self.ensure_vacant(&app_root)?;

        info!(build_tool = %params.build_tool, "Creating application");
        self.templates
            .render(&params.template_path(), &params.app_dir, &params.token_map())?;
        self.records.write(&app_root, params)?;

        info!(root = %app_root.display(), "Application created");
        Ok(app_root)
    }

    /// Add a service module to the application at `app_root`.
    #[instrument(skip_all, fields(root = %app_root.display(), service = %service.service_name()))]
    pub fn add_service(
        &self,
        app_root: &Path,
        service: &ServiceParams,
    ) -> AppBuilderResult<ServiceReport> {
        let app = self.records.read(app_root)?;
        let build_tool = app.build_tool;

        // 1. Factory ids
        let ids = self
            .allocator
            .allocate_for_application(app_root, IDS_PER_SERVICE)?;
        let (state_model_id, message_model_id) = match ids.as_slice() {
            [state, message, ..] => (*state, *message),
            _ => {
                return Err(AppBuilderError::Internal {
                    message: format!("allocator returned {} ids, expected {}", ids.len(), IDS_PER_SERVICE),
                });
            }
        };
        let tokens = service
            .token_map(&app)
            .with(STATE_MODEL_ID_TOKEN, state_model_id.to_string())
            .with(MESSAGE_MODEL_ID_TOKEN, message_model_id.to_string());
        info!(state_model_id, message_model_id, "Factory ids allocated");

        // 2. Service module
        let structure = self
            .templates
            .render(&service.template_path(build_tool), app_root, &tokens)?;

        // 3. Configuration
        let config_tree = self
            .templates
            .load(&service.config_template_path(build_tool))?;
        let fragments = self.injector.collect_fragments(&config_tree, &tokens)?;
        let config_path = app_root
            .join(app.system_artifact_id())
            .join(SYSTEM_CONFIG_PATH);
        let config = self.injector.inject_file(&config_path, fragments)?;

        // 4. Parent POM
        let artifact_id = service.artifact_id(&app);
        let pom_updated = self.register_module(app_root, &artifact_id, &app.system_artifact_id())?;

        info!(artifact = %artifact_id, "Service added");
        Ok(ServiceReport {
            artifact_id,
            state_model_id,
            message_model_id,
            files_written: structure.files().count(),
            config,
            pom_updated,
        })
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn ensure_vacant(&self, app_root: &Path) -> AppBuilderResult<()> {
        if !self.filesystem.exists(app_root) {
            return Ok(());
        }

        let path = app_root.to_path_buf();
        if self.records.exists(app_root) {
            Err(ApplicationError::ProjectExists { path }.into())
        } else {
            Err(ApplicationError::DirectoryExists { path }.into())
        }
    }

    fn register_module(
        &self,
        app_root: &Path,
        artifact_id: &str,
        system_artifact_id: &str,
    ) -> AppBuilderResult<bool> {
        let pom_path = app_root.join("pom.xml");
        let pom = self.filesystem.read_to_string(&pom_path)?;

        match insert_module(&pom, artifact_id, system_artifact_id)? {
            Some(updated) => {
                self.filesystem.write_file(&pom_path, &updated)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{
        MockFilesystem, MockProjectRecordStore, MockTemplateLoader, MockTemplateRenderer,
        MockXmlParser,
    };
    use crate::domain::entities::params::fixtures;

    fn service(fs: MockFilesystem, records: MockProjectRecordStore) -> ScaffoldService {
        ScaffoldService::new(
            Arc::new(MockTemplateLoader::new()),
            Arc::new(MockTemplateRenderer::new()),
            Arc::new(fs),
            Arc::new(MockXmlParser::new()),
            Arc::new(records),
        )
    }

    #[test]
    fn refuses_existing_application() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| true);
        let mut records = MockProjectRecordStore::new();
        records.expect_exists().returning(|_| true);
        records.expect_write().never();

        let err = service(fs, records)
            .create_application(&fixtures::app())
            .unwrap_err();
        assert!(matches!(
            err,
            AppBuilderError::Application(ApplicationError::ProjectExists { .. })
        ));
    }

    #[test]
    fn refuses_existing_non_application_directory() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| true);
        let mut records = MockProjectRecordStore::new();
        records.expect_exists().returning(|_| false);

        let err = service(fs, records)
            .create_application(&fixtures::app())
            .unwrap_err();
        assert!(matches!(
            err,
            AppBuilderError::Application(ApplicationError::DirectoryExists { .. })
        ));
    }

    #[test]
    fn requires_existing_app_dir() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| false);

        let err = service(fs, MockProjectRecordStore::new())
            .create_application(&fixtures::app())
            .unwrap_err();
        assert!(matches!(
            err,
            AppBuilderError::Application(ApplicationError::DirectoryNotFound { .. })
        ));
    }

    #[test]
    fn invalid_params_fail_before_touching_disk() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().never();
        let mut params = fixtures::app();
        params.app_name.clear();

        let err = service(fs, MockProjectRecordStore::new())
            .create_application(&params)
            .unwrap_err();
        assert!(matches!(err, AppBuilderError::Domain(_)));
    }

    #[test]
    fn add_service_requires_project_record() {
        let mut records = MockProjectRecordStore::new();
        records.expect_read().returning(|root| {
            Err(ApplicationError::NotAnApplication {
                path: root.to_path_buf(),
            }
            .into())
        });

        let err = service(MockFilesystem::new(), records)
            .add_service(Path::new("/work/app"), &fixtures::processor())
            .unwrap_err();
        assert!(matches!(
            err,
            AppBuilderError::Application(ApplicationError::NotAnApplication { .. })
        ));
    }
}
