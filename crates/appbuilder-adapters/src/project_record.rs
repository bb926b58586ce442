//! JSON project record (`.rumi`) stored at the application root.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use appbuilder_core::{
    application::{
        ApplicationError,
        ports::{Filesystem, ProjectRecordStore},
    },
    domain::{AppParams, entities::params::PROJECT_RECORD_FILE},
    error::AppBuilderResult,
};
use tracing::{debug, instrument};

/// [`ProjectRecordStore`] that keeps [`AppParams`] as pretty-printed JSON.
#[derive(Clone)]
pub struct JsonProjectRecordStore {
    filesystem: Arc<dyn Filesystem>,
}

impl JsonProjectRecordStore {
    pub fn new(filesystem: Arc<dyn Filesystem>) -> Self {
        Self { filesystem }
    }

    /// Path of the record for `app_root`.
    pub fn record_path(app_root: &Path) -> PathBuf {
        app_root.join(PROJECT_RECORD_FILE)
    }
}

impl ProjectRecordStore for JsonProjectRecordStore {
    fn exists(&self, app_root: &Path) -> bool {
        self.filesystem.exists(&Self::record_path(app_root))
    }

    #[instrument(skip(self), fields(root = %app_root.display()))]
    fn read(&self, app_root: &Path) -> AppBuilderResult<AppParams> {
        let path = Self::record_path(app_root);
        if !self.filesystem.exists(&path) {
            return Err(ApplicationError::NotAnApplication {
                path: app_root.to_path_buf(),
            }
            .into());
        }

        let text = self.filesystem.read_to_string(&path)?;
        let params: AppParams =
            serde_json::from_str(&text).map_err(|e| ApplicationError::CorruptRecord {
                path: path.clone(),
                reason: e.to_string(),
            })?;

        debug!(app = %params.app_name, "Project record loaded");
        Ok(params)
    }

    #[instrument(skip(self, params), fields(root = %app_root.display()))]
    fn write(&self, app_root: &Path, params: &AppParams) -> AppBuilderResult<()> {
        let path = Self::record_path(app_root);
        let json = serde_json::to_string_pretty(params).map_err(|e| ApplicationError::CorruptRecord {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        self.filesystem.write_file(&path, &format!("{json}\n"))
    }
}
