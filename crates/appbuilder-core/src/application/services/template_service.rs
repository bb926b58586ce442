//! Template Service - render a template directory into a target directory.
//!
//! Load → substitute tokens → write. Any failure aborts the whole render;
//! whatever was already written stays on disk. Rendering into an existing
//! target silently overwrites files.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, TemplateLoader, TemplateRenderer},
    },
    domain::{FsEntry, ProjectStructure, TemplateTree, TokenMap},
    error::{AppBuilderError, AppBuilderResult},
};

/// Service for template operations.
#[derive(Clone)]
pub struct TemplateService {
    loader: Arc<dyn TemplateLoader>,
    renderer: Arc<dyn TemplateRenderer>,
    filesystem: Arc<dyn Filesystem>,
}

impl TemplateService {
    /// Create a new template service.
    pub fn new(
        loader: Arc<dyn TemplateLoader>,
        renderer: Arc<dyn TemplateRenderer>,
        filesystem: Arc<dyn Filesystem>,
    ) -> Self {
        Self {
            loader,
            renderer,
            filesystem,
        }
    }

    /// Load a template, treating an empty one as missing.
    pub fn load(&self, template_path: &str) -> AppBuilderResult<TemplateTree> {
        let tree = self.loader.load(template_path)?;
        if tree.is_empty() {
            return Err(ApplicationError::TemplateNotFound {
                path: template_path.to_string(),
            }
            .into());
        }
        Ok(tree)
    }

    /// Render `template_path` into `target_root` with `tokens`.
    #[instrument(skip_all, fields(template = %template_path, target = %target_root.display()))]
    pub fn render(
        &self,
        template_path: &str,
        target_root: &Path,
        tokens: &TokenMap,
    ) -> AppBuilderResult<ProjectStructure> {
        let tree = self.load(template_path)?;
        debug!(entries = tree.len(), "Template loaded");

        let structure = self.renderer.render(&tree, tokens, target_root)?;
        structure.validate()?;

        self.write_structure(&structure).map_err(|e| match e {
            AppBuilderError::Application(ApplicationError::FilesystemError { path, reason }) => {
                ApplicationError::RenderingFailed {
                    reason: format!("{}: {}", path.display(), reason),
                }
                .into()
            }
            other => other,
        })?;

        info!(
            files = structure.files().count(),
            directories = structure.directories().count(),
            "Template rendered"
        );
        Ok(structure)
    }

    /// Materialize a rendered structure.
    fn write_structure(&self, structure: &ProjectStructure) -> AppBuilderResult<()> {
        self.filesystem.create_dir_all(structure.root())?;

        for entry in structure.entries() {
            let path = structure.root().join(entry.path());
            match entry {
                FsEntry::Directory(_) => self.filesystem.create_dir_all(&path)?,
                FsEntry::File(file) => {
                    if let Some(parent) = path.parent() {
                        self.filesystem.create_dir_all(parent)?;
                    }
                    self.filesystem.write_file(&path, &file.content)?;
                }
            }
        }

        Ok(())
    }
}
