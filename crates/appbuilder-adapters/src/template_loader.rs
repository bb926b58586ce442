//! On-disk template packages and template source resolution.
//!
//! A template package is a plain directory tree:
//!
//! ```text
//! templates/
//! └── maven/
//!     ├── app/{{ParentArtifactId}}/pom.xml
//!     ├── service/processor/es/{{ServiceArtifactId}}/...
//!     └── config/processor/es/profiles/dev/config.xml
//! ```
//!
//! [`DirectoryTemplateLoader`] turns one subtree (`maven/app`) into a
//! [`TemplateTree`]. [`resolve_template_loader`] decides whether the CLI uses
//! an on-disk package or the built-in table.
//!
//! # Template resolution order
//!
//! 1. **explicit directory** from `--templates-dir` or the config file
//! 2. **`$APPBUILDER_TEMPLATES_DIR`**
//! 3. **`<executable-dir>/templates`**, when it exists
//! 4. the embedded templates compiled into the binary

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use appbuilder_core::{
    application::{ApplicationError, ports::TemplateLoader},
    domain::{RelativePath, TemplateTree},
    error::{AppBuilderError, AppBuilderResult},
};
use tracing::{debug, info, instrument};
use walkdir::WalkDir;

use crate::builtin_templates::EmbeddedTemplateLoader;

/// Environment variable naming an on-disk template package.
pub const TEMPLATES_DIR_ENV: &str = "APPBUILDER_TEMPLATES_DIR";

/// Loads templates from a directory on disk.
///
/// Entries are visited in file-name order so the resulting tree (and any
/// fragment order derived from it) is stable across platforms.
#[derive(Debug, Clone)]
pub struct DirectoryTemplateLoader {
    templates_dir: PathBuf,
}

impl DirectoryTemplateLoader {
    /// Create a loader pointed at `templates_dir`.
    ///
    /// The directory does not need to exist yet; [`load`](TemplateLoader::load)
    /// reports a missing template when called.
    pub fn new(templates_dir: impl Into<PathBuf>) -> Self {
        Self {
            templates_dir: templates_dir.into(),
        }
    }

    pub fn templates_dir(&self) -> &Path {
        &self.templates_dir
    }
}

impl TemplateLoader for DirectoryTemplateLoader {
    #[instrument(skip(self), fields(dir = %self.templates_dir.display()))]
    fn load(&self, template_path: &str) -> AppBuilderResult<TemplateTree> {
        let root = self.templates_dir.join(template_path);
        if !root.is_dir() {
            return Err(ApplicationError::TemplateNotFound {
                path: template_path.to_string(),
            }
            .into());
        }

        let mut tree = TemplateTree::new();

        for walk_entry in WalkDir::new(&root).min_depth(1).sort_by_file_name() {
            let walk_entry = walk_entry.map_err(|e| rendering_failed(format!("directory walk error: {e}")))?;
            let abs_path = walk_entry.path();
            let rel_raw = abs_path.strip_prefix(&root).map_err(|_| {
                rendering_failed(format!(
                    "failed to relativise '{}' against '{}'",
                    abs_path.display(),
                    root.display()
                ))
            })?;
            let path = RelativePath::try_new(rel_raw)?;

            if walk_entry.file_type().is_dir() {
                tree = tree.with_directory(path);
                continue;
            }

            if !walk_entry.file_type().is_file() {
                continue; // Skip symlinks and other special types.
            }

            let content = fs::read_to_string(abs_path).map_err(|e| {
                rendering_failed(format!("failed to read template file '{path}': {e}"))
            })?;
            tree = tree.with_file(path, content);
        }

        debug!(template = template_path, entries = tree.len(), "Loaded template from disk");
        Ok(tree)
    }
}

fn rendering_failed(reason: String) -> AppBuilderError {
    ApplicationError::RenderingFailed { reason }.into()
}

// ── Resolution ────────────────────────────────────────────────────────────────

/// Where the templates in use come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// Compiled into the binary.
    Embedded,
    /// A template package directory.
    Directory(PathBuf),
}

impl fmt::Display for TemplateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Embedded => write!(f, "built-in"),
            Self::Directory(dir) => write!(f, "{}", dir.display()),
        }
    }
}

/// Pick a template loader following the resolution order in the module docs.
///
/// An explicit directory is used even if it does not exist, so a typo
/// surfaces as "template not found" rather than silently falling back.
#[instrument]
pub fn resolve_template_loader(
    explicit: Option<&Path>,
) -> (Arc<dyn TemplateLoader>, TemplateSource) {
    let source = resolve_source(explicit, std::env::var_os(TEMPLATES_DIR_ENV).map(PathBuf::from));
    info!(source = %source, "Using templates");

    let loader: Arc<dyn TemplateLoader> = match &source {
        TemplateSource::Embedded => Arc::new(EmbeddedTemplateLoader::new()),
        TemplateSource::Directory(dir) => Arc::new(DirectoryTemplateLoader::new(dir)),
    };
    (loader, source)
}

fn resolve_source(explicit: Option<&Path>, from_env: Option<PathBuf>) -> TemplateSource {
    if let Some(dir) = explicit {
        debug!(path = %dir.display(), "Templates from explicit directory");
        return TemplateSource::Directory(dir.to_path_buf());
    }

    if let Some(dir) = from_env.filter(|d| !d.as_os_str().is_empty()) {
        debug!(path = %dir.display(), "Templates from ${}", TEMPLATES_DIR_ENV);
        return TemplateSource::Directory(dir);
    }

    if let Some(dir) = exe_sibling_templates().filter(|d| d.is_dir()) {
        debug!(path = %dir.display(), "Templates from exe sibling");
        return TemplateSource::Directory(dir);
    }

    TemplateSource::Embedded
}

/// `<directory of current executable>/templates`, if the executable path is
/// known.
fn exe_sibling_templates() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.join("templates")))
}
