//! Factory-id allocation over model files on disk.

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::{
    application::ports::{Filesystem, XmlParser},
    domain::{MODELS_DIR, available_ids, factory_ids, is_model_document},
    error::AppBuilderResult,
};

/// Scans model files for used factory ids and hands out free ones.
///
/// Nothing is cached: every call re-reads the models.
#[derive(Clone)]
pub struct FactoryIdAllocator {
    filesystem: Arc<dyn Filesystem>,
    parser: Arc<dyn XmlParser>,
}

impl FactoryIdAllocator {
    pub fn new(filesystem: Arc<dyn Filesystem>, parser: Arc<dyn XmlParser>) -> Self {
        Self { filesystem, parser }
    }

    /// At least `min_count` free ids, ascending, given every `.xml` under
    /// `models_root`.
    #[instrument(skip_all, fields(root = %models_root.display(), min_count))]
    pub fn allocate(&self, models_root: &Path, min_count: usize) -> AppBuilderResult<Vec<u16>> {
        let files = self.xml_files(models_root)?;
        self.allocate_from(&files, min_count)
    }

    /// Same as [`allocate`](Self::allocate), over every module's
    /// `src/main/models` directory below an application root.
    #[instrument(skip_all, fields(root = %app_root.display(), min_count))]
    pub fn allocate_for_application(
        &self,
        app_root: &Path,
        min_count: usize,
    ) -> AppBuilderResult<Vec<u16>> {
        let files: Vec<PathBuf> = self
            .xml_files(app_root)?
            .into_iter()
            .filter(|p| is_under_models_dir(p))
            .collect();
        self.allocate_from(&files, min_count)
    }

    /// Ids declared in the given model files.
    pub fn used_ids(&self, files: &[PathBuf]) -> AppBuilderResult<BTreeSet<u16>> {
        let mut used = BTreeSet::new();

        for file in files {
            let source = file.display().to_string();

            let text = match self.filesystem.read_to_string(file) {
                Ok(text) => text,
                Err(e) => {
                    warn!(file = %source, error = %e, "Skipping unreadable model file");
                    continue;
                }
            };

            let root = match self.parser.parse(&text, &source) {
                Ok(root) => root,
                Err(e) => {
                    warn!(file = %source, error = %e, "Skipping invalid model file");
                    continue;
                }
            };

            if !is_model_document(&root) {
                warn!(file = %source, "Skipping XML file outside the model namespace");
                continue;
            }

            let ids = factory_ids(&root, &source)?;
            debug!(file = %source, count = ids.len(), "Collected factory ids");
            used.extend(ids);
        }

        Ok(used)
    }

    fn allocate_from(&self, files: &[PathBuf], min_count: usize) -> AppBuilderResult<Vec<u16>> {
        let used = self.used_ids(files)?;
        let available = available_ids(&used, min_count)?;
        debug!(used = used.len(), available = available.len(), "Factory ids computed");
        Ok(available)
    }

    fn xml_files(&self, root: &Path) -> AppBuilderResult<Vec<PathBuf>> {
        if !self.filesystem.exists(root) {
            return Ok(Vec::new());
        }
        Ok(self
            .filesystem
            .list_files(root)?
            .into_iter()
            .filter(|p| p.extension().is_some_and(|ext| ext == "xml"))
            .collect())
    }
}

/// True when `path` has `src/main/models` as consecutive components.
fn is_under_models_dir(path: &Path) -> bool {
    let wanted: Vec<&str> = MODELS_DIR.split('/').collect();
    let parts: Vec<&str> = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => s.to_str(),
            _ => None,
        })
        .collect();

    parts.windows(wanted.len()).any(|w| w == wanted.as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MockFilesystem, MockXmlParser};
    use crate::domain::{DomainError, Element, MODEL_NAMESPACE};
    use crate::error::AppBuilderError;

    fn model(ids: &[&str]) -> Element {
        ids.iter().fold(
            Element::new("model").with_namespace(MODEL_NAMESPACE),
            |el, id| {
                el.with_child(
                    Element::new("factory")
                        .with_namespace(MODEL_NAMESPACE)
                        .with_attribute("id", *id),
                )
            },
        )
    }

    /// Filesystem listing the given files, whose content is the file name;
    /// the parser maps each name to a canned document.
    fn allocator(files: &'static [&'static str], docs: fn(&str) -> AppBuilderResult<Element>) -> FactoryIdAllocator {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| true);
        fs.expect_list_files()
            .returning(move |_| Ok(files.iter().map(PathBuf::from).collect()));
        fs.expect_read_to_string()
            .returning(|p| Ok(p.display().to_string()));

        let mut parser = MockXmlParser::new();
        parser.expect_parse().returning(move |text, _| docs(text));

        FactoryIdAllocator::new(Arc::new(fs), Arc::new(parser))
    }

    #[test]
    fn gaps_are_filled_first() {
        let alloc = allocator(&["m/a.xml", "m/b.xml"], |name| match name {
            "m/a.xml" => Ok(model(&["2", "3"])),
            _ => Ok(model(&["7"])),
        });
        assert_eq!(alloc.allocate(Path::new("m"), 4).unwrap(), [1, 4, 5, 6]);
    }

    #[test]
    fn non_xml_and_foreign_documents_are_skipped() {
        let alloc = allocator(&["m/a.xml", "m/notes.txt", "m/pom.xml"], |name| match name {
            "m/a.xml" => Ok(model(&["1"])),
            _ => Ok(Element::new("project").with_attribute("id", "99")),
        });
        assert_eq!(alloc.allocate(Path::new("m"), 2).unwrap(), [2, 3]);
    }

    #[test]
    fn unparsable_files_are_skipped() {
        let alloc = allocator(&["m/bad.xml", "m/good.xml"], |name| match name {
            "m/good.xml" => Ok(model(&["1"])),
            _ => Err(AppBuilderError::Internal {
                message: "broken".into(),
            }),
        });
        assert_eq!(alloc.allocate(Path::new("m"), 1).unwrap(), [2]);
    }

    #[test]
    fn malformed_id_is_fatal() {
        let alloc = allocator(&["m/a.xml"], |_| Ok(model(&["twelve"])));
        let err = alloc.allocate(Path::new("m"), 1).unwrap_err();
        assert!(matches!(
            err,
            AppBuilderError::Domain(DomainError::MalformedIdentifier { .. })
        ));
    }

    #[test]
    fn missing_root_means_no_ids_used() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| false);
        let alloc = FactoryIdAllocator::new(Arc::new(fs), Arc::new(MockXmlParser::new()));
        assert_eq!(alloc.allocate(Path::new("nowhere"), 2).unwrap(), [1, 2]);
    }

    #[test]
    fn application_scan_only_reads_model_directories() {
        let alloc = allocator(
            &[
                "app/svc/src/main/models/state.xml",
                "app/svc/conf/config.xml",
            ],
            |name| match name {
                "app/svc/src/main/models/state.xml" => Ok(model(&["1", "2"])),
                _ => Ok(model(&["50"])),
            },
        );
        assert_eq!(alloc.allocate_for_application(Path::new("app"), 2).unwrap(), [3, 4]);
    }

    #[test]
    fn models_dir_detection() {
        assert!(is_under_models_dir(Path::new("a/src/main/models/x.xml")));
        assert!(!is_under_models_dir(Path::new("a/src/main/x.xml")));
        assert!(!is_under_models_dir(Path::new("a/src/models/main/x.xml")));
    }
}
