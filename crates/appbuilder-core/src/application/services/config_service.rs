//! Injecting configuration fragments into an application's config document.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, XmlParser},
    },
    domain::{ConfigMerger, Fragment, InsertionPath, MergeMode, MergeReport, TemplateTree, TokenMap},
    error::{AppBuilderError, AppBuilderResult},
};

/// File name marking a configuration fragment inside a config template.
pub const FRAGMENT_FILE_NAME: &str = "config.xml";

/// Reads fragments from a config template and merges them into a document.
#[derive(Clone)]
pub struct ConfigInjector {
    filesystem: Arc<dyn Filesystem>,
    parser: Arc<dyn XmlParser>,
    merger: ConfigMerger,
}

impl ConfigInjector {
    pub fn new(filesystem: Arc<dyn Filesystem>, parser: Arc<dyn XmlParser>) -> Self {
        Self {
            filesystem,
            parser,
            merger: ConfigMerger::new(),
        }
    }

    pub fn with_mode(mut self, mode: MergeMode) -> Self {
        self.merger = ConfigMerger::with_mode(mode);
        self
    }

    /// Every `config.xml` in `tree`, token-substituted and parsed.
    ///
    /// The insertion path of a fragment is the directory chain above it.
    /// Fails on the first fragment that is not well-formed, before anything
    /// is merged.
    pub fn collect_fragments(
        &self,
        tree: &TemplateTree,
        tokens: &TokenMap,
    ) -> AppBuilderResult<Vec<Fragment>> {
        tree.files()
            .filter(|(path, _)| path.file_name() == Some(FRAGMENT_FILE_NAME))
            .map(|(path, content)| -> AppBuilderResult<Fragment> {
                let text = tokens.apply(content);
                let body = self.parser.parse(&text, path.as_str()).map_err(|e| {
                    AppBuilderError::from(ApplicationError::FragmentParse {
                        fragment: path.to_string(),
                        reason: parse_reason(e),
                    })
                })?;
                Ok(Fragment::new(InsertionPath::from_fragment_file(path), body))
            })
            .collect()
    }

    /// Merge `fragments` into the document text and return the canonical
    /// serialization. Comments and processing instructions outside the
    /// document element are written back unchanged.
    pub fn merge_text(
        &self,
        document: &str,
        source: &str,
        fragments: Vec<Fragment>,
    ) -> AppBuilderResult<(String, MergeReport)> {
        let mut parsed = self.parser.parse_document(document, source)?;
        let report = self.merger.merge(&mut parsed.root, fragments);
        Ok((parsed.to_xml_string(), report))
    }

    /// Read, merge and rewrite the config document at `config_path`.
    ///
    /// The file is left untouched when the result is byte-identical.
    #[instrument(skip_all, fields(config = %config_path.display(), fragments = fragments.len()))]
    pub fn inject_file(
        &self,
        config_path: &Path,
        fragments: Vec<Fragment>,
    ) -> AppBuilderResult<MergeReport> {
        let original = self.filesystem.read_to_string(config_path)?;
        let source = config_path.display().to_string();

        let (merged, report) = self.merge_text(&original, &source, fragments)?;

        if merged == original {
            debug!("Configuration unchanged");
        } else {
            self.filesystem.write_file(config_path, &merged)?;
        }

        info!(
            injected = report.injected(),
            duplicates = report.duplicates(),
            "Configuration merged"
        );
        Ok(report)
    }
}

fn parse_reason(err: AppBuilderError) -> String {
    match err {
        AppBuilderError::Application(ApplicationError::XmlParse { reason, .. }) => reason,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MockFilesystem, MockXmlParser};
    use crate::domain::entities::xml::XML_DECLARATION;
    use crate::domain::{Element, RelativePath, XmlDocument, XmlNode};

    fn rel(p: &str) -> RelativePath {
        RelativePath::try_new(p).unwrap()
    }

    /// Understands `<NAME/>`, optionally after an XML declaration. Anything
    /// else fails.
    fn toy_parse(text: &str, source: &str) -> AppBuilderResult<Element> {
        let trimmed = text.trim().trim_start_matches(XML_DECLARATION).trim();
        match trimmed
            .strip_prefix('<')
            .and_then(|t| t.strip_suffix("/>"))
        {
            Some(name) if !name.contains('<') => Ok(Element::new(name)),
            _ => Err(ApplicationError::XmlParse {
                file: source.to_string(),
                reason: "not well-formed".into(),
            }
            .into()),
        }
    }

    fn toy_parser() -> MockXmlParser {
        let mut parser = MockXmlParser::new();
        parser.expect_parse().returning(toy_parse);
        parser
            .expect_parse_document()
            .returning(|text, source| toy_parse(text, source).map(XmlDocument::new));
        parser
    }

    #[test]
    fn only_config_xml_files_become_fragments() {
        let tree = TemplateTree::new()
            .with_file(rel("config.xml"), "<{{Root}}/>")
            .with_file(rel("profiles/dev/config.xml"), "<app/>")
            .with_file(rel("profiles/dev/readme.md"), "ignored");

        let injector = ConfigInjector::new(Arc::new(MockFilesystem::new()), Arc::new(toy_parser()));
        let tokens = TokenMap::builder().token("Root", "buses").build();
        let fragments = injector.collect_fragments(&tree, &tokens).unwrap();

        assert_eq!(
            fragments,
            vec![
                Fragment::new(InsertionPath::root(), Element::new("buses")),
                Fragment::new(InsertionPath::from_segments(["profiles", "dev"]), Element::new("app")),
            ]
        );
    }

    #[test]
    fn bad_fragment_aborts_before_anything_is_written() {
        let tree = TemplateTree::new()
            .with_file(rel("a/config.xml"), "<ok/>")
            .with_file(rel("b/config.xml"), "<broken>");

        let mut fs = MockFilesystem::new();
        fs.expect_write_file().never();

        let injector = ConfigInjector::new(Arc::new(fs), Arc::new(toy_parser()));
        let err = injector.collect_fragments(&tree, &TokenMap::new()).unwrap_err();
        assert!(matches!(
            err,
            AppBuilderError::Application(ApplicationError::FragmentParse { ref fragment, ref reason })
                if fragment == "b/config.xml" && reason == "not well-formed"
        ));
    }

    #[test]
    fn unchanged_document_is_not_rewritten() {
        let canonical = Element::new("model").to_xml_string();

        let mut fs = MockFilesystem::new();
        let text = canonical.clone();
        fs.expect_read_to_string().returning(move |_| Ok(text.clone()));
        fs.expect_write_file().never();

        let injector = ConfigInjector::new(Arc::new(fs), Arc::new(toy_parser()));
        let report = injector
            .inject_file(Path::new("conf/config.xml"), Vec::new())
            .unwrap();
        assert!(report.is_noop());
    }

    #[test]
    fn changed_document_is_rewritten() {
        let mut fs = MockFilesystem::new();
        fs.expect_read_to_string().returning(|_| Ok("<model/>".into()));
        fs.expect_write_file()
            .withf(|_, content| content.contains("<profile name=\"dev\">"))
            .times(1)
            .returning(|_, _| Ok(()));

        let injector = ConfigInjector::new(Arc::new(fs), Arc::new(toy_parser()));
        let fragment = Fragment::new(
            InsertionPath::from_segments(["profiles", "dev"]),
            Element::new("app"),
        );
        let report = injector
            .inject_file(Path::new("conf/config.xml"), vec![fragment])
            .unwrap();
        assert_eq!(report.injected(), 1);
    }

    #[test]
    fn document_level_comments_are_written_back() {
        let mut parser = MockXmlParser::new();
        parser.expect_parse_document().returning(|_, _| {
            Ok(XmlDocument {
                prolog: vec![XmlNode::Comment(" Copyright ACME ".into())],
                root: Element::new("model"),
                epilog: Vec::new(),
            })
        });

        let injector = ConfigInjector::new(Arc::new(MockFilesystem::new()), Arc::new(parser));
        let fragment = Fragment::new(InsertionPath::root(), Element::new("apps"));
        let (merged, report) = injector
            .merge_text("ignored", "conf/config.xml", vec![fragment])
            .unwrap();

        assert_eq!(report.injected(), 1);
        assert!(
            merged.starts_with(&format!("{XML_DECLARATION}\n<!-- Copyright ACME -->\n<model>")),
            "{merged}"
        );
    }
}
