//! `{{Name}}` substitution renderer.

use std::path::Path;

use appbuilder_core::{
    application::ports::TemplateRenderer,
    domain::{ProjectStructure, RelativePath, TemplateNode, TemplateTree, TokenMap},
    error::{AppBuilderError, AppBuilderResult},
};
use tracing::{instrument, trace};

/// Renderer that applies a [`TokenMap`] to every path and file body.
///
/// Paths are substituted as a whole, so a value containing `/` (such as a
/// package path) expands into nested directories.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenRenderer;

impl TokenRenderer {
    /// Create a new token renderer.
    pub fn new() -> Self {
        Self
    }
}

impl TemplateRenderer for TokenRenderer {
    #[instrument(skip_all, fields(nodes = tree.len(), tokens = tokens.len()))]
    fn render(
        &self,
        tree: &TemplateTree,
        tokens: &TokenMap,
        output_root: &Path,
    ) -> AppBuilderResult<ProjectStructure> {
        let mut structure = ProjectStructure::new(output_root);

        for node in &tree.nodes {
            let path = render_path(node.path(), tokens)?;
            match node {
                TemplateNode::File { content, .. } => {
                    trace!(path = %path, "Rendering file");
                    structure.add_file(path.to_path_buf(), tokens.apply(content));
                }
                TemplateNode::Directory { .. } => {
                    structure.add_directory(path.to_path_buf());
                }
            }
        }

        structure.validate().map_err(AppBuilderError::Domain)?;
        Ok(structure)
    }
}

fn render_path(path: &RelativePath, tokens: &TokenMap) -> AppBuilderResult<RelativePath> {
    Ok(RelativePath::try_new(tokens.apply(path.as_str()))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use appbuilder_core::domain::DomainError;
    use std::path::PathBuf;

    fn rel(p: &str) -> RelativePath {
        RelativePath::try_new(p).unwrap()
    }

    fn tokens() -> TokenMap {
        TokenMap::builder()
            .token("ServiceArtifactId", "acme-orderbook-order-processor")
            .token("AppPackagePath", "com/acme/orderbook")
            .token("AppPackageName", "com.acme.orderbook")
            .build()
    }

    #[test]
    fn substitutes_paths_and_contents() {
        let tree = TemplateTree::new()
            .with_directory(rel("{{ServiceArtifactId}}/src/main/models"))
            .with_file(
                rel("{{ServiceArtifactId}}/src/main/java/{{AppPackagePath}}/Main.java"),
                "package {{AppPackageName}};\n",
            );

        let structure = TokenRenderer::new()
            .render(&tree, &tokens(), Path::new("/work"))
            .unwrap();

        let dirs: Vec<_> = structure.directories().map(|d| d.path.clone()).collect();
        assert_eq!(
            dirs,
            vec![PathBuf::from("acme-orderbook-order-processor/src/main/models")]
        );

        let file = structure.files().next().unwrap();
        assert_eq!(
            file.path,
            PathBuf::from("acme-orderbook-order-processor/src/main/java/com/acme/orderbook/Main.java")
        );
        assert_eq!(file.content, "package com.acme.orderbook;\n");
        assert_eq!(structure.root(), Path::new("/work"));
    }

    #[test]
    fn unknown_tokens_are_left_alone() {
        let tree = TemplateTree::new().with_file(rel("README.md"), "{{Unknown}} stays");
        let structure = TokenRenderer::new()
            .render(&tree, &tokens(), Path::new("/work"))
            .unwrap();
        assert_eq!(structure.files().next().unwrap().content, "{{Unknown}} stays");
    }

    #[test]
    fn colliding_files_are_rejected() {
        let tree = TemplateTree::new()
            .with_file(rel("{{A}}.txt"), "1")
            .with_file(rel("{{B}}.txt"), "2");
        let tokens = TokenMap::builder().token("A", "same").token("B", "same").build();

        let err = TokenRenderer::new()
            .render(&tree, &tokens, Path::new("/work"))
            .unwrap_err();
        assert!(matches!(
            err,
            AppBuilderError::Domain(DomainError::DuplicatePath { .. })
        ));
    }
}
