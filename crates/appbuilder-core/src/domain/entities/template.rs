//! Loaded template trees.
//!
//! A template is a directory of files whose relative paths and contents may
//! both contain `{{Token}}` placeholders. Loaders (embedded table or on-disk
//! directory) produce a [`TemplateTree`]; renderers turn it into a
//! `ProjectStructure` by applying a `TokenMap`.

use super::common::RelativePath;

/// Ordered list of template entries under one template root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateTree {
    /// Ordered list of filesystem nodes to create.
    pub nodes: Vec<TemplateNode>,
}

impl TemplateTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node to the tree (maintains insertion order).
    pub fn push(&mut self, node: TemplateNode) {
        self.nodes.push(node);
    }

    /// Fluent variant of `push` for builder chains.
    pub fn with_node(mut self, node: TemplateNode) -> Self {
        self.push(node);
        self
    }

    pub fn with_file(self, path: RelativePath, content: impl Into<String>) -> Self {
        self.with_node(TemplateNode::File {
            path,
            content: content.into(),
        })
    }

    pub fn with_directory(self, path: RelativePath) -> Self {
        self.with_node(TemplateNode::Directory { path })
    }

    /// Files only, in insertion order.
    pub fn files(&self) -> impl Iterator<Item = (&RelativePath, &str)> {
        self.nodes.iter().filter_map(|n| match n {
            TemplateNode::File { path, content } => Some((path, content.as_str())),
            TemplateNode::Directory { .. } => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}

/// A single entry in the template tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateNode {
    File { path: RelativePath, content: String },
    Directory { path: RelativePath },
}

impl TemplateNode {
    pub fn path(&self) -> &RelativePath {
        match self {
            TemplateNode::File { path, .. } | TemplateNode::Directory { path } => path,
        }
    }
}
