//! Structural merge of configuration fragments into a configuration document.
//!
//! Each [`Fragment`] is an already-parsed subtree plus the [`InsertionPath`]
//! naming its container. [`ConfigMerger::merge`] resolves the container
//! (creating missing `profiles` / `profile` / plain elements), then appends
//! the subtree unless an equivalent element is already there.
//!
//! Merging the same fragments into the same document any number of times
//! yields the same tree, and therefore the same serialized bytes.

use std::fmt;

use tracing::{debug, info};

use super::entities::{insertion_path::InsertionPath, xml::Element};

/// One subtree to inject and where it goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub path: InsertionPath,
    pub body: Element,
}

impl Fragment {
    pub fn new(path: InsertionPath, body: Element) -> Self {
        Self { path, body }
    }
}

/// How to treat a fragment already present at its insertion point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MergeMode {
    /// Skip fragments equivalent to an existing sibling.
    #[default]
    Deduplicate,
    /// Always append, even when an equivalent sibling exists.
    AlwaysAppend,
}

/// What happened to a single fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Appended as the last child of its container.
    Injected { path: InsertionPath, element: String },
    /// An equivalent element was already present; nothing changed.
    Duplicate { path: InsertionPath, element: String },
}

impl MergeOutcome {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, MergeOutcome::Duplicate { .. })
    }
}

impl fmt::Display for MergeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeOutcome::Injected { path, element } => write!(f, "injected <{element}> at {path}"),
            MergeOutcome::Duplicate { path, element } => {
                write!(f, "skipped duplicate <{element}> at {path}")
            }
        }
    }
}

/// Per-fragment outcomes of one merge call, in fragment order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    outcomes: Vec<MergeOutcome>,
}

impl MergeReport {
    pub fn outcomes(&self) -> &[MergeOutcome] {
        &self.outcomes
    }

    /// Number of fragments appended.
    pub fn injected(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_duplicate()).count()
    }

    /// Number of fragments skipped as duplicates.
    pub fn duplicates(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_duplicate()).count()
    }

    /// True when the document was not changed by structural insertion.
    ///
    /// Container creation alone never happens without an injection, so a
    /// report with zero injections means the tree is unchanged apart from
    /// whitespace normalisation.
    pub fn is_noop(&self) -> bool {
        self.injected() == 0
    }
}

/// The merge engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigMerger {
    mode: MergeMode,
}

impl ConfigMerger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mode: MergeMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> MergeMode {
        self.mode
    }

    /// Merge `fragments` into `document` in order.
    ///
    /// Whitespace-only text is stripped from the document and from every
    /// candidate before comparison, and once more from the whole document
    /// afterwards, so indentation never defeats duplicate detection and the
    /// result holds no blank text nodes at any depth.
    pub fn merge(&self, document: &mut Element, fragments: Vec<Fragment>) -> MergeReport {
        document.prune_whitespace();

        let mut report = MergeReport::default();
        for Fragment { path, mut body } in fragments {
            body.prune_whitespace();
            let element = body.name().to_string();

            // Resolving may create empty containers; only do so when the
            // fragment is actually going in.
            let duplicate = self.mode == MergeMode::Deduplicate
                && find_container(document, &path)
                    .is_some_and(|parent| parent.elements().any(|e| e.is_equivalent(&body)));

            if duplicate {
                debug!(%path, element = %element, "Fragment already present, skipping");
                report.outcomes.push(MergeOutcome::Duplicate { path, element });
                continue;
            }

            path.resolve(document).push(body);
            info!(%path, element = %element, "Fragment injected");
            report.outcomes.push(MergeOutcome::Injected { path, element });
        }

        document.prune_whitespace();
        report
    }
}

/// Read-only counterpart of [`InsertionPath::resolve`]: `None` when any
/// container along the path does not exist yet.
fn find_container<'a>(root: &'a Element, path: &InsertionPath) -> Option<&'a Element> {
    use super::entities::insertion_path::{PROFILE_NAME_ATTR, PROFILE_TAG, PROFILES_TAG};

    let mut current = root;
    for segment in path.segments() {
        let segment = segment.as_str();
        current = if segment == PROFILES_TAG {
            current.elements().find(|e| e.name() == PROFILES_TAG)?
        } else if current.name() == PROFILES_TAG {
            current
                .elements()
                .find(|e| e.name() == PROFILE_TAG && e.attribute(PROFILE_NAME_ATTR) == Some(segment))?
        } else {
            current.elements().find(|e| e.name() == segment)?
        };
    }
    Some(current)
}
