//! Where a configuration fragment lands inside the configuration document.

use std::fmt;

use super::common::RelativePath;
use super::xml::Element;

/// Container element that holds named profiles.
pub const PROFILES_TAG: &str = "profiles";

/// Element created for each named profile under `profiles`.
pub const PROFILE_TAG: &str = "profile";

/// Attribute keying a profile.
pub const PROFILE_NAME_ATTR: &str = "name";

/// Ordered segments naming a container inside the configuration document.
///
/// Derived from the directories between a config template root and a
/// `config.xml` fragment: `profiles/dev/config.xml` → `["profiles", "dev"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct InsertionPath {
    segments: Vec<String>,
}

impl InsertionPath {
    /// The document root itself.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments
                .into_iter()
                .map(Into::into)
                .filter(|s: &String| !s.is_empty())
                .collect(),
        }
    }

    /// Insertion path of a fragment file: every directory above it.
    pub fn from_fragment_file(path: &RelativePath) -> Self {
        Self::from_segments(path.parent().segments())
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Walk from `root`, creating whatever is missing, and return the
    /// container the fragment belongs in.
    ///
    /// Per segment, looking only at direct children of the current element:
    ///
    /// - `profiles` → the `profiles` child
    /// - any segment under a `profiles` element → the `profile` child whose
    ///   `name` attribute equals the segment
    /// - anything else → the child element with that tag name
    pub fn resolve<'a>(&self, root: &'a mut Element) -> &'a mut Element {
        let mut current = root;
        for segment in &self.segments {
            current = if segment == PROFILES_TAG {
                current.child_or_insert_with(|e| e.name() == PROFILES_TAG, || Element::new(PROFILES_TAG))
            } else if current.name() == PROFILES_TAG {
                current.child_or_insert_with(
                    |e| e.name() == PROFILE_TAG && e.attribute(PROFILE_NAME_ATTR) == Some(segment.as_str()),
                    || Element::new(PROFILE_TAG).with_attribute(PROFILE_NAME_ATTR, segment.as_str()),
                )
            } else {
                current.child_or_insert_with(|e| e.name() == segment.as_str(), || Element::new(segment.as_str()))
            };
        }
        current
    }
}

impl fmt::Display for InsertionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            f.write_str("/")
        } else {
            for segment in &self.segments {
                write!(f, "/{segment}")?;
            }
            Ok(())
        }
    }
}
