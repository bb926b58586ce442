//! Token maps and delimiter-bounded substitution.
//!
//! A token is a name wrapped in `{{` / `}}`, e.g. `{{ServiceArtifactId}}`.
//! A [`TokenMap`] maps token names to replacement values and is immutable
//! once built: adding a token produces a new map (see [`TokenMap::with`]).
//!
//! ## Substitution semantics
//!
//! [`TokenMap::apply`] scans the **original** input exactly once. Every match
//! position is decided against the input, never against text produced by a
//! replacement, so a value that itself contains `{{Other}}` is emitted
//! verbatim. Unknown tokens are left untouched.

use std::collections::BTreeMap;
use std::fmt;

/// Opening token delimiter.
pub const TOKEN_PREFIX: &str = "{{";

/// Closing token delimiter.
pub const TOKEN_SUFFIX: &str = "}}";

/// Wrap a token name in delimiters: `Name` → `{{Name}}`.
pub fn to_token(name: &str) -> String {
    format!("{TOKEN_PREFIX}{name}{TOKEN_SUFFIX}")
}

/// Immutable mapping from token names to substitution values.
///
/// Keys are stored without delimiters. `BTreeMap` keeps iteration (and
/// therefore debug output and dry-run listings) deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenMap {
    values: BTreeMap<String, String>,
}

impl TokenMap {
    /// Create an empty token map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a builder.
    pub fn builder() -> TokenMapBuilder {
        TokenMapBuilder::default()
    }

    /// Return a new map containing every token of `self` plus `name = value`.
    ///
    /// An existing token with the same name is replaced in the new map only.
    pub fn with(&self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let mut values = self.values.clone();
        values.insert(name.into(), value.into());
        Self { values }
    }

    /// Return a new map with every token of `other` layered over `self`.
    pub fn extended(&self, other: &TokenMap) -> Self {
        let mut values = self.values.clone();
        values.extend(other.values.iter().map(|(k, v)| (k.clone(), v.clone())));
        Self { values }
    }

    /// Look up a value by token name (without delimiters).
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Substitute every known `{{Name}}` occurrence in `input`.
    ///
    /// Single pass over the original string:
    ///
    /// 1. find the next `{{`
    /// 2. find the first `}}` after it; the text between is the candidate name
    /// 3. known name → emit the value and resume after `}}`; otherwise emit
    ///    one character of the prefix and resume scanning right after it, so
    ///    `{{{{Name}}` still resolves the inner token
    pub fn apply(&self, input: &str) -> String {
        if self.values.is_empty() {
            return input.to_string();
        }

        let mut out = String::with_capacity(input.len());
        let mut rest = input;

        while let Some(start) = rest.find(TOKEN_PREFIX) {
            out.push_str(&rest[..start]);
            let candidate = &rest[start + TOKEN_PREFIX.len()..];

            let replaced = candidate.find(TOKEN_SUFFIX).and_then(|end| {
                self.values
                    .get(&candidate[..end])
                    .map(|value| (value, end + TOKEN_SUFFIX.len()))
            });

            match replaced {
                Some((value, consumed)) => {
                    out.push_str(value);
                    rest = &candidate[consumed..];
                }
                None => {
                    // `{` is one byte, so this slice is always on a char boundary.
                    out.push('{');
                    rest = &rest[start + 1..];
                }
            }
        }

        out.push_str(rest);
        out
    }
}

impl fmt::Display for TokenMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in &self.values {
            writeln!(f, "{} = {}", to_token(name), value)?;
        }
        Ok(())
    }
}

impl<K, V> FromIterator<(K, V)> for TokenMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Fluent builder for [`TokenMap`].
#[derive(Debug, Default)]
pub struct TokenMapBuilder {
    values: BTreeMap<String, String>,
}

impl TokenMapBuilder {
    /// Add a token. Accepts the bare name (`Name`) or the delimited form
    /// (`{{Name}}`); both register the same key.
    pub fn token(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let key = name
            .strip_prefix(TOKEN_PREFIX)
            .and_then(|n| n.strip_suffix(TOKEN_SUFFIX))
            .map(str::to_string)
            .unwrap_or(name);
        self.values.insert(key, value.into());
        self
    }

    pub fn build(self) -> TokenMap {
        TokenMap {
            values: self.values,
        }
    }
}
