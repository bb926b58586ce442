//! Factory-id allocation.
//!
//! Every generated model carries a factory id that must be unique across the
//! application. Used ids are re-read from the model files on every request;
//! this module only holds the pure parts: recognising model documents,
//! reading ids off them and computing the free list.

use std::collections::BTreeSet;

use super::DomainError;
use super::entities::xml::Element;

/// Namespace of model documents.
pub const MODEL_NAMESPACE: &str = "http://www.neeveresearch.com/schema/x-adml";

/// Largest factory id the runtime accepts.
pub const MAX_FACTORY_ID: u16 = i16::MAX as u16;

/// Directory, relative to a module root, holding model files.
pub const MODELS_DIR: &str = "src/main/models";

const FACTORY_TAG: &str = "factory";
const ID_ATTR: &str = "id";

/// Parse a raw `id` attribute.
///
/// Blank → `Ok(None)`. Anything that is not a base-10 integer in
/// `[0, MAX_FACTORY_ID]` is a [`DomainError::MalformedIdentifier`].
pub fn parse_factory_id(value: &str, source_file: &str) -> Result<Option<u16>, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    trimmed
        .parse::<u16>()
        .ok()
        .filter(|id| *id <= MAX_FACTORY_ID)
        .map(Some)
        .ok_or_else(|| DomainError::MalformedIdentifier {
            source_file: source_file.to_string(),
            value: value.to_string(),
        })
}

/// True when `root` is the document element of a model file.
pub fn is_model_document(root: &Element) -> bool {
    root.namespace() == Some(MODEL_NAMESPACE)
}

/// Every factory id declared in a model document, anywhere in the tree.
///
/// Only `factory` elements in the model namespace count.
pub fn factory_ids(root: &Element, source_file: &str) -> Result<Vec<u16>, DomainError> {
    let mut ids = Vec::new();
    for el in root.descendants() {
        if el.local_name() != FACTORY_TAG || el.namespace() != Some(MODEL_NAMESPACE) {
            continue;
        }
        let Some(raw) = el.attribute(ID_ATTR) else {
            continue;
        };
        ids.extend(parse_factory_id(raw, source_file)?);
    }
    Ok(ids)
}

/// Compute the free ids given the used set.
///
/// Gaps in `[1, max_used)` come first, in ascending order, then
/// `max_used + 1, max_used + 2, …` until at least `min_count` ids are
/// available. The result may be longer than `min_count` when the gaps alone
/// exceed it.
pub fn available_ids(used: &BTreeSet<u16>, min_count: usize) -> Result<Vec<u16>, DomainError> {
    let max_used = used.last().copied().unwrap_or(0);

    let mut available: Vec<u16> = (1..max_used).filter(|id| !used.contains(id)).collect();

    let mut next = u32::from(max_used) + 1;
    while available.len() < min_count {
        if next > u32::from(MAX_FACTORY_ID) {
            return Err(DomainError::IdentifiersExhausted {
                max: MAX_FACTORY_ID,
            });
        }
        available.push(next as u16);
        next += 1;
    }

    Ok(available)
}
