//! XML parsing adapter backed by `xot`.
//!
//! The parsed `xot` document is converted into the core's owned
//! [`Element`] tree:
//!
//! - element and attribute names keep the prefix they were written with
//! - namespace declarations become leading `xmlns` / `xmlns:p` attributes
//! - the element's resolved namespace URI is recorded when it has one
//! - text, comments and processing instructions are carried through
//!
//! Comments and processing instructions around the document element land
//! in the [`XmlDocument`] prolog and epilog. The XML declaration is not
//! kept; serialization writes its own.

use appbuilder_core::{
    application::{ApplicationError, ports::XmlParser},
    domain::{Element, XmlDocument, XmlNode},
    error::AppBuilderResult,
};
use tracing::{instrument, trace};
use xot::{Node, Value, Xot};

/// [`XmlParser`] implementation using `xot`.
#[derive(Debug, Clone, Copy, Default)]
pub struct XotParser;

impl XotParser {
    pub fn new() -> Self {
        Self
    }
}

impl XmlParser for XotParser {
    #[instrument(skip(self, text), fields(source = %source, len = text.len()))]
    fn parse_document(&self, text: &str, source: &str) -> AppBuilderResult<XmlDocument> {
        let parse_error = |reason: String| ApplicationError::XmlParse {
            file: source.to_string(),
            reason,
        };

        let mut xot = Xot::new();
        let document = xot.parse(text).map_err(|e| parse_error(e.to_string()))?;
        let root = xot
            .document_element(document)
            .map_err(|e| parse_error(e.to_string()))?;

        let element = convert_element(&xot, root).map_err(|e| parse_error(e.to_string()))?;
        let mut parsed = XmlDocument::new(element);

        let mut before_root = true;
        for child in xot.children(document) {
            if child == root {
                before_root = false;
            } else if let Some(node) = convert_misc(&xot, child) {
                if before_root {
                    parsed.prolog.push(node);
                } else {
                    parsed.epilog.push(node);
                }
            }
        }

        trace!(
            root = %parsed.root.name(),
            prolog = parsed.prolog.len(),
            epilog = parsed.epilog.len(),
            "Parsed XML document"
        );
        Ok(parsed)
    }
}

fn convert_element(xot: &Xot, node: Node) -> Result<Element, xot::Error> {
    let Some(source) = xot.element(node) else {
        return Err(xot::Error::NotElement(node));
    };

    let name_id = source.name();
    let mut element = Element::new(xot.full_name(node, name_id)?);

    let uri = xot.uri_str(name_id);
    if !uri.is_empty() {
        element = element.with_namespace(uri);
    }

    for (prefix, namespace) in xot.namespaces(node).iter() {
        let prefix = xot.prefix_str(prefix);
        let attr = if prefix.is_empty() {
            "xmlns".to_string()
        } else {
            format!("xmlns:{prefix}")
        };
        element.set_attribute(attr, xot.namespace_str(*namespace));
    }

    for (name, value) in xot.attributes(node).iter() {
        element.set_attribute(xot.full_name(node, name)?, value.as_str());
    }

    for child in xot.children(node) {
        match xot.value(child) {
            Value::Element(_) => element.push(convert_element(xot, child)?),
            Value::Text(_) => {
                if let Some(text) = xot.text_str(child) {
                    element.push(XmlNode::text(text));
                }
            }
            _ => {
                if let Some(node) = convert_misc(xot, child) {
                    element.push(node);
                }
            }
        }
    }

    Ok(element)
}

/// Comment or processing instruction at `node`, if it is one.
fn convert_misc(xot: &Xot, node: Node) -> Option<XmlNode> {
    match xot.value(node) {
        Value::Comment(_) => xot
            .comment_str(node)
            .map(|comment| XmlNode::Comment(comment.to_string())),
        Value::ProcessingInstruction(pi) => Some(XmlNode::ProcessingInstruction {
            target: xot.local_name_str(pi.target()).to_string(),
            data: pi.data().map(str::to_string),
        }),
        _ => None,
    }
}
