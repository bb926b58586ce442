//! Owned XML tree used by the configuration merge and the model scanner.
//!
//! An [`Element`] owns its attributes and children outright, there are no
//! parent pointers. Parsing text into this tree is an adapter concern (see
//! the `XmlParser` port); everything here is pure tree manipulation plus the
//! canonical serializer.
//!
//! ## Canonical form
//!
//! [`Element::to_xml_string`] always writes:
//!
//! - `<?xml version="1.0" encoding="UTF-8"?>` followed by a newline
//! - four spaces of indentation per depth level
//! - `<name/>` for an element without children
//! - text-only and mixed-content elements on a single line, verbatim
//! - one child per line otherwise
//!
//! After [`Element::prune_whitespace`] the indentation written here is the
//! only whitespace between elements, so parse → prune → serialize is a
//! fixed point.
//!
//! [`XmlDocument`] adds the comments and processing instructions written
//! around the document element, one per line before and after it.

/// XML declaration written ahead of every serialized document.
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

const INDENT: &str = "    ";

/// A child node of an [`Element`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(Element),
    Text(String),
    Comment(String),
    ProcessingInstruction { target: String, data: Option<String> },
}

impl XmlNode {
    pub fn text(value: impl Into<String>) -> Self {
        XmlNode::Text(value.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            XmlNode::Element(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            XmlNode::Element(e) => Some(e),
            _ => None,
        }
    }

    /// True for a text node holding nothing but whitespace.
    pub fn is_blank_text(&self) -> bool {
        matches!(self, XmlNode::Text(t) if t.trim().is_empty())
    }

    fn is_equivalent(&self, other: &XmlNode) -> bool {
        match (self, other) {
            (XmlNode::Element(a), XmlNode::Element(b)) => a.is_equivalent(b),
            (XmlNode::Text(a), XmlNode::Text(b)) => a.trim() == b.trim(),
            (XmlNode::Comment(a), XmlNode::Comment(b)) => a.trim() == b.trim(),
            (
                XmlNode::ProcessingInstruction { target: ta, data: da },
                XmlNode::ProcessingInstruction { target: tb, data: db },
            ) => ta == tb && da.as_deref().map(str::trim) == db.as_deref().map(str::trim),
            _ => false,
        }
    }
}

impl From<Element> for XmlNode {
    fn from(element: Element) -> Self {
        XmlNode::Element(element)
    }
}

/// An XML element: qualified name, ordered unique attributes, ordered children.
///
/// `name` is kept exactly as written (`x:factory`). `namespace` is the
/// resolved namespace URI, filled in by the parser; it is informational and
/// takes no part in equivalence or serialization. Namespace declarations are
/// ordinary `xmlns` / `xmlns:p` attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    namespace: Option<String>,
    attributes: Vec<(String, String)>,
    children: Vec<XmlNode>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_namespace(mut self, uri: impl Into<String>) -> Self {
        self.namespace = Some(uri.into());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn with_child(mut self, child: impl Into<XmlNode>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_child(XmlNode::Text(text.into()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name without its prefix: `x:factory` → `factory`.
    pub fn local_name(&self) -> &str {
        self.name
            .split_once(':')
            .map_or(self.name.as_str(), |(_, local)| local)
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing the value in place if it already exists.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == name) {
            Some((_, v)) => *v = value,
            None => self.attributes.push((name, value)),
        }
    }

    pub fn children(&self) -> &[XmlNode] {
        &self.children
    }

    pub fn push(&mut self, child: impl Into<XmlNode>) {
        self.children.push(child.into());
    }

    /// Element children only.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(XmlNode::as_element)
    }

    /// Concatenated direct text children.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|c| match c {
                XmlNode::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Depth-first pre-order walk over this element and all descendants.
    pub fn descendants(&self) -> Vec<&Element> {
        let mut out = vec![self];
        let mut stack: Vec<&Element> = self.elements().collect();
        stack.reverse();
        while let Some(el) = stack.pop() {
            out.push(el);
            let mark = stack.len();
            stack.extend(el.elements());
            stack[mark..].reverse();
        }
        out
    }

    /// Find the first direct child element matching `matches`, appending
    /// `create()` when none does. Returns the matched or created child.
    pub fn child_or_insert_with(
        &mut self,
        matches: impl Fn(&Element) -> bool,
        create: impl FnOnce() -> Element,
    ) -> &mut Element {
        let found = self
            .children
            .iter()
            .position(|n| n.as_element().is_some_and(&matches));

        let idx = match found {
            Some(idx) => idx,
            None => {
                self.children.push(XmlNode::Element(create()));
                self.children.len() - 1
            }
        };

        match &mut self.children[idx] {
            XmlNode::Element(e) => e,
            _ => unreachable!("index always points at an element child"),
        }
    }

    /// Structural equivalence.
    ///
    /// Names equal, attributes equal as an unordered set of name/value pairs,
    /// children equal in count and order (text compared trimmed, elements
    /// compared recursively).
    pub fn is_equivalent(&self, other: &Element) -> bool {
        self.name == other.name
            && self.attributes.len() == other.attributes.len()
            && self
                .attributes
                .iter()
                .all(|(k, v)| other.attribute(k) == Some(v.as_str()))
            && self.children.len() == other.children.len()
            && self
                .children
                .iter()
                .zip(&other.children)
                .all(|(a, b)| a.is_equivalent(b))
    }

    /// Remove every whitespace-only text node at every depth.
    pub fn prune_whitespace(&mut self) {
        self.children.retain(|c| !c.is_blank_text());
        for child in &mut self.children {
            if let XmlNode::Element(e) = child {
                e.prune_whitespace();
            }
        }
    }

    /// Serialize as a complete document in canonical form.
    pub fn to_xml_string(&self) -> String {
        let mut out = String::with_capacity(256);
        out.push_str(XML_DECLARATION);
        out.push('\n');
        write_element(&mut out, self, 0);
        out
    }

    /// Serialize this element alone, without declaration or trailing newline.
    pub fn to_fragment_string(&self) -> String {
        let mut out = String::new();
        write_inline(&mut out, &XmlNode::Element(self.clone()));
        out
    }
}

/// A whole document: the element plus the nodes written before and after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    /// Comments and processing instructions ahead of the document element.
    pub prolog: Vec<XmlNode>,
    pub root: Element,
    /// Comments and processing instructions after the document element.
    pub epilog: Vec<XmlNode>,
}

impl XmlDocument {
    pub fn new(root: Element) -> Self {
        Self {
            prolog: Vec::new(),
            root,
            epilog: Vec::new(),
        }
    }

    /// Canonical form of the document, prolog and epilog included.
    pub fn to_xml_string(&self) -> String {
        let mut out = String::with_capacity(256);
        out.push_str(XML_DECLARATION);
        out.push('\n');
        for node in &self.prolog {
            write_inline(&mut out, node);
            out.push('\n');
        }
        write_element(&mut out, &self.root, 0);
        for node in &self.epilog {
            write_inline(&mut out, node);
            out.push('\n');
        }
        out
    }
}

impl From<Element> for XmlDocument {
    fn from(root: Element) -> Self {
        Self::new(root)
    }
}

// ── serialization ──

fn write_element(out: &mut String, el: &Element, depth: usize) {
    push_indent(out, depth);
    write_start_tag(out, el);

    if el.children.is_empty() {
        out.push_str("/>\n");
        return;
    }

    let has_text = el.children.iter().any(|c| matches!(c, XmlNode::Text(_)));
    if has_text {
        out.push('>');
        for child in &el.children {
            write_inline(out, child);
        }
        write_end_tag(out, el);
        out.push('\n');
        return;
    }

    out.push_str(">\n");
    for child in &el.children {
        match child {
            XmlNode::Element(e) => write_element(out, e, depth + 1),
            other => {
                push_indent(out, depth + 1);
                write_inline(out, other);
                out.push('\n');
            }
        }
    }
    push_indent(out, depth);
    write_end_tag(out, el);
    out.push('\n');
}

fn write_inline(out: &mut String, node: &XmlNode) {
    match node {
        XmlNode::Element(el) => {
            write_start_tag(out, el);
            if el.children.is_empty() {
                out.push_str("/>");
            } else {
                out.push('>');
                for child in &el.children {
                    write_inline(out, child);
                }
                write_end_tag(out, el);
            }
        }
        XmlNode::Text(text) => escape_into(out, text, false),
        XmlNode::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
        XmlNode::ProcessingInstruction { target, data } => {
            out.push_str("<?");
            out.push_str(target);
            if let Some(data) = data {
                out.push(' ');
                out.push_str(data);
            }
            out.push_str("?>");
        }
    }
}

fn write_start_tag(out: &mut String, el: &Element) {
    out.push('<');
    out.push_str(&el.name);
    for (name, value) in &el.attributes {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        escape_into(out, value, true);
        out.push('"');
    }
}

fn write_end_tag(out: &mut String, el: &Element) {
    out.push_str("</");
    out.push_str(&el.name);
    out.push('>');
}

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

fn escape_into(out: &mut String, text: &str, attribute: bool) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            '\n' if attribute => out.push_str("&#10;"),
            '\t' if attribute => out.push_str("&#9;"),
            // A raw CR is folded away by any parser, in text and attributes.
            '\r' => out.push_str("&#13;"),
            _ => out.push(c),
        }
    }
}
