//! In-memory element tree.
//!
//! Trees are owned: an [`Element`] holds its attributes and children
//! directly, so node creation needs no document arena. Bindings read the tree
//! through [`NodeRef`], a borrowed view that puts attributes and children
//! behind one type so a single `is_bound_to` check can route either.

use std::fmt::{self, Write as _};

/// Name of the scratch parent used for top-level encodes.
pub const DOCUMENT_NODE_NAME: &str = "#document";

/// The three node kinds a binding can claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Element,
    Text,
    Attribute,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Element => f.write_str("element"),
            NodeKind::Text => f.write_str("text"),
            NodeKind::Attribute => f.write_str("attribute"),
        }
    }
}

/// A `name="value"` pair on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    name: String,
    value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Attribute {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// An owned node, as produced by a binding's `serialize`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    Attribute(Attribute),
}

impl Node {
    pub fn text(value: impl Into<String>) -> Self {
        Node::Text(value.into())
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Element(_) => NodeKind::Element,
            Node::Text(_) => NodeKind::Text,
            Node::Attribute(_) => NodeKind::Attribute,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }

    pub fn into_element(self) -> Option<Element> {
        match self {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_node_ref(&self) -> NodeRef<'_> {
        match self {
            Node::Element(e) => NodeRef::Element(e),
            Node::Text(t) => NodeRef::Text(t),
            Node::Attribute(a) => NodeRef::Attribute(a),
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

/// A borrowed view of one node inside an [`Element`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRef<'a> {
    Element(&'a Element),
    Text(&'a str),
    Attribute(&'a Attribute),
}

impl<'a> NodeRef<'a> {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeRef::Element(_) => NodeKind::Element,
            NodeRef::Text(_) => NodeKind::Text,
            NodeRef::Attribute(_) => NodeKind::Attribute,
        }
    }

    /// The tag of an element or the name of an attribute. Text has no name.
    pub fn name(&self) -> Option<&'a str> {
        match self {
            NodeRef::Element(e) => Some(e.name()),
            NodeRef::Attribute(a) => Some(a.name()),
            NodeRef::Text(_) => None,
        }
    }

    pub fn as_element(&self) -> Option<&'a Element> {
        match self {
            NodeRef::Element(e) => Some(e),
            _ => None,
        }
    }

    /// True when this is an element carrying `tag`.
    pub fn is_element_named(&self, tag: &str) -> bool {
        matches!(self, NodeRef::Element(e) if e.name() == tag)
    }
}

/// Short identity used in diagnostics: `<tag>`, `@name` or `text "..."`.
impl fmt::Display for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const PREVIEW: usize = 24;
        match self {
            NodeRef::Element(e) => write!(f, "<{}>", e.name()),
            NodeRef::Attribute(a) => write!(f, "@{}", a.name()),
            NodeRef::Text(t) => {
                let mut preview: String = t.chars().take(PREVIEW).collect();
                if t.chars().count() > PREVIEW {
                    preview.push_str("...");
                }
                write!(f, "text {preview:?}")
            }
        }
    }
}

/// An element: tag name, attributes in insertion order, children in
/// document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<Attribute>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Element {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// A scratch parent for encoding a root bean.
    pub fn document() -> Self {
        Element::new(DOCUMENT_NODE_NAME)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Sets `name`, replacing the value of an existing attribute in place.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|a| a.name == name) {
            Some(existing) => existing.value = value,
            None => self.attributes.push(Attribute { name, value }),
        }
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Child elements only, skipping text.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Appends `node`. Attribute nodes land in the attribute list.
    pub fn append(&mut self, node: Node) {
        match node {
            Node::Attribute(a) => self.set_attribute(a.name, a.value),
            other => self.children.push(other),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn with_child(mut self, node: impl Into<Node>) -> Self {
        self.append(node.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.append(Node::Text(text.into()));
        self
    }

    /// Concatenated text of the direct text children.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|n| match n {
                Node::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Attributes first, then children in document order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeRef<'_>> {
        self.attributes
            .iter()
            .map(NodeRef::Attribute)
            .chain(self.children.iter().map(Node::as_node_ref))
    }

    /// Indented rendering, one element per line.
    pub fn pretty(&self, indent: usize) -> Pretty<'_> {
        Pretty {
            element: self,
            indent,
        }
    }

    pub fn to_pretty_string(&self, indent: usize) -> String {
        self.pretty(indent).to_string()
    }

    fn write_open(&self, out: &mut impl fmt::Write) -> fmt::Result {
        write!(out, "<{}", self.name)?;
        for a in &self.attributes {
            write!(out, " {}=\"", a.name)?;
            write_escaped(out, &a.value, true)?;
            out.write_char('"')?;
        }
        Ok(())
    }

    fn write_pretty(&self, out: &mut impl fmt::Write, indent: usize, depth: usize) -> fmt::Result {
        let pad = " ".repeat(indent * depth);
        out.write_str(&pad)?;
        self.write_open(out)?;
        if self.children.is_empty() {
            return out.write_str("/>\n");
        }
        // Mixed or text-only content stays on one line.
        if self.children.iter().any(|c| matches!(c, Node::Text(_))) {
            out.write_char('>')?;
            for child in &self.children {
                write!(out, "{child}")?;
            }
            writeln!(out, "</{}>", self.name)?;
            return Ok(());
        }
        out.write_str(">\n")?;
        for child in &self.children {
            if let Node::Element(e) = child {
                e.write_pretty(out, indent, depth + 1)?;
            }
        }
        writeln!(out, "{pad}</{}>", self.name)
    }
}

/// Display adapter returned by [`Element::pretty`].
#[derive(Debug, Clone, Copy)]
pub struct Pretty<'a> {
    element: &'a Element,
    indent: usize,
}

impl fmt::Display for Pretty<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.element.write_pretty(f, self.indent, 0)
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_open(f)?;
        if self.children.is_empty() {
            return f.write_str("/>");
        }
        f.write_char('>')?;
        for child in &self.children {
            write!(f, "{child}")?;
        }
        write!(f, "</{}>", self.name)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Element(e) => write!(f, "{e}"),
            Node::Text(t) => write_escaped(f, t, false),
            Node::Attribute(a) => {
                write!(f, "{}=\"", a.name)?;
                write_escaped(f, &a.value, true)?;
                f.write_char('"')
            }
        }
    }
}

fn write_escaped(out: &mut impl fmt::Write, s: &str, in_attribute: bool) -> fmt::Result {
    for c in s.chars() {
        match c {
            '&' => out.write_str("&amp;")?,
            '<' => out.write_str("&lt;")?,
            '>' => out.write_str("&gt;")?,
            '"' if in_attribute => out.write_str("&quot;")?,
            c => out.write_char(c)?,
        }
    }
    Ok(())
}

/// Whether `name` can be used as an element or attribute name.
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == ':' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | ':' | '-' | '.'))
}
