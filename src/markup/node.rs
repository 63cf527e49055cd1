//! Parsed markup nodes.
//!
//! A [`Node`] is either an element (name, attributes, children) or a text
//! literal. Children may contain `None` holes left by empty statements; the
//! component runtime filters them before use.

use std::rc::Rc;

/// Per-pass identity of a parsed node, used to memoize component state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(u64);

impl NodeKey {
    /// The raw counter value.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Monotonic [`NodeKey`] allocator. One per render pass.
#[derive(Debug, Default)]
pub struct NodeKeys {
    next: u64,
}

impl NodeKeys {
    /// Create an allocator starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next key.
    pub fn next_key(&mut self) -> NodeKey {
        let key = NodeKey(self.next);
        self.next += 1;
        key
    }
}

/// A `name: value` attribute. The value is always the raw (unquoted) string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A child slot: either a node or a hole.
pub type Child = Option<Rc<Node>>;

/// What kind of node this is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// `name attrs { children }`
    Element(String),
    /// `"text"`
    Text(String),
}

/// A node of the parsed markup tree.
#[derive(Debug, Clone)]
pub struct Node {
    key: NodeKey,
    kind: NodeKind,
    attributes: Vec<Attribute>,
    children: Vec<Child>,
}

impl Node {
    /// Create an element node.
    pub fn element(
        key: NodeKey,
        name: impl Into<String>,
        attributes: Vec<Attribute>,
        children: Vec<Child>,
    ) -> Self {
        Self {
            key,
            kind: NodeKind::Element(name.into()),
            attributes,
            children,
        }
    }

    /// Create a text node.
    pub fn text(key: NodeKey, text: impl Into<String>) -> Self {
        Self {
            key,
            kind: NodeKind::Text(text.into()),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn key(&self) -> NodeKey {
        self.key
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Element name, or `None` for text nodes.
    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element(name) => Some(name),
            NodeKind::Text(_) => None,
        }
    }

    /// Text content, or `None` for elements.
    pub fn text_value(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text(text) => Some(text),
            NodeKind::Element(_) => None,
        }
    }

    /// Attributes in source order.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// First attribute with the given name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    /// Children including holes.
    pub fn children(&self) -> &[Child] {
        &self.children
    }

    /// Children with holes filtered out, in order.
    pub fn present_children(&self) -> impl Iterator<Item = &Rc<Node>> {
        self.children.iter().flatten()
    }
}
