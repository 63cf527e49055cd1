//! Node types: DomId, NodeData, ElementData.

use slotmap::new_key_type;

new_key_type! {
    /// Unique identifier for a DOM node. Copy, lightweight (u64).
    pub struct DomId;
}

/// Data associated with a single DOM node: an element or a run of text.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    /// An element with a tag name and attributes.
    Element(ElementData),
    /// A text node.
    Text(String),
}

impl NodeData {
    /// Shorthand for an element node with no attributes.
    pub fn element(tag: impl Into<String>) -> Self {
        Self::Element(ElementData::new(tag))
    }

    /// Shorthand for a text node.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// The tag name, if this is an element.
    pub fn tag(&self) -> Option<&str> {
        match self {
            Self::Element(el) => Some(&el.tag),
            Self::Text(_) => None,
        }
    }

    /// The element data, if this is an element.
    pub fn as_element(&self) -> Option<&ElementData> {
        match self {
            Self::Element(el) => Some(el),
            Self::Text(_) => None,
        }
    }

    /// Whether this is an element node.
    pub fn is_element(&self) -> bool {
        matches!(self, Self::Element(_))
    }
}

/// Tag name plus ordered attribute list of an element node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    /// Element tag (e.g. "div", "h1").
    pub tag: String,
    /// Attributes in source order.
    pub attributes: Vec<(String, String)>,
}

impl ElementData {
    /// Create element data with the given tag and no attributes.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
        }
    }

    /// Set an attribute (builder).
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Look up an attribute value by name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Whether the element carries the named attribute.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|(n, _)| n == name)
    }

    /// Set an attribute, replacing an existing value in place.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Remove an attribute. No-op if not present.
    pub fn remove_attribute(&mut self, name: &str) {
        self.attributes.retain(|(n, _)| n != name);
    }
}
