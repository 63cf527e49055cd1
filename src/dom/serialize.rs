//! Serialize DOM subtrees back to HTML text.
//!
//! The output format matches the string resolution path exactly, so the same
//! markup rendered both ways compares equal.

use super::node::{DomId, NodeData};
use super::tree::Dom;
use crate::markup::html::{push_close_tag, push_open_tag, push_text};

impl Dom {
    /// Serialize the subtree rooted at `id` (outer HTML).
    ///
    /// Returns an empty string for unknown ids.
    pub fn to_markup(&self, id: DomId) -> String {
        let mut out = String::new();
        self.write_markup(id, &mut out);
        out
    }

    /// Concatenated text of every text node below `id`, in tree order.
    pub fn text_content(&self, id: DomId) -> String {
        self.walk_depth_first(id)
            .into_iter()
            .filter_map(|node| match self.get(node) {
                Some(NodeData::Text(text)) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn write_markup(&self, id: DomId, out: &mut String) {
        match self.get(id) {
            Some(NodeData::Text(text)) => push_text(out, text),
            Some(NodeData::Element(el)) => {
                let attributes = el
                    .attributes
                    .iter()
                    .map(|(name, value)| (name.as_str(), value.as_str()));
                push_open_tag(out, &el.tag, attributes);
                for &child in self.children(id) {
                    self.write_markup(child, out);
                }
                push_close_tag(out, &el.tag);
            }
            None => {}
        }
    }
}
