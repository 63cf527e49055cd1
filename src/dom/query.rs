//! DOM queries: by tag, by attribute, generic predicate matching.

use super::node::{DomId, NodeData};
use super::tree::Dom;

impl Dom {
    /// Find all elements with the given tag, in tree order from the root.
    pub fn query_by_tag(&self, tag: &str) -> Vec<DomId> {
        self.query_all(|data| data.tag() == Some(tag))
    }

    /// Find all elements carrying the named attribute, in tree order.
    pub fn query_by_attribute(&self, name: &str) -> Vec<DomId> {
        self.query_all(|data| data.as_element().is_some_and(|el| el.has_attribute(name)))
    }

    /// Find all nodes matching an arbitrary predicate.
    ///
    /// Walks the tree rooted at [`Dom::root`] depth-first. Without a root the
    /// arena is scanned in insertion order.
    pub fn query_all(&self, predicate: impl Fn(&NodeData) -> bool) -> Vec<DomId> {
        let order = match self.root() {
            Some(root) => self.walk_depth_first(root),
            None => self.nodes.keys().collect(),
        };
        order
            .into_iter()
            .filter(|&id| self.get(id).is_some_and(&predicate))
            .collect()
    }
}
