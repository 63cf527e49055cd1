//! Children cache and the placeholder element that expands back to it.
//!
//! Render functions return markup text, so an invocation's children cannot be
//! passed through directly. They are stored in the pass's [`ChildrenCache`]
//! and a placeholder element carrying the cache index is spliced into the
//! markup instead. When the engine reaches the placeholder,
//! [`PlaceholderHandler`] resolves the cached nodes in place.

use std::rc::Rc;

use super::error::ComponentError;
use crate::dom::{Dom, DomId};
use crate::error::RenderError;
use crate::markup::context::RenderContext;
use crate::markup::engine::BlockHandler;
use crate::markup::escape::quote;
use crate::markup::node::Node;

/// Name of the placeholder's only attribute.
pub const INDEX_ATTRIBUTE: &str = "index";

/// Append-only store of child node sequences for one render pass.
///
/// Indices are assigned in increasing order and never reused.
#[derive(Debug, Default)]
pub struct ChildrenCache {
    entries: Vec<Vec<Rc<Node>>>,
}

impl ChildrenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `children` and return their index.
    pub fn push(&mut self, children: Vec<Rc<Node>>) -> usize {
        let index = self.entries.len();
        tracing::debug!(index, count = children.len(), "cached children");
        self.entries.push(children);
        index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The children stored under `index`.
    pub fn get(&self, index: usize) -> Result<&[Rc<Node>], ComponentError> {
        if index >= self.entries.len() {
            return Err(ComponentError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        self.entries
            .get(index)
            .map(Vec::as_slice)
            .ok_or_else(|| ComponentError::NoSuchEntry {
                index: index.to_string(),
            })
    }
}

/// Markup of a placeholder element for cache entry `index`.
pub fn placeholder_markup(tag: &str, index: usize) -> String {
    format!("{tag} {INDEX_ATTRIBUTE}: {};", quote(&index.to_string()))
}

/// Block handler for the placeholder element.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaceholderHandler;

impl PlaceholderHandler {
    /// Look up the cached children referenced by `node`.
    fn children(
        &self,
        node: &Node,
        cx: &RenderContext<'_>,
    ) -> Result<Vec<Rc<Node>>, ComponentError> {
        let raw = node
            .attribute(INDEX_ATTRIBUTE)
            .ok_or(ComponentError::MissingIndex)?;
        let index = raw
            .trim()
            .parse::<usize>()
            .map_err(|_| ComponentError::NoSuchEntry {
                index: raw.to_owned(),
            })?;
        // Cloned out so resolution can borrow the context mutably.
        Ok(cx.children_cache().get(index)?.to_vec())
    }
}

impl BlockHandler for PlaceholderHandler {
    fn render_to_string(
        &self,
        node: &Node,
        cx: &mut RenderContext<'_>,
    ) -> Result<String, RenderError> {
        let children = self.children(node, cx)?;
        let mut out = String::new();
        for child in &children {
            out.push_str(&cx.render_node(child)?);
        }
        Ok(out)
    }

    fn create_dom_node(
        &self,
        node: &Node,
        cx: &mut RenderContext<'_>,
        dom: &mut Dom,
    ) -> Result<Vec<DomId>, RenderError> {
        let children = self.children(node, cx)?;
        let mut ids = Vec::new();
        for child in &children {
            ids.extend(cx.build_dom_node(child, dom)?);
        }
        Ok(ids)
    }
}
