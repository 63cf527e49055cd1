//! Per-pass render state.
//!
//! A [`RenderContext`] lives for exactly one top-level render call. It owns
//! the node key allocator, the children cache, the event table, and the
//! memoized component instances, so nothing from one pass leaks into the
//! next.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::component::children::ChildrenCache;
use crate::component::event::EventTable;
use crate::component::scope::Instance;
use crate::dom::{Dom, DomId, ElementData};
use crate::error::RenderError;
use crate::markup::engine::Engine;
use crate::markup::html::{push_close_tag, push_open_tag, push_text};
use crate::markup::node::{Child, Node, NodeKey, NodeKeys, NodeKind};
use crate::markup::parser::{ParseError, parse_markup_with};

/// State of one render pass.
pub struct RenderContext<'e> {
    engine: &'e Engine,
    keys: NodeKeys,
    children: ChildrenCache,
    events: RefCell<EventTable>,
    instances: HashMap<NodeKey, Instance>,
    depth: usize,
}

impl<'e> RenderContext<'e> {
    pub fn new(engine: &'e Engine) -> Self {
        Self {
            engine,
            keys: NodeKeys::new(),
            children: ChildrenCache::new(),
            events: RefCell::new(EventTable::with_function_name(
                &engine.config().event_function,
            )),
            instances: HashMap::new(),
            depth: 0,
        }
    }

    pub fn engine(&self) -> &'e Engine {
        self.engine
    }

    // ── Resolution ───────────────────────────────────────────────────

    /// Parse and resolve `markup` to HTML text.
    pub fn render(&mut self, markup: &str) -> Result<String, RenderError> {
        self.nested(|cx| {
            let items = cx.parse(markup)?;
            let mut out = String::new();
            for node in items.iter().flatten() {
                out.push_str(&cx.render_node(node)?);
            }
            Ok(out)
        })
    }

    /// Parse and resolve `markup` into detached nodes of `dom`.
    pub fn create_dom_fragment(
        &mut self,
        markup: &str,
        dom: &mut Dom,
    ) -> Result<Vec<DomId>, RenderError> {
        self.nested(|cx| {
            let items = cx.parse(markup)?;
            let mut ids = Vec::new();
            for node in items.iter().flatten() {
                ids.extend(cx.build_dom_node(node, dom)?);
            }
            Ok(ids)
        })
    }

    /// Resolve one parsed node to HTML text.
    pub fn render_node(&mut self, node: &Node) -> Result<String, RenderError> {
        match node.kind() {
            NodeKind::Text(text) => {
                let mut out = String::new();
                push_text(&mut out, text);
                Ok(out)
            }
            NodeKind::Element(name) => self.nested(|cx| cx.render_element(name, node)),
        }
    }

    fn render_element(&mut self, name: &str, node: &Node) -> Result<String, RenderError> {
        if let Some(handler) = self.engine.handler(name) {
            tracing::trace!(element = %name, key = node.key().get(), "resolving custom block");
            return handler.render_to_string(node, self);
        }

        let mut out = String::new();
        let attributes = node
            .attributes()
            .iter()
            .map(|attr| (attr.name.as_str(), attr.value.as_str()));
        push_open_tag(&mut out, name, attributes);
        for child in node.present_children() {
            out.push_str(&self.render_node(child)?);
        }
        push_close_tag(&mut out, name);
        Ok(out)
    }

    /// Resolve one parsed node into detached nodes of `dom`.
    pub fn build_dom_node(&mut self, node: &Node, dom: &mut Dom) -> Result<Vec<DomId>, RenderError> {
        match node.kind() {
            NodeKind::Text(text) => Ok(vec![dom.create_text(text.clone())]),
            NodeKind::Element(name) => self.nested(|cx| cx.build_element(name, node, dom)),
        }
    }

    fn build_element(
        &mut self,
        name: &str,
        node: &Node,
        dom: &mut Dom,
    ) -> Result<Vec<DomId>, RenderError> {
        if let Some(handler) = self.engine.handler(name) {
            tracing::trace!(element = %name, key = node.key().get(), "building custom block");
            return handler.create_dom_node(node, self, dom);
        }

        let element = ElementData {
            tag: name.to_owned(),
            attributes: node
                .attributes()
                .iter()
                .map(|attr| (attr.name.clone(), attr.value.clone()))
                .collect(),
        };
        let id = dom.create_element(element);
        for child in node.present_children() {
            for child_id in self.build_dom_node(child, dom)? {
                dom.append_child(id, child_id);
            }
        }
        Ok(vec![id])
    }

    /// Parse `markup` with whatever nesting budget this pass has left.
    fn parse(&mut self, markup: &str) -> Result<Vec<Child>, RenderError> {
        let engine = self.engine;
        let limit = engine.config().max_depth;
        let remaining = limit.saturating_sub(self.depth);
        parse_markup_with(markup, &mut self.keys, engine.attribute_handlers(), remaining).map_err(
            |err| match err {
                ParseError::TooDeep { .. } => RenderError::DepthExceeded { limit },
                other => RenderError::Parse(other),
            },
        )
    }

    /// Run `f` one nesting level deeper, failing past the configured limit.
    fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, RenderError>,
    ) -> Result<T, RenderError> {
        let limit = self.engine.config().max_depth;
        if self.depth >= limit {
            return Err(RenderError::DepthExceeded { limit });
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    // ── Pass-scoped state ────────────────────────────────────────────

    pub fn children_cache(&self) -> &ChildrenCache {
        &self.children
    }

    pub(crate) fn children_cache_mut(&mut self) -> &mut ChildrenCache {
        &mut self.children
    }

    pub(crate) fn events(&self) -> &RefCell<EventTable> {
        &self.events
    }

    /// Number of events bound so far in this pass.
    pub fn event_count(&self) -> usize {
        self.events.borrow().len()
    }

    pub(crate) fn instance(&self, key: NodeKey) -> Option<&Instance> {
        self.instances.get(&key)
    }

    pub(crate) fn insert_instance(&mut self, key: NodeKey, instance: Instance) {
        self.instances.insert(key, instance);
    }

    /// Current nesting depth: open elements plus markup re-injections.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// End the pass, keeping the event table.
    pub fn into_events(self) -> EventTable {
        self.events.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuntimeConfig;

    #[test]
    fn depth_returns_to_zero_after_render() {
        let engine = Engine::new();
        let mut cx = RenderContext::new(&engine);
        cx.render("div { p; }").unwrap();
        assert_eq!(cx.depth(), 0);
    }

    #[test]
    fn zero_depth_limit_rejects_everything() {
        let engine = Engine::with_config(RuntimeConfig::new().with_max_depth(0));
        let mut cx = RenderContext::new(&engine);
        assert_eq!(
            cx.render("p;"),
            Err(RenderError::DepthExceeded { limit: 0 })
        );
    }

    fn nested_divs(depth: usize) -> String {
        "div {".repeat(depth) + &"}".repeat(depth)
    }

    #[test]
    fn deeply_nested_markup_is_rejected_in_both_paths() {
        let engine = Engine::new();
        let markup = nested_divs(10_000);

        let mut cx = RenderContext::new(&engine);
        assert_eq!(
            cx.render(&markup),
            Err(RenderError::DepthExceeded { limit: 128 })
        );

        let mut dom = Dom::new();
        let mut cx = RenderContext::new(&engine);
        assert_eq!(
            cx.create_dom_fragment(&markup, &mut dom),
            Err(RenderError::DepthExceeded { limit: 128 })
        );
    }

    #[test]
    fn element_levels_count_toward_the_limit() {
        let engine = Engine::with_config(RuntimeConfig::new().with_max_depth(4));

        // One level for the pass plus three elements.
        let mut cx = RenderContext::new(&engine);
        assert_eq!(
            cx.render(&nested_divs(3)).unwrap(),
            "<div><div><div></div></div></div>"
        );

        let mut cx = RenderContext::new(&engine);
        assert_eq!(
            cx.render(&nested_divs(4)),
            Err(RenderError::DepthExceeded { limit: 4 })
        );
    }

    #[test]
    fn holes_are_skipped_in_both_paths() {
        let engine = Engine::new();
        let mut cx = RenderContext::new(&engine);
        assert_eq!(cx.render(r#"ul { ; li; ; }"#).unwrap(), "<ul><li></li></ul>");

        let mut dom = Dom::new();
        let ids = cx.create_dom_fragment(r#"ul { ; li; ; }"#, &mut dom).unwrap();
        assert_eq!(ids.len(), 1);
        assert_eq!(dom.children(ids[0]).len(), 1);
    }

    #[test]
    fn fresh_context_has_empty_state() {
        let engine = Engine::new();
        let cx = RenderContext::new(&engine);
        assert!(cx.children_cache().is_empty());
        assert_eq!(cx.event_count(), 0);
    }
}
