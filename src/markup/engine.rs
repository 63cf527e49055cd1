//! The markup engine: handler tables and top-level render entry points.
//!
//! [`Engine`] owns the extension points (custom block handlers, template
//! middleware, attribute handlers) and starts render passes. Each pass gets a
//! fresh [`RenderContext`] that owns the pass-scoped state; the engine itself
//! never accumulates per-render data.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::component::event::EventTable;
use crate::component::scope::RenderScope;
use crate::config::RuntimeConfig;
use crate::dom::{Dom, DomId};
use crate::error::RenderError;
use crate::markup::context::RenderContext;
use crate::markup::node::{Attribute, Node};
use crate::value::Value;

// ---------------------------------------------------------------------------
// Extension point types
// ---------------------------------------------------------------------------

/// Resolution logic for a custom element name.
///
/// Both methods receive the node being resolved and the pass context, which
/// they use to resolve nested markup.
pub trait BlockHandler {
    /// Resolve `node` to HTML text.
    fn render_to_string(&self, node: &Node, cx: &mut RenderContext<'_>)
        -> Result<String, RenderError>;

    /// Resolve `node` into detached nodes of `dom`, returned in order.
    fn create_dom_node(
        &self,
        node: &Node,
        cx: &mut RenderContext<'_>,
        dom: &mut Dom,
    ) -> Result<Vec<DomId>, RenderError>;
}

/// Verdict of an attribute handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeAction {
    Keep,
    Drop,
}

/// Consulted for every attribute at parse time.
pub type AttributeHandler = dyn Fn(&Attribute) -> AttributeAction;

/// Rewrites interpolated values during markup assembly.
pub type TemplateMiddleware = dyn Fn(Value, &RenderScope<'_>) -> Value;

/// Result of a render pass: the output plus the events bound while producing
/// it, so handles embedded in the output can be dispatched.
#[derive(Debug)]
pub struct RenderOutput<T> {
    pub output: T,
    pub events: EventTable,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// BlockML engine with pluggable element handlers.
pub struct Engine {
    config: RuntimeConfig,
    handlers: HashMap<String, Rc<dyn BlockHandler>>,
    middleware: Vec<Rc<TemplateMiddleware>>,
    attribute_handlers: Vec<Rc<AttributeHandler>>,
}

impl Engine {
    /// Create an engine with default configuration and no handlers.
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    pub fn with_config(config: RuntimeConfig) -> Self {
        Self {
            config,
            handlers: HashMap::new(),
            middleware: Vec::new(),
            attribute_handlers: Vec::new(),
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Install `handler` for elements named `name`. Returns the handler it
    /// replaced, if any.
    pub fn register_custom_block_handler(
        &mut self,
        name: impl Into<String>,
        handler: Rc<dyn BlockHandler>,
    ) -> Option<Rc<dyn BlockHandler>> {
        self.handlers.insert(name.into(), handler)
    }

    /// Handler for `name`, if one is installed.
    pub fn handler(&self, name: &str) -> Option<Rc<dyn BlockHandler>> {
        self.handlers.get(name).cloned()
    }

    pub fn has_handler(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Append a template middleware. Middleware runs in registration order.
    pub fn register_template_middleware<F>(&mut self, middleware: F)
    where
        F: Fn(Value, &RenderScope<'_>) -> Value + 'static,
    {
        self.middleware.push(Rc::new(middleware));
    }

    pub fn middleware(&self) -> &[Rc<TemplateMiddleware>] {
        &self.middleware
    }

    /// Append an attribute handler. An attribute is dropped if any handler
    /// says so.
    pub fn register_custom_attribute_handler<F>(&mut self, handler: F)
    where
        F: Fn(&Attribute) -> AttributeAction + 'static,
    {
        self.attribute_handlers.push(Rc::new(handler));
    }

    pub fn attribute_handlers(&self) -> &[Rc<AttributeHandler>] {
        &self.attribute_handlers
    }

    /// Render markup to HTML text.
    pub fn render(&self, markup: &str) -> Result<String, RenderError> {
        self.render_pass(markup).map(|pass| pass.output)
    }

    /// Render markup to HTML text and keep the pass's event table.
    pub fn render_pass(&self, markup: &str) -> Result<RenderOutput<String>, RenderError> {
        let mut cx = RenderContext::new(self);
        let output = cx.render(markup)?;
        tracing::trace!(
            bytes = output.len(),
            events = cx.event_count(),
            cached_children = cx.children_cache().len(),
            "render pass complete"
        );
        Ok(RenderOutput {
            output,
            events: cx.into_events(),
        })
    }

    /// Build a DOM from markup that resolves to exactly one element.
    pub fn create_dom_node(&self, markup: &str) -> Result<Dom, RenderError> {
        self.create_dom_pass(markup).map(|pass| pass.output)
    }

    /// Build a DOM and keep the pass's event table.
    pub fn create_dom_pass(&self, markup: &str) -> Result<RenderOutput<Dom>, RenderError> {
        let mut cx = RenderContext::new(self);
        let mut dom = Dom::new();
        let roots = cx.create_dom_fragment(markup, &mut dom)?;
        match roots.as_slice() {
            [root] if dom.is_element(*root) => dom.set_root(*root),
            _ => return Err(RenderError::NotSingleElement { found: roots.len() }),
        }
        Ok(RenderOutput {
            output: dom,
            events: cx.into_events(),
        })
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut handlers: Vec<_> = self.handlers.keys().collect();
        handlers.sort();
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("handlers", &handlers)
            .field("middleware", &self.middleware.len())
            .field("attribute_handlers", &self.attribute_handlers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::html::push_text;
    use pretty_assertions::assert_eq;

    /// Renders `Shout { "x" }` as the upper-cased text of its children.
    struct Shout;

    fn shout(node: &Node) -> String {
        node.present_children()
            .filter_map(|child| child.text_value())
            .collect::<String>()
            .to_uppercase()
    }

    impl BlockHandler for Shout {
        fn render_to_string(
            &self,
            node: &Node,
            _cx: &mut RenderContext<'_>,
        ) -> Result<String, RenderError> {
            let mut out = String::new();
            push_text(&mut out, &shout(node));
            Ok(out)
        }

        fn create_dom_node(
            &self,
            node: &Node,
            _cx: &mut RenderContext<'_>,
            dom: &mut Dom,
        ) -> Result<Vec<DomId>, RenderError> {
            Ok(vec![dom.create_text(shout(node))])
        }
    }

    #[test]
    fn plain_markup_renders_html() {
        let engine = Engine::new();
        let html = engine
            .render(r#"html { head; body { h1 class: "t" { "Hi & bye" } } }"#)
            .unwrap();
        assert_eq!(
            html,
            r#"<html><head></head><body><h1 class="t">Hi &amp; bye</h1></body></html>"#
        );
    }

    #[test]
    fn top_level_siblings_concatenate() {
        let engine = Engine::new();
        assert_eq!(engine.render(r#"p { "a" } ; p { "b" }"#).unwrap(), "<p>a</p><p>b</p>");
    }

    #[test]
    fn custom_handler_resolves_element() {
        let mut engine = Engine::new();
        assert!(engine
            .register_custom_block_handler("Shout", Rc::new(Shout))
            .is_none());
        assert!(engine.has_handler("Shout"));
        let html = engine.render(r#"div { Shout { "hey" } }"#).unwrap();
        assert_eq!(html, "<div>HEY</div>");
    }

    #[test]
    fn replacing_a_handler_returns_the_old_one() {
        let mut engine = Engine::new();
        engine.register_custom_block_handler("Shout", Rc::new(Shout));
        assert!(engine
            .register_custom_block_handler("Shout", Rc::new(Shout))
            .is_some());
    }

    #[test]
    fn attribute_handlers_filter_at_parse_time() {
        let mut engine = Engine::new();
        engine.register_custom_attribute_handler(|attr| {
            if attr.name == "secret" {
                AttributeAction::Drop
            } else {
                AttributeAction::Keep
            }
        });
        let html = engine.render(r#"p secret: "x", id: "y";"#).unwrap();
        assert_eq!(html, r#"<p id="y"></p>"#);
    }

    #[test]
    fn dom_path_requires_single_element() {
        let engine = Engine::new();
        let err = engine.create_dom_node(r#"p; p;"#).unwrap_err();
        assert_eq!(err, RenderError::NotSingleElement { found: 2 });

        let err = engine.create_dom_node(r#""just text""#).unwrap_err();
        assert_eq!(err, RenderError::NotSingleElement { found: 1 });
    }

    #[test]
    fn dom_path_matches_string_path() {
        let mut engine = Engine::new();
        engine.register_custom_block_handler("Shout", Rc::new(Shout));
        let markup = r#"div id: "a" { Shout { "x" } p { "1 < 2" } }"#;
        let dom = engine.create_dom_node(markup).unwrap();
        let root = dom.root().unwrap();
        assert_eq!(dom.to_markup(root), engine.render(markup).unwrap());
    }

    #[test]
    fn parse_errors_propagate() {
        let engine = Engine::new();
        assert!(matches!(
            engine.render("div {"),
            Err(RenderError::Parse(_))
        ));
    }

    #[test]
    fn empty_pass_has_no_events() {
        let engine = Engine::new();
        let pass = engine.render_pass("p;").unwrap();
        assert!(pass.events.is_empty());
    }
}
