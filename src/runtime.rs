//! Runtime: the engine with component support installed.
//!
//! [`Runtime`] ties together the markup engine and the component registry.
//! Construction installs the placeholder handler, the template middleware
//! that turns callbacks into event handles, and the attribute handler that
//! drops event-sigil attributes.

use std::rc::Rc;

use crate::component::children::PlaceholderHandler;
use crate::component::descriptor::ComponentDescriptor;
use crate::component::error::ComponentError;
use crate::component::registry::ComponentRegistry;
use crate::config::RuntimeConfig;
use crate::dom::Dom;
use crate::error::RenderError;
use crate::markup::engine::{AttributeAction, Engine, RenderOutput};
use crate::value::Value;

/// Markup engine plus registered components.
#[derive(Debug)]
pub struct Runtime {
    engine: Engine,
    registry: ComponentRegistry,
}

impl Runtime {
    /// Create a runtime with the default configuration.
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    pub fn with_config(config: RuntimeConfig) -> Self {
        let placeholder = config.placeholder_tag.clone();
        let sigil = config.event_sigil;
        let mut engine = Engine::with_config(config);

        engine.register_custom_block_handler(placeholder, Rc::new(PlaceholderHandler));
        engine.register_template_middleware(|value, scope| match value {
            Value::Callback(callback) => Value::Event(scope.bind(callback)),
            other => other,
        });
        // Dedicated handling of sigil attributes is an open extension point;
        // until then they are removed so they never reach the output.
        engine.register_custom_attribute_handler(move |attr| {
            if attr.name.starts_with(sigil) {
                tracing::trace!(attribute = %attr.name, "dropping event attribute");
                AttributeAction::Drop
            } else {
                AttributeAction::Keep
            }
        });

        Self {
            engine,
            registry: ComponentRegistry::new(),
        }
    }

    /// Register a component under `name`.
    pub fn register(
        &mut self,
        name: &str,
        descriptor: impl Into<ComponentDescriptor>,
    ) -> Result<Rc<ComponentDescriptor>, ComponentError> {
        self.registry.register(&mut self.engine, name, descriptor)
    }

    /// Alias of [`register`](Self::register).
    pub fn component(
        &mut self,
        name: &str,
        descriptor: impl Into<ComponentDescriptor>,
    ) -> Result<Rc<ComponentDescriptor>, ComponentError> {
        self.register(name, descriptor)
    }

    pub fn render(&self, markup: &str) -> Result<String, RenderError> {
        self.engine.render(markup)
    }

    /// Render and keep the event table so handles in the output can be
    /// dispatched.
    pub fn render_pass(&self, markup: &str) -> Result<RenderOutput<String>, RenderError> {
        self.engine.render_pass(markup)
    }

    pub fn create_dom_node(&self, markup: &str) -> Result<Dom, RenderError> {
        self.engine.create_dom_node(markup)
    }

    pub fn create_dom_pass(&self, markup: &str) -> Result<RenderOutput<Dom>, RenderError> {
        self.engine.create_dom_pass(markup)
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Mutable engine access for installing further handlers.
    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    pub fn config(&self) -> &RuntimeConfig {
        self.engine.config()
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}
