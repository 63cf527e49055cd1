//! Component registry: name to descriptor, plus engine handler installation.

use std::collections::HashMap;
use std::rc::Rc;

use super::descriptor::{ComponentDescriptor, Field};
use super::error::ComponentError;
use super::pipeline::ComponentHandler;
use crate::markup::engine::Engine;

/// Registered components, in registration order.
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    components: HashMap<String, Rc<ComponentDescriptor>>,
    order: Vec<String>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and store `descriptor` under `name`, run its create hook, and
    /// install its block handler with `engine`.
    ///
    /// Fails if the name is taken (the placeholder tag counts as taken) or the
    /// descriptor has no usable render function.
    pub fn register(
        &mut self,
        engine: &mut Engine,
        name: &str,
        descriptor: impl Into<ComponentDescriptor>,
    ) -> Result<Rc<ComponentDescriptor>, ComponentError> {
        if self.components.contains_key(name) || name == engine.config().placeholder_tag {
            return Err(ComponentError::DuplicateRegistration {
                name: name.to_owned(),
            });
        }

        let mut descriptor = descriptor.into();
        descriptor.name = name.to_owned();
        validate(&descriptor)?;
        descriptor.run_create();

        let descriptor = Rc::new(descriptor);
        engine.register_custom_block_handler(
            name,
            Rc::new(ComponentHandler::new(Rc::clone(&descriptor))),
        );
        self.components.insert(name.to_owned(), Rc::clone(&descriptor));
        self.order.push(name.to_owned());

        tracing::debug!(
            component = name,
            defaults = descriptor.defaults().count(),
            methods = descriptor.methods().count(),
            "registered component"
        );
        Ok(descriptor)
    }

    pub fn get(&self, name: &str) -> Option<&Rc<ComponentDescriptor>> {
        self.components.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.components.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
}

fn validate(descriptor: &ComponentDescriptor) -> Result<(), ComponentError> {
    let name = descriptor.name();
    for (field, value) in descriptor.fields() {
        match (field.as_str(), value) {
            ("render", _) => {
                return Err(ComponentError::InvalidRenderType {
                    name: name.to_owned(),
                })
            }
            ("create", Field::Value(_)) => {
                return Err(ComponentError::InvalidDescriptor {
                    name: name.to_owned(),
                    reason: "`create` must be a function".into(),
                })
            }
            _ => {}
        }
    }
    if descriptor.render_fn().is_none() {
        return Err(ComponentError::InvalidDescriptor {
            name: name.to_owned(),
            reason: "the `render` function is required".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use pretty_assertions::assert_eq;

    fn hello() -> ComponentDescriptor {
        ComponentDescriptor::new().render(|_| r#"p { "hello" }"#)
    }

    #[test]
    fn register_installs_handler_and_names_descriptor() {
        let mut engine = Engine::new();
        let mut registry = ComponentRegistry::new();
        let desc = registry.register(&mut engine, "Hello", hello()).unwrap();
        assert_eq!(desc.name(), "Hello");
        assert!(engine.has_handler("Hello"));
        assert!(registry.contains("Hello"));
        assert_eq!(engine.render("Hello;").unwrap(), "<p>hello</p>");
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut engine = Engine::new();
        let mut registry = ComponentRegistry::new();
        registry.register(&mut engine, "Hello", hello()).unwrap();
        assert_eq!(
            registry.register(&mut engine, "Hello", hello()).unwrap_err(),
            ComponentError::DuplicateRegistration {
                name: "Hello".into()
            }
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn placeholder_tag_is_reserved() {
        let mut engine = Engine::new();
        let mut registry = ComponentRegistry::new();
        assert!(matches!(
            registry.register(&mut engine, "__InnerChildren", hello()),
            Err(ComponentError::DuplicateRegistration { .. })
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn descriptor_without_render_is_invalid() {
        let mut engine = Engine::new();
        let mut registry = ComponentRegistry::new();
        assert_eq!(
            registry
                .register(&mut engine, "Blank", ComponentDescriptor::new())
                .unwrap_err(),
            ComponentError::InvalidDescriptor {
                name: "Blank".into(),
                reason: "the `render` function is required".into(),
            }
        );
        assert!(!engine.has_handler("Blank"));
    }

    #[test]
    fn render_declared_as_field_is_invalid_type() {
        let mut engine = Engine::new();
        let mut registry = ComponentRegistry::new();
        let desc = ComponentDescriptor::new().field("render", "p;");
        assert_eq!(
            registry.register(&mut engine, "Odd", desc).unwrap_err(),
            ComponentError::InvalidRenderType { name: "Odd".into() }
        );
    }

    #[test]
    fn create_declared_as_field_is_invalid() {
        let mut engine = Engine::new();
        let mut registry = ComponentRegistry::new();
        let desc = hello().field("create", true);
        assert!(matches!(
            registry.register(&mut engine, "Odd", desc),
            Err(ComponentError::InvalidDescriptor { .. })
        ));
    }

    #[test]
    fn create_hook_runs_once_at_registration() {
        let mut engine = Engine::new();
        let mut registry = ComponentRegistry::new();
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        registry
            .register(
                &mut engine,
                "Counted",
                hello().create(move || counter.set(counter.get() + 1)),
            )
            .unwrap();
        assert_eq!(calls.get(), 1);
        engine.render("div { Counted; Counted; }").unwrap();
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn names_keep_registration_order() {
        let mut engine = Engine::new();
        let mut registry = ComponentRegistry::new();
        for name in ["Zeta", "Alpha", "Mid"] {
            registry.register(&mut engine, name, hello()).unwrap();
        }
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["Zeta", "Alpha", "Mid"]);
        assert!(registry.get("Alpha").is_some());
        assert!(registry.get("Omega").is_none());
    }
}
