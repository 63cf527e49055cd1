//! The per-invocation render pipeline.
//!
//! [`ComponentHandler`] is the block handler installed for every registered
//! component. For each invocation node it assembles props, stashes the
//! children behind a placeholder, calls the render function, and feeds the
//! returned markup back into the engine.

use std::cell::RefCell;
use std::rc::Rc;

use super::children::placeholder_markup;
use super::descriptor::ComponentDescriptor;
use super::error::ComponentError;
use super::props::{PropsObject, SharedProps};
use super::scope::{Bindings, Instance, RenderScope};
use crate::dom::{Dom, DomId};
use crate::error::RenderError;
use crate::markup::context::RenderContext;
use crate::markup::engine::BlockHandler;
use crate::markup::node::Node;
use crate::value::Value;

/// Resolves invocations of one registered component.
#[derive(Debug, Clone)]
pub struct ComponentHandler {
    descriptor: Rc<ComponentDescriptor>,
}

impl ComponentHandler {
    pub fn new(descriptor: Rc<ComponentDescriptor>) -> Self {
        Self { descriptor }
    }

    pub fn descriptor(&self) -> &Rc<ComponentDescriptor> {
        &self.descriptor
    }

    /// The memoized instance for `node`, built on first resolution.
    fn instance(&self, node: &Node, cx: &mut RenderContext<'_>) -> Instance {
        if let Some(instance) = cx.instance(node.key()) {
            return instance.clone();
        }

        let mut props = PropsObject::new().with_schema(self.descriptor.prop_schema().to_vec());
        for (name, value) in self.descriptor.defaults() {
            props.set_clean(name, value.clone());
        }
        for attr in node.attributes() {
            props.set_clean(&attr.name, attr.value.as_str());
        }
        let props: SharedProps = Rc::new(RefCell::new(props));

        let bindings: Bindings = {
            let mut events = cx.events().borrow_mut();
            self.descriptor
                .methods()
                .map(|(name, method)| {
                    let bound = events.bind_event(
                        Rc::clone(&self.descriptor),
                        Rc::clone(method),
                        Rc::clone(&props),
                        Some(node.key()),
                    );
                    (name.to_owned(), bound)
                })
                .collect()
        };

        tracing::debug!(
            component = self.descriptor.name(),
            key = node.key().get(),
            props = props.borrow().len(),
            methods = bindings.len(),
            "built component instance"
        );

        let instance = Instance {
            props,
            bindings: Rc::new(bindings),
        };
        cx.insert_instance(node.key(), instance.clone());
        instance
    }

    /// Cache the node's children and return the placeholder markup, or `""`
    /// when there are none.
    fn placeholder(&self, node: &Node, cx: &mut RenderContext<'_>) -> String {
        let children: Vec<Rc<Node>> = node.present_children().cloned().collect();
        if children.is_empty() {
            return String::new();
        }
        let index = cx.children_cache_mut().push(children);
        placeholder_markup(&cx.engine().config().placeholder_tag, index)
    }

    /// Run steps 1 to 3 of the pipeline: the markup this invocation renders to.
    fn markup(&self, node: &Node, cx: &mut RenderContext<'_>) -> Result<String, ComponentError> {
        let instance = self.instance(node, cx);
        let children = self.placeholder(node, cx);

        let name = self.descriptor.name();
        let render = self
            .descriptor
            .render_fn()
            .ok_or_else(|| ComponentError::MissingRender {
                name: name.to_owned(),
            })?;

        let engine = cx.engine();
        let scope = RenderScope {
            descriptor: &self.descriptor,
            instance: &instance,
            key: node.key(),
            children: &children,
            events: cx.events(),
            middleware: engine.middleware(),
        };
        match render(&scope) {
            Value::String(markup) => Ok(markup),
            other => Err(ComponentError::InvalidRenderResult {
                name: name.to_owned(),
                reason: format!("`render` must return a string, got {}", other.type_name()),
            }),
        }
    }
}

impl BlockHandler for ComponentHandler {
    fn render_to_string(
        &self,
        node: &Node,
        cx: &mut RenderContext<'_>,
    ) -> Result<String, RenderError> {
        let markup = self.markup(node, cx)?;
        cx.render(&markup)
    }

    fn create_dom_node(
        &self,
        node: &Node,
        cx: &mut RenderContext<'_>,
        dom: &mut Dom,
    ) -> Result<Vec<DomId>, RenderError> {
        let markup = self.markup(node, cx)?;
        let ids = cx.create_dom_fragment(&markup, dom)?;
        match ids.as_slice() {
            [id] if dom.is_element(*id) => Ok(ids),
            _ => Err(ComponentError::InvalidRenderResult {
                name: self.descriptor.name().to_owned(),
                reason: format!(
                    "`render` must produce exactly one element, got {} node(s)",
                    ids.len()
                ),
            }
            .into()),
        }
    }
}
