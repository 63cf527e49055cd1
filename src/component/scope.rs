//! What a render function sees: props, children placeholder, bound methods.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use super::descriptor::ComponentDescriptor;
use super::event::{BoundEvent, Callback, EventTable};
use super::props::{PropsObject, SharedProps};
use crate::markup::engine::TemplateMiddleware;
use crate::markup::node::NodeKey;
use crate::markup::template::Template;
use crate::value::Value;

/// Per-invocation table mapping method name to its bound event.
pub type Bindings = Vec<(String, BoundEvent)>;

/// Memoized state of one component invocation node.
#[derive(Debug, Clone)]
pub struct Instance {
    pub props: SharedProps,
    pub bindings: Rc<Bindings>,
}

/// Arguments of a single render call.
pub struct RenderScope<'a> {
    pub(crate) descriptor: &'a Rc<ComponentDescriptor>,
    pub(crate) instance: &'a Instance,
    pub(crate) key: NodeKey,
    pub(crate) children: &'a str,
    pub(crate) events: &'a RefCell<EventTable>,
    pub(crate) middleware: &'a [Rc<TemplateMiddleware>],
}

impl<'a> RenderScope<'a> {
    /// Name of the component being rendered.
    pub fn name(&self) -> &str {
        self.descriptor.name()
    }

    /// The instance's props.
    ///
    /// # Panics
    ///
    /// Panics if called while an event handler of the same instance is
    /// running, which cannot happen within a synchronous render.
    pub fn props(&self) -> Ref<'_, PropsObject> {
        self.instance.props.borrow()
    }

    /// Current value of one prop, or `Undefined`.
    pub fn prop(&self, key: &str) -> Value {
        self.instance.props.borrow().get(key)
    }

    /// Markup that expands to the invocation's children, or `""` if it had none.
    pub fn children(&self) -> &str {
        self.children
    }

    /// The bound event for one of the descriptor's methods.
    pub fn method(&self, name: &str) -> Option<&BoundEvent> {
        self.instance
            .bindings
            .iter()
            .find(|(method, _)| method == name)
            .map(|(_, bound)| bound)
    }

    /// Bind an ad-hoc callback to this instance.
    pub fn bind(&self, callback: Callback) -> BoundEvent {
        self.events.borrow_mut().bind_event(
            Rc::clone(self.descriptor),
            callback,
            Rc::clone(&self.instance.props),
            Some(self.key),
        )
    }

    /// Run `value` through every registered template middleware.
    pub fn intercept(&self, value: Value) -> Value {
        self.middleware
            .iter()
            .fold(value, |value, middleware| middleware(value, self))
    }

    /// Start assembling markup with interpolation interception.
    pub fn template(&self) -> Template<'_, 'a> {
        Template::new(self)
    }
}
