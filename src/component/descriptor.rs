//! Component descriptors and the typed `Component` trait.
//!
//! A [`ComponentDescriptor`] bundles a render function, an optional create
//! hook, default property values and bindable methods. Descriptors are built
//! with builder methods or converted from any [`Component`] implementation,
//! and are immutable once registered.

use std::fmt;
use std::rc::Rc;

use super::event::{Callback, Event};
use super::props::{PropSchema, PropsObject};
use super::scope::RenderScope;
use crate::value::Value;

/// Render function: produces markup (as a string value) for one invocation.
pub type RenderFn = dyn Fn(&RenderScope<'_>) -> Value;

/// Side-effecting hook run once when the component is registered.
pub type CreateFn = dyn Fn();

fn render_fn<F>(f: F) -> Rc<RenderFn>
where
    F: Fn(&RenderScope<'_>) -> Value + 'static,
{
    Rc::new(f)
}

/// A non-render member of a descriptor.
#[derive(Clone)]
pub enum Field {
    /// Default property value, seeded clean into every instance.
    Value(Value),
    /// Method, bound per instance into the event table.
    Method(Callback),
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Field::Method(_) => f.write_str("Method(<fn>)"),
        }
    }
}

// ---------------------------------------------------------------------------
// ComponentDescriptor
// ---------------------------------------------------------------------------

/// Everything the runtime knows about one component.
#[derive(Clone, Default)]
pub struct ComponentDescriptor {
    pub(crate) name: String,
    render: Option<Rc<RenderFn>>,
    create: Option<Rc<CreateFn>>,
    fields: Vec<(String, Field)>,
    schema: PropSchema,
}

impl ComponentDescriptor {
    /// An empty descriptor. Registration fails until a render function is set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the render function (builder).
    pub fn render<F, R>(mut self, render: F) -> Self
    where
        F: Fn(&RenderScope<'_>) -> R + 'static,
        R: Into<Value>,
    {
        self.render = Some(render_fn(move |scope| render(scope).into()));
        self
    }

    /// Set the create hook (builder).
    pub fn create(mut self, create: impl Fn() + 'static) -> Self {
        self.create = Some(Rc::new(create));
        self
    }

    /// Add a default property value (builder).
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push_field(name.into(), Field::Value(value.into()));
        self
    }

    /// Add a bindable method (builder).
    pub fn method<F>(mut self, name: impl Into<String>, method: F) -> Self
    where
        F: Fn(&ComponentDescriptor, &Event, &mut PropsObject) + 'static,
    {
        self.push_field(name.into(), Field::Method(Rc::new(method)));
        self
    }

    /// Declare an advisory schema entry (builder).
    pub fn schema(mut self, prop: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.schema.push((prop.into(), type_name.into()));
        self
    }

    fn push_field(&mut self, name: String, field: Field) {
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = field,
            None => self.fields.push((name, field)),
        }
    }

    /// Registered name. Empty until registration.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn render_fn(&self) -> Option<&Rc<RenderFn>> {
        self.render.as_ref()
    }

    pub fn has_create(&self) -> bool {
        self.create.is_some()
    }

    /// All non-render members in declaration order.
    pub fn fields(&self) -> &[(String, Field)] {
        &self.fields
    }

    /// Default property values in declaration order.
    pub fn defaults(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().filter_map(|(name, field)| match field {
            Field::Value(value) => Some((name.as_str(), value)),
            Field::Method(_) => None,
        })
    }

    /// Methods in declaration order.
    pub fn methods(&self) -> impl Iterator<Item = (&str, &Callback)> {
        self.fields.iter().filter_map(|(name, field)| match field {
            Field::Method(method) => Some((name.as_str(), method)),
            Field::Value(_) => None,
        })
    }

    pub fn prop_schema(&self) -> &[(String, String)] {
        &self.schema
    }

    pub(crate) fn run_create(&self) {
        if let Some(create) = &self.create {
            create();
        }
    }
}

impl fmt::Debug for ComponentDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentDescriptor")
            .field("name", &self.name)
            .field("has_render", &self.render.is_some())
            .field("has_create", &self.create.is_some())
            .field("fields", &self.fields)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Component trait
// ---------------------------------------------------------------------------

/// Typed component interface.
///
/// Implementors convert into a [`ComponentDescriptor`] via `From`, so they can
/// be passed straight to registration.
pub trait Component: 'static {
    /// Produce markup for one invocation.
    fn render(&self, scope: &RenderScope<'_>) -> String;

    /// Run once at registration.
    fn create(&self) {}

    /// Default property values.
    fn defaults(&self) -> Vec<(String, Value)> {
        Vec::new()
    }

    /// Bindable methods.
    fn methods(&self) -> Vec<(String, Callback)> {
        Vec::new()
    }
}

impl<C: Component> From<C> for ComponentDescriptor {
    fn from(component: C) -> Self {
        let component = Rc::new(component);
        let mut descriptor = ComponentDescriptor::new();
        for (name, value) in component.defaults() {
            descriptor.push_field(name, Field::Value(value));
        }
        for (name, method) in component.methods() {
            descriptor.push_field(name, Field::Method(method));
        }

        let renderer = Rc::clone(&component);
        descriptor = descriptor.render(move |scope| renderer.render(scope));
        descriptor.create(move || component.create())
    }
}
