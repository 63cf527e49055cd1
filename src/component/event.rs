//! Event binding: callbacks stored in a per-pass table, referenced from markup
//! by textual handles.
//!
//! Raw callables cannot be embedded in the markup text a render function
//! returns, so [`EventTable::bind_event`] stores a thunk and hands back a
//! [`BoundEvent`] whose `Display` form (`__bml_event(<slot>)`) is what goes
//! into the text. After rendering, the handle text found in the output can be
//! dispatched back through [`EventTable::dispatch`].

use std::fmt;
use std::rc::Rc;

use slotmap::{Key, KeyData, SlotMap, new_key_type};

use super::descriptor::ComponentDescriptor;
use super::error::ComponentError;
use super::props::{PropsObject, SharedProps};
use crate::config::DEFAULT_EVENT_FUNCTION;
use crate::markup::node::NodeKey;
use crate::value::Value;

new_key_type! {
    /// Slot of a bound callback in an [`EventTable`].
    pub struct EventId;
}

/// A component method or interpolated callback.
///
/// Receives the component descriptor as receiver, the ambient event, and the
/// instance's current props (which it may mutate).
pub type Callback = Rc<dyn Fn(&ComponentDescriptor, &Event, &mut PropsObject)>;

type Thunk = Rc<dyn Fn(&Event)>;

/// Wrap a closure as a [`Callback`].
pub fn callback<F>(f: F) -> Callback
where
    F: Fn(&ComponentDescriptor, &Event, &mut PropsObject) + 'static,
{
    Rc::new(f)
}

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// The ambient event object handed to callbacks.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    kind: String,
    detail: Vec<(String, Value)>,
}

impl Event {
    /// Create an event of the given kind (e.g. `"click"`).
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            detail: Vec::new(),
        }
    }

    /// Attach a detail value (builder).
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.detail.push((key.into(), value.into()));
        self
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Detail value for `key`, or `Undefined`.
    pub fn detail(&self, key: &str) -> Value {
        self.detail
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// BoundEvent
// ---------------------------------------------------------------------------

/// Handle to a callback stored in an [`EventTable`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BoundEvent {
    id: EventId,
    props: Option<NodeKey>,
    function: Rc<str>,
}

impl BoundEvent {
    pub fn id(&self) -> EventId {
        self.id
    }

    /// Key of the node whose props this event reads, if bound to an instance.
    pub fn props_key(&self) -> Option<NodeKey> {
        self.props
    }

    fn slot(&self) -> u64 {
        self.id.data().as_ffi()
    }
}

/// The handle expression embedded in markup, e.g. `__bml_event(4294967297)`.
impl fmt::Display for BoundEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.function, self.slot())
    }
}

// ---------------------------------------------------------------------------
// EventTable
// ---------------------------------------------------------------------------

/// Append-only table of bound callbacks for one render pass.
pub struct EventTable {
    slots: SlotMap<EventId, Thunk>,
    function: Rc<str>,
}

impl EventTable {
    /// Create an empty table using the default handle function name.
    pub fn new() -> Self {
        Self::with_function_name(DEFAULT_EVENT_FUNCTION)
    }

    /// Create an empty table whose handles render as `name(<slot>)`.
    pub fn with_function_name(name: &str) -> Self {
        Self {
            slots: SlotMap::with_key(),
            function: Rc::from(name),
        }
    }

    /// Store `callback` and return its handle.
    ///
    /// Invoking the handle calls `callback(this, event, props)` with the props
    /// borrowed at invocation time, then synchronizes them if the callback left
    /// them dirty.
    pub fn bind_event(
        &mut self,
        this: Rc<ComponentDescriptor>,
        callback: Callback,
        props: SharedProps,
        props_key: Option<NodeKey>,
    ) -> BoundEvent {
        let thunk: Thunk = Rc::new(move |event: &Event| {
            let mut props = props.borrow_mut();
            callback(&this, event, &mut props);
            // TODO: schedule a re-render of the owning instance once the engine
            // exposes a way to replace an already-resolved subtree.
            if props.check_is_dirty() {
                props.sync_last_props();
                tracing::debug!(
                    component = this.name(),
                    event = event.kind(),
                    "props changed by event handler, synchronized"
                );
            }
        });
        let id = self.slots.insert(thunk);
        BoundEvent {
            id,
            props: props_key,
            function: Rc::clone(&self.function),
        }
    }

    /// Invoke the callback behind `handle`.
    pub fn invoke(&self, handle: &BoundEvent, event: &Event) -> Result<(), ComponentError> {
        self.invoke_id(handle.id, event)
            .map_err(|_| ComponentError::UnknownEvent {
                handle: handle.to_string(),
            })
    }

    /// Parse handle text as produced by `BoundEvent`'s `Display` and invoke it.
    pub fn dispatch(&self, handle: &str, event: &Event) -> Result<(), ComponentError> {
        let id = self.parse_handle(handle)?;
        self.invoke_id(id, event)
    }

    /// Resolve handle text to a slot in this table.
    pub fn parse_handle(&self, handle: &str) -> Result<EventId, ComponentError> {
        let malformed = || ComponentError::MalformedHandle(handle.to_owned());
        let slot = handle
            .trim()
            .strip_prefix(&*self.function)
            .and_then(|rest| rest.strip_prefix('('))
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(malformed)?
            .trim()
            .parse::<u64>()
            .map_err(|_| malformed())?;
        Ok(EventId::from(KeyData::from_ffi(slot)))
    }

    fn invoke_id(&self, id: EventId, event: &Event) -> Result<(), ComponentError> {
        // Clone the thunk out so the callback runs without borrowing the table.
        let thunk = self
            .slots
            .get(id)
            .cloned()
            .ok_or_else(|| ComponentError::UnknownEvent {
                handle: format!("{}({})", self.function, id.data().as_ffi()),
            })?;
        thunk(event);
        Ok(())
    }

    pub fn contains(&self, handle: &BoundEvent) -> bool {
        self.slots.contains_key(handle.id)
    }

    /// Number of bound events.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl Default for EventTable {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventTable")
            .field("function", &self.function)
            .field("len", &self.slots.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    fn shared(props: PropsObject) -> SharedProps {
        Rc::new(RefCell::new(props))
    }

    fn receiver() -> Rc<ComponentDescriptor> {
        Rc::new(ComponentDescriptor::new().render(|_| ""))
    }

    /// Callback that records the `count` prop it observes.
    fn recorder(seen: &Rc<RefCell<Vec<Value>>>) -> Callback {
        let seen = Rc::clone(seen);
        callback(move |_this, _event, props| {
            seen.borrow_mut().push(props.get("count"));
        })
    }

    #[test]
    fn handle_text_round_trips_to_slot() {
        let mut table = EventTable::new();
        let props = shared(PropsObject::new());
        let bound = table.bind_event(receiver(), callback(|_, _, _| {}), props, None);
        let text = bound.to_string();
        assert!(text.starts_with("__bml_event("));
        assert!(text.ends_with(')'));
        assert_eq!(table.parse_handle(&text).unwrap(), bound.id());
    }

    #[test]
    fn custom_function_name() {
        let mut table = EventTable::with_function_name("emit");
        let bound = table.bind_event(
            receiver(),
            callback(|_, _, _| {}),
            shared(PropsObject::new()),
            None,
        );
        assert!(bound.to_string().starts_with("emit("));
        assert!(table.dispatch(&bound.to_string(), &Event::new("click")).is_ok());
    }

    #[test]
    fn invocation_sees_current_props_not_bind_time() {
        let mut table = EventTable::new();
        let props = shared(PropsObject::new());
        props.borrow_mut().set_clean("count", 1);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let bound = table.bind_event(receiver(), recorder(&seen), Rc::clone(&props), None);

        table.invoke(&bound, &Event::new("click")).unwrap();
        props.borrow_mut().set_clean("count", 2);
        table.dispatch(&bound.to_string(), &Event::new("click")).unwrap();

        assert_eq!(*seen.borrow(), vec![Value::from(1), Value::from(2)]);
    }

    #[test]
    fn dirty_props_are_synced_after_callback() {
        let mut table = EventTable::new();
        let props = shared(PropsObject::new());
        props.borrow_mut().set_clean("count", 0);
        let bound = table.bind_event(
            receiver(),
            callback(|_, _, props| {
                let next = props.get("count").as_f64().unwrap_or(0.0) + 1.0;
                props.set_dirty("count", next);
            }),
            Rc::clone(&props),
            None,
        );

        table.invoke(&bound, &Event::new("click")).unwrap();
        assert_eq!(props.borrow().get("count"), Value::from(1));
        assert!(!props.borrow().check_is_dirty());
    }

    #[test]
    fn callback_receives_event_and_receiver() {
        let mut table = EventTable::new();
        let seen = Rc::new(RefCell::new(String::new()));
        let sink = Rc::clone(&seen);
        let bound = table.bind_event(
            receiver(),
            callback(move |this, event, _props| {
                *sink.borrow_mut() = format!("{}:{}:{}", this.name(), event.kind(), event.detail("x"));
            }),
            shared(PropsObject::new()),
            None,
        );
        table
            .invoke(&bound, &Event::new("input").with_detail("x", 7))
            .unwrap();
        assert_eq!(*seen.borrow(), ":input:7");
    }

    #[test]
    fn table_is_append_only() {
        let mut table = EventTable::new();
        let noop: Callback = callback(|_, _, _| {});
        let a = table.bind_event(receiver(), Rc::clone(&noop), shared(PropsObject::new()), None);
        let b = table.bind_event(receiver(), noop, shared(PropsObject::new()), None);
        assert_ne!(a, b);
        assert_eq!(table.len(), 2);
        assert!(table.contains(&a) && table.contains(&b));
    }

    #[test]
    fn malformed_handles() {
        let table = EventTable::new();
        for text in ["", "alert(1)", "__bml_event(", "__bml_event(x)", "__bml_event 3"] {
            assert_eq!(
                table.dispatch(text, &Event::new("click")),
                Err(ComponentError::MalformedHandle(text.to_owned())),
                "{text}"
            );
        }
    }

    #[test]
    fn handle_from_another_table_is_unknown() {
        let mut other = EventTable::new();
        let bound = other.bind_event(
            receiver(),
            callback(|_, _, _| {}),
            shared(PropsObject::new()),
            None,
        );
        let table = EventTable::new();
        assert!(matches!(
            table.invoke(&bound, &Event::new("click")),
            Err(ComponentError::UnknownEvent { .. })
        ));
    }
}
