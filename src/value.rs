//! Dynamic values carried by props, attribute seeds, interpolations, and
//! render results.
//!
//! Equality is strict: values of different variants are never equal,
//! `NaN != NaN`, and callbacks compare by identity.

use std::fmt;
use std::rc::Rc;

use crate::component::descriptor::ComponentDescriptor;
use crate::component::event::{BoundEvent, Callback, Event};
use crate::component::props::PropsObject;

/// A dynamically typed value.
#[derive(Clone, Default)]
pub enum Value {
    /// Absent. Skipped by [`PropsObject::merge`].
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    /// A callback already bound into the event table.
    Event(BoundEvent),
    /// A raw callback. Serializes to a handle only after the template
    /// middleware binds it.
    Callback(Callback),
}

impl Value {
    /// Wrap a closure as a [`Value::Callback`].
    pub fn callback<F>(f: F) -> Self
    where
        F: Fn(&ComponentDescriptor, &Event, &mut PropsObject) + 'static,
    {
        Value::Callback(Rc::new(f))
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Whether the value is callable (bound or raw callback).
    pub fn is_function(&self) -> bool {
        matches!(self, Value::Event(_) | Value::Callback(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Short type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Event(_) => "bound event",
            Value::Callback(_) => "function",
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Event(a), Value::Event(b)) => a == b,
            (Value::Callback(a), Value::Callback(b)) => {
                std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
            }
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "Undefined"),
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Number(n) => write!(f, "Number({n})"),
            Value::String(s) => write!(f, "String({s:?})"),
            Value::Event(e) => write!(f, "Event({e})"),
            Value::Callback(_) => write!(f, "Callback(<fn>)"),
        }
    }
}

/// Text form used when a value is interpolated into markup.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => f.write_str(s),
            Value::Event(e) => write!(f, "{e}"),
            Value::Callback(_) => f.write_str("[function]"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<BoundEvent> for Value {
    fn from(e: BoundEvent) -> Self {
        Value::Event(e)
    }
}

impl From<&BoundEvent> for Value {
    fn from(e: &BoundEvent) -> Self {
        Value::Event(e.clone())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Undefined, Into::into)
    }
}
