//! Markup assembly with interpolation middleware.
//!
//! [`Template`] is the interpolation point of the engine: literal markup is
//! appended untouched, while every interpolated [`Value`] first passes through
//! the registered template middleware. The component runtime uses this to
//! turn callback values into event handles before the text is parsed.

use crate::component::scope::RenderScope;
use crate::markup::escape::quote;
use crate::value::Value;

/// Builder for markup text produced inside a render function.
pub struct Template<'s, 'a> {
    scope: &'s RenderScope<'a>,
    buf: String,
}

impl<'s, 'a> Template<'s, 'a> {
    pub fn new(scope: &'s RenderScope<'a>) -> Self {
        Self {
            scope,
            buf: String::new(),
        }
    }

    /// Append literal markup.
    pub fn raw(mut self, markup: &str) -> Self {
        self.buf.push_str(markup);
        self
    }

    /// Interpolate a value as bare text.
    pub fn value(mut self, value: impl Into<Value>) -> Self {
        let value = self.scope.intercept(value.into());
        self.buf.push_str(&value.to_string());
        self
    }

    /// Interpolate a value as a quoted string literal.
    pub fn quoted(mut self, value: impl Into<Value>) -> Self {
        let value = self.scope.intercept(value.into());
        self.buf.push_str(&quote(&value.to_string()));
        self
    }

    /// Append the children placeholder.
    pub fn children(mut self) -> Self {
        self.buf.push_str(self.scope.children());
        self
    }

    pub fn finish(self) -> String {
        self.buf
    }
}
