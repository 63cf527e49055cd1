//! # blockml-component
//!
//! Reusable, named components for BlockML markup.
//!
//! A component is a render function producing BlockML text plus optional
//! default props, bindable methods and a create hook. Registered components
//! become custom elements of the markup engine: props are assembled from the
//! invocation's attributes, children survive the round trip through text via
//! a cached placeholder element, and callbacks are carried through markup as
//! textual event handles.
//!
//! ## Core Systems
//!
//! - **[`component`]**: Registry, props with dirty tracking, event binding, children cache, render pipeline
//! - **[`markup`]**: Logos tokenizer, recursive descent parser, handler tables, per-pass render context
//! - **[`dom`]**: Slotmap-backed element tree built by the DOM resolution path
//! - **[`runtime`]**: Engine with component support installed
//! - **[`config`]**: Placeholder tag, event sigil, handle function name, depth limit
//!
//! ## Example
//!
//! ```
//! use blockml_component::{ComponentDescriptor, Runtime};
//!
//! let mut rt = Runtime::new();
//! rt.register(
//!     "Card",
//!     ComponentDescriptor::new()
//!         .field("title", "Untitled")
//!         .render(|scope| {
//!             scope
//!                 .template()
//!                 .raw("div { h2 { ")
//!                 .quoted(scope.prop("title"))
//!                 .raw(" } ")
//!                 .children()
//!                 .raw(" }")
//!                 .finish()
//!         }),
//! )
//! .unwrap();
//!
//! let html = rt.render(r#"Card title: "News" { p { "body" } }"#).unwrap();
//! assert_eq!(html, "<div><h2>News</h2><p>body</p></div>");
//! ```

// Foundation
pub mod config;
pub mod error;
pub mod value;

// Markup engine
pub mod dom;
pub mod markup;

// Component runtime
pub mod component;
pub mod runtime;

pub use component::{
    BoundEvent, Component, ComponentDescriptor, ComponentError, ComponentRegistry, Event,
    EventTable, PropsObject, RenderScope, callback,
};
pub use config::RuntimeConfig;
pub use error::RenderError;
pub use markup::{Engine, ParseError, RenderOutput};
pub use runtime::Runtime;
pub use value::Value;
