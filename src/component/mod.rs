//! The component runtime: registry, props, event binding, children cache and
//! the render pipeline that ties them to the markup engine.

pub mod children;
pub mod descriptor;
pub mod error;
pub mod event;
pub mod pipeline;
pub mod props;
pub mod registry;
pub mod scope;

pub use children::{ChildrenCache, PlaceholderHandler};
pub use descriptor::{Component, ComponentDescriptor, Field};
pub use error::ComponentError;
pub use event::{BoundEvent, Callback, Event, EventId, EventTable, callback};
pub use pipeline::ComponentHandler;
pub use props::{PropSchema, PropsObject, SharedProps};
pub use registry::ComponentRegistry;
pub use scope::{Bindings, Instance, RenderScope};
