//! DOM arena: slotmap-backed element tree built by the DOM resolution path.

pub mod node;
pub mod query;
pub mod serialize;
pub mod tree;

pub use node::{DomId, ElementData, NodeData};
pub use tree::Dom;
