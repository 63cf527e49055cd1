//! Umbrella error returned by every render entry point.

use crate::component::error::ComponentError;
use crate::markup::parser::ParseError;

/// Any failure that aborts a render pass.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RenderError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Component(#[from] ComponentError),
    #[error("expected exactly one root element, found {found} node(s)")]
    NotSingleElement { found: usize },
    #[error("nested markup resolution exceeded the depth limit of {limit}")]
    DepthExceeded { limit: usize },
}
