//! Component runtime failure conditions.

/// Errors raised by registration, rendering, placeholder resolution and
/// event dispatch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComponentError {
    #[error("component `{name}` already registered")]
    DuplicateRegistration { name: String },
    #[error("component `{name}`: {reason}")]
    InvalidDescriptor { name: String, reason: String },
    #[error("component `{name}`: the `render` function is required")]
    MissingRender { name: String },
    #[error("component `{name}`: `render` must be a function")]
    InvalidRenderType { name: String },
    #[error("component `{name}`: {reason}")]
    InvalidRenderResult { name: String, reason: String },

    // Placeholder lookups. These indicate a framework bug, not an authoring
    // mistake in the markup.
    #[error("`index` attribute not found on children placeholder")]
    MissingIndex,
    #[error("children index {index} out of range (cache holds {len}); this is most likely a bug")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("no cached children with index `{index}`")]
    NoSuchEntry { index: String },

    #[error("no bound event for handle `{handle}`")]
    UnknownEvent { handle: String },
    #[error("malformed event handle `{0}`")]
    MalformedHandle(String),
}
