//! Runtime configuration.

/// Tag of the synthetic element that stands in for cached children.
pub const DEFAULT_PLACEHOLDER_TAG: &str = "__InnerChildren";

/// Function name used in the textual form of bound event handles.
pub const DEFAULT_EVENT_FUNCTION: &str = "__bml_event";

/// Default limit on element nesting plus markup re-injection.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Configuration shared by the engine and the component runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Element name of the children placeholder.
    pub placeholder_tag: String,
    /// Attributes whose name starts with this character are dropped at parse
    /// time. Must be a character the tokenizer accepts at the start of an
    /// identifier (`@`, `$`, `_`, or a letter).
    pub event_sigil: char,
    /// Function name in `name(<slot>)` event handle text.
    pub event_function: String,
    /// Maximum nesting within one pass. Every element level and every
    /// re-injection of rendered markup counts as one level.
    pub max_depth: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            placeholder_tag: DEFAULT_PLACEHOLDER_TAG.to_owned(),
            event_sigil: '@',
            event_function: DEFAULT_EVENT_FUNCTION.to_owned(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl RuntimeConfig {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the placeholder tag (builder).
    pub fn with_placeholder_tag(mut self, tag: impl Into<String>) -> Self {
        self.placeholder_tag = tag.into();
        self
    }

    /// Set the event sigil (builder).
    pub fn with_event_sigil(mut self, sigil: char) -> Self {
        self.event_sigil = sigil;
        self
    }

    /// Set the event handle function name (builder).
    pub fn with_event_function(mut self, name: impl Into<String>) -> Self {
        self.event_function = name.into();
        self
    }

    /// Set the nesting limit (builder).
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}
