//! BlockML markup: tokenizer, parser, node model and the resolving engine.

pub mod context;
pub mod engine;
pub mod escape;
pub mod html;
pub mod node;
pub mod parser;
pub mod template;
pub mod tokenizer;

pub use context::RenderContext;
pub use engine::{AttributeAction, AttributeHandler, BlockHandler, Engine, RenderOutput, TemplateMiddleware};
pub use node::{Attribute, Node, NodeKey, NodeKind};
pub use parser::{ParseError, parse_markup};
pub use template::Template;
