//! Recursive descent BlockML parser.
//!
//! Parses markup text into a list of top-level [`Child`] slots. Uses the
//! logos-based tokenizer from [`crate::markup::tokenizer`]. Attribute handlers
//! registered with the engine are consulted for every attribute as it is
//! parsed and may drop it. Block nesting is bounded so hostile input fails
//! with an error rather than exhausting the stack.

use std::rc::Rc;

use logos::Logos;

use crate::config::DEFAULT_MAX_DEPTH;
use crate::markup::engine::{AttributeAction, AttributeHandler};
use crate::markup::escape::unquote;
use crate::markup::node::{Attribute, Child, Node, NodeKeys};
use crate::markup::tokenizer::Token;

/// Errors from markup parsing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("unexpected token at position {position}: {message}")]
    UnexpectedToken { position: usize, message: String },
    #[error("unexpected end of input: {0}")]
    UnexpectedEof(String),
    #[error("unrecognized input at byte {offset}: {text:?}")]
    InvalidToken { offset: usize, text: String },
    #[error("blocks nested deeper than {limit} levels")]
    TooDeep { limit: usize },
}

/// A positioned token.
#[derive(Debug, Clone)]
struct PToken {
    token: Token,
    text: String,
    /// Index in the token stream (for error reporting).
    pos: usize,
}

fn tokenize_positioned(input: &str) -> Result<Vec<PToken>, ParseError> {
    let lexer = Token::lexer(input);
    let mut tokens = Vec::new();

    for (pos, (result, span)) in lexer.spanned().enumerate() {
        match result {
            Ok(token) => tokens.push(PToken {
                token,
                text: input[span].to_string(),
                pos,
            }),
            Err(()) => {
                return Err(ParseError::InvalidToken {
                    offset: span.start,
                    text: input[span].to_string(),
                })
            }
        }
    }

    Ok(tokens)
}

/// Parse markup with a fresh key allocator, no attribute handlers and the
/// default nesting limit.
pub fn parse_markup(input: &str) -> Result<Vec<Child>, ParseError> {
    parse_markup_with(input, &mut NodeKeys::new(), &[], DEFAULT_MAX_DEPTH)
}

/// Parse markup, allocating node keys from `keys`, filtering attributes
/// through `attribute_handlers`, and rejecting blocks nested deeper than
/// `max_depth`.
pub fn parse_markup_with(
    input: &str,
    keys: &mut NodeKeys,
    attribute_handlers: &[Rc<AttributeHandler>],
    max_depth: usize,
) -> Result<Vec<Child>, ParseError> {
    let tokens = tokenize_positioned(input)?;
    let mut parser = Parser {
        tokens,
        cursor: 0,
        depth: 0,
        max_depth,
        keys,
        attribute_handlers,
    };
    parser.parse_items(false)
}

/// Recursive descent parser state.
struct Parser<'p> {
    tokens: Vec<PToken>,
    cursor: usize,
    /// Number of currently open blocks.
    depth: usize,
    max_depth: usize,
    keys: &'p mut NodeKeys,
    attribute_handlers: &'p [Rc<AttributeHandler>],
}

impl Parser<'_> {
    fn peek(&self) -> Option<&PToken> {
        self.tokens.get(self.cursor)
    }

    fn peek_token(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.cursor + offset).map(|t| &t.token)
    }

    fn advance(&mut self) -> Option<PToken> {
        let tok = self.tokens.get(self.cursor).cloned();
        if tok.is_some() {
            self.cursor += 1;
        }
        tok
    }

    fn unexpected(tok: &PToken, expected: &str) -> ParseError {
        ParseError::UnexpectedToken {
            position: tok.pos,
            message: format!("expected {expected}, got {:?} '{}'", tok.token, tok.text),
        }
    }

    /// Parse a sequence of items. With `in_block`, stops at (and consumes) the
    /// closing brace; otherwise runs to end of input.
    fn parse_items(&mut self, in_block: bool) -> Result<Vec<Child>, ParseError> {
        let mut items = Vec::new();

        loop {
            let Some(tok) = self.peek().cloned() else {
                if in_block {
                    return Err(ParseError::UnexpectedEof("expected '}'".into()));
                }
                return Ok(items);
            };

            match tok.token {
                Token::BraceClose if in_block => {
                    self.advance();
                    return Ok(items);
                }
                Token::Semicolon => {
                    // Empty statement: leaves a hole in the child list.
                    self.advance();
                    items.push(None);
                }
                Token::StringLiteral | Token::StringLiteralSingle => {
                    let text = unquote(&tok.text);
                    self.advance();
                    items.push(Some(Rc::new(Node::text(self.keys.next_key(), text))));
                }
                Token::Ident => {
                    let node = self.parse_element()?;
                    items.push(Some(Rc::new(node)));
                }
                _ => return Err(Self::unexpected(&tok, "element, string or '}'")),
            }
        }
    }

    /// Parse `name attrs? ( '{' items '}' | ';' )?`.
    fn parse_element(&mut self) -> Result<Node, ParseError> {
        let name = match self.advance() {
            Some(tok) if tok.token == Token::Ident => tok.text,
            Some(tok) => return Err(Self::unexpected(&tok, "element name")),
            None => return Err(ParseError::UnexpectedEof("expected element name".into())),
        };
        let key = self.keys.next_key();

        let mut attributes = Vec::new();
        while self.peek_token(0) == Some(&Token::Ident) && self.peek_token(1) == Some(&Token::Colon)
        {
            let attr = self.parse_attribute()?;
            if self.keep_attribute(&attr) {
                attributes.push(attr);
            }
            if self.peek_token(0) == Some(&Token::Comma) {
                self.advance();
            }
        }

        let children = match self.peek_token(0) {
            Some(Token::BraceOpen) => {
                self.advance();
                if self.depth >= self.max_depth {
                    return Err(ParseError::TooDeep {
                        limit: self.max_depth,
                    });
                }
                self.depth += 1;
                let items = self.parse_items(true);
                self.depth -= 1;
                items?
            }
            Some(Token::Semicolon) => {
                self.advance();
                Vec::new()
            }
            _ => Vec::new(),
        };

        Ok(Node::element(key, name, attributes, children))
    }

    /// Parse `name ':' value`.
    fn parse_attribute(&mut self) -> Result<Attribute, ParseError> {
        let name = self
            .advance()
            .map(|tok| tok.text)
            .ok_or_else(|| ParseError::UnexpectedEof("expected attribute name".into()))?;
        self.advance(); // consume colon

        let value = match self.advance() {
            Some(tok) if tok.token.is_string() => unquote(&tok.text),
            Some(tok) if matches!(tok.token, Token::Number | Token::Ident) => tok.text,
            Some(tok) => return Err(Self::unexpected(&tok, "attribute value")),
            None => {
                return Err(ParseError::UnexpectedEof(format!(
                    "expected value for attribute '{name}'"
                )))
            }
        };

        Ok(Attribute::new(name, value))
    }

    fn keep_attribute(&self, attr: &Attribute) -> bool {
        self.attribute_handlers
            .iter()
            .all(|handler| handler(attr) == AttributeAction::Keep)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::node::NodeKind;

    fn only(children: &[Child]) -> &Node {
        assert_eq!(children.len(), 1, "expected exactly one top-level item");
        children[0].as_deref().unwrap()
    }

    #[test]
    fn parse_empty() {
        assert!(parse_markup("").unwrap().is_empty());
    }

    #[test]
    fn parse_bare_element_with_semicolon() {
        let items = parse_markup("head;").unwrap();
        let node = only(&items);
        assert_eq!(node.name(), Some("head"));
        assert!(node.children().is_empty());
    }

    #[test]
    fn parse_attributes_and_children() {
        let items = parse_markup(r#"App name: 'myapp', test: "test" { h1 { "Hello" } }"#).unwrap();
        let app = only(&items);
        assert_eq!(app.attribute("name"), Some("myapp"));
        assert_eq!(app.attribute("test"), Some("test"));

        let h1 = app.children()[0].as_deref().unwrap();
        assert_eq!(h1.name(), Some("h1"));
        let text = h1.children()[0].as_deref().unwrap();
        assert_eq!(text.kind(), &NodeKind::Text("Hello".into()));
    }

    #[test]
    fn parse_attributes_without_commas() {
        let items = parse_markup("input kind: text size: 10;").unwrap();
        let input = only(&items);
        assert_eq!(input.attribute("kind"), Some("text"));
        assert_eq!(input.attribute("size"), Some("10"));
    }

    #[test]
    fn parse_placeholder_syntax() {
        let items = parse_markup(r#"__InnerChildren index: "3";"#).unwrap();
        let node = only(&items);
        assert_eq!(node.name(), Some("__InnerChildren"));
        assert_eq!(node.attribute("index"), Some("3"));
    }

    #[test]
    fn empty_statements_leave_holes() {
        let items = parse_markup(r#"div { ; "a" ; }"#).unwrap();
        let div = only(&items);
        assert_eq!(div.children().len(), 3);
        assert!(div.children()[0].is_none());
        assert!(div.children()[2].is_none());
        assert_eq!(div.present_children().count(), 1);
    }

    #[test]
    fn sibling_elements_without_terminators() {
        let items = parse_markup(r#"div { h1 { "a" } p { "b" } }"#).unwrap();
        let names: Vec<_> = only(&items)
            .present_children()
            .map(|n| n.name().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["h1", "p"]);
    }

    #[test]
    fn keys_are_unique_across_the_tree() {
        let items = parse_markup(r#"a { b; c { "d" } }"#).unwrap();
        let a = only(&items);
        let mut keys = vec![a.key()];
        for child in a.present_children() {
            keys.push(child.key());
            keys.extend(child.present_children().map(|n| n.key()));
        }
        let mut sorted = keys.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), keys.len());
    }

    #[test]
    fn attribute_handlers_can_drop() {
        let handler: Rc<AttributeHandler> = Rc::new(|attr: &Attribute| {
            if attr.name.starts_with('@') {
                AttributeAction::Drop
            } else {
                AttributeAction::Keep
            }
        });
        let items = parse_markup_with(
            r#"button @click: "x", id: "ok";"#,
            &mut NodeKeys::new(),
            &[handler],
            DEFAULT_MAX_DEPTH,
        )
        .unwrap();
        let button = only(&items);
        assert_eq!(button.attributes(), &[Attribute::new("id", "ok")]);
    }

    #[test]
    fn unclosed_block_is_eof_error() {
        let err = parse_markup("div { h1;").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof(_)));
    }

    #[test]
    fn stray_brace_is_unexpected() {
        let err = parse_markup("}").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { position: 0, .. }));
    }

    #[test]
    fn missing_attribute_value() {
        let err = parse_markup("div id: {").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { .. }));
    }

    fn nested_divs(depth: usize) -> String {
        "div {".repeat(depth) + &"}".repeat(depth)
    }

    #[test]
    fn nesting_up_to_the_limit_parses() {
        let items = parse_markup_with(&nested_divs(3), &mut NodeKeys::new(), &[], 3).unwrap();
        assert_eq!(only(&items).name(), Some("div"));
    }

    #[test]
    fn nesting_past_the_limit_is_rejected() {
        let err = parse_markup_with(&nested_divs(4), &mut NodeKeys::new(), &[], 3).unwrap_err();
        assert_eq!(err, ParseError::TooDeep { limit: 3 });
    }

    #[test]
    fn very_deep_input_fails_without_overflowing() {
        let err = parse_markup(&nested_divs(20_000)).unwrap_err();
        assert_eq!(
            err,
            ParseError::TooDeep {
                limit: DEFAULT_MAX_DEPTH
            }
        );
    }

    #[test]
    fn invalid_character_is_reported() {
        let err = parse_markup("div % ;").unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidToken {
                offset: 4,
                text: "%".into()
            }
        );
    }
}
