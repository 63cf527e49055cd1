//! logos-based BlockML tokenizer.
//!
//! Token priority in logos is determined by:
//! 1. Longest match wins
//! 2. For equal length matches, earlier-defined variants win
//!
//! Identifiers may start with `@` or `$` so that sigil-prefixed attribute
//! names (`@click: ...`) reach the attribute handlers as single tokens.

use logos::Logos;

/// BlockML token produced by the lexer.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"([ \t\n\r\f]+|//[^\n]*)")]
pub enum Token {
    /// Double-quoted string literal with backslash escapes.
    #[regex(r#""([^"\\]|\\.)*""#)]
    StringLiteral,

    /// Single-quoted string literal with backslash escapes.
    #[regex(r"'([^'\\]|\\.)*'")]
    StringLiteralSingle,

    /// Number: integer or float, possibly negative.
    #[regex(r"-?[0-9]+(\.[0-9]+)?")]
    Number,

    /// Identifier: element names, attribute names, bare attribute values.
    #[regex(r"[a-zA-Z_@$][a-zA-Z0-9_-]*")]
    Ident,

    /// `{`
    #[token("{")]
    BraceOpen,

    /// `}`
    #[token("}")]
    BraceClose,

    /// `:`
    #[token(":")]
    Colon,

    /// `;`
    #[token(";")]
    Semicolon,

    /// `,`
    #[token(",")]
    Comma,
}

impl Token {
    /// Whether this token is either flavor of string literal.
    pub fn is_string(&self) -> bool {
        matches!(self, Token::StringLiteral | Token::StringLiteralSingle)
    }
}
