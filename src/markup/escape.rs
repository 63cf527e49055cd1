//! Quoting for markup string literals.

/// Quote `input` as a double-quoted markup string literal, escaping
/// backslashes, quotes and control whitespace so the parser reads back the
/// exact original text.
pub fn quote(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 2);
    out.push('"');
    for c in input.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

/// Strip the surrounding quotes from a string literal token and resolve
/// backslash escapes. Unknown escapes yield the escaped character itself.
pub fn unquote(literal: &str) -> String {
    let inner = literal
        .get(1..literal.len().saturating_sub(1))
        .unwrap_or_default();
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unquote_resolves_escapes() {
        assert_eq!(unquote(r#""say \"hi\"\n""#), "say \"hi\"\n");
        assert_eq!(unquote("'it\\'s'"), "it's");
        assert_eq!(unquote("\"\""), "");
    }

    #[test]
    fn quote_then_unquote_preserves_text() {
        let original = "line \"one\"\n\\ two";
        assert_eq!(unquote(&quote(original)), original);
    }
}
