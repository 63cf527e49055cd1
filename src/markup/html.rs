//! HTML output shared by the string resolution path and DOM serialization.
//!
//! Both paths write elements through these helpers, so the same markup
//! produces byte-identical HTML either way.

fn escape(value: &str) -> String {
    v_htmlescape::escape(value).to_string()
}

/// Append `text` as escaped character data.
pub fn push_text(out: &mut String, text: &str) {
    out.push_str(&escape(text));
}

/// Append `<tag a="v" ...>` with every attribute value escaped.
pub fn push_open_tag<'a>(
    out: &mut String,
    tag: &str,
    attributes: impl IntoIterator<Item = (&'a str, &'a str)>,
) {
    out.push('<');
    out.push_str(tag);
    for (name, value) in attributes {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape(value));
        out.push('"');
    }
    out.push('>');
}

/// Append `</tag>`.
pub fn push_close_tag(out: &mut String, tag: &str) {
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}
