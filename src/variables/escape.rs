//! Escape functions applied to substituted values.
//!
//! The interpolator never escapes on its own; callers pick an escape for the
//! target they are writing into. URLs use percent-encoding so a value cannot
//! introduce new path segments or query parameters. HTML escaping is offered
//! for callers rendering into markup.

/// Signature of an escape function passed to the interpolator.
pub type EscapeFn = fn(&str) -> String;

/// Marks left unescaped in URL components, on top of `A-Z a-z 0-9 - _ . ~`.
const UNESCAPED_MARKS: [(&str, &str); 5] = [
    ("%21", "!"),
    ("%27", "'"),
    ("%28", "("),
    ("%29", ")"),
    ("%2A", "*"),
];

/// Percent-encodes a value for use as a single URL component.
///
/// Everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )` is encoded, so `/`, `?`,
/// `&` and `#` inside a value cannot change the URL structure. The character
/// set matches JavaScript's `encodeURIComponent`.
pub fn url_component(value: &str) -> String {
    let encoded = urlencoding::encode(value);
    if !encoded.contains('%') {
        return encoded.into_owned();
    }
    // A literal '%' is always encoded as %25, so these sequences only come
    // from the marks themselves
    UNESCAPED_MARKS
        .iter()
        .fold(encoded.into_owned(), |acc, (escaped, mark)| acc.replace(escaped, mark))
}

/// Escapes the characters significant in HTML text and attribute values.
pub fn html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
