//! Percent-encoding for query values and path segments.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Everything except RFC 3986 unreserved characters and `!*'()`.
///
/// Leaves filter punctuation (`'`, `*`, parentheses) readable while
/// escaping spaces, `&`, `=`, `+`, `,`, `/` and `?`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'!')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Encode one query value or path segment.
pub fn encode_component(s: &str) -> String {
    utf8_percent_encode(s, COMPONENT).to_string()
}

/// Encode each item and join with a literal `,`.
pub fn encode_list<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(|item| encode_component(item.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}
