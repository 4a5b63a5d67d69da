//! Payload classification: decides which parser handles the argument vector.
use crate::types::PayloadShape;

/// Classify the argument vector. Total: every input maps to exactly one shape.
///
/// A single argument whose trimmed form is bracketed by `{…}` or `[…]` is
/// treated as JSON without attempting to parse it; anything else that is not
/// empty goes to the key=value splitter.
pub fn classify<S: AsRef<str>>(args: &[S]) -> PayloadShape {
    match args {
        [] => PayloadShape::Empty,
        [only] if looks_like_json(only.as_ref()) => PayloadShape::Json,
        _ => PayloadShape::KeyValues,
    }
}

/// Structural check only; nesting is not validated, so `{]}` passes here and
/// is left for the JSON parser to reject.
///
/// Only ASCII control characters and space are stripped before the check.
/// Unicode whitespace such as U+00A0 is significant.
pub fn looks_like_json(arg: &str) -> bool {
    let s = arg.trim_matches(|c: char| c <= ' ');
    (s.starts_with('{') && s.ends_with('}')) || (s.starts_with('[') && s.ends_with(']'))
}
