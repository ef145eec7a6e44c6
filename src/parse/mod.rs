//! Structural parsing of directive text.
//!
//! A directive is free text with two kinds of bracketed groups:
//! `[...]` parameters and `<...>` conditionals. Both may nest. Parsing is
//! total: malformed brackets are kept as literal text.

mod grammar;

use std::borrow::Cow;

pub(crate) use grammar::{RawToken, expression_tokens, nesting_depth};

use grammar::{Segment, segments};

/// Deepest nesting of conditionals, or of bracketed sub-countables, that is
/// still interpreted. Deeper groups are kept as text.
pub const MAX_NESTING: usize = 32;

/// Marker that replaces each parameter in a placeholder template.
pub const PARAM_MARKER: &str = "[]";

/// Text of every top-level `<...>` group, in order, without the angle brackets.
#[must_use]
pub fn conditional_texts(text: &str) -> Vec<&str> {
    if !text.contains('<') {
        return Vec::new();
    }
    segments(text)
        .into_iter()
        .filter_map(|s| match s {
            Segment::Conditional(inner) => Some(inner),
            _ => None,
        })
        .collect()
}

/// `text` with all top-level `<...>` groups removed.
///
/// Text without conditionals is returned unchanged; otherwise doubled
/// spaces left behind by the removal are collapsed and the result trimmed.
#[must_use]
pub fn remove_conditionals(text: &str) -> Cow<'_, str> {
    if !text.contains('<') {
        return Cow::Borrowed(text);
    }
    let segs = segments(text);
    if !segs.iter().any(|s| matches!(s, Segment::Conditional(_))) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    for seg in segs {
        match seg {
            Segment::Text(t) => out.push_str(t),
            Segment::Param(p) => {
                out.push('[');
                out.push_str(p);
                out.push(']');
            }
            Segment::Conditional(_) => {}
        }
    }
    while out.contains("  ") {
        out = out.replace("  ", " ");
    }
    Cow::Owned(out.trim().to_owned())
}

/// Bracketed parameter values of `text`, left to right, after conditionals
/// have been stripped. Nested brackets stay inside their parameter.
#[must_use]
pub fn params(text: &str) -> Vec<String> {
    let main = remove_conditionals(text);
    if !main.contains('[') {
        return Vec::new();
    }
    segments(&main)
        .into_iter()
        .filter_map(|s| match s {
            Segment::Param(p) => Some(p.to_owned()),
            _ => None,
        })
        .collect()
}

/// `text` without conditionals, each parameter replaced by [`PARAM_MARKER`].
#[must_use]
pub fn placeholder_text(text: &str) -> String {
    let main = remove_conditionals(text);
    if !main.contains('[') {
        return main.into_owned();
    }
    let mut out = String::with_capacity(main.len());
    for seg in segments(&main) {
        match seg {
            Segment::Text(t) => out.push_str(t),
            Segment::Param(_) => out.push_str(PARAM_MARKER),
            Segment::Conditional(_) => {}
        }
    }
    out
}

/// Substitute `params` into the markers of `template`, in order.
///
/// Extra markers are left as-is; extra params are ignored.
#[must_use]
pub fn fill_placeholders<S: AsRef<str>>(template: &str, params: &[S]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    let mut values = params.iter();
    while let Some(pos) = rest.find(PARAM_MARKER) {
        out.push_str(&rest[..pos]);
        match values.next() {
            Some(value) => {
                out.push('[');
                out.push_str(value.as_ref());
                out.push(']');
            }
            None => out.push_str(PARAM_MARKER),
        }
        rest = &rest[pos + PARAM_MARKER.len()..];
    }
    out.push_str(rest);
    out
}
