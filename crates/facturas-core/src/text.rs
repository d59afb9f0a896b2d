//! Whitespace normalization of extracted document text.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
}

/// Collapse every run of whitespace (spaces, tabs, newlines, Unicode spaces)
/// into a single ASCII space.
///
/// The ends are not trimmed: leading or trailing whitespace survives as one
/// space. Matches found in the result are trimmed individually by the
/// extractor, so this never leaks into identifiers.
pub fn normalize(raw: &str) -> String {
    WHITESPACE_RUN.replace_all(raw, " ").into_owned()
}
