//! Rule-based field extractors for invoice identifiers and currency amounts.

pub mod amounts;
pub mod identifiers;
pub mod patterns;

pub use amounts::{
    format_regional_amount, parse_regional_amount, try_parse_regional_amount, CurrencyRule,
};
pub use identifiers::{IdentifierRules, PatternRule};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the first occurrence of the field.
    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    /// Extract all occurrences of the field, in extraction order.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A single value found in the text, with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Name of the rule that produced the match.
    pub rule: String,
    /// Position in source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, rule: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            value,
            rule: rule.into(),
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}
