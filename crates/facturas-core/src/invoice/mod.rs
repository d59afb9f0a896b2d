//! Invoice record extraction module.

mod extractor;
pub mod rules;

pub use extractor::{extract, ExtractionResult, RecordExtractor};

/// Trait for invoice table parsing.
pub trait InvoiceParser {
    /// Parse invoice rows from raw document text.
    ///
    /// Total over any input: anomalies are reported as warnings in the
    /// result, never as errors.
    fn parse(&self, text: &str) -> ExtractionResult;
}
