//! Record extractor: identifier and amount matching, alignment and totals.

use std::time::Instant;

use lazy_static::lazy_static;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::error::FacturasError;
use crate::models::config::ExtractionConfig;
use crate::models::table::{ResultTable, Row, MISSING_IDENTIFIER, TOTAL_LABEL};
use crate::text::normalize;

use super::rules::{
    try_parse_regional_amount, CurrencyRule, FieldExtractor, IdentifierRules, PatternRule,
};
use super::InvoiceParser;

lazy_static! {
    static ref DEFAULT_EXTRACTOR: RecordExtractor = RecordExtractor::new();
}

/// Extract a result table from raw text with the built-in rules.
pub fn extract(text: &str) -> ResultTable {
    DEFAULT_EXTRACTOR.extract(text)
}

/// Result of a table extraction, with diagnostics.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Extracted table, total row included.
    pub table: ResultTable,
    /// Text the rules were applied to.
    pub normalized_text: String,
    /// Number of identifier candidates found before padding.
    pub identifier_count: usize,
    /// Number of amount candidates per currency before padding.
    pub amount_counts: Vec<(String, usize)>,
    /// Extraction warnings.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Extracts invoice rows from document text.
///
/// Holds an immutable rule set; one extractor can be shared across threads
/// and reused for any number of documents.
#[derive(Debug, Clone)]
pub struct RecordExtractor {
    identifiers: IdentifierRules,
    currencies: Vec<CurrencyRule>,
    missing_identifier_label: String,
    total_label: String,
}

impl RecordExtractor {
    /// Create an extractor with the built-in rules and labels.
    pub fn new() -> Self {
        Self {
            identifiers: IdentifierRules::builtin(),
            currencies: CurrencyRule::builtin(),
            missing_identifier_label: MISSING_IDENTIFIER.to_string(),
            total_label: TOTAL_LABEL.to_string(),
        }
    }

    /// Build an extractor from configuration.
    pub fn from_config(config: &ExtractionConfig) -> Result<Self, FacturasError> {
        check_labels(&config.missing_identifier_label, &config.total_label)?;

        let mut identifiers = IdentifierRules::builtin();
        for extra in &config.extra_identifier_patterns {
            let rule = PatternRule::new(extra.name.as_str(), &extra.pattern).map_err(|e| {
                FacturasError::Config(format!("invalid identifier pattern {}: {}", extra.name, e))
            })?;
            identifiers = identifiers.with_rule(rule);
        }

        let mut currencies = Vec::with_capacity(config.currencies.len());
        for currency in &config.currencies {
            if currency.markers.is_empty() {
                return Err(FacturasError::Config(format!(
                    "currency {} has no markers",
                    currency.code
                )));
            }
            let rule = CurrencyRule::new(currency.code.as_str(), &currency.markers).map_err(
                |e| FacturasError::Config(format!("invalid markers for {}: {}", currency.code, e)),
            )?;
            currencies.push(rule);
        }

        Ok(Self {
            identifiers,
            currencies,
            missing_identifier_label: config.missing_identifier_label.clone(),
            total_label: config.total_label.clone(),
        })
    }

    /// Replace the identifier rules.
    pub fn with_identifier_rules(mut self, rules: IdentifierRules) -> Self {
        self.identifiers = rules;
        self
    }

    /// Replace the currency columns.
    pub fn with_currencies(mut self, currencies: Vec<CurrencyRule>) -> Self {
        self.currencies = currencies;
        self
    }

    /// Set the label of rows without an identifier.
    ///
    /// Fails if it equals the total label.
    pub fn with_missing_identifier_label(
        mut self,
        label: impl Into<String>,
    ) -> Result<Self, FacturasError> {
        let label = label.into();
        check_labels(&label, &self.total_label)?;
        self.missing_identifier_label = label;
        Ok(self)
    }

    /// Set the label of the total row.
    ///
    /// Fails if it equals the missing identifier label.
    pub fn with_total_label(mut self, label: impl Into<String>) -> Result<Self, FacturasError> {
        let label = label.into();
        check_labels(&self.missing_identifier_label, &label)?;
        self.total_label = label;
        Ok(self)
    }

    pub fn identifier_rules(&self) -> &IdentifierRules {
        &self.identifiers
    }

    pub fn currencies(&self) -> &[CurrencyRule] {
        &self.currencies
    }

    /// Extract the result table. Never fails; see [`ResultTable`] for the
    /// alignment policy.
    pub fn extract(&self, text: &str) -> ResultTable {
        self.parse(text).table
    }
}

/// Padded rows and the total row must stay distinguishable.
fn check_labels(missing_identifier_label: &str, total_label: &str) -> Result<(), FacturasError> {
    if missing_identifier_label == total_label {
        return Err(FacturasError::Config(format!(
            "missing identifier label and total label must differ (both {:?})",
            total_label
        )));
    }
    Ok(())
}

impl Default for RecordExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceParser for RecordExtractor {
    fn parse(&self, text: &str) -> ExtractionResult {
        let start = Instant::now();
        let mut warnings = Vec::new();

        let normalized = normalize(text);
        info!("Extracting invoices from {} characters of text", normalized.len());

        let mut identifiers: Vec<String> = self
            .identifiers
            .extract_all(&normalized)
            .into_iter()
            .map(|m| m.value)
            .collect();
        let identifier_count = identifiers.len();
        if identifiers.is_empty() {
            warnings.push("No invoice identifiers found".to_string());
        }

        let mut columns: Vec<Vec<Decimal>> = Vec::with_capacity(self.currencies.len());
        let mut amount_counts = Vec::with_capacity(self.currencies.len());
        for currency in &self.currencies {
            let matches = currency.extract_all(&normalized);
            for m in &matches {
                if try_parse_regional_amount(&m.source).is_none() {
                    warnings.push(format!(
                        "Malformed {} amount {:?} counted as zero",
                        currency.code(),
                        m.source
                    ));
                }
            }
            debug!("Found {} {} amounts", matches.len(), currency.code());
            amount_counts.push((currency.code().to_string(), matches.len()));
            columns.push(matches.into_iter().map(|m| m.value).collect());
        }

        // Pad every column to the longest one
        let row_count = columns
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(identifiers.len()))
            .max()
            .unwrap_or(0);

        if identifiers.len() < row_count {
            warnings.push(format!(
                "{} rows have no invoice identifier",
                row_count - identifiers.len()
            ));
            identifiers.resize(row_count, self.missing_identifier_label.clone());
        }
        for (column, currency) in columns.iter_mut().zip(&self.currencies) {
            if !column.is_empty() && column.len() < row_count {
                warnings.push(format!(
                    "{} rows have no {} amount",
                    row_count - column.len(),
                    currency.code()
                ));
            }
            column.resize(row_count, Decimal::ZERO);
        }

        let rows: Vec<Row> = identifiers
            .into_iter()
            .enumerate()
            .map(|(i, identifier)| Row::new(identifier, columns.iter().map(|c| c[i]).collect()))
            .collect();

        let codes = self.currencies.iter().map(|c| c.code().to_string()).collect();
        let table = ResultTable::new(codes, rows, &self.total_label);
        for code in table.overflowed_currencies() {
            warn!("{} total exceeds the decimal range", code);
            warnings.push(format!(
                "{} total exceeds the decimal range; kept the last total that fit",
                code
            ));
        }

        debug!(
            "Extracted {} rows from {} identifiers",
            table.len(),
            identifier_count
        );

        ExtractionResult {
            table,
            normalized_text: normalized,
            identifier_count,
            amount_counts,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}
