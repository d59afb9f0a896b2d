//! Currency amount extraction in regional number format (1.234,56).

use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::{amount_pattern_for, default_amount_patterns};
use super::{ExtractionMatch, FieldExtractor};

/// Amount extractor for one currency.
///
/// The pattern must capture the numeric literal in group 1.
#[derive(Debug, Clone)]
pub struct CurrencyRule {
    code: String,
    pattern: Regex,
}

impl CurrencyRule {
    /// Build a rule from literal currency markers, e.g. `["$", "ARS"]`.
    pub fn new(code: impl Into<String>, markers: &[String]) -> Result<Self, regex::Error> {
        Ok(Self::from_regex(code, amount_pattern_for(markers)?))
    }

    pub fn from_regex(code: impl Into<String>, pattern: Regex) -> Self {
        Self {
            code: code.into(),
            pattern,
        }
    }

    /// The built-in currencies: ARS (`$`, `ARS`) and USD (`USD`).
    pub fn builtin() -> Vec<Self> {
        default_amount_patterns()
            .into_iter()
            .map(|(code, re)| Self::from_regex(code, re.clone()))
            .collect()
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }
}

impl FieldExtractor for CurrencyRule {
    type Output = ExtractionMatch<Decimal>;

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();

        for caps in self.pattern.captures_iter(text) {
            let Some(literal) = caps.get(1) else {
                continue;
            };
            results.push(
                ExtractionMatch::new(
                    parse_regional_amount(literal.as_str()),
                    self.code.as_str(),
                    literal.as_str(),
                )
                .with_position(literal.start(), literal.end()),
            );
        }

        results
    }
}

/// Parse a regionally formatted amount, or `None` if it is malformed.
///
/// Every `.` is a thousands separator and is dropped; every `,` becomes the
/// decimal point. Values outside the `Decimal` range (magnitude above
/// `79.228.162.514.264.337.593.543.950.335`) are `None`.
pub fn try_parse_regional_amount(s: &str) -> Option<Decimal> {
    let normalized = s.replace('.', "").replace(',', ".");
    Decimal::from_str(&normalized).ok()
}

/// Parse a regionally formatted amount (e.g. "1.234,56").
///
/// Malformed and out-of-range literals convert to zero so a single bad amount never aborts the
/// rest of the document.
pub fn parse_regional_amount(s: &str) -> Decimal {
    try_parse_regional_amount(s).unwrap_or(Decimal::ZERO)
}

/// Format amount in regional style with two decimals (1.234,56).
pub fn format_regional_amount(amount: Decimal) -> String {
    let s = format!("{:.2}", amount.round_dp(2));
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.as_str()),
    };

    let Some((integer_part, decimal_part)) = digits.split_once('.') else {
        return s;
    };

    // Add thousand separators
    let chars: Vec<char> = integer_part.chars().collect();
    let mut formatted = String::new();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push('.');
        }
        formatted.push(*c);
    }

    format!("{}{},{}", sign, formatted, decimal_part)
}
