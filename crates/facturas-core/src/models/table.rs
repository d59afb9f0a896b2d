//! Tabular extraction result: aligned invoice rows plus a grand total row.

use rust_decimal::Decimal;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// Record key of the identifier column.
pub const IDENTIFIER_COLUMN: &str = "Factura";

/// Identifier used when a row has no matched invoice identifier.
pub const MISSING_IDENTIFIER: &str = "SIN FACTURA";

/// Identifier of the aggregate row.
pub const TOTAL_LABEL: &str = "TOTAL GENERAL";

/// Record key of the amount column for a currency code (`Importe_ARS`).
pub fn amount_column_name(code: &str) -> String {
    format!("Importe_{}", code)
}

/// One reconciled invoice line.
///
/// `amounts` holds one value per currency, in the column order of the owning
/// [`ResultTable`].
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub identifier: String,
    pub amounts: Vec<Decimal>,
}

impl Row {
    pub fn new(identifier: impl Into<String>, amounts: Vec<Decimal>) -> Self {
        Self {
            identifier: identifier.into(),
            amounts,
        }
    }

    /// Amount in the given column, zero if the column does not exist.
    pub fn amount(&self, column: usize) -> Decimal {
        self.amounts.get(column).copied().unwrap_or(Decimal::ZERO)
    }
}

/// Ordered data rows terminated by exactly one total row.
///
/// Rows are paired by naive positional alignment: the i-th identifier found
/// in the text shares a row with the i-th amount of every currency. No other
/// association between identifiers and amounts is attempted, so documents
/// with subtotal or tax lines can shift amounts onto the wrong identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultTable {
    currencies: Vec<String>,
    rows: Vec<Row>,
    overflowed: Vec<String>,
}

impl ResultTable {
    /// Build a table from data rows, appending the total row.
    ///
    /// Totals are exact decimal sums of each currency column. A column whose
    /// sum exceeds the `Decimal` range keeps the last total that fit and is
    /// listed by [`overflowed_currencies`](Self::overflowed_currencies).
    pub fn new(currencies: Vec<String>, data_rows: Vec<Row>, total_label: &str) -> Self {
        let mut totals = vec![Decimal::ZERO; currencies.len()];
        let mut overflow = vec![false; currencies.len()];
        for row in &data_rows {
            for (column, total) in totals.iter_mut().enumerate() {
                match total.checked_add(row.amount(column)) {
                    Some(sum) => *total = sum,
                    None => overflow[column] = true,
                }
            }
        }

        let overflowed = currencies
            .iter()
            .zip(&overflow)
            .filter(|(_, o)| **o)
            .map(|(code, _)| code.clone())
            .collect();

        let mut rows = data_rows;
        rows.push(Row::new(total_label, totals));

        Self {
            currencies,
            rows,
            overflowed,
        }
    }

    /// Currency codes in column order.
    pub fn currencies(&self) -> &[String] {
        &self.currencies
    }

    /// Currency codes whose total overflowed and was capped.
    pub fn overflowed_currencies(&self) -> &[String] {
        &self.overflowed
    }

    /// All rows, the total row last.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Rows excluding the total row.
    pub fn data_rows(&self) -> &[Row] {
        &self.rows[..self.rows.len() - 1]
    }

    pub fn total(&self) -> &Row {
        &self.rows[self.rows.len() - 1]
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Column index of a currency code.
    pub fn currency_index(&self, code: &str) -> Option<usize> {
        self.currencies.iter().position(|c| c.eq_ignore_ascii_case(code))
    }

    /// Data-row values of one currency column.
    pub fn column(&self, code: &str) -> Option<Vec<Decimal>> {
        let index = self.currency_index(code)?;
        Some(self.data_rows().iter().map(|r| r.amount(index)).collect())
    }

    /// Total of one currency column.
    pub fn total_for(&self, code: &str) -> Option<Decimal> {
        let index = self.currency_index(code)?;
        Some(self.total().amount(index))
    }

    /// Data-row identifiers.
    pub fn identifiers(&self) -> Vec<&str> {
        self.data_rows().iter().map(|r| r.identifier.as_str()).collect()
    }

    /// Record keys: the identifier column then one amount column per currency.
    pub fn headers(&self) -> Vec<String> {
        let mut headers = vec![IDENTIFIER_COLUMN.to_string()];
        headers.extend(self.currencies.iter().map(|c| amount_column_name(c)));
        headers
    }

    /// Serializable record views, one per row including the total row.
    pub fn records(&self) -> impl Iterator<Item = Record<'_>> {
        self.rows.iter().map(move |row| Record { table: self, row })
    }
}

/// A row viewed as a record keyed by column name.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    table: &'a ResultTable,
    row: &'a Row,
}

#[derive(Serialize)]
struct NumericAmount(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Serialize for Record<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.table.currencies.len() + 1))?;
        map.serialize_entry(IDENTIFIER_COLUMN, &self.row.identifier)?;
        for (column, code) in self.table.currencies.iter().enumerate() {
            map.serialize_entry(
                &amount_column_name(code),
                &NumericAmount(self.row.amount(column)),
            )?;
        }
        map.end()
    }
}

impl Serialize for ResultTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for record in self.records() {
            seq.serialize_element(&record)?;
        }
        seq.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn codes() -> Vec<String> {
        vec!["ARS".to_string(), "USD".to_string()]
    }

    #[test]
    fn test_total_row_appended() {
        let table = ResultTable::new(
            codes(),
            vec![
                Row::new("FAC-1", vec![dec("10.50"), dec("1")]),
                Row::new("FAC-2", vec![dec("0.50"), dec("2")]),
            ],
            TOTAL_LABEL,
        );

        assert_eq!(table.len(), 2);
        assert_eq!(table.rows().len(), 3);
        assert_eq!(table.total().identifier, "TOTAL GENERAL");
        assert_eq!(table.total_for("ars"), Some(dec("11.00")));
        assert_eq!(table.total_for("USD"), Some(dec("3")));
        assert_eq!(table.total_for("EUR"), None);
    }

    #[test]
    fn test_empty_table_has_only_total() {
        let table = ResultTable::new(codes(), Vec::new(), TOTAL_LABEL);

        assert!(table.is_empty());
        assert_eq!(table.rows().len(), 1);
        assert_eq!(table.total().amounts, vec![Decimal::ZERO, Decimal::ZERO]);
    }

    #[test]
    fn test_total_overflow_keeps_last_fitting_sum() {
        let table = ResultTable::new(
            codes(),
            vec![
                Row::new("FAC-1", vec![Decimal::MAX, dec("1")]),
                Row::new("FAC-2", vec![Decimal::MAX, dec("2")]),
            ],
            TOTAL_LABEL,
        );

        assert_eq!(table.total_for("ARS"), Some(Decimal::MAX));
        assert_eq!(table.total_for("USD"), Some(dec("3")));
        assert_eq!(table.overflowed_currencies(), ["ARS".to_string()]);
    }

    #[test]
    fn test_headers() {
        let table = ResultTable::new(codes(), Vec::new(), TOTAL_LABEL);
        assert_eq!(table.headers(), vec!["Factura", "Importe_ARS", "Importe_USD"]);
    }

    #[test]
    fn test_serializes_as_records() {
        let table = ResultTable::new(
            codes(),
            vec![Row::new("FAC-1", vec![dec("1200.50"), dec("0")])],
            TOTAL_LABEL,
        );

        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"Factura": "FAC-1", "Importe_ARS": 1200.5, "Importe_USD": 0.0},
                {"Factura": "TOTAL GENERAL", "Importe_ARS": 1200.5, "Importe_USD": 0.0}
            ])
        );
    }
}
