//! Export of result tables to spreadsheet, CSV and JSON.
//!
//! Exporters write the untouched decimal values; regional formatting is only
//! applied by the [`preview`](crate::preview) module.

mod xlsx;

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::error::ExportError;
use crate::models::table::ResultTable;

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Supported output kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    /// Office Open XML workbook with one sheet.
    Xlsx,
    /// Comma-separated values with a header row.
    Csv,
    /// Array of records keyed by column name.
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    /// Output file name for a stem, e.g. `resultado.csv`.
    pub fn file_name(&self, stem: &str) -> String {
        format!("{}.{}", stem, self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "xlsx" => Ok(ExportFormat::Xlsx),
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            _ => Err(ExportError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Serialize a table, total row included, into the given format.
pub fn export(table: &ResultTable, format: ExportFormat) -> Result<Vec<u8>> {
    let bytes = match format {
        ExportFormat::Xlsx => xlsx::write_workbook(table)?,
        ExportFormat::Csv => to_csv(table)?,
        ExportFormat::Json => serde_json::to_vec(table)?,
    };

    debug!(
        "Exported {} rows as {} ({} bytes)",
        table.rows().len(),
        format,
        bytes.len()
    );
    Ok(bytes)
}

fn to_csv(table: &ResultTable) -> Result<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(table.headers())?;
    for row in table.rows() {
        let mut record = Vec::with_capacity(row.amounts.len() + 1);
        record.push(row.identifier.clone());
        record.extend(row.amounts.iter().map(|a| a.to_string()));
        wtr.write_record(&record)?;
    }

    wtr.into_inner().map_err(|e| ExportError::Io(e.into_error()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::extract;
    use calamine::{Data, Reader, Xlsx};
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn sample() -> ResultTable {
        extract("Factura FAC-001 por $ 1.200,50 y Factura FAC-002 por $ 300,00 USD 10,00")
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("xlsx".parse::<ExportFormat>().unwrap(), ExportFormat::Xlsx);
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!(" json ".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
    }

    #[test]
    fn test_unsupported_format_names_it() {
        let err = "pdf".parse::<ExportFormat>().unwrap_err();
        assert!(matches!(err, ExportError::UnsupportedFormat(ref f) if f == "pdf"));
        assert_eq!(err.to_string(), "unsupported export format: pdf");
    }

    #[test]
    fn test_file_name() {
        assert_eq!(ExportFormat::Xlsx.file_name("resultado"), "resultado.xlsx");
        assert_eq!(ExportFormat::Json.to_string(), "json");
    }

    #[test]
    fn test_csv_export() {
        let bytes = export(&sample(), ExportFormat::Csv).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert_eq!(
            text,
            "Factura,Importe_ARS,Importe_USD\n\
             FAC-001,1200.50,10.00\n\
             FAC-002,300.00,0\n\
             TOTAL GENERAL,1500.50,10.00\n"
        );
    }

    #[test]
    fn test_json_export() {
        let bytes = export(&sample(), ExportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        let records = value.as_array().unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0]["Factura"], "FAC-001");
        assert_eq!(records[0]["Importe_ARS"], 1200.5);
        assert_eq!(records[2]["Factura"], "TOTAL GENERAL");
        assert_eq!(records[2]["Importe_ARS"], 1500.5);
        assert_eq!(records[2]["Importe_USD"], 10.0);
    }

    #[test]
    fn test_xlsx_export() {
        let bytes = export(&sample(), ExportFormat::Xlsx).unwrap();
        assert_eq!(&bytes[..2], b"PK");

        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes)).unwrap();
        let range = workbook.worksheet_range("Sheet1").unwrap();

        assert_eq!(range.get_size(), (4, 3));
        assert_eq!(range.get_value((1, 0)), Some(&Data::String("FAC-001".to_string())));
        assert_eq!(range.get_value((3, 0)), Some(&Data::String("TOTAL GENERAL".to_string())));
        assert_eq!(range.get_value((3, 1)), Some(&Data::Float(1500.5)));
        assert_eq!(range.get_value((2, 2)), Some(&Data::Float(0.0)));
    }
}
