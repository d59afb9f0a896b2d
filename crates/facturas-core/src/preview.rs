//! Human-readable rendering of result tables with regional number format.

use quick_xml::escape::escape;

use crate::invoice::rules::format_regional_amount;
use crate::models::table::ResultTable;

/// String view of a table, amounts formatted as `1.234,56`.
///
/// Built from a [`ResultTable`] without touching its decimal values, so the
/// same table can still be exported with raw numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl PreviewTable {
    pub fn from_table(table: &ResultTable) -> Self {
        let rows = table
            .rows()
            .iter()
            .map(|row| {
                let mut cells = Vec::with_capacity(row.amounts.len() + 1);
                cells.push(row.identifier.clone());
                cells.extend(row.amounts.iter().map(|a| format_regional_amount(*a)));
                cells
            })
            .collect();

        Self {
            headers: table.headers(),
            rows,
        }
    }

    /// Plain-text grid; identifiers left-aligned, amounts right-aligned.
    pub fn to_text(&self) -> String {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if let Some(w) = widths.get_mut(i) {
                    *w = (*w).max(cell.chars().count());
                }
            }
        }

        let render = |cells: &[String]| -> String {
            cells
                .iter()
                .zip(&widths)
                .enumerate()
                .map(|(i, (cell, width))| {
                    if i == 0 {
                        format!("{:<width$}", cell, width = *width)
                    } else {
                        format!("{:>width$}", cell, width = *width)
                    }
                })
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        let mut output = render(&self.headers);
        output.push('\n');
        let rule_len = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
        output.push_str(&"-".repeat(rule_len));
        output.push('\n');
        for row in &self.rows {
            output.push_str(&render(row));
            output.push('\n');
        }
        output
    }

    /// HTML table for web previews.
    pub fn to_html(&self) -> String {
        let mut html = String::from(r#"<table border="1" class="dataframe table table-striped table-bordered">"#);

        html.push_str("<thead><tr>");
        for header in &self.headers {
            html.push_str(&format!("<th>{}</th>", escape(header.as_str())));
        }
        html.push_str("</tr></thead><tbody>");

        for row in &self.rows {
            html.push_str("<tr>");
            for cell in row {
                html.push_str(&format!("<td>{}</td>", escape(cell.as_str())));
            }
            html.push_str("</tr>");
        }

        html.push_str("</tbody></table>");
        html
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::extract;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_preview_formats_amounts() {
        let table = extract("FAC-1 $ 1.234,5 USD 0,99");
        let preview = PreviewTable::from_table(&table);

        assert_eq!(preview.headers, vec!["Factura", "Importe_ARS", "Importe_USD"]);
        assert_eq!(preview.rows[0], vec!["FAC-1", "1.234,50", "0,99"]);
        assert_eq!(preview.rows[1], vec!["TOTAL GENERAL", "1.234,50", "0,99"]);
    }

    #[test]
    fn test_preview_leaves_table_untouched() {
        let table = extract("FAC-1 $ 1.234,5");
        let before = table.clone();
        let _ = PreviewTable::from_table(&table);
        assert_eq!(table, before);
    }

    #[test]
    fn test_to_text() {
        let table = extract("FAC-1 $ 10,00");
        let text = PreviewTable::from_table(&table).to_text();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "Factura        Importe_ARS  Importe_USD");
        assert_eq!(lines[2], "FAC-1                10,00         0,00");
        assert_eq!(lines[3], "TOTAL GENERAL        10,00         0,00");
    }

    #[test]
    fn test_to_html_escapes() {
        let preview = PreviewTable {
            headers: vec!["Factura".to_string()],
            rows: vec![vec!["A<B>".to_string()]],
        };
        let html = preview.to_html();

        assert!(html.starts_with("<table"));
        assert!(html.contains("table-striped"));
        assert!(html.contains("<td>A&lt;B&gt;</td>"));
    }
}
