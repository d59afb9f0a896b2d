//! Single-sheet XLSX writer.

use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Format, Workbook};

use super::Result;
use crate::models::table::ResultTable;

/// Number format of amount cells; Excel localizes the separators.
const AMOUNT_FORMAT: &str = "#,##0.00";

/// Write the table, header row first, into an in-memory workbook.
///
/// Identifiers are string cells and amounts numeric cells, so the total row
/// stays a plain value rather than a formula.
pub(super) fn write_workbook(table: &ResultTable) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let amount_format = Format::new().set_num_format(AMOUNT_FORMAT);

    let worksheet = workbook.add_worksheet();

    for (col, header) in table.headers().iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, header, &header_format)?;
    }

    for (row_idx, row) in table.rows().iter().enumerate() {
        let excel_row = (row_idx + 1) as u32;
        worksheet.write_string(excel_row, 0, &row.identifier)?;
        for (col_idx, amount) in row.amounts.iter().enumerate() {
            worksheet.write_number_with_format(
                excel_row,
                (col_idx + 1) as u16,
                amount.to_f64().unwrap_or_default(),
                &amount_format,
            )?;
        }
    }

    worksheet.set_column_width(0, 24)?;

    Ok(workbook.save_to_buffer()?)
}
