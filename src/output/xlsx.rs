use std::path::Path;

use rust_xlsxwriter::Workbook;

use crate::error::AppError;

use super::UnifiedTable;

/// Writes the unified table as a single-sheet workbook, header row first.
/// Everything is written as text so identifiers keep their leading zeros.
pub fn mirror(table: &UnifiedTable, path: &Path) -> Result<(), AppError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (col, name) in table.columns.iter().enumerate() {
        sheet.write_string(0, col as u16, name)?;
    }
    for (r, row) in table.rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            sheet.write_string(r as u32 + 1, c as u16, value)?;
        }
    }

    workbook.save(path)?;
    Ok(())
}
