// XLSX writing via rust_xlsxwriter

use std::path::Path;

use acsx_core::CellValue;
use rust_xlsxwriter::{Color, Format, Workbook, Worksheet};

use crate::ExportError;

/// Width applied to every table column, in Excel character units.
pub const COLUMN_WIDTH: f64 = 15.0;

/// Fill behind the header row.
const HEADER_FILL: u32 = 0xCCCCCC;

/// 0-based row of the source note, placed one blank column right of the table.
const SOURCE_NOTE_ROW: u32 = 3;

/// One sheet's worth of table output.
#[derive(Debug, Clone)]
pub struct TableExport<'a> {
    pub sheet_name: &'a str,
    /// Rows in order. When `header` is set the first row holds column titles.
    pub rows: &'a [Vec<CellValue>],
    pub header: bool,
    pub source_note: Option<&'a str>,
}

/// Write `table` as a single-sheet workbook at `path`.
pub fn export_table(path: &Path, table: &TableExport<'_>) -> Result<(), ExportError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(table.sheet_name)?;

    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(HEADER_FILL));
    let note_format = Format::new().set_italic().set_font_size(9);

    let width = table.rows.iter().map(Vec::len).max().unwrap_or(0);

    for (row_idx, row) in table.rows.iter().enumerate() {
        let r = row_num(row_idx)?;
        let format = (table.header && row_idx == 0).then_some(&header_format);
        for (col_idx, value) in row.iter().enumerate() {
            write_cell(worksheet, r, col_num(col_idx)?, value, format)?;
        }
    }

    for col_idx in 0..width {
        worksheet.set_column_width(col_num(col_idx)?, COLUMN_WIDTH)?;
    }

    if let Some(note) = table.source_note.filter(|n| !n.trim().is_empty()) {
        worksheet.write_string_with_format(SOURCE_NOTE_ROW, col_num(width + 1)?, note, &note_format)?;
    }

    workbook.save(path)?;
    tracing::debug!(
        path = %path.display(),
        sheet = table.sheet_name,
        rows = table.rows.len(),
        cols = width,
        "wrote workbook"
    );
    Ok(())
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &CellValue,
    format: Option<&Format>,
) -> Result<(), ExportError> {
    match (value, format) {
        (CellValue::Empty, Some(f)) => {
            worksheet.write_blank(row, col, f)?;
        }
        (CellValue::Empty, None) => {}
        (CellValue::Text(s), Some(f)) => {
            worksheet.write_string_with_format(row, col, s, f)?;
        }
        (CellValue::Text(s), None) => {
            worksheet.write_string(row, col, s)?;
        }
        (CellValue::Number(n), Some(f)) => {
            worksheet.write_number_with_format(row, col, *n, f)?;
        }
        (CellValue::Number(n), None) => {
            worksheet.write_number(row, col, *n)?;
        }
    }
    Ok(())
}

fn row_num(row: usize) -> Result<u32, ExportError> {
    u32::try_from(row).map_err(|_| ExportError::TooLarge(format!("row {}", row + 1)))
}

fn col_num(col: usize) -> Result<u16, ExportError> {
    u16::try_from(col).map_err(|_| ExportError::TooLarge(format!("column {}", col + 1)))
}
