// Excel / ODS loading via calamine (xlsx, xlsm, xlsb, xls, ods)

use std::path::Path;

use acsx_core::{CellValue, Grid, MemGrid};
use calamine::{open_workbook_auto, Data, Reader, Sheets};

use crate::LoadError;

fn open(path: &Path) -> Result<Sheets<std::io::BufReader<std::fs::File>>, LoadError> {
    if !path.exists() {
        return Err(LoadError::io(
            path,
            std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        ));
    }
    open_workbook_auto(path).map_err(|e| LoadError::Workbook(e.to_string()))
}

pub fn sheet_names(path: &Path) -> Result<Vec<String>, LoadError> {
    let workbook = open(path)?;
    Ok(workbook.sheet_names().to_vec())
}

/// Load one worksheet. `None` picks the first sheet; a name is matched exactly,
/// then case-insensitively.
pub fn load_sheet(path: &Path, sheet: Option<&str>) -> Result<MemGrid, LoadError> {
    let mut workbook = open(path)?;
    let names: Vec<String> = workbook.sheet_names().to_vec();

    let name = select_sheet(&names, sheet)?;
    let range = workbook
        .worksheet_range(&name)
        .map_err(|e| LoadError::Workbook(format!("failed to read sheet '{name}': {e}")))?;

    // Range start offset (data may not begin at A1)
    let (start_row, start_col) = range.start().unwrap_or((0, 0));

    let mut cells = Vec::new();
    for (row_idx, row) in range.rows().enumerate() {
        for (col_idx, data) in row.iter().enumerate() {
            let value = to_cell_value(data);
            if value.is_blank() {
                continue;
            }
            cells.push((start_row as usize + row_idx, start_col as usize + col_idx, value));
        }
    }

    let grid = MemGrid::from_cells(cells);
    tracing::debug!(
        path = %path.display(),
        sheet = %name,
        rows = grid.row_count(),
        cols = grid.col_count(),
        "loaded worksheet"
    );
    Ok(grid)
}

fn select_sheet(names: &[String], wanted: Option<&str>) -> Result<String, LoadError> {
    let Some(wanted) = wanted else {
        return names.first().cloned().ok_or(LoadError::NoSheets);
    };
    if names.is_empty() {
        return Err(LoadError::NoSheets);
    }
    names
        .iter()
        .find(|n| n.as_str() == wanted)
        .or_else(|| names.iter().find(|n| n.eq_ignore_ascii_case(wanted)))
        .cloned()
        .ok_or_else(|| LoadError::SheetNotFound {
            name: wanted.to_string(),
            available: names.to_vec(),
        })
}

/// Map a calamine cell to a grid cell. Dates keep their serial number.
pub fn to_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::from_input(s),
        Data::Float(n) => CellValue::Number(*n),
        Data::Int(n) => CellValue::Number(*n as f64),
        Data::Bool(b) => CellValue::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Data::Error(e) => CellValue::Text(format!("#{e:?}")),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> Vec<String> {
        vec!["Data".into(), "Notes".into()]
    }

    #[test]
    fn first_sheet_by_default() {
        assert_eq!(select_sheet(&names(), None).unwrap(), "Data");
    }

    #[test]
    fn sheet_selected_case_insensitively() {
        assert_eq!(select_sheet(&names(), Some("notes")).unwrap(), "Notes");
    }

    #[test]
    fn unknown_sheet_reports_available() {
        match select_sheet(&names(), Some("Summary")) {
            Err(LoadError::SheetNotFound { name, available }) => {
                assert_eq!(name, "Summary");
                assert_eq!(available, names());
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn empty_workbook_has_no_sheets() {
        assert!(matches!(select_sheet(&[], None), Err(LoadError::NoSheets)));
        assert!(matches!(select_sheet(&[], Some("Data")), Err(LoadError::NoSheets)));
    }

    #[test]
    fn cell_mapping() {
        assert_eq!(to_cell_value(&Data::Float(2.5)), CellValue::Number(2.5));
        assert_eq!(to_cell_value(&Data::Int(7)), CellValue::Number(7.0));
        assert_eq!(
            to_cell_value(&Data::String("Cook County".into())),
            CellValue::Text("Cook County".into())
        );
        assert_eq!(to_cell_value(&Data::Bool(true)), CellValue::Text("TRUE".into()));
        assert!(to_cell_value(&Data::String("   ".into())).is_blank());
        assert_eq!(to_cell_value(&Data::String("42".into())), CellValue::Number(42.0));
    }

    #[test]
    fn missing_workbook_is_io_error() {
        let err = load_sheet(Path::new("/nonexistent/acsx/book.xlsx"), None).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn corrupt_workbook_is_workbook_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.xlsx");
        std::fs::write(&path, b"not a zip archive").unwrap();
        assert!(matches!(load_sheet(&path, None), Err(LoadError::Workbook(_))));
    }
}
