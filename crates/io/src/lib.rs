//! `acsx-io`: Loads worksheets into in-memory grids.
//!
//! Spreadsheet formats go through calamine; delimited text through the `csv`
//! crate. Callers get a [`MemGrid`] and never see the file format.

pub mod csv;
pub mod names;
pub mod xlsx;
pub mod xlsx_export;

pub use names::read_names;
pub use xlsx_export::{export_table, TableExport};

use std::path::Path;

use acsx_core::MemGrid;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file type '{0}' (expected xlsx, xlsm, xlsb, xls, ods, csv, tsv or txt)")]
    UnsupportedFormat(String),

    #[error("failed to open workbook: {0}")]
    Workbook(String),

    #[error("sheet '{name}' not found (available: {})", available.join(", "))]
    SheetNotFound { name: String, available: Vec<String> },

    #[error("workbook contains no sheets")]
    NoSheets,

    #[error("CSV parse error: {0}")]
    Csv(#[from] ::csv::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write workbook: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("table too large for a worksheet ({0})")]
    TooLarge(String),
}

impl LoadError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        LoadError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Workbook,
    Delimited,
    Tsv,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(SourceFormat::Workbook),
            "csv" | "txt" => Ok(SourceFormat::Delimited),
            "tsv" | "tab" => Ok(SourceFormat::Tsv),
            _ => Err(LoadError::UnsupportedFormat(ext)),
        }
    }
}

/// Load one sheet as a grid. `sheet` selects a workbook sheet by name (the
/// first sheet when `None`); it is ignored for delimited text.
pub fn load_grid(path: &Path, sheet: Option<&str>) -> Result<MemGrid, LoadError> {
    let format = SourceFormat::from_path(path)?;
    if sheet.is_some() && format != SourceFormat::Workbook {
        tracing::debug!(path = %path.display(), "sheet name ignored for delimited input");
    }
    match format {
        SourceFormat::Workbook => xlsx::load_sheet(path, sheet),
        SourceFormat::Delimited => csv::load(path),
        SourceFormat::Tsv => csv::load_with_delimiter(path, b'\t'),
    }
}

/// Sheet names in workbook order. Delimited files have a single unnamed sheet
/// reported under the file stem.
pub fn list_sheets(path: &Path) -> Result<Vec<String>, LoadError> {
    match SourceFormat::from_path(path)? {
        SourceFormat::Workbook => xlsx::sheet_names(path),
        SourceFormat::Delimited | SourceFormat::Tsv => {
            if !path.exists() {
                return Err(LoadError::io(
                    path,
                    std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
                ));
            }
            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("Sheet1")
                .to_string();
            Ok(vec![stem])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use acsx_core::Grid;
    use std::path::PathBuf;

    #[test]
    fn format_from_extension() {
        assert_eq!(SourceFormat::from_path(Path::new("a.XLSX")).unwrap(), SourceFormat::Workbook);
        assert_eq!(SourceFormat::from_path(Path::new("a.ods")).unwrap(), SourceFormat::Workbook);
        assert_eq!(SourceFormat::from_path(Path::new("a.csv")).unwrap(), SourceFormat::Delimited);
        assert_eq!(SourceFormat::from_path(Path::new("a.tsv")).unwrap(), SourceFormat::Tsv);
        assert!(matches!(
            SourceFormat::from_path(Path::new("a.pdf")),
            Err(LoadError::UnsupportedFormat(e)) if e == "pdf"
        ));
        assert!(matches!(
            SourceFormat::from_path(&PathBuf::from("noext")),
            Err(LoadError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn load_grid_dispatches_tsv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.tsv");
        std::fs::write(&path, "Name\tAlabama, total\nTotal\t5\n").unwrap();
        let grid = load_grid(&path, Some("ignored")).unwrap();
        assert_eq!(grid.row_text(0), vec!["Name", "Alabama, total"]);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_grid(Path::new("/nonexistent/acsx/data.csv"), None).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("data.csv"));
    }

    #[test]
    fn sheet_not_found_lists_available() {
        let err = LoadError::SheetNotFound {
            name: "Data".into(),
            available: vec!["Sheet1".into(), "Notes".into()],
        };
        assert_eq!(err.to_string(), "sheet 'Data' not found (available: Sheet1, Notes)");
    }

    #[test]
    fn list_sheets_for_csv_uses_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("acs_2022.csv");
        std::fs::write(&path, "a,b\n").unwrap();
        assert_eq!(list_sheets(&path).unwrap(), vec!["acs_2022"]);
    }
}
