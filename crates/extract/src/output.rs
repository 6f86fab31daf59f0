//! Rendering of an extraction.
//!
//! TSV is for pasting: fields joined by tabs, no escaping. CSV is for files:
//! standard quoting via the `csv` crate. Missing values render empty in both.
//! Workbook output gets typed cells from [`to_cells`] instead of text.

use acsx_core::CellValue;
use serde::{Deserialize, Serialize};

use crate::geography::GeographyKind;

use crate::model::{ColumnKind, Extraction};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    Tsv,
    Csv,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputOptions {
    /// Fixed decimals for percentage columns; `None` prints the shortest form.
    pub percent_decimals: Option<usize>,
    /// Emit a header line with the column titles.
    pub header: bool,
    /// Worksheet name for workbook output; defaults to the geography title.
    pub sheet_name: Option<String>,
    /// Citation written beside the table in workbook output.
    pub source_note: Option<String>,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            percent_decimals: None,
            header: true,
            sheet_name: None,
            source_note: None,
        }
    }
}

impl OutputOptions {
    pub fn sheet_name_for(&self, kind: GeographyKind) -> &str {
        self.sheet_name.as_deref().unwrap_or(kind.column_title())
    }
}

/// Round percentage values to the configured decimals; everything else as is.
pub fn round_value(value: f64, kind: ColumnKind, options: &OutputOptions) -> f64 {
    match (kind, options.percent_decimals) {
        (ColumnKind::Percentage, Some(decimals)) => {
            let factor = 10f64.powi(decimals.min(15) as i32);
            (value * factor).round() / factor
        }
        _ => value,
    }
}

/// Render one value for display. Rounding happens here and nowhere else.
pub fn format_value(value: Option<f64>, kind: ColumnKind, options: &OutputOptions) -> String {
    let Some(v) = value else {
        return String::new();
    };
    match (kind, options.percent_decimals) {
        (ColumnKind::Percentage, Some(decimals)) => format!("{v:.decimals$}"),
        (ColumnKind::Rank, _) => format!("{}", v as i64),
        _ => {
            if v.fract() == 0.0 && v.abs() < 1e15 {
                format!("{}", v as i64)
            } else {
                format!("{v}")
            }
        }
    }
}

/// The extraction as text cells: optional title line, then one line per geography.
pub fn to_records(extraction: &Extraction, options: &OutputOptions) -> Vec<Vec<String>> {
    let mut records = Vec::with_capacity(extraction.rows.len() + 1);

    if options.header {
        let mut titles = vec![extraction.kind.column_title().to_string()];
        titles.extend(extraction.columns.iter().map(|c| c.label.clone()));
        records.push(titles);
    }

    for row in &extraction.rows {
        let mut record = vec![row.geography.clone()];
        record.extend(
            extraction
                .columns
                .iter()
                .map(|c| format_value(row.value(&c.label), c.kind, options)),
        );
        records.push(record);
    }

    records
}

/// The extraction as typed cells, laid out like [`to_records`]. Missing
/// values are empty cells.
pub fn to_cells(extraction: &Extraction, options: &OutputOptions) -> Vec<Vec<CellValue>> {
    let mut rows = Vec::with_capacity(extraction.rows.len() + 1);

    if options.header {
        let mut titles = vec![CellValue::Text(extraction.kind.column_title().to_string())];
        titles.extend(extraction.columns.iter().map(|c| CellValue::Text(c.label.clone())));
        rows.push(titles);
    }

    for row in &extraction.rows {
        let mut cells = vec![CellValue::Text(row.geography.clone())];
        cells.extend(extraction.columns.iter().map(|c| match row.value(&c.label) {
            Some(v) => CellValue::Number(round_value(v, c.kind, options)),
            None => CellValue::Empty,
        }));
        rows.push(cells);
    }

    rows
}

/// Join pre-formatted records in the given mode.
pub fn format_records(records: &[Vec<String>], mode: OutputMode) -> Result<String, csv::Error> {
    match mode {
        OutputMode::Tsv => Ok(records
            .iter()
            .map(|r| r.join("\t"))
            .collect::<Vec<_>>()
            .join("\n")),
        OutputMode::Csv => {
            let mut writer = csv::WriterBuilder::new()
                .terminator(csv::Terminator::Any(b'\n'))
                .flexible(true)
                .from_writer(Vec::new());
            for record in records {
                writer.write_record(record)?;
            }
            let bytes = writer.into_inner().map_err(|e| e.into_error())?;
            let mut out = String::from_utf8_lossy(&bytes).into_owned();
            if out.ends_with('\n') {
                out.pop();
            }
            Ok(out)
        }
    }
}

pub fn render(extraction: &Extraction, mode: OutputMode, options: &OutputOptions) -> Result<String, csv::Error> {
    format_records(&to_records(extraction, options), mode)
}
