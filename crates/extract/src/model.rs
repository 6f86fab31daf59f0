use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use acsx_core::col_to_letters;

use crate::geography::{GeographyKind, MatchResult};

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// One output column sourced from the grid: the listed 1-based rows are summed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowSpec {
    pub label: String,
    pub rows: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PercentageRequest {
    pub numerator: String,
    pub denominator: String,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankOrder {
    /// Largest value gets rank 1.
    #[default]
    Descending,
    Ascending,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankRequest {
    pub source: String,
    pub label: String,
    #[serde(default)]
    pub order: RankOrder,
}

// ---------------------------------------------------------------------------
// Output table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Sum,
    Percentage,
    Rank,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub label: String,
    pub kind: ColumnKind,
}

/// One geography's row. `None` marks a missing value, never a zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedRow {
    pub geography: String,
    #[serde(rename = "match")]
    pub match_result: MatchResult,
    pub values: IndexMap<String, Option<f64>>,
}

impl ExtractedRow {
    /// Value under `label`; `None` both for missing values and unknown labels.
    pub fn value(&self, label: &str) -> Option<f64> {
        self.values.get(label).copied().flatten()
    }

    pub fn is_matched(&self) -> bool {
        self.match_result.is_match()
    }
}

// ---------------------------------------------------------------------------
// Warnings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WarningReason {
    /// No block-start header scored at or above the threshold.
    NoMatch { confidence: f64 },
    /// Cell held text that is not a number; counted as 0.
    NonNumericCell { text: String },
    /// Row lies past the last grid row; counted as 0.
    RowOutOfRange { row_count: usize },
    /// Resolved column lies past the last grid column; counted as 0.
    ColumnOutOfRange { col_count: usize },
}

/// Non-fatal anomaly recorded alongside the table.
/// `row` is 1-based and `column` 0-based, matching configuration conventions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Warning {
    pub geography: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
    pub reason: WarningReason,
}

impl Warning {
    pub fn no_match(geography: &str, confidence: f64) -> Self {
        Self {
            geography: geography.to_string(),
            label: None,
            row: None,
            column: None,
            reason: WarningReason::NoMatch { confidence },
        }
    }

    pub fn cell(geography: &str, label: &str, row: usize, column: usize, reason: WarningReason) -> Self {
        Self {
            geography: geography.to_string(),
            label: Some(label.to_string()),
            row: Some(row),
            column: Some(column),
            reason,
        }
    }

    /// Spreadsheet address of the offending cell, e.g. "D12".
    pub fn cell_address(&self) -> Option<String> {
        match (self.row, self.column) {
            (Some(row), Some(col)) => Some(format!("{}{}", col_to_letters(col), row)),
            _ => None,
        }
    }
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.geography)?;
        if let Some(label) = &self.label {
            write!(f, " / {label}")?;
        }
        if let Some(addr) = self.cell_address() {
            write!(f, " @ {addr}")?;
        }
        match &self.reason {
            WarningReason::NoMatch { confidence } => {
                write!(f, ": no match (best score {confidence:.2})")
            }
            WarningReason::NonNumericCell { text } => {
                write!(f, ": non-numeric cell '{text}' treated as 0")
            }
            WarningReason::RowOutOfRange { row_count } => {
                write!(f, ": row beyond sheet ({row_count} rows) treated as 0")
            }
            WarningReason::ColumnOutOfRange { col_count } => {
                write!(f, ": column beyond sheet ({col_count} columns) treated as 0")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// Everything one run produces. Row order mirrors the requested geography order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Extraction {
    pub kind: GeographyKind,
    pub columns: Vec<Column>,
    pub rows: Vec<ExtractedRow>,
    pub warnings: Vec<Warning>,
}

impl Extraction {
    pub fn column(&self, label: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.label == label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warning_display_names_cell() {
        let w = Warning::cell(
            "Alabama",
            "Total",
            12,
            3,
            WarningReason::NonNumericCell { text: "(X)".into() },
        );
        assert_eq!(w.cell_address().as_deref(), Some("D12"));
        assert_eq!(w.to_string(), "Alabama / Total @ D12: non-numeric cell '(X)' treated as 0");
    }

    #[test]
    fn no_match_display() {
        let w = Warning::no_match("Alsaka", 0.4);
        assert_eq!(w.cell_address(), None);
        assert_eq!(w.to_string(), "Alsaka: no match (best score 0.40)");
    }

    #[test]
    fn warning_serializes_reason_tag() {
        let w = Warning::no_match("X", 0.25);
        let json = serde_json::to_value(&w).unwrap();
        assert_eq!(json["reason"]["kind"], "no_match");
        assert!(json.get("label").is_none());
    }
}
