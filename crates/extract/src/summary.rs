use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::{Extraction, WarningReason};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionSummary {
    pub geographies: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub warnings: usize,
    /// Warning count per reason kind, e.g. "non_numeric_cell".
    pub warning_counts: BTreeMap<String, usize>,
}

impl ExtractionSummary {
    pub fn is_clean(&self) -> bool {
        self.warnings == 0
    }
}

/// Compute summary statistics for an extraction.
pub fn compute_summary(extraction: &Extraction) -> ExtractionSummary {
    let matched = extraction.rows.iter().filter(|r| r.is_matched()).count();

    let mut warning_counts: BTreeMap<String, usize> = BTreeMap::new();
    for w in &extraction.warnings {
        *warning_counts.entry(reason_kind(&w.reason).to_string()).or_insert(0) += 1;
    }

    ExtractionSummary {
        geographies: extraction.rows.len(),
        matched,
        unmatched: extraction.rows.len() - matched,
        warnings: extraction.warnings.len(),
        warning_counts,
    }
}

fn reason_kind(reason: &WarningReason) -> &'static str {
    match reason {
        WarningReason::NoMatch { .. } => "no_match",
        WarningReason::NonNumericCell { .. } => "non_numeric_cell",
        WarningReason::RowOutOfRange { .. } => "row_out_of_range",
        WarningReason::ColumnOutOfRange { .. } => "column_out_of_range",
    }
}
