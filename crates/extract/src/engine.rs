use std::collections::HashMap;

use acsx_core::{CellValue, Grid};
use indexmap::IndexMap;

use crate::config::{ExtractConfig, ExtractPlan};
use crate::error::ExtractError;
use crate::fuzzy;
use crate::geography::GeographyMatcher;
use crate::model::{Column, ColumnKind, ExtractedRow, Extraction, RowSpec, Warning, WarningReason};
use crate::{percentage, rank};

/// Validate `config` and run it against `grid`. Configuration errors are
/// returned before any cell is read.
pub fn run<G: Grid + ?Sized>(
    config: &ExtractConfig,
    extra_names: &[String],
    grid: &G,
) -> Result<Extraction, ExtractError> {
    let plan = config.plan(extra_names)?;
    Ok(extract(grid, &plan))
}

/// Extract one row per requested geography, in request order. Never fails:
/// unmatched geographies and unreadable cells become warnings.
pub fn extract<G: Grid + ?Sized>(grid: &G, plan: &ExtractPlan) -> Extraction {
    let header = grid.row_text(plan.header_row);
    let matcher = GeographyMatcher::new(plan.kind, plan.threshold)
        .with_containment_bonus(plan.containment_bonus);

    let mut rows = Vec::with_capacity(plan.geographies.len());
    let mut warnings = Vec::new();
    let mut occurrences: HashMap<String, usize> = HashMap::new();

    for geo in &plan.geographies {
        let seen = occurrences.entry(fuzzy::normalize(&geo.name)).or_insert(0);
        let occurrence = *seen;
        *seen += 1;

        let match_result = matcher.match_geography(&geo.name, &header, &plan.pattern, occurrence);

        let values: IndexMap<String, Option<f64>> = match match_result.column_block_start {
            Some(block_start) => {
                let col = plan.pattern.resolve_column(block_start);
                tracing::debug!(
                    geography = %geo.name,
                    header = match_result.matched_header_text.as_deref().unwrap_or(""),
                    block_start,
                    col,
                    confidence = match_result.confidence,
                    "matched geography"
                );
                plan.row_specs
                    .iter()
                    .map(|spec| {
                        let sum = sum_spec(grid, &geo.name, spec, col, &mut warnings);
                        (spec.label.clone(), Some(sum))
                    })
                    .collect()
            }
            None => {
                let warning = Warning::no_match(&geo.name, match_result.confidence);
                tracing::warn!("{warning}");
                warnings.push(warning);
                plan.row_specs.iter().map(|spec| (spec.label.clone(), None)).collect()
            }
        };

        rows.push(ExtractedRow {
            geography: geo.name.clone(),
            match_result,
            values,
        });
    }

    percentage::derive(&mut rows, &plan.percentages);
    rank::derive(&mut rows, &plan.ranks);

    let columns = output_columns(plan);
    let matched = rows.iter().filter(|r| r.is_matched()).count();
    tracing::info!(
        name = %plan.name,
        geographies = rows.len(),
        matched,
        warnings = warnings.len(),
        "extraction complete"
    );

    Extraction {
        kind: plan.kind,
        columns,
        rows,
        warnings,
    }
}

/// Output columns in order: row specs, then percentages, then ranks.
pub fn output_columns(plan: &ExtractPlan) -> Vec<Column> {
    let sums = plan.row_specs.iter().map(|s| Column { label: s.label.clone(), kind: ColumnKind::Sum });
    let pcts = plan
        .percentages
        .iter()
        .map(|p| Column { label: p.label.clone(), kind: ColumnKind::Percentage });
    let ranks = plan.ranks.iter().map(|r| Column { label: r.label.clone(), kind: ColumnKind::Rank });
    sums.chain(pcts).chain(ranks).collect()
}

/// Sum every listed row of `spec` in column `col`. Unreadable cells count as
/// 0; blank cells are silent, everything else is recorded. A column past the
/// grid is one warning for the whole spec, reported at its first row.
fn sum_spec<G: Grid + ?Sized>(
    grid: &G,
    geography: &str,
    spec: &RowSpec,
    col: usize,
    warnings: &mut Vec<Warning>,
) -> f64 {
    if col >= grid.col_count() {
        let row = spec.rows.first().copied().unwrap_or(1);
        let reason = WarningReason::ColumnOutOfRange { col_count: grid.col_count() };
        let warning = Warning::cell(geography, &spec.label, row, col, reason);
        tracing::warn!("{warning}");
        warnings.push(warning);
        return 0.0;
    }

    let mut sum = 0.0;
    for &row in &spec.rows {
        let reason = match read_cell(grid, row - 1, col) {
            CellRead::Number(n) => {
                sum += n;
                continue;
            }
            CellRead::Blank => continue,
            CellRead::NonNumeric(text) => WarningReason::NonNumericCell { text },
            CellRead::RowOutOfRange => WarningReason::RowOutOfRange { row_count: grid.row_count() },
            CellRead::ColumnOutOfRange => WarningReason::ColumnOutOfRange { col_count: grid.col_count() },
        };
        let warning = Warning::cell(geography, &spec.label, row, col, reason);
        tracing::warn!("{warning}");
        warnings.push(warning);
    }
    sum
}

#[derive(Debug, Clone, PartialEq)]
pub enum CellRead {
    Number(f64),
    Blank,
    NonNumeric(String),
    RowOutOfRange,
    ColumnOutOfRange,
}

/// Read a 0-based cell as a number, distinguishing every way it can fail.
pub fn read_cell<G: Grid + ?Sized>(grid: &G, row: usize, col: usize) -> CellRead {
    if col >= grid.col_count() {
        return CellRead::ColumnOutOfRange;
    }
    if row >= grid.row_count() {
        return CellRead::RowOutOfRange;
    }
    match grid.cell(row, col) {
        None => CellRead::Blank,
        Some(cell) if cell.is_blank() => CellRead::Blank,
        Some(CellValue::Number(n)) => CellRead::Number(*n),
        Some(CellValue::Text(text)) => match parse_number(text) {
            Some(n) => CellRead::Number(n),
            None => CellRead::NonNumeric(text.clone()),
        },
        Some(CellValue::Empty) => CellRead::Blank,
    }
}

/// Parse numbers as survey exports format them: thousands separators,
/// a trailing percent sign, a leading plus.
pub fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let trimmed = trimmed.strip_suffix('%').unwrap_or(trimmed).trim_end();
    let trimmed = trimmed.strip_prefix('+').unwrap_or(trimmed);
    if trimmed.is_empty() || trimmed.starts_with(',') {
        return None;
    }
    let cleaned: String = trimmed.chars().filter(|&c| c != ',').collect();
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}
