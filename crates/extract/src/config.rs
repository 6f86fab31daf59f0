use std::collections::HashSet;

use acsx_core::{ColumnRef, ColumnRefError};
use serde::{Deserialize, Deserializer};

use crate::columns::ColumnPattern;
use crate::error::ExtractError;
use crate::fuzzy::CONTAINMENT_BONUS;
use crate::geography::{GeographyKind, GeographyRequest, DEFAULT_THRESHOLD};
use crate::model::{PercentageRequest, RankRequest, RowSpec};
use crate::output::OutputOptions;
use crate::rowspec;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractConfig {
    #[serde(default)]
    pub name: String,
    pub geography: GeographyKind,
    /// County/metro names in output order. Ignored for states.
    #[serde(default)]
    pub geographies: Vec<String>,
    /// One name per line, resolved relative to the config file by the caller.
    #[serde(default)]
    pub geographies_file: Option<String>,
    #[serde(default)]
    pub source: SourceConfig,
    pub columns: ColumnsConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub rows: Vec<RowSpecConfig>,
    #[serde(default)]
    pub percentages: Vec<PercentageRequest>,
    #[serde(default)]
    pub ranks: Vec<RankRequest>,
    #[serde(default)]
    pub output: OutputConfig,
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub sheet: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ColumnsConfig {
    /// First block's start column: letters ("B") or a 1-based number.
    pub start: ColumnStart,
    pub per_block: usize,
    pub target_offset: usize,
    /// 1-based row holding the geography names.
    #[serde(default = "default_header_row")]
    pub header_row: usize,
}

/// A column reference as written in the config, resolved during validation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ColumnStart {
    Number(u64),
    Text(String),
}

impl ColumnStart {
    pub fn resolve(&self) -> Result<ColumnRef, ColumnRefError> {
        match self {
            ColumnStart::Number(n) => ColumnRef::from_number(*n),
            ColumnStart::Text(s) => s.parse(),
        }
    }
}

fn default_header_row() -> usize {
    1
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingConfig {
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Share of the gap to 1.0 granted when one name contains the other as whole words.
    #[serde(default = "default_containment_bonus")]
    pub containment_bonus: f64,
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

fn default_containment_bonus() -> f64 {
    CONTAINMENT_BONUS
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            containment_bonus: CONTAINMENT_BONUS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RowSpecConfig {
    pub label: String,
    /// "7", "4,5,6", "11-14"; a bare TOML integer is accepted too.
    #[serde(deserialize_with = "de_spec")]
    pub spec: String,
}

fn de_spec<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Number(n) => n.to_string(),
        Raw::Text(s) => s,
    })
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub percent_decimals: Option<usize>,
    #[serde(default = "default_true")]
    pub header: bool,
    /// Worksheet name for `--format xlsx`.
    #[serde(default)]
    pub sheet_name: Option<String>,
    /// Citation written beside the table in workbook output.
    #[serde(default)]
    pub source_note: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            percent_decimals: None,
            header: true,
            sheet_name: None,
            source_note: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Validated plan
// ---------------------------------------------------------------------------

/// Immutable, validated input to one extraction run.
#[derive(Debug, Clone)]
pub struct ExtractPlan {
    pub name: String,
    pub kind: GeographyKind,
    pub geographies: Vec<GeographyRequest>,
    pub pattern: ColumnPattern,
    /// 0-based row holding the geography names.
    pub header_row: usize,
    pub threshold: f64,
    pub containment_bonus: f64,
    pub row_specs: Vec<RowSpec>,
    pub percentages: Vec<PercentageRequest>,
    pub ranks: Vec<RankRequest>,
    pub output: OutputOptions,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ExtractConfig {
    pub fn from_toml(input: &str) -> Result<Self, ExtractError> {
        let config: ExtractConfig =
            toml::from_str(input).map_err(|e| ExtractError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Every check that does not depend on externally supplied geography names.
    pub fn validate(&self) -> Result<(), ExtractError> {
        self.compile().map(|_| ())?;

        if self.geography != GeographyKind::State
            && self.geographies_file.is_none()
            && !self.geographies.iter().any(|g| !g.trim().is_empty())
        {
            return Err(ExtractError::ConfigValidation(format!(
                "geography = \"{}\" requires geographies or geographies_file",
                self.geography
            )));
        }

        Ok(())
    }

    /// Build the plan. `extra_names` are appended after inline `geographies`
    /// (typically the contents of `geographies_file`).
    pub fn plan(&self, extra_names: &[String]) -> Result<ExtractPlan, ExtractError> {
        let (pattern, row_specs) = self.compile()?;

        let geographies = match self.geography {
            GeographyKind::State => GeographyRequest::states(),
            kind => GeographyRequest::from_names(
                kind,
                self.geographies.iter().chain(extra_names.iter()),
            ),
        };
        if geographies.is_empty() {
            return Err(ExtractError::ConfigValidation(format!(
                "no {} names to extract",
                self.geography
            )));
        }

        Ok(ExtractPlan {
            name: self.name.clone(),
            kind: self.geography,
            geographies,
            pattern,
            header_row: self.columns.header_row - 1,
            threshold: self.matching.threshold,
            containment_bonus: self.matching.containment_bonus,
            row_specs,
            percentages: self
                .percentages
                .iter()
                .map(|p| PercentageRequest {
                    numerator: p.numerator.trim().to_string(),
                    denominator: p.denominator.trim().to_string(),
                    label: p.label.trim().to_string(),
                })
                .collect(),
            ranks: self
                .ranks
                .iter()
                .map(|r| RankRequest {
                    source: r.source.trim().to_string(),
                    label: r.label.trim().to_string(),
                    order: r.order,
                })
                .collect(),
            output: OutputOptions {
                percent_decimals: self.output.percent_decimals,
                header: self.output.header,
                sheet_name: self.output.sheet_name.clone(),
                source_note: self.output.source_note.clone(),
            },
        })
    }

    fn compile(&self) -> Result<(ColumnPattern, Vec<RowSpec>), ExtractError> {
        let pattern = ColumnPattern::new(
            self.columns.start.resolve()?,
            self.columns.per_block,
            self.columns.target_offset,
        )?;

        if self.columns.header_row == 0 {
            return Err(ExtractError::ConfigValidation(
                "columns.header_row is 1-based and must be at least 1".into(),
            ));
        }

        let threshold = self.matching.threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ExtractError::ConfigValidation(format!(
                "matching.threshold must be between 0 and 1, got {threshold}"
            )));
        }

        // 1.0 would let a contained name tie with an exact one.
        let bonus = self.matching.containment_bonus;
        if !(0.0..1.0).contains(&bonus) {
            return Err(ExtractError::ConfigValidation(format!(
                "matching.containment_bonus must be at least 0 and below 1, got {bonus}"
            )));
        }

        if let Some(name) = &self.output.sheet_name {
            validate_sheet_name(name)?;
        }

        if self.rows.is_empty() {
            return Err(ExtractError::ConfigValidation(
                "at least one [[rows]] entry is required".into(),
            ));
        }

        let mut labels: HashSet<String> = HashSet::new();
        let mut define = |label: &str| -> Result<(), ExtractError> {
            let trimmed = label.trim();
            if trimmed.is_empty() {
                return Err(ExtractError::ConfigValidation("output labels must not be empty".into()));
            }
            if trimmed.eq_ignore_ascii_case(self.geography.column_title()) || !labels.insert(trimmed.to_string()) {
                return Err(ExtractError::DuplicateLabel(trimmed.to_string()));
            }
            Ok(())
        };

        let mut row_specs = Vec::with_capacity(self.rows.len());
        for row in &self.rows {
            let rows = rowspec::parse(&row.spec)
                .map_err(|e| ExtractError::from_row_spec(&row.label, e))?;
            define(&row.label)?;
            row_specs.push(RowSpec { label: row.label.trim().to_string(), rows });
        }

        // References may only point at columns defined earlier.
        let mut known: Vec<&str> = row_specs.iter().map(|r| r.label.as_str()).collect();

        for (i, pct) in self.percentages.iter().enumerate() {
            for (field, label) in [("numerator", &pct.numerator), ("denominator", &pct.denominator)] {
                if !known.contains(&label.trim()) {
                    return Err(ExtractError::UnknownLabel {
                        field: format!("percentages[{i}].{field}"),
                        label: label.clone(),
                    });
                }
            }
            define(&pct.label)?;
            known.push(pct.label.trim());
        }

        for (i, rank) in self.ranks.iter().enumerate() {
            if !known.contains(&rank.source.trim()) {
                return Err(ExtractError::UnknownLabel {
                    field: format!("ranks[{i}].source"),
                    label: rank.source.clone(),
                });
            }
            define(&rank.label)?;
            known.push(rank.label.trim());
        }

        Ok((pattern, row_specs))
    }
}

/// Excel's worksheet naming rules.
fn validate_sheet_name(name: &str) -> Result<(), ExtractError> {
    const FORBIDDEN: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];
    let len = name.chars().count();
    if name.trim().is_empty() || len > 31 || name.contains(FORBIDDEN) || name.starts_with('\'') {
        return Err(ExtractError::ConfigValidation(format!(
            "output.sheet_name '{name}' is not a valid worksheet name (1-31 chars, none of []:*?/\\)"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
