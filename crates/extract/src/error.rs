use acsx_core::ColumnRefError;

use crate::rowspec::RowSpecError;

/// Configuration errors. Any of these halts a run before extraction starts;
/// per-geography and per-cell anomalies are [`crate::Warning`]s instead.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// TOML parse / deserialization error.
    #[error("config parse error: {0}")]
    ConfigParse(String),

    /// Config validation error (missing rows, empty geography list, etc.).
    #[error("config validation error: {0}")]
    ConfigValidation(String),

    #[error("row spec '{label}': invalid token '{token}' (expected N or A-B with A <= B)")]
    InvalidRowSpec { label: String, token: String },

    #[error("row spec '{label}': spec is empty")]
    EmptyRowSpec { label: String },

    #[error(
        "invalid column pattern: target_offset {target_offset} must be between 1 and per_block {block_width}"
    )]
    InvalidColumnPattern { block_width: usize, target_offset: usize },

    #[error("columns.start: {0}")]
    InvalidColumnRef(#[from] ColumnRefError),

    /// Two output columns share a label.
    #[error("duplicate output label '{0}'")]
    DuplicateLabel(String),

    /// A percentage or rank references a label that is not defined before it.
    #[error("{field}: unknown label '{label}'")]
    UnknownLabel { field: String, label: String },
}

impl ExtractError {
    /// Attach the owning row-spec label to a parser error.
    pub fn from_row_spec(label: &str, err: RowSpecError) -> Self {
        match err {
            RowSpecError::Empty => ExtractError::EmptyRowSpec { label: label.to_string() },
            RowSpecError::InvalidToken(token) => ExtractError::InvalidRowSpec {
                label: label.to_string(),
                token,
            },
        }
    }
}
