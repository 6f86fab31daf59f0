//! `acsx-extract`: Extraction engine for block-layout survey workbooks.
//!
//! Pure engine crate: receives a pre-loaded grid, returns an extracted table
//! plus accumulated warnings. No file IO.

pub mod columns;
pub mod config;
pub mod engine;
pub mod error;
pub mod fuzzy;
pub mod geography;
pub mod model;
pub mod output;
pub mod percentage;
pub mod rank;
pub mod rowspec;
pub mod states;
pub mod summary;

pub use columns::ColumnPattern;
pub use config::{ExtractConfig, ExtractPlan};
pub use engine::{extract, run};
pub use error::ExtractError;
pub use geography::{GeographyKind, GeographyMatcher, GeographyRequest, MatchResult};
pub use model::{Extraction, ExtractedRow, RowSpec, Warning, WarningReason};
pub use output::{render, OutputMode};
