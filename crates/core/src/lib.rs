//! `acsx-core`: read-only worksheet grid and column addressing.
//!
//! Workbook loaders produce a [`MemGrid`]; the extraction engine only ever
//! sees the [`Grid`] trait.

pub mod cell;
pub mod column;
pub mod grid;

pub use cell::CellValue;
pub use column::{col_to_letters, ColumnRef, ColumnRefError};
pub use grid::{Grid, MemGrid};
