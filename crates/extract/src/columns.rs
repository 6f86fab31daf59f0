use acsx_core::ColumnRef;
use serde::Serialize;

use crate::error::ExtractError;

/// Repeating column-block layout: every geography occupies `block_width`
/// adjacent columns starting at `start + k * block_width`, and the value to
/// extract sits at 1-based `target_offset` within each block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnPattern {
    pub start: ColumnRef,
    pub block_width: usize,
    pub target_offset: usize,
}

impl ColumnPattern {
    pub fn new(start: ColumnRef, block_width: usize, target_offset: usize) -> Result<Self, ExtractError> {
        if block_width == 0 || target_offset == 0 || target_offset > block_width {
            return Err(ExtractError::InvalidColumnPattern { block_width, target_offset });
        }
        Ok(Self { start, block_width, target_offset })
    }

    /// Every column that could start a block within a header of `width` columns.
    pub fn block_starts(&self, width: usize) -> impl Iterator<Item = usize> {
        (self.start.index()..width).step_by(self.block_width)
    }

    /// Whether `col` lies on a block boundary.
    pub fn is_block_start(&self, col: usize) -> bool {
        col >= self.start.index() && (col - self.start.index()) % self.block_width == 0
    }

    /// Absolute 0-based column of the target field in the block starting at
    /// `block_start`. Grid bounds are checked by the engine, which owns them.
    pub fn resolve_column(&self, block_start: usize) -> usize {
        block_start + (self.target_offset - 1)
    }
}
