use crate::cell::CellValue;

static EMPTY: CellValue = CellValue::Empty;

/// Read-only view of one worksheet. Rows and columns are 0-based.
pub trait Grid {
    /// Number of rows in the used extent.
    fn row_count(&self) -> usize;

    /// Number of columns in the used extent.
    fn col_count(&self) -> usize;

    /// Cell at (row, col), or `None` when outside the extent.
    fn cell(&self, row: usize, col: usize) -> Option<&CellValue>;

    /// Display text of every cell in `row`, padded to `col_count`.
    fn row_text(&self, row: usize) -> Vec<String> {
        (0..self.col_count())
            .map(|col| self.cell(row, col).map(CellValue::display).unwrap_or_default())
            .collect()
    }
}

/// Dense in-memory grid. Ragged input rows are padded with `Empty`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemGrid {
    cells: Vec<Vec<CellValue>>,
    cols: usize,
}

impl MemGrid {
    pub fn new(rows: Vec<Vec<CellValue>>) -> Self {
        let cols = rows.iter().map(Vec::len).max().unwrap_or(0);
        let cells = rows
            .into_iter()
            .map(|mut row| {
                row.resize(cols, CellValue::Empty);
                row
            })
            .collect();
        Self { cells, cols }
    }

    /// Build from raw text, classifying each cell with [`CellValue::from_input`].
    pub fn from_text_rows<R, S>(rows: R) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rows: Vec<Vec<CellValue>> = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|s| CellValue::from_input(s.as_ref()))
                    .collect::<Vec<_>>()
            })
            .collect();
        Self::new(rows)
    }

    /// Sparse construction: every (row, col, value) is placed into a grid
    /// sized to the largest coordinate seen.
    pub fn from_cells(cells: impl IntoIterator<Item = (usize, usize, CellValue)>) -> Self {
        let mut rows: Vec<Vec<CellValue>> = Vec::new();
        for (row, col, value) in cells {
            if rows.len() <= row {
                rows.resize_with(row + 1, Vec::new);
            }
            let r = &mut rows[row];
            if r.len() <= col {
                r.resize(col + 1, CellValue::Empty);
            }
            r[col] = value;
        }
        Self::new(rows)
    }
}

impl Grid for MemGrid {
    fn row_count(&self) -> usize {
        self.cells.len()
    }

    fn col_count(&self) -> usize {
        self.cols
    }

    fn cell(&self, row: usize, col: usize) -> Option<&CellValue> {
        if col >= self.cols {
            return None;
        }
        self.cells.get(row).map(|r| r.get(col).unwrap_or(&EMPTY))
    }
}
