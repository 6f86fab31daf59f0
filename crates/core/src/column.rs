//! Column references.
//!
//! Configuration names a column either by spreadsheet letters (`"B"`, `"AA"`)
//! or by a 1-based number (`2`, `"2"`). Internally everything is a 0-based index.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

/// Excel's last column (XFD).
pub const MAX_COLUMN: usize = 16_384;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColumnRefError {
    #[error("empty column reference")]
    Empty,
    #[error("invalid column reference '{0}' (expected letters like \"B\" or a 1-based number)")]
    Invalid(String),
    #[error("column number must be at least 1, got {0}")]
    Zero(String),
    #[error("column reference '{0}' is beyond the last spreadsheet column")]
    TooLarge(String),
}

/// A resolved column, stored as a 0-based index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnRef(usize);

impl ColumnRef {
    /// From a 0-based index.
    #[inline]
    pub fn from_index(index: usize) -> Self {
        Self(index)
    }

    /// From a 1-based column number.
    pub fn from_number(number: u64) -> Result<Self, ColumnRefError> {
        if number == 0 {
            return Err(ColumnRefError::Zero(number.to_string()));
        }
        if number > MAX_COLUMN as u64 {
            return Err(ColumnRefError::TooLarge(number.to_string()));
        }
        Ok(Self(number as usize - 1))
    }

    /// 0-based index.
    #[inline]
    pub fn index(&self) -> usize {
        self.0
    }

    /// Spreadsheet letters (0 -> "A").
    pub fn letters(&self) -> String {
        col_to_letters(self.0)
    }
}

impl FromStr for ColumnRef {
    type Err = ColumnRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ColumnRefError::Empty);
        }

        if s.chars().all(|c| c.is_ascii_digit()) {
            let number: u64 = s
                .parse()
                .map_err(|_| ColumnRefError::TooLarge(s.to_string()))?;
            return Self::from_number(number);
        }

        if !s.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ColumnRefError::Invalid(s.to_string()));
        }

        let mut col = 0usize;
        for c in s.chars() {
            col = col * 26 + (c.to_ascii_uppercase() as usize - 'A' as usize + 1);
            if col > MAX_COLUMN {
                return Err(ColumnRefError::TooLarge(s.to_string()));
            }
        }
        Ok(Self(col - 1))
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letters())
    }
}

impl Serialize for ColumnRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.letters())
    }
}

/// Convert 0-based column index to Excel-style letter(s).
pub fn col_to_letters(col: usize) -> String {
    let mut result = String::new();
    let mut n = col;
    loop {
        result.insert(0, (b'A' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    result
}
