//! CLI Exit Code Registry
//!
//! Single source of truth for `acsx` exit codes. Scripts rely on these.
//!
//! | Code | Meaning                                              |
//! |------|------------------------------------------------------|
//! | 0    | Success                                              |
//! | 1    | General error (output could not be written, etc.)    |
//! | 2    | Usage error (bad arguments, no input file)           |
//! | 3    | Invalid configuration                                |
//! | 4    | Input could not be loaded (workbook, CSV, names file)|
//! | 5    | Extraction finished with warnings under `--strict`   |
//!
//! Warnings never fail a run unless `--strict` is passed; the table is
//! still written before exiting with 5.

/// Success - command completed.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required input.
pub const EXIT_USAGE: u8 = 2;

/// Config file unreadable, malformed, or failed validation.
pub const EXIT_INVALID_CONFIG: u8 = 3;

/// Workbook, sheet, CSV, or names file could not be loaded.
pub const EXIT_LOAD: u8 = 4;

/// `--strict` and at least one warning was recorded.
pub const EXIT_WARNINGS: u8 = 5;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct() {
        let codes = [EXIT_SUCCESS, EXIT_ERROR, EXIT_USAGE, EXIT_INVALID_CONFIG, EXIT_LOAD, EXIT_WARNINGS];
        let mut sorted = codes.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), codes.len());
    }
}
