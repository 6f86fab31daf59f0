//! Row specification parsing.
//!
//! A spec is a comma-separated list of tokens, each either a bare 1-based row
//! number (`7`) or an inclusive ascending range (`11-14`). Rows are kept in
//! encounter order and repeats are preserved: every listed row is summed once
//! per occurrence.

/// Excel's last row. Larger row numbers can never address a cell.
pub const MAX_ROW: usize = 1_048_576;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RowSpecError {
    #[error("row spec is empty")]
    Empty,
    #[error("invalid row spec token '{0}'")]
    InvalidToken(String),
}

/// Parse a row spec into the ordered list of 1-based source rows to sum.
pub fn parse(spec: &str) -> Result<Vec<usize>, RowSpecError> {
    let spec = spec.trim();
    if spec.is_empty() {
        return Err(RowSpecError::Empty);
    }

    let mut rows = Vec::new();
    for raw in spec.split(',') {
        let token = raw.trim();
        match token.split_once('-') {
            None => rows.push(parse_row(token)?),
            Some((a, b)) => {
                let start = parse_row(a.trim()).map_err(|_| invalid(token))?;
                let end = parse_row(b.trim()).map_err(|_| invalid(token))?;
                if start > end {
                    return Err(invalid(token));
                }
                rows.extend(start..=end);
            }
        }
    }

    Ok(rows)
}

fn parse_row(token: &str) -> Result<usize, RowSpecError> {
    if token.is_empty() || !token.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid(token));
    }
    match token.parse::<usize>() {
        Ok(n) if (1..=MAX_ROW).contains(&n) => Ok(n),
        _ => Err(invalid(token)),
    }
}

fn invalid(token: &str) -> RowSpecError {
    RowSpecError::InvalidToken(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_row() {
        assert_eq!(parse("7").unwrap(), vec![7]);
        assert_eq!(parse("  7 ").unwrap(), vec![7]);
    }

    #[test]
    fn comma_joined_rows() {
        assert_eq!(parse("4,5,6").unwrap(), vec![4, 5, 6]);
        assert_eq!(parse("4, 9 ,2").unwrap(), vec![4, 9, 2]);
    }

    #[test]
    fn inclusive_range() {
        assert_eq!(parse("11-14").unwrap(), vec![11, 12, 13, 14]);
        assert_eq!(parse("3-3").unwrap(), vec![3]);
        assert_eq!(parse("2 - 4").unwrap(), vec![2, 3, 4]);
    }

    #[test]
    fn mixed_tokens_keep_encounter_order() {
        assert_eq!(parse("20,4-6,2").unwrap(), vec![20, 4, 5, 6, 2]);
    }

    #[test]
    fn repeats_are_preserved() {
        assert_eq!(parse("5,5").unwrap(), vec![5, 5]);
        assert_eq!(parse("4-6,5").unwrap(), vec![4, 5, 6, 5]);
    }

    #[test]
    fn empty_spec() {
        assert_eq!(parse(""), Err(RowSpecError::Empty));
        assert_eq!(parse("   "), Err(RowSpecError::Empty));
    }

    #[test]
    fn malformed_specs_name_the_token() {
        assert_eq!(parse("4-"), Err(RowSpecError::InvalidToken("4-".into())));
        assert_eq!(parse("b-2"), Err(RowSpecError::InvalidToken("b-2".into())));
        assert_eq!(parse("5-2"), Err(RowSpecError::InvalidToken("5-2".into())));
        assert_eq!(parse("4,,5"), Err(RowSpecError::InvalidToken("".into())));
        assert_eq!(parse("1-2-3"), Err(RowSpecError::InvalidToken("1-2-3".into())));
        assert_eq!(parse("0"), Err(RowSpecError::InvalidToken("0".into())));
        assert_eq!(parse("+3"), Err(RowSpecError::InvalidToken("+3".into())));
        assert_eq!(parse("2.5"), Err(RowSpecError::InvalidToken("2.5".into())));
        assert_eq!(
            parse("1-1048577"),
            Err(RowSpecError::InvalidToken("1-1048577".into()))
        );
    }

    #[test]
    fn malformed_token_anywhere_fails_whole_spec() {
        assert_eq!(parse("2,3,x"), Err(RowSpecError::InvalidToken("x".into())));
    }
}
