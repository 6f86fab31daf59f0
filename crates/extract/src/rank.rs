//! Rank columns: standard competition ranking ("1224") over the non-missing
//! values of a source column. Rows keep their order; only a column is added.

use std::cmp::Ordering;

use crate::model::{ExtractedRow, RankOrder, RankRequest};

/// Rank `values`; missing inputs get a missing rank.
pub fn competition_ranks(values: &[Option<f64>], order: RankOrder) -> Vec<Option<f64>> {
    let mut present: Vec<(usize, f64)> = values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|v| (i, v)))
        .collect();

    let cmp = |a: &f64, b: &f64| -> Ordering {
        match order {
            RankOrder::Descending => b.total_cmp(a),
            RankOrder::Ascending => a.total_cmp(b),
        }
    };
    // Stable: equal values keep input order.
    present.sort_by(|(_, a), (_, b)| cmp(a, b));

    let mut ranks = vec![None; values.len()];
    let mut prev: Option<f64> = None;
    let mut current_rank = 0usize;
    for (pos, (idx, value)) in present.iter().enumerate() {
        if prev != Some(*value) {
            current_rank = pos + 1;
            prev = Some(*value);
        }
        ranks[*idx] = Some(current_rank as f64);
    }
    ranks
}

/// Append one rank column per request, in request order.
pub fn derive(rows: &mut [ExtractedRow], requests: &[RankRequest]) {
    for request in requests {
        let values: Vec<Option<f64>> = rows.iter().map(|r| r.value(&request.source)).collect();
        let ranks = competition_ranks(&values, request.order);
        for (row, rank) in rows.iter_mut().zip(ranks) {
            row.values.insert(request.label.clone(), rank);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descending_by_default() {
        let ranks = competition_ranks(&[Some(10.0), Some(30.0), Some(20.0)], RankOrder::default());
        assert_eq!(ranks, vec![Some(3.0), Some(1.0), Some(2.0)]);
    }

    #[test]
    fn ascending() {
        let ranks = competition_ranks(&[Some(10.0), Some(30.0), Some(20.0)], RankOrder::Ascending);
        assert_eq!(ranks, vec![Some(1.0), Some(3.0), Some(2.0)]);
    }

    #[test]
    fn ties_share_rank_and_skip() {
        let ranks = competition_ranks(
            &[Some(5.0), Some(9.0), Some(9.0), Some(1.0)],
            RankOrder::Descending,
        );
        assert_eq!(ranks, vec![Some(3.0), Some(1.0), Some(1.0), Some(4.0)]);
    }

    #[test]
    fn missing_values_are_unranked() {
        let ranks = competition_ranks(&[None, Some(2.0), None, Some(4.0)], RankOrder::Descending);
        assert_eq!(ranks, vec![None, Some(2.0), None, Some(1.0)]);
    }

    #[test]
    fn empty_input() {
        assert!(competition_ranks(&[], RankOrder::Descending).is_empty());
    }
}
