use crate::model::{ExtractedRow, PercentageRequest};

/// `numerator / denominator * 100`, or missing when either operand is
/// missing or the denominator is zero. Never an error.
pub fn percentage(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    match (numerator, denominator) {
        (Some(n), Some(d)) if d != 0.0 => {
            let pct = n / d * 100.0;
            pct.is_finite().then_some(pct)
        }
        _ => None,
    }
}

/// Append one percentage value per request to every row, in request order.
pub fn derive(rows: &mut [ExtractedRow], requests: &[PercentageRequest]) {
    for request in requests {
        for row in rows.iter_mut() {
            let value = percentage(row.value(&request.numerator), row.value(&request.denominator));
            row.values.insert(request.label.clone(), value);
        }
    }
}
