use hpi_parser::Record;

use crate::types::{FilteredView, OutlierReport};

/// Percentile by linear interpolation between closest ranks over an
/// ascending-sorted slice: `pos = (n - 1) * q`, interpolating between the
/// neighbouring ranks when `pos` is fractional.
fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = (sorted.len() - 1) as f64 * q;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    if lower == upper {
        return Some(sorted[lower]);
    }
    let weight = pos - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}

/// Flag records whose average price falls strictly outside
/// `[Q1 - 1.5*IQR, Q3 + 1.5*IQR]`. An empty view yields an empty report
/// with no fences, never an error.
pub fn compute_outliers(view: &FilteredView) -> OutlierReport {
    let mut prices: Vec<f64> = view
        .records()
        .iter()
        .map(|record| record.average_price)
        .collect();
    prices.sort_by(f64::total_cmp);

    let (Some(q1), Some(q3)) = (quantile(&prices, 0.25), quantile(&prices, 0.75)) else {
        return OutlierReport::default();
    };

    let iqr = q3 - q1;
    let lower_fence = q1 - 1.5 * iqr;
    let upper_fence = q3 + 1.5 * iqr;

    let outliers: Vec<Record> = view
        .records()
        .iter()
        .filter(|record| record.average_price < lower_fence || record.average_price > upper_fence)
        .cloned()
        .collect();

    OutlierReport {
        q1: Some(q1),
        q3: Some(q3),
        lower_fence: Some(lower_fence),
        upper_fence: Some(upper_fence),
        outliers,
    }
}
