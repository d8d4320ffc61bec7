use hpi_parser::Dataset;

use crate::types::{FilterSpec, FilteredView};

/// Retain records matching the spec's region set, date range, and average
/// price range (bounds inclusive both ends). Property types do not gate
/// row retention: every record carries all four type prices, and the type
/// selection is consumed by the type-series derivation instead.
///
/// Pure with respect to its inputs; the dataset is never modified and an
/// empty result is a valid view.
pub fn apply_filters(dataset: &Dataset, spec: &FilterSpec) -> FilteredView {
    let (start, end) = spec.date_range;
    let (min_price, max_price) = spec.price_range;

    let records = dataset
        .records()
        .iter()
        .filter(|record| spec.regions.contains(record.region_name.as_str()))
        .filter(|record| record.date >= start && record.date <= end)
        .filter(|record| record.average_price >= min_price && record.average_price <= max_price)
        .cloned()
        .collect();

    FilteredView::new(records)
}
