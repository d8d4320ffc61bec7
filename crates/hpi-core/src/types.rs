use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use hpi_parser::{Dataset, PropertyType, Record};

/// What the caller's widgets selected. All bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub regions: BTreeSet<String>,
    pub property_types: BTreeSet<PropertyType>,
    pub date_range: (NaiveDate, NaiveDate),
    pub price_range: (f64, f64),
}

impl FilterSpec {
    /// The identity spec for a dataset: every region, every property type,
    /// the full date and price span. Filtering with it returns the dataset
    /// unchanged.
    pub fn unbounded(dataset: &Dataset) -> Self {
        Self {
            regions: dataset.regions().into_iter().collect(),
            property_types: PropertyType::ALL.into_iter().collect(),
            date_range: dataset
                .date_span()
                .unwrap_or((NaiveDate::MIN, NaiveDate::MAX)),
            price_range: dataset.price_span().unwrap_or((f64::MIN, f64::MAX)),
        }
    }
}

/// Subset of a dataset satisfying a [`FilterSpec`], in ascending date
/// order. An empty view is an expected state (overly narrow filters), not
/// an error; the KPI computation is the only consumer that refuses it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredView {
    records: Vec<Record>,
}

impl FilteredView {
    pub(crate) fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// One point of a per-region series. `pct_change` is `None` on the first
/// point of a region and wherever the prior price would divide by zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub average_price: f64,
    pub sales_volume: Option<i64>,
    pub pct_change: Option<f64>,
}

pub type RegionSeries = Vec<SeriesPoint>;

/// Latest-month headline figures for a filtered view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiSummary {
    pub latest_date: NaiveDate,
    pub latest_avg_price: f64,
    pub latest_sales_volume: i64,
    pub mom_pct_change: Option<f64>,
}

/// IQR fence report over a view's average prices. The full outlier set is
/// exposed; display truncation is the caller's call via [`top_by_date`].
///
/// [`top_by_date`]: OutlierReport::top_by_date
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OutlierReport {
    pub q1: Option<f64>,
    pub q3: Option<f64>,
    pub lower_fence: Option<f64>,
    pub upper_fence: Option<f64>,
    pub outliers: Vec<Record>,
}

impl OutlierReport {
    pub fn is_empty(&self) -> bool {
        self.outliers.is_empty()
    }

    /// The `n` most recent outliers, date descending.
    pub fn top_by_date(&self, n: usize) -> Vec<&Record> {
        let mut sorted: Vec<&Record> = self.outliers.iter().collect();
        sorted.sort_by(|a, b| b.date.cmp(&a.date));
        sorted.truncate(n);
        sorted
    }
}

/// Long-format point for the per-type price views: one point per record
/// per selected property type, blank prices skipped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypePricePoint {
    pub date: NaiveDate,
    pub region_name: String,
    pub property_type: PropertyType,
    pub price: f64,
}
