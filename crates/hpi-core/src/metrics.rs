use std::collections::BTreeMap;

use chrono::Months;

use hpi_parser::Record;

use crate::error::{PipelineError, Result};
use crate::types::{FilterSpec, FilteredView, KpiSummary, RegionSeries, SeriesPoint, TypePricePoint};

/// Group a view by region and derive each region's price series with
/// month-over-month percent change. The first point of every region has
/// `pct_change = None`; so does any point whose prior price is zero.
pub fn compute_region_series(view: &FilteredView) -> BTreeMap<String, RegionSeries> {
    let mut grouped: BTreeMap<&str, Vec<&Record>> = BTreeMap::new();
    for record in view.records() {
        grouped
            .entry(record.region_name.as_str())
            .or_default()
            .push(record);
    }

    let mut series_by_region = BTreeMap::new();
    for (region, mut records) in grouped {
        records.sort_by_key(|record| record.date);

        let mut series = Vec::with_capacity(records.len());
        let mut prior_price: Option<f64> = None;
        for record in records {
            let pct_change = prior_price
                .filter(|prior| *prior != 0.0)
                .map(|prior| (record.average_price - prior) / prior * 100.0);
            series.push(SeriesPoint {
                date: record.date,
                average_price: record.average_price,
                sales_volume: record.sales_volume,
                pct_change,
            });
            prior_price = Some(record.average_price);
        }
        series_by_region.insert(region.to_string(), series);
    }

    series_by_region
}

/// Headline figures at the view's latest date, with month-over-month
/// change against the records exactly one calendar month prior. The
/// subtraction clamps at month ends (Mar 31 reaches back to Feb 28/29),
/// and a prior month with no records yields `mom_pct_change = None`.
pub fn compute_kpis(view: &FilteredView) -> Result<KpiSummary> {
    let records = view.records();
    let latest_date = records
        .iter()
        .map(|record| record.date)
        .max()
        .ok_or(PipelineError::EmptyView)?;

    let latest: Vec<&Record> = records
        .iter()
        .filter(|record| record.date == latest_date)
        .collect();
    let latest_avg_price =
        latest.iter().map(|record| record.average_price).sum::<f64>() / latest.len() as f64;
    let latest_sales_volume = latest
        .iter()
        .filter_map(|record| record.sales_volume)
        .sum::<i64>();

    let mom_pct_change = latest_date
        .checked_sub_months(Months::new(1))
        .and_then(|prior_date| {
            let prior: Vec<f64> = records
                .iter()
                .filter(|record| record.date == prior_date)
                .map(|record| record.average_price)
                .collect();
            if prior.is_empty() {
                return None;
            }
            let prior_avg = prior.iter().sum::<f64>() / prior.len() as f64;
            (prior_avg != 0.0).then(|| (latest_avg_price - prior_avg) / prior_avg * 100.0)
        });

    Ok(KpiSummary {
        latest_date,
        latest_avg_price,
        latest_sales_volume,
        mom_pct_change,
    })
}

/// Melt the per-type price columns into long format, one point per record
/// per property type selected in the spec. Blank prices are skipped.
pub fn compute_type_series(view: &FilteredView, spec: &FilterSpec) -> Vec<TypePricePoint> {
    let mut points = Vec::new();
    for record in view.records() {
        for property_type in &spec.property_types {
            if let Some(price) = record.type_price(*property_type) {
                points.push(TypePricePoint {
                    date: record.date,
                    region_name: record.region_name.clone(),
                    property_type: *property_type,
                    price,
                });
            }
        }
    }
    points
}
