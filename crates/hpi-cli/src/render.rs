use std::collections::BTreeMap;

use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;

use hpi_core::{KpiSummary, Record, RegionSeries, TypePricePoint};

fn pct_or_na(value: Option<f64>) -> String {
    value
        .map(|pct| format!("{pct:+.2}%"))
        .unwrap_or_else(|| "N/A".to_string())
}

fn volume_or_dash(value: Option<i64>) -> String {
    value.map(|volume| volume.to_string()).unwrap_or_else(|| "-".to_string())
}

pub fn kpi_table(summary: &KpiSummary) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        "Latest Avg Price",
        "Sales Volume",
        "MoM Change",
        "Last Updated",
    ]);
    table.add_row(vec![
        format!("£{:.0}", summary.latest_avg_price),
        summary.latest_sales_volume.to_string(),
        pct_or_na(summary.mom_pct_change),
        summary.latest_date.format("%b %Y").to_string(),
    ]);
    table
}

/// One row per series point, regions in order; `last == 0` means all
/// points, otherwise each region shows its most recent `last` points.
pub fn series_table(series: &BTreeMap<String, RegionSeries>, last: usize) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Region", "Date", "Avg Price", "MoM Change", "Sales Volume"]);
    for (region, points) in series {
        let skip = if last == 0 || points.len() <= last {
            0
        } else {
            points.len() - last
        };
        for point in &points[skip..] {
            table.add_row(vec![
                region.clone(),
                point.date.to_string(),
                format!("£{:.0}", point.average_price),
                pct_or_na(point.pct_change),
                volume_or_dash(point.sales_volume),
            ]);
        }
    }
    table
}

pub fn type_table(points: &[TypePricePoint]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Date", "Region", "Property Type", "Price"]);
    for point in points {
        table.add_row(vec![
            point.date.to_string(),
            point.region_name.clone(),
            point.property_type.to_string(),
            format!("£{:.0}", point.price),
        ]);
    }
    table
}

pub fn outlier_table(records: &[&Record]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Date", "Region", "Avg Price"]);
    for record in records {
        table.add_row(vec![
            record.date.to_string(),
            record.region_name.clone(),
            format!("£{:.0}", record.average_price),
        ]);
    }
    table
}
