use chrono::NaiveDate;

use hpi_core::{
    apply_filters, compute_kpis, compute_region_series, compute_type_series, Dataset, FilterSpec,
    PipelineError, PropertyType, Record,
};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn record(date: NaiveDate, region: &str, price: f64) -> Record {
    Record {
        date,
        region_name: region.to_string(),
        average_price: price,
        sales_volume: None,
        detached_price: None,
        semi_detached_price: None,
        terraced_price: None,
        flat_price: None,
    }
}

fn view_of(records: Vec<Record>) -> (Dataset, hpi_core::FilteredView) {
    let dataset = Dataset::from_records(records);
    let spec = FilterSpec::unbounded(&dataset);
    let view = apply_filters(&dataset, &spec);
    (dataset, view)
}

#[test]
fn single_point_region_has_no_pct_change() {
    let (_, view) = view_of(vec![record(date(2024, 1, 1), "London", 520_000.0)]);

    let series = compute_region_series(&view);

    let london = &series["London"];
    assert_eq!(london.len(), 1);
    assert_eq!(london[0].pct_change, None);
}

#[test]
fn pct_change_is_relative_to_the_prior_point() {
    let (_, view) = view_of(vec![
        record(date(2024, 1, 1), "London", 100.0),
        record(date(2024, 2, 1), "London", 110.0),
        record(date(2024, 3, 1), "London", 99.0),
    ]);

    let series = compute_region_series(&view);
    let london = &series["London"];

    assert_eq!(london[0].pct_change, None);
    assert!((london[1].pct_change.unwrap() - 10.0).abs() < 1e-9);
    assert!((london[2].pct_change.unwrap() - -10.0).abs() < 1e-9);
}

#[test]
fn regions_do_not_bleed_into_each_other() {
    let (_, view) = view_of(vec![
        record(date(2024, 1, 1), "London", 100.0),
        record(date(2024, 2, 1), "London", 110.0),
        record(date(2024, 2, 1), "South East", 200.0),
    ]);

    let series = compute_region_series(&view);

    // The South East point must not chain off London's prices.
    assert_eq!(series["South East"][0].pct_change, None);
}

#[test]
fn zero_prior_price_is_not_available_not_infinity() {
    let (_, view) = view_of(vec![
        record(date(2024, 1, 1), "London", 0.0),
        record(date(2024, 2, 1), "London", 100.0),
    ]);

    let series = compute_region_series(&view);

    assert_eq!(series["London"][1].pct_change, None);
}

#[test]
fn kpi_mom_change_against_exact_calendar_month() {
    let (_, view) = view_of(vec![
        record(date(2023, 12, 31), "London", 90.0),
        record(date(2024, 1, 31), "London", 100.0),
    ]);

    let summary = compute_kpis(&view).unwrap();

    assert_eq!(summary.latest_date, date(2024, 1, 31));
    let pct = summary.mom_pct_change.expect("prior month present");
    assert!((pct - 11.11).abs() < 0.01);
}

#[test]
fn kpi_month_subtraction_clamps_at_month_end() {
    // Mar 31 has no Feb 31; the comparison period is Feb 28 in a non-leap
    // year, not "31 days earlier".
    let (_, view) = view_of(vec![
        record(date(2023, 2, 28), "London", 200.0),
        record(date(2023, 3, 31), "London", 210.0),
    ]);

    let summary = compute_kpis(&view).unwrap();

    assert!((summary.mom_pct_change.unwrap() - 5.0).abs() < 1e-9);
}

#[test]
fn kpi_averages_prices_and_sums_volume_at_latest_date() {
    let mut with_volume = record(date(2024, 2, 1), "London", 100.0);
    with_volume.sales_volume = Some(5);
    let mut without_volume = record(date(2024, 2, 1), "South East", 300.0);
    without_volume.sales_volume = None;

    let (_, view) = view_of(vec![
        record(date(2024, 1, 1), "London", 80.0),
        with_volume,
        without_volume,
    ]);

    let summary = compute_kpis(&view).unwrap();

    assert_eq!(summary.latest_date, date(2024, 2, 1));
    assert!((summary.latest_avg_price - 200.0).abs() < 1e-9);
    assert_eq!(summary.latest_sales_volume, 5);
}

#[test]
fn kpi_mom_is_not_available_without_prior_records() {
    let (_, view) = view_of(vec![record(date(2024, 1, 1), "London", 100.0)]);

    let summary = compute_kpis(&view).unwrap();

    assert_eq!(summary.mom_pct_change, None);
}

#[test]
fn kpi_on_empty_view_is_an_explicit_error() {
    let dataset = Dataset::from_records(vec![record(date(2024, 1, 1), "London", 100.0)]);
    let mut spec = FilterSpec::unbounded(&dataset);
    spec.regions.clear();
    let view = apply_filters(&dataset, &spec);

    assert!(view.is_empty());
    assert!(matches!(
        compute_kpis(&view),
        Err(PipelineError::EmptyView)
    ));
}

#[test]
fn type_series_melts_selected_types_and_skips_blanks() {
    let mut with_types = record(date(2024, 1, 1), "London", 520_000.0);
    with_types.detached_price = Some(1_040_000.0);
    with_types.flat_price = Some(438_000.0);
    with_types.terraced_price = None;

    let (dataset, view) = view_of(vec![with_types]);
    let mut spec = FilterSpec::unbounded(&dataset);
    spec.property_types = [PropertyType::Detached, PropertyType::Terraced, PropertyType::Flat]
        .into_iter()
        .collect();

    let points = compute_type_series(&view, &spec);

    assert_eq!(points.len(), 2);
    assert_eq!(points[0].property_type, PropertyType::Detached);
    assert_eq!(points[0].price, 1_040_000.0);
    assert_eq!(points[1].property_type, PropertyType::Flat);
    assert_eq!(points[1].price, 438_000.0);
}
