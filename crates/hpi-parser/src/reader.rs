use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;

use crate::errors::LoadError;
use crate::model::{Dataset, LoadOutcome, LoadSummary, Record};

pub const REQUIRED_COLUMNS: [&str; 8] = [
    "Date",
    "RegionName",
    "AveragePrice",
    "SalesVolume",
    "DetachedPrice",
    "SemiDetachedPrice",
    "TerracedPrice",
    "FlatPrice",
];

// Day-first per the HPI publication; ISO accepted as a fallback for
// re-exported files.
static DATE_FORMATS: &[&str] = &["%d/%m/%Y", "%d-%m-%Y", "%d/%m/%y", "%Y-%m-%d"];

#[derive(Debug, Clone, Copy)]
struct ColumnIndexes {
    date: usize,
    region_name: usize,
    average_price: usize,
    sales_volume: usize,
    detached_price: usize,
    semi_detached_price: usize,
    terraced_price: usize,
    flat_price: usize,
}

impl ColumnIndexes {
    /// Header lookup is by name: the published file carries dozens of
    /// columns beyond the ones this pipeline reads, in no fixed order.
    fn resolve(header: &StringRecord) -> Result<Self, LoadError> {
        let find = |name: &str| {
            header
                .iter()
                .position(|column| column.trim().eq_ignore_ascii_case(name))
        };

        let mut missing = Vec::new();
        let mut require = |name: &'static str| match find(name) {
            Some(index) => index,
            None => {
                missing.push(name.to_string());
                usize::MAX
            }
        };

        let indexes = ColumnIndexes {
            date: require("Date"),
            region_name: require("RegionName"),
            average_price: require("AveragePrice"),
            sales_volume: require("SalesVolume"),
            detached_price: require("DetachedPrice"),
            semi_detached_price: require("SemiDetachedPrice"),
            terraced_price: require("TerracedPrice"),
            flat_price: require("FlatPrice"),
        };

        if missing.is_empty() {
            Ok(indexes)
        } else {
            Err(LoadError::MissingColumns { missing })
        }
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }
    None
}

fn parse_required_f64(value: &str) -> Option<f64> {
    let parsed: f64 = value.trim().parse().ok()?;
    parsed.is_finite().then_some(parsed)
}

fn parse_optional_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("na") || trimmed.eq_ignore_ascii_case("nan")
    {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|parsed| parsed.is_finite())
}

fn parse_optional_i64(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("na") || trimmed.eq_ignore_ascii_case("nan")
    {
        return None;
    }
    trimmed.parse().ok()
}

/// Parse HPI CSV content from any reader into a date-sorted [`Dataset`].
///
/// Rows whose `Date` or `AveragePrice` cell fails to parse are dropped and
/// counted in the returned [`LoadSummary`]; a malformed header or an input
/// with no surviving rows is an error.
pub fn parse_records(reader: impl Read) -> Result<LoadOutcome, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let header = csv_reader.headers()?.clone();
    let columns = ColumnIndexes::resolve(&header)?;

    let mut records = Vec::new();
    let mut rows_dropped = 0usize;

    for row in csv_reader.records() {
        let row = row?;
        let field = |index: usize| row.get(index).unwrap_or("");

        let Some(date) = parse_date(field(columns.date)) else {
            rows_dropped += 1;
            continue;
        };
        let Some(average_price) = parse_required_f64(field(columns.average_price)) else {
            rows_dropped += 1;
            continue;
        };

        records.push(Record {
            date,
            region_name: field(columns.region_name).trim().to_string(),
            average_price,
            sales_volume: parse_optional_i64(field(columns.sales_volume)),
            detached_price: parse_optional_f64(field(columns.detached_price)),
            semi_detached_price: parse_optional_f64(field(columns.semi_detached_price)),
            terraced_price: parse_optional_f64(field(columns.terraced_price)),
            flat_price: parse_optional_f64(field(columns.flat_price)),
        });
    }

    if records.is_empty() {
        return Err(LoadError::EmptyData);
    }

    let summary = LoadSummary {
        rows_loaded: records.len(),
        rows_dropped,
    };

    Ok(LoadOutcome {
        dataset: Dataset::from_records(records),
        summary,
    })
}

/// Load a dataset from disk. Path resolution (full file vs. sample
/// fallback) belongs to the caller; this only checks that the given path
/// exists so a missing file surfaces as [`LoadError::SourceNotFound`]
/// rather than a bare I/O error.
pub fn load_dataset(path: impl AsRef<Path>) -> Result<LoadOutcome, LoadError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(LoadError::SourceNotFound {
            path: path.to_path_buf(),
        });
    }
    let file = File::open(path)?;
    parse_records(file)
}
