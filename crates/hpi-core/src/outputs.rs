use std::io::Cursor;

use polars::io::parquet::write::{ParquetCompression, ParquetWriter, StatisticsOptions};
use polars::prelude::*;

use crate::error::Result;
use crate::types::FilteredView;

/// Materialize a view as a dataframe for export. Dates are rendered
/// ISO-8601 so the output is self-describing regardless of the day-first
/// convention of the source file.
pub fn view_to_dataframe(view: &FilteredView) -> Result<DataFrame> {
    let len = view.len();
    let mut date = Vec::with_capacity(len);
    let mut region_name = Vec::with_capacity(len);
    let mut average_price = Vec::with_capacity(len);
    let mut sales_volume = Vec::with_capacity(len);
    let mut detached_price = Vec::with_capacity(len);
    let mut semi_detached_price = Vec::with_capacity(len);
    let mut terraced_price = Vec::with_capacity(len);
    let mut flat_price = Vec::with_capacity(len);

    for record in view.records() {
        date.push(record.date.format("%Y-%m-%d").to_string());
        region_name.push(record.region_name.clone());
        average_price.push(record.average_price);
        sales_volume.push(record.sales_volume);
        detached_price.push(record.detached_price);
        semi_detached_price.push(record.semi_detached_price);
        terraced_price.push(record.terraced_price);
        flat_price.push(record.flat_price);
    }

    let df = DataFrame::new(vec![
        Series::new("date".into(), date).into(),
        Series::new("region_name".into(), region_name).into(),
        Series::new("average_price".into(), average_price).into(),
        Series::new("sales_volume".into(), sales_volume).into(),
        Series::new("detached_price".into(), detached_price).into(),
        Series::new("semi_detached_price".into(), semi_detached_price).into(),
        Series::new("terraced_price".into(), terraced_price).into(),
        Series::new("flat_price".into(), flat_price).into(),
    ])?;

    Ok(df)
}

pub fn write_csv_bytes(view: &FilteredView) -> Result<Vec<u8>> {
    let mut df = view_to_dataframe(view)?;
    let mut buffer = Vec::new();
    CsvWriter::new(&mut buffer).finish(&mut df)?;
    Ok(buffer)
}

pub fn write_parquet_bytes(view: &FilteredView) -> Result<Vec<u8>> {
    let mut df = view_to_dataframe(view)?;
    let mut buffer = Vec::new();
    {
        let mut cursor = Cursor::new(&mut buffer);
        ParquetWriter::new(&mut cursor)
            .with_compression(ParquetCompression::Zstd(None))
            .with_statistics(StatisticsOptions::default())
            .finish(&mut df)?;
    }
    Ok(buffer)
}
