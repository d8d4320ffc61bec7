pub mod error;
pub mod filters;
pub mod metrics;
pub mod outliers;
pub mod outputs;
pub mod types;

pub use error::{PipelineError, Result};
pub use filters::apply_filters;
pub use metrics::{compute_kpis, compute_region_series, compute_type_series};
pub use outliers::compute_outliers;
pub use types::{
    FilterSpec, FilteredView, KpiSummary, OutlierReport, RegionSeries, SeriesPoint, TypePricePoint,
};

pub use hpi_parser::{
    load_dataset, parse_records, Dataset, LoadError, LoadOutcome, LoadSummary, PropertyType, Record,
};
