// crates/hpi-cli/src/main.rs

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use hpi_core::{
    apply_filters, compute_kpis, compute_outliers, compute_region_series, compute_type_series,
    load_dataset, outputs, Dataset, FilterSpec, PipelineError, PropertyType,
};

mod config;
mod discover;
mod render;

use config::Config;

/// A CLI for the UK House Price Index metrics pipeline
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Dataset CSV path; overrides discovery and HPI_DATASET
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Configuration file
    #[arg(long, global = true, default_value = "hpi.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Dataset spans and the regions available for filtering
    Info,
    /// Latest-month KPIs for the current filters
    Summary(SummaryArgs),
    /// Per-region price series with month-over-month change
    Series(SeriesArgs),
    /// Long-format per-type prices for the selected property types
    Types(TypesArgs),
    /// IQR outliers over the filtered average prices
    Outliers(OutlierArgs),
    /// Write the filtered view to CSV or Parquet
    Export(ExportArgs),
}

#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Region to include (repeatable); defaults to config or every region
    #[arg(long = "region", value_name = "NAME")]
    regions: Vec<String>,

    /// Property type to include (repeatable): detached, semi-detached,
    /// terraced, flat
    #[arg(long = "property-type", value_name = "TYPE")]
    property_types: Vec<String>,

    /// Inclusive start date (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Inclusive end date (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Inclusive minimum average price
    #[arg(long)]
    min_price: Option<f64>,

    /// Inclusive maximum average price
    #[arg(long)]
    max_price: Option<f64>,
}

#[derive(Args, Debug, Default)]
struct SummaryArgs {
    #[command(flatten)]
    filters: FilterArgs,

    /// Emit the summary as JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug, Default)]
struct SeriesArgs {
    #[command(flatten)]
    filters: FilterArgs,

    /// Show only the most recent N points per region (0 = all)
    #[arg(long, default_value_t = 12)]
    last: usize,
}

#[derive(Args, Debug, Default)]
struct TypesArgs {
    #[command(flatten)]
    filters: FilterArgs,

    /// Show only the most recent N points (0 = all)
    #[arg(long, default_value_t = 20)]
    last: usize,
}

#[derive(Args, Debug, Default)]
struct OutlierArgs {
    #[command(flatten)]
    filters: FilterArgs,

    /// Maximum outliers to display, most recent first
    #[arg(long, default_value_t = 10)]
    limit: usize,

    /// Emit the full report as JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[command(flatten)]
    filters: FilterArgs,

    /// Output file
    #[arg(long)]
    out: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value = "csv")]
    format: ExportFormat,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum ExportFormat {
    Csv,
    Parquet,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let config = config::load_config(&cli.config)?;
    let path = discover::resolve_dataset_path(cli.data.as_deref(), &config)?;
    let outcome = load_dataset(&path)
        .with_context(|| format!("failed to load dataset from '{}'", path.display()))?;

    if outcome.summary.rows_dropped > 0 {
        warn!(
            "dropped {} rows with unparseable dates or prices",
            outcome.summary.rows_dropped
        );
    }
    info!(
        "loaded {} records from '{}'",
        outcome.summary.rows_loaded,
        path.display()
    );

    let dataset = outcome.dataset;

    match cli.command {
        Command::Info => handle_info(&dataset),
        Command::Summary(args) => handle_summary(&dataset, &config, args),
        Command::Series(args) => handle_series(&dataset, &config, args),
        Command::Types(args) => handle_types(&dataset, &config, args),
        Command::Outliers(args) => handle_outliers(&dataset, &config, args),
        Command::Export(args) => handle_export(&dataset, &config, args),
    }
}

/// Merge filter flags over config defaults over the dataset's full spans.
fn build_spec(dataset: &Dataset, config: &Config, args: &FilterArgs) -> Result<FilterSpec> {
    let mut spec = FilterSpec::unbounded(dataset);

    let regions = if !args.regions.is_empty() {
        args.regions.clone()
    } else {
        config.filters.regions.clone()
    };
    if !regions.is_empty() {
        spec.regions = regions.into_iter().collect();
    }

    let type_names = if !args.property_types.is_empty() {
        args.property_types.clone()
    } else {
        config.filters.property_types.clone()
    };
    if !type_names.is_empty() {
        spec.property_types = type_names
            .iter()
            .map(|name| PropertyType::try_from(name.as_str()).map_err(anyhow::Error::msg))
            .collect::<Result<_>>()?;
    }

    if let Some(from) = args.from {
        spec.date_range.0 = from;
    }
    if let Some(to) = args.to {
        spec.date_range.1 = to;
    }
    if let Some(min_price) = args.min_price {
        spec.price_range.0 = min_price;
    }
    if let Some(max_price) = args.max_price {
        spec.price_range.1 = max_price;
    }

    Ok(spec)
}

fn handle_info(dataset: &Dataset) -> Result<()> {
    let (first, last) = dataset.date_span().context("dataset is empty")?;
    let (min_price, max_price) = dataset.price_span().context("dataset is empty")?;

    println!("Records:    {}", dataset.len());
    println!("Date span:  {first} to {last}");
    println!("Price span: £{min_price:.0} to £{max_price:.0}");
    println!("\nRegions:");
    for region in dataset.regions() {
        println!("  {region}");
    }
    Ok(())
}

fn handle_summary(dataset: &Dataset, config: &Config, args: SummaryArgs) -> Result<()> {
    let spec = build_spec(dataset, config, &args.filters)?;
    let view = apply_filters(dataset, &spec);

    let summary = match compute_kpis(&view) {
        Ok(summary) => summary,
        Err(PipelineError::EmptyView) => {
            println!("No data for the current filters.");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", render::kpi_table(&summary));
    }
    Ok(())
}

fn handle_series(dataset: &Dataset, config: &Config, args: SeriesArgs) -> Result<()> {
    let spec = build_spec(dataset, config, &args.filters)?;
    let view = apply_filters(dataset, &spec);

    if view.is_empty() {
        println!("No data for the current filters.");
        return Ok(());
    }

    let series = compute_region_series(&view);
    println!("{}", render::series_table(&series, args.last));
    Ok(())
}

fn handle_types(dataset: &Dataset, config: &Config, args: TypesArgs) -> Result<()> {
    let spec = build_spec(dataset, config, &args.filters)?;
    let view = apply_filters(dataset, &spec);

    let points = compute_type_series(&view, &spec);
    if points.is_empty() {
        println!("No per-type prices for the current filters.");
        return Ok(());
    }

    let skip = if args.last == 0 || points.len() <= args.last {
        0
    } else {
        points.len() - args.last
    };
    println!("{}", render::type_table(&points[skip..]));
    Ok(())
}

fn handle_outliers(dataset: &Dataset, config: &Config, args: OutlierArgs) -> Result<()> {
    let spec = build_spec(dataset, config, &args.filters)?;
    let view = apply_filters(dataset, &spec);

    let report = compute_outliers(&view);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if report.is_empty() {
        println!("No outliers for the current filters.");
        return Ok(());
    }

    if let (Some(lower), Some(upper)) = (report.lower_fence, report.upper_fence) {
        println!("Fences: £{lower:.2} to £{upper:.2}");
    }
    let top = report.top_by_date(args.limit);
    println!("{}", render::outlier_table(&top));
    println!(
        "Showing {} of {} outliers.",
        top.len(),
        report.outliers.len()
    );
    Ok(())
}

fn handle_export(dataset: &Dataset, config: &Config, args: ExportArgs) -> Result<()> {
    let spec = build_spec(dataset, config, &args.filters)?;
    let view = apply_filters(dataset, &spec);

    let bytes = match args.format {
        ExportFormat::Csv => outputs::write_csv_bytes(&view)?,
        ExportFormat::Parquet => outputs::write_parquet_bytes(&view)?,
    };
    std::fs::write(&args.out, bytes)
        .with_context(|| format!("failed to write '{}'", args.out.display()))?;

    println!("Wrote {} records to '{}'.", view.len(), args.out.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hpi_core::Record;

    fn dataset() -> Dataset {
        let record = |day: u32, region: &str, price: f64| Record {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            region_name: region.to_string(),
            average_price: price,
            sales_volume: None,
            detached_price: None,
            semi_detached_price: None,
            terraced_price: None,
            flat_price: None,
        };
        Dataset::from_records(vec![
            record(1, "London", 520_000.0),
            record(1, "South East", 390_000.0),
        ])
    }

    #[test]
    fn flags_override_config_defaults() {
        let dataset = dataset();
        let mut config = Config::default();
        config.filters.regions = vec!["South East".to_string()];

        let from_config = build_spec(&dataset, &config, &FilterArgs::default()).unwrap();
        assert!(from_config.regions.contains("South East"));
        assert!(!from_config.regions.contains("London"));

        let args = FilterArgs {
            regions: vec!["London".to_string()],
            ..FilterArgs::default()
        };
        let from_flags = build_spec(&dataset, &config, &args).unwrap();
        assert!(from_flags.regions.contains("London"));
        assert!(!from_flags.regions.contains("South East"));
    }

    #[test]
    fn unknown_property_type_is_rejected() {
        let dataset = dataset();
        let args = FilterArgs {
            property_types: vec!["castle".to_string()],
            ..FilterArgs::default()
        };

        let err = build_spec(&dataset, &Config::default(), &args).unwrap_err();
        assert!(err.to_string().contains("unknown property type"));
    }

    #[test]
    fn date_and_price_flags_narrow_the_spec() {
        let dataset = dataset();
        let args = FilterArgs {
            from: NaiveDate::from_ymd_opt(2024, 1, 1),
            min_price: Some(400_000.0),
            ..FilterArgs::default()
        };

        let spec = build_spec(&dataset, &Config::default(), &args).unwrap();
        assert_eq!(spec.date_range.0, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(spec.price_range.0, 400_000.0);
        // Untouched bounds stay at the dataset spans.
        assert_eq!(spec.price_range.1, 520_000.0);
    }
}
