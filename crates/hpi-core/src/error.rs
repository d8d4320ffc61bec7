// crates/hpi-core/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("failed to load dataset: {0}")]
    Load(#[from] hpi_parser::LoadError),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("filter produced an empty view")]
    EmptyView,
}

pub type Result<T> = std::result::Result<T, PipelineError>;
