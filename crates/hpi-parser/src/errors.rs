use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no dataset found at '{}'", .path.display())]
    SourceNotFound { path: PathBuf },

    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {source}")]
    Csv {
        #[from]
        source: csv::Error,
    },

    #[error("required columns missing from header: {missing:?}")]
    MissingColumns { missing: Vec<String> },

    #[error("dataset did not contain any parseable rows")]
    EmptyData,
}
