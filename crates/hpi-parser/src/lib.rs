pub mod errors;
pub mod model;
mod reader;

pub use errors::LoadError;
pub use model::{Dataset, LoadOutcome, LoadSummary, PropertyType, Record};
pub use reader::{load_dataset, parse_records, REQUIRED_COLUMNS};
