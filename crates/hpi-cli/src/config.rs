use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub dataset: DatasetPaths,
    pub filters: FilterDefaults,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatasetPaths {
    /// Preferred dataset; the published full HPI file.
    pub full: PathBuf,
    /// Fallback when the full file is absent (e.g. a committed sample).
    pub sample: Option<PathBuf>,
}

impl Default for DatasetPaths {
    fn default() -> Self {
        Self {
            full: PathBuf::from("UK-HPI-full-file.csv"),
            sample: Some(PathBuf::from("UK-HPI-sample.csv")),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FilterDefaults {
    pub regions: Vec<String>,
    pub property_types: Vec<String>,
}

/// A missing config file is not an error; the defaults apply and the CLI
/// flags can override everything anyway.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file at '{}'", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("failed to parse TOML config from '{}'", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_config_parses() {
        let config: Config = toml::from_str(
            r#"
            [dataset]
            full = "data/UK-HPI-full-file-2025-02.csv"
            sample = "data/UK-HPI-sample.csv"

            [filters]
            regions = ["London", "South East"]
            property_types = ["detached", "flat"]
            "#,
        )
        .unwrap();

        assert_eq!(
            config.dataset.full,
            PathBuf::from("data/UK-HPI-full-file-2025-02.csv")
        );
        assert_eq!(config.filters.regions, vec!["London", "South East"]);
        assert_eq!(config.filters.property_types, vec!["detached", "flat"]);
    }

    #[test]
    fn empty_config_falls_back_to_defaults() {
        let config: Config = toml::from_str("").unwrap();

        assert_eq!(config.dataset.full, PathBuf::from("UK-HPI-full-file.csv"));
        assert_eq!(
            config.dataset.sample,
            Some(PathBuf::from("UK-HPI-sample.csv"))
        );
        assert!(config.filters.regions.is_empty());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = load_config(Path::new("does-not-exist/hpi.toml")).unwrap();
        assert_eq!(config.dataset.full, PathBuf::from("UK-HPI-full-file.csv"));
    }
}
