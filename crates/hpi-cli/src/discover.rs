use std::env;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use tracing::{info, warn};

use crate::config::Config;

/// Resolve which physical file to load: an explicit `--data` path wins,
/// then the `HPI_DATASET` environment variable, then the configured full
/// dataset, then the configured sample fallback. Explicit choices that do
/// not exist are errors; only the config-driven discovery falls through.
pub fn resolve_dataset_path(explicit: Option<&Path>, config: &Config) -> Result<PathBuf> {
    if let Some(path) = explicit {
        if !path.exists() {
            bail!("dataset '{}' does not exist", path.display());
        }
        return Ok(path.to_path_buf());
    }

    if let Ok(from_env) = env::var("HPI_DATASET") {
        let path = PathBuf::from(from_env);
        if !path.exists() {
            bail!(
                "HPI_DATASET points at '{}', which does not exist",
                path.display()
            );
        }
        return Ok(path);
    }

    let full = &config.dataset.full;
    if full.exists() {
        info!("using full dataset at '{}'", full.display());
        return Ok(full.clone());
    }

    if let Some(sample) = &config.dataset.sample {
        if sample.exists() {
            warn!(
                "full dataset '{}' not found; falling back to sample '{}'",
                full.display(),
                sample.display()
            );
            return Ok(sample.clone());
        }
        bail!(
            "no dataset found; checked '{}' and '{}'",
            full.display(),
            sample.display()
        );
    }

    bail!("no dataset found; checked '{}'", full.display())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::config::DatasetPaths;

    fn temp_file(name: &str) -> PathBuf {
        let path = env::temp_dir().join(format!("hpi-discover-{}-{name}", std::process::id()));
        fs::write(&path, "Date,RegionName\n").unwrap();
        path
    }

    #[test]
    fn explicit_path_must_exist() {
        let config = Config::default();
        let err =
            resolve_dataset_path(Some(Path::new("no-such-file.csv")), &config).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn falls_back_to_sample_when_full_is_absent() {
        let sample = temp_file("sample.csv");
        let config = Config {
            dataset: DatasetPaths {
                full: PathBuf::from("missing-full.csv"),
                sample: Some(sample.clone()),
            },
            ..Config::default()
        };

        let resolved = resolve_dataset_path(None, &config).unwrap();
        assert_eq!(resolved, sample);

        fs::remove_file(sample).ok();
    }

    #[test]
    fn errors_when_nothing_is_found() {
        let config = Config {
            dataset: DatasetPaths {
                full: PathBuf::from("missing-full.csv"),
                sample: Some(PathBuf::from("missing-sample.csv")),
            },
            ..Config::default()
        };

        let err = resolve_dataset_path(None, &config).unwrap_err();
        assert!(err.to_string().contains("no dataset found"));
    }
}
