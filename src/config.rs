use crate::core::titan::optimizer::AdamConfig;
use crate::core::titan::scheduler::LrSchedule;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Settings read from `~/.titan/config.toml` (or `--config FILE`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TitanConfig {
    /// Fixed RNG seed; unset means a fresh seed per run.
    pub seed: Option<u64>,
    pub shots: usize,
    /// Decimal places in printed output.
    pub precision: usize,
    pub adam: AdamConfig,
    pub schedule: LrSchedule,
}

impl Default for TitanConfig {
    fn default() -> Self {
        TitanConfig {
            seed: None,
            shots: 1024,
            precision: 4,
            adam: AdamConfig::default(),
            schedule: LrSchedule::Constant,
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    // ~/.titan/config.toml
    dirs_next::home_dir().map(|h| h.join(".titan").join("config.toml"))
}

pub fn resolve_config_path(cli_path: &Option<PathBuf>) -> Option<PathBuf> {
    if let Some(p) = cli_path {
        return Some(p.clone());
    }
    default_config_path()
}

pub fn parse_config(src: &str) -> Result<TitanConfig> {
    toml::from_str(src).context("Parse Titan config")
}

pub fn load_config_file(path: &Path) -> Result<TitanConfig> {
    let src = std::fs::read_to_string(path)
        .with_context(|| format!("Read config {}", path.display()))?;
    parse_config(&src).with_context(|| format!("In config {}", path.display()))
}

/// An explicit `--config` must exist; a missing default file means defaults.
pub fn load_config(cli_path: &Option<PathBuf>) -> Result<TitanConfig> {
    if let Some(p) = cli_path {
        return load_config_file(p);
    }
    match default_config_path() {
        Some(p) if p.exists() => load_config_file(&p),
        _ => Ok(TitanConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let cfg = parse_config("seed = 7\n[adam]\nlr = 0.01\n").unwrap();
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.shots, 1024);
        assert_eq!(cfg.adam.lr, 0.01);
        assert_eq!(cfg.adam.beta2, 0.999);
        assert_eq!(cfg.schedule, LrSchedule::Constant);
    }

    #[test]
    fn test_schedule_table() {
        let cfg = parse_config("[schedule]\nkind = \"exponential\"\ngamma = 0.95\n").unwrap();
        assert_eq!(cfg.schedule, LrSchedule::Exponential { gamma: 0.95 });
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(load_config(&Some(missing)).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "shots = 64\nprecision = 2\n").unwrap();
        let cfg = load_config(&Some(path)).unwrap();
        assert_eq!(cfg.shots, 64);
        assert_eq!(cfg.precision, 2);
    }
}
