//! TOML configuration for a synthesis run: domain shape, which exemplar to
//! use, and the scheduler's tunables.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Failure to load or parse a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Deserialize, Clone)]
struct RawConfig {
    #[serde(default = "RawConfig::default_domain_size")]
    domain_size: usize,
    #[serde(default)]
    periodic: bool,
    problem_name: String,
    #[serde(default)]
    tilemap_name: Option<String>,
    #[serde(default)]
    passes: Option<usize>,
    #[serde(default = "RawConfig::default_attempts_per_pass")]
    attempts_per_pass: usize,
    #[serde(default = "RawConfig::default_sub_region_side_range")]
    sub_region_side_range: (usize, usize),
    #[serde(default)]
    seed: Option<u64>,
}

impl RawConfig {
    const fn default_domain_size() -> usize {
        16
    }

    const fn default_attempts_per_pass() -> usize {
        32
    }

    const fn default_sub_region_side_range() -> (usize, usize) {
        (8, 16)
    }
}

/// A fully-resolved run configuration; every optional field has had its
/// default applied (`passes` in particular defaults to `domain_size`, which
/// can only be known after parsing).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub domain_size: usize,
    pub periodic: bool,
    pub problem_name: String,
    pub tilemap_name: Option<String>,
    pub passes: usize,
    pub attempts_per_pass: usize,
    pub sub_region_side_range: (usize, usize),
    pub seed: Option<u64>,
}

impl From<RawConfig> for Config {
    fn from(raw: RawConfig) -> Self {
        let passes = raw.passes.unwrap_or(raw.domain_size);
        Self {
            domain_size: raw.domain_size,
            periodic: raw.periodic,
            problem_name: raw.problem_name,
            tilemap_name: raw.tilemap_name,
            passes,
            attempts_per_pass: raw.attempts_per_pass,
            sub_region_side_range: raw.sub_region_side_range,
            seed: raw.seed,
        }
    }
}

/// Parse a configuration from an in-memory TOML string.
pub fn parse(content: &str) -> Result<Config, ConfigError> {
    let raw: RawConfig = toml::from_str(content)?;
    Ok(raw.into())
}

/// Load and parse a configuration file from disk.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&content)
}
