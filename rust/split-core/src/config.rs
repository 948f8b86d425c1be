// rust/split-core/src/config.rs

//! Configuration management for the split planner.
//!
//! This module provides configuration parsing from TOML files, environment
//! variable overrides, and validation of configuration values.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Result, SplitError};
use crate::locality::{LOCALITY_THRESHOLD, MIN_LOCATION_NAMES};

// Top-level planner configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub storage: StorageConfig,
    pub planner: PlanningConfig,
    pub locality: LocalityConfig,
}

// Storage configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    // Base path for all storage operations.
    pub base_path: PathBuf,
    // Buffer size in bytes for I/O operations.
    pub buffer_size: usize,
    /// Block granularity (bytes) reported by the local backend's locality lookup.
    pub block_size: u64,
    /// Host names the local backend reports for every block.
    pub hosts: Vec<String>,
}

/// Planning options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanningConfig {
    /// Upper bound on the number of splits. Unset means one split per reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_workers: Option<u32>,
    /// File name suffix marking a descriptor file as a container.
    pub container_extension: String,
    // Directory encoded splits are written to.
    pub output_dir: PathBuf,
}

/// Host selection tunables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalityConfig {
    /// Minimum number of hosts reported when that many contributed bytes.
    pub min_location_names: usize,
    /// Share of the total bytes at which a single host is always kept.
    pub locality_threshold: f64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("./data"),
            buffer_size: 64 * 1024,         // 64 KB
            block_size: 128 * 1024 * 1024, // 128 MB
            hosts: vec!["localhost".to_string()],
        }
    }
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            max_workers: None,
            container_extension: ".mwu".to_string(),
            output_dir: PathBuf::from("./splits"),
        }
    }
}

impl Default for LocalityConfig {
    fn default() -> Self {
        Self {
            min_location_names: MIN_LOCATION_NAMES,
            locality_threshold: LOCALITY_THRESHOLD,
        }
    }
}

impl FromStr for PlannerConfig {
    type Err = SplitError;

    /// Parse configuration from a TOML string.
    fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s)
            .map_err(|e| SplitError::config_with_source("failed to parse TOML config", e))
    }
}

impl PlannerConfig {
    // Load configuration from a TOML file.
    //
    // # Errors
    //
    // Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            SplitError::storage_with_source(path, "failed to read config file", e)
        })?;
        let config: Self = content.parse()?;
        config.validate()?;
        Ok(config)
    }

    // Apply environment variable overrides.
    //
    // Environment variables are prefixed with `WSP_` and use underscores
    // to separate nested fields. For example:
    // - `WSP_STORAGE_BASE_PATH` overrides `storage.base_path`
    // - `WSP_STORAGE_HOSTS` overrides `storage.hosts` (comma-separated)
    // - `WSP_PLANNER_MAX_WORKERS` overrides `planner.max_workers`
    // - `WSP_LOCALITY_THRESHOLD` overrides `locality.locality_threshold`
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        // Storage overrides
        if let Ok(val) = std::env::var("WSP_STORAGE_BASE_PATH") {
            self.storage.base_path = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("WSP_STORAGE_BUFFER_SIZE") {
            if let Ok(v) = val.parse() {
                self.storage.buffer_size = v;
            }
        }
        if let Ok(val) = std::env::var("WSP_STORAGE_BLOCK_SIZE") {
            if let Ok(v) = val.parse() {
                self.storage.block_size = v;
            }
        }
        if let Ok(val) = std::env::var("WSP_STORAGE_HOSTS") {
            let hosts: Vec<String> = val
                .split(',')
                .map(str::trim)
                .filter(|h| !h.is_empty())
                .map(String::from)
                .collect();
            if !hosts.is_empty() {
                self.storage.hosts = hosts;
            }
        }

        // Planner overrides
        if let Ok(val) = std::env::var("WSP_PLANNER_MAX_WORKERS") {
            if let Ok(v) = val.parse() {
                self.planner.max_workers = Some(v);
            }
        }
        if let Ok(val) = std::env::var("WSP_PLANNER_CONTAINER_EXTENSION") {
            self.planner.container_extension = val;
        }
        if let Ok(val) = std::env::var("WSP_PLANNER_OUTPUT_DIR") {
            self.planner.output_dir = PathBuf::from(val);
        }

        // Locality overrides
        if let Ok(val) = std::env::var("WSP_LOCALITY_MIN_LOCATION_NAMES") {
            if let Ok(v) = val.parse() {
                self.locality.min_location_names = v;
            }
        }
        if let Ok(val) = std::env::var("WSP_LOCALITY_THRESHOLD") {
            if let Ok(v) = val.parse() {
                self.locality.locality_threshold = v;
            }
        }

        self
    }

    // Validate all configuration values.
    //
    // # Errors
    //
    // Returns an error if any configuration value is invalid.
    pub fn validate(&self) -> Result<()> {
        // Storage validation
        if self.storage.buffer_size == 0 {
            return Err(SplitError::config(
                "storage.buffer_size must be greater than 0",
            ));
        }
        if self.storage.block_size == 0 {
            return Err(SplitError::config(
                "storage.block_size must be greater than 0",
            ));
        }
        if self.storage.hosts.is_empty() {
            return Err(SplitError::config("storage.hosts must not be empty"));
        }

        // Planner validation
        if self.planner.max_workers == Some(0) {
            return Err(SplitError::config(
                "planner.max_workers must be greater than 0 when set",
            ));
        }
        if self.planner.container_extension.is_empty() {
            return Err(SplitError::config(
                "planner.container_extension must not be empty",
            ));
        }

        // Locality validation
        let threshold = self.locality.locality_threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(SplitError::config(format!(
                "locality.locality_threshold must be in (0, 1], got {threshold}"
            )));
        }

        Ok(())
    }
}
