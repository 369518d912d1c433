//! Viewer configuration loading and types.
//!
//! Values are layered: built-in defaults, then an optional YAML file, then
//! environment variables. Command-line flags are applied last by `main`.

use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use hysplit_runner::RunnerConfig;
use serde::{Deserialize, Serialize};
use trajectory_map::{OverlayStyle, DEFAULT_ZOOM};

/// Default upload limit for `POST /api/tdump` (16 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Service configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Listen address for `serve`
    pub listen: String,

    /// How to invoke the model
    pub hysplit: RunnerConfig,

    pub map: MapConfig,

    /// Largest accepted request body
    pub max_upload_bytes: usize,
}

/// Map presentation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub zoom: u8,
    pub style: OverlayStyle,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            zoom: DEFAULT_ZOOM,
            style: OverlayStyle::default(),
        }
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:8090".to_string(),
            hysplit: RunnerConfig::default(),
            map: MapConfig::default(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl ViewerConfig {
    /// Load from an optional YAML file, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a YAML file. Missing keys keep their defaults.
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config = Self::from_yaml_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        tracing::info!(path = ?path, "Loaded viewer configuration");
        Ok(config)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Apply overrides from a variable lookup (the process environment in
    /// production).
    ///
    /// | Variable                  | Field                          |
    /// |---------------------------|--------------------------------|
    /// | `VIEWER_LISTEN_ADDR`      | `listen`                       |
    /// | `HYSPLIT_EXEC`            | `hysplit.executable`           |
    /// | `HYSPLIT_ARGS`            | `hysplit.args` (whitespace)    |
    /// | `HYSPLIT_WORKDIR`         | `hysplit.working_dir`          |
    /// | `HYSPLIT_CONTROL_FILE`    | `hysplit.control_file_name`    |
    /// | `HYSPLIT_OUTPUT_FILE`     | `hysplit.output_file_name`     |
    /// | `HYSPLIT_TIMEOUT_SECS`    | `hysplit.timeout_secs`         |
    /// | `VIEWER_MAP_ZOOM`         | `map.zoom`                     |
    /// | `VIEWER_MAX_UPLOAD_BYTES` | `max_upload_bytes`             |
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("VIEWER_LISTEN_ADDR") {
            self.listen = v;
        }
        if let Some(v) = lookup("HYSPLIT_EXEC") {
            self.hysplit.executable = v.into();
        }
        if let Some(v) = lookup("HYSPLIT_ARGS") {
            self.hysplit.args = v.split_whitespace().map(str::to_string).collect();
        }
        if let Some(v) = lookup("HYSPLIT_WORKDIR") {
            self.hysplit.working_dir = v.into();
        }
        if let Some(v) = lookup("HYSPLIT_CONTROL_FILE") {
            self.hysplit.control_file_name = v;
        }
        if let Some(v) = lookup("HYSPLIT_OUTPUT_FILE") {
            self.hysplit.output_file_name = v;
        }
        if let Some(v) = lookup("HYSPLIT_TIMEOUT_SECS") {
            self.hysplit.timeout_secs = Some(parse_var("HYSPLIT_TIMEOUT_SECS", &v)?);
        }
        if let Some(v) = lookup("VIEWER_MAP_ZOOM") {
            self.map.zoom = parse_var("VIEWER_MAP_ZOOM", &v)?;
        }
        if let Some(v) = lookup("VIEWER_MAX_UPLOAD_BYTES") {
            self.max_upload_bytes = parse_var("VIEWER_MAX_UPLOAD_BYTES", &v)?;
        }
        Ok(())
    }
}

fn parse_var<T>(name: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .trim()
        .parse()
        .with_context(|| format!("Invalid value for {}: {:?}", name, value))
}
