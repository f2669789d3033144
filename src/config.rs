//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.insightboard.toml` files.

use crate::models::FilterState;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Record source settings.
    #[serde(default)]
    pub source: SourceConfig,

    /// Default filter selections (empty = no constraint).
    #[serde(default)]
    pub filters: FilterState,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// Record source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Record source endpoint URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Retry attempts after a transport failure.
    #[serde(default = "default_retries")]
    pub retries: usize,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_seconds: default_timeout(),
            retries: default_retries(),
        }
    }
}

pub fn default_endpoint() -> String {
    "https://dashboard-backend-0t5x.onrender.com/api/data".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_retries() -> usize {
    3
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Include the available-filters section in the report.
    #[serde(default = "default_true")]
    pub include_facets: bool,

    /// Maximum facet values listed per filter control.
    #[serde(default = "default_max_facet_values")]
    pub max_facet_values: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            include_facets: true,
            max_facet_values: default_max_facet_values(),
        }
    }
}

fn default_output() -> String {
    "insightboard_report.md".to_string()
}

fn default_true() -> bool {
    true
}

fn default_max_facet_values() -> usize {
    25
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(".insightboard.toml");

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings; only values
    /// the user explicitly provided are merged in.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref endpoint) = args.endpoint {
            self.source.endpoint = endpoint.clone();
        }
        if let Some(timeout) = args.timeout {
            self.source.timeout_seconds = timeout;
        }

        // Filter flags override the configured defaults one dimension at a time.
        if let Some(ref end_year) = args.end_year {
            self.filters.end_year = end_year.clone();
        }
        if let Some(ref topic) = args.topic {
            self.filters.topic = topic.clone();
        }
        if let Some(ref sector) = args.sector {
            self.filters.sector = sector.clone();
        }
        if let Some(ref region) = args.region {
            self.filters.region = region.clone();
        }
        if let Some(ref pestle) = args.pestle {
            self.filters.pestle = pestle.clone();
        }
        if let Some(ref source) = args.source {
            self.filters.source = source.clone();
        }
        if let Some(ref country) = args.country {
            self.filters.country = country.clone();
        }

        if let Some(ref output) = args.output {
            self.report.output = output.display().to_string();
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
