//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// Insightboard - survey insights dashboard for the terminal
///
/// Fetch survey records from a remote endpoint, narrow them through
/// independent filters, and render four chart views (bar, line, radar,
/// doughnut) to a Markdown or JSON report.
///
/// Examples:
///   insightboard
///   insightboard --sector Energy --country India
///   insightboard --endpoint http://localhost:3000/api/data --format json
///   insightboard --watch 60 --output dashboard.md
///   insightboard --list-facets
///   insightboard --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Record source endpoint URL
    ///
    /// Must return a JSON array of survey records on GET.
    /// Can also be set via INSIGHTBOARD_ENDPOINT or .insightboard.toml.
    #[arg(short, long, value_name = "URL", env = "INSIGHTBOARD_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Filter by end year (exact match, e.g. 2027)
    #[arg(long, value_name = "YEAR")]
    pub end_year: Option<String>,

    /// Filter by topic
    #[arg(long, value_name = "TOPIC")]
    pub topic: Option<String>,

    /// Filter by sector
    #[arg(long, value_name = "SECTOR")]
    pub sector: Option<String>,

    /// Filter by region
    #[arg(long, value_name = "REGION")]
    pub region: Option<String>,

    /// Filter by PESTLE category
    #[arg(long, value_name = "PEST")]
    pub pestle: Option<String>,

    /// Filter by source
    #[arg(long, value_name = "SOURCE")]
    pub source: Option<String>,

    /// Filter by country
    #[arg(long, value_name = "COUNTRY")]
    pub country: Option<String>,

    /// Output file path for the rendered dashboard report
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Re-fetch and re-render every SECS seconds until interrupted
    ///
    /// Filter changes never re-fetch; only the watch interval (or a plain
    /// re-run) issues a new request.
    #[arg(long, value_name = "SECS")]
    pub watch: Option<u64>,

    /// Fetch records, print the available facet values, and exit
    #[arg(long)]
    pub list_facets: bool,

    /// Path to configuration file
    ///
    /// If not specified, looks for .insightboard.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .insightboard.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Validate endpoint URL format when provided
        if let Some(ref endpoint) = self.endpoint {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err("Endpoint URL must start with 'http://' or 'https://'".to_string());
            }
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        // Validate timeout if provided
        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        // Validate watch interval if provided
        if let Some(watch) = self.watch {
            if watch == 0 {
                return Err("Watch interval must be at least 1 second".to_string());
            }
        }

        if self.watch.is_some() && self.list_facets {
            return Err("Cannot use both --watch and --list-facets".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn make_args() -> Args {
        Args {
            endpoint: Some("http://localhost:3000/api/data".to_string()),
            end_year: None,
            topic: None,
            sector: None,
            region: None,
            pestle: None,
            source: None,
            country: None,
            output: None,
            format: OutputFormat::Markdown,
            timeout: None,
            watch: None,
            list_facets: false,
            config: None,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    #[test]
    fn test_validation_ok() {
        assert!(make_args().validate().is_ok());
    }

    #[test]
    fn test_validation_invalid_endpoint() {
        let mut args = make_args();
        args.endpoint = Some("localhost:3000".to_string());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_zero_watch() {
        let mut args = make_args();
        args.watch = Some(0);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }

    #[test]
    fn test_args_override_config() {
        let mut args = make_args();
        args.sector = Some("Energy".to_string());
        args.timeout = Some(5);

        let mut config = Config::default();
        config.filters.sector = "Retail".to_string();
        config.filters.country = "India".to_string();

        config.merge_with_args(&args);

        // CLI wins where provided; config defaults survive elsewhere.
        assert_eq!(config.source.endpoint, "http://localhost:3000/api/data");
        assert_eq!(config.source.timeout_seconds, 5);
        assert_eq!(config.filters.sector, "Energy");
        assert_eq!(config.filters.country, "India");
    }
}
