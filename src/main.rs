//! Insightboard - Survey Insights Dashboard
//!
//! A CLI tool that fetches survey records from a remote endpoint, narrows
//! them through independent filters, and renders four chart views (bar,
//! line, radar, doughnut) to a Markdown or JSON report.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (fetch, config, or write failure)

mod cli;
mod client;
mod config;
mod models;
mod pipeline;
mod report;
mod state;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use client::{ClientOptions, RecordClient};
use config::Config;
use models::{Field, ReportMetadata};
use state::{DashboardState, RefreshOutcome};
use std::time::Duration;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("Insightboard v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    // Run the dashboard
    match run_dashboard(args).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Dashboard failed: {}", e);
            eprintln!("\n❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .insightboard.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(".insightboard.toml");

    if path.exists() {
        eprintln!("⚠️  .insightboard.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .insightboard.toml")?;

    println!("✅ Created .insightboard.toml with default settings.");
    println!("   Edit it to customize the endpoint, default filters, and report output.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the complete dashboard workflow. Returns exit code (0).
async fn run_dashboard(args: Args) -> Result<i32> {
    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let client = RecordClient::new(ClientOptions {
        endpoint: config.source.endpoint.clone(),
        timeout_seconds: config.source.timeout_seconds,
        retries: config.source.retries,
        show_progress: !args.quiet,
    });

    let mut state = DashboardState::new();
    state.set_filters(config.filters.clone());

    // Step 1: Initial fetch
    println!("📡 Fetching records from: {}", client.endpoint());
    match state.refresh(&client).await {
        RefreshOutcome::Applied { valid, dropped } => {
            println!(
                "   {} valid records held ({} dropped by the validity gate)",
                valid, dropped
            );
        }
        RefreshOutcome::Failed(err) => {
            // Nothing to fall back to on the first fetch.
            anyhow::bail!("fetch failed: {}", err);
        }
        RefreshOutcome::Stale => {
            debug!("Initial fetch completed stale");
        }
    }
    debug!("Fetch status: {:?}", state.status());

    // Handle --list-facets: print the available filter values and exit
    if args.list_facets {
        return handle_list_facets(&state);
    }

    // Step 2: Render the dashboard
    render_report(&state, &config, &args)?;
    print_summary(&state, &config);

    // Step 3: Watch mode re-fetches on an interval until interrupted
    if let Some(interval) = args.watch {
        println!(
            "\n👀 Watch mode: refreshing every {}s (Ctrl-C to stop)",
            interval
        );

        loop {
            tokio::time::sleep(Duration::from_secs(interval)).await;

            match state.refresh(&client).await {
                RefreshOutcome::Applied { valid, .. } => {
                    info!("Refreshed: {} valid records held", valid);
                }
                RefreshOutcome::Failed(err) => {
                    warn!("Refresh failed: {}", err);
                    println!("⚠️  Refresh failed ({}); keeping previous data", err);
                }
                RefreshOutcome::Stale => {}
            }

            render_report(&state, &config, &args)?;
        }
    }

    Ok(0)
}

/// Handle --list-facets: print every facet list for the filtered collection.
fn handle_list_facets(state: &DashboardState) -> Result<i32> {
    let view = state.view();

    println!(
        "\n🔍 Available filter values ({} matching records):\n",
        view.matching_records
    );

    for field in Field::ALL {
        let values = view.facets.get(field);
        println!("   {} ({}):", field, values.len());
        for value in values {
            if value.is_empty() {
                println!("     - (blank)");
            } else {
                println!("     - {}", value);
            }
        }
    }

    Ok(0)
}

/// Derive the view model and write the report file.
fn render_report(state: &DashboardState, config: &Config, args: &Args) -> Result<()> {
    let view = state.view();
    let metadata = ReportMetadata {
        endpoint: config.source.endpoint.clone(),
        fetched_at: Utc::now(),
    };

    let output = match args.format {
        OutputFormat::Markdown => {
            report::generate_markdown_report(&view, &metadata, &config.report)
        }
        OutputFormat::Json => report::generate_json_report(&view, &metadata)?,
    };

    std::fs::write(&config.report.output, &output)
        .with_context(|| format!("Failed to write report to {}", config.report.output))?;

    debug!("Report written to {}", config.report.output);
    Ok(())
}

/// Print the console summary.
fn print_summary(state: &DashboardState, config: &Config) {
    let view = state.view();

    println!("\n📊 Dashboard Summary:");
    println!(
        "   Records matching filters: {} / {}",
        view.matching_records, view.fetched_records
    );
    println!(
        "   Sectors: {} | Topics: {} | Years: {}",
        view.facets.sectors.len(),
        view.facets.topics.len(),
        view.facets.years.len()
    );

    let active = view.filters.active();
    if !active.is_empty() {
        let described: Vec<String> = active
            .iter()
            .map(|(field, value)| format!("{}={}", field, value))
            .collect();
        println!("   Active filters: {}", described.join(", "));
    }

    println!("\n✅ Dashboard written to: {}", config.report.output);
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from .insightboard.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
