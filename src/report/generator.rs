//! Markdown and JSON dashboard report generation.
//!
//! The markdown report renders the four chart views as tables; the JSON
//! report carries the chart datasets in the shape a chart renderer consumes
//! (labels plus parallel series with colors).

use crate::config::ReportConfig;
use crate::models::{ChartData, DistributionData, ReportMetadata, TimeSeriesData};
use crate::pipeline::Facets;
use crate::state::ViewModel;
use anyhow::Result;
use serde::Serialize;

/// Generate a complete Markdown dashboard report.
pub fn generate_markdown_report(
    view: &ViewModel,
    metadata: &ReportMetadata,
    options: &ReportConfig,
) -> String {
    let mut output = String::new();

    output.push_str("# Insightboard Dashboard\n\n");

    output.push_str(&generate_metadata_section(view, metadata));
    output.push_str(&generate_filters_section(view));

    if options.include_facets {
        output.push_str(&generate_facets_section(
            &view.facets,
            options.max_facet_values,
        ));
    }

    output.push_str(&generate_chart_section(&view.charts.sector_bar, "Sector"));
    output.push_str(&generate_time_series_section(&view.charts.intensity_line));
    output.push_str(&generate_chart_section(&view.charts.topic_radar, "Topic"));
    output.push_str(&generate_distribution_section(&view.charts.impact_doughnut));

    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section, including the stale-data banner when the
/// most recent refresh failed.
fn generate_metadata_section(view: &ViewModel, metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Record Source:** {}\n", metadata.endpoint));
    section.push_str(&format!(
        "- **Fetched At:** {}\n",
        metadata.fetched_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Records Held:** {}\n", view.fetched_records));
    section.push_str(&format!(
        "- **Records Matching Filters:** {}\n",
        view.matching_records
    ));
    section.push('\n');

    if let Some(ref error) = view.last_error {
        section.push_str(&format!(
            "> ⚠️ **Last refresh failed:** {} — showing last-known-good data.\n\n",
            error
        ));
    }

    section
}

/// Generate the active-filters section.
fn generate_filters_section(view: &ViewModel) -> String {
    let mut section = String::new();

    section.push_str("## Active Filters\n\n");

    let active = view.filters.active();
    if active.is_empty() {
        section.push_str("No filters active; the full collection is shown.\n\n");
        return section;
    }

    for (field, value) in active {
        section.push_str(&format!("- **{}:** {}\n", field, value));
    }
    section.push('\n');

    section
}

/// Generate the available-filters section from the facet lists.
fn generate_facets_section(facets: &Facets, max_values: usize) -> String {
    let mut section = String::new();

    section.push_str("## Available Filters\n\n");

    for field in crate::models::Field::ALL {
        let values = facets.get(field);
        section.push_str(&format!(
            "- **{}** ({}): {}\n",
            field,
            values.len(),
            format_facet_values(values, max_values)
        ));
    }
    section.push('\n');

    section
}

fn format_facet_values(values: &[String], max_values: usize) -> String {
    if values.is_empty() {
        return "(none)".to_string();
    }

    let shown: Vec<&str> = values
        .iter()
        .take(max_values)
        .map(|v| if v.is_empty() { "(blank)" } else { v.as_str() })
        .collect();

    let mut line = shown.join(", ");
    if values.len() > max_values {
        line.push_str(&format!(" … (+{} more)", values.len() - max_values));
    }
    line
}

/// Generate a chart section as a table with one row per category and one
/// column per series.
fn generate_chart_section(chart: &ChartData, category_heading: &str) -> String {
    let mut section = String::new();

    section.push_str(&format!("## {}\n\n", chart.title));

    if chart.labels.is_empty() {
        section.push_str("No data for the current filters.\n\n");
        return section;
    }

    section.push_str(&format!("| {} |", category_heading));
    for series in &chart.datasets {
        section.push_str(&format!(" {} |", series.label));
    }
    section.push('\n');

    section.push_str("|:---|");
    for _ in &chart.datasets {
        section.push_str("---:|");
    }
    section.push('\n');

    for (i, label) in chart.labels.iter().enumerate() {
        section.push_str(&format!("| {} |", label));
        for series in &chart.datasets {
            section.push_str(&format!(" {} |", format_value(series.data[i])));
        }
        section.push('\n');
    }
    section.push('\n');

    section
}

/// Generate the time-series section.
fn generate_time_series_section(series: &TimeSeriesData) -> String {
    let mut section = String::new();

    section.push_str(&format!("## {}\n\n", series.title));

    if series.points.is_empty() {
        section.push_str("No data for the current filters.\n\n");
        return section;
    }

    section.push_str("| Year | Average Intensity |\n");
    section.push_str("|:---|---:|\n");
    for point in &series.points {
        let year = if point.year.is_empty() {
            "(blank)"
        } else {
            point.year.as_str()
        };
        section.push_str(&format!(
            "| {} | {} |\n",
            year,
            format_value(point.average_intensity)
        ));
    }
    section.push('\n');

    section
}

/// Generate the distribution (doughnut) section.
fn generate_distribution_section(distribution: &DistributionData) -> String {
    let mut section = String::new();

    section.push_str(&format!("## {}\n\n", distribution.title));

    if distribution.labels.is_empty() {
        section.push_str("No data for the current filters.\n\n");
        return section;
    }

    section.push_str("| Sector | Total Impact | Color |\n");
    section.push_str("|:---|---:|:---|\n");
    for (i, label) in distribution.labels.iter().enumerate() {
        section.push_str(&format!(
            "| {} | {} | `{}` |\n",
            label,
            format_value(distribution.values[i]),
            distribution.colors[i]
        ));
    }
    section.push('\n');

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str("*Report generated by Insightboard*\n");

    footer
}

/// Format a chart value: NaN is the "no data" sentinel and renders as a gap.
fn format_value(value: f64) -> String {
    if value.is_nan() {
        "—".to_string()
    } else {
        format!("{:.2}", value)
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    metadata: &'a ReportMetadata,
    dashboard: &'a ViewModel,
}

/// Generate a JSON report: the full view model with chart datasets.
///
/// NaN chart values serialize as `null`, the JSON encoding of "no data".
pub fn generate_json_report(view: &ViewModel, metadata: &ReportMetadata) -> Result<String> {
    serde_json::to_string_pretty(&JsonReport {
        metadata,
        dashboard: view,
    })
    .map_err(Into::into)
}
