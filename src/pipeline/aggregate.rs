//! Aggregation: the per-year and per-category statistics behind the charts.
//!
//! All functions here are pure and recompute from scratch on every render.
//! An empty bucket averages to `f64::NAN`, the defined "no data" sentinel;
//! nothing in this module panics on empty input.

use crate::models::{
    ChartData, DashboardCharts, DistributionData, Field, Record, Rgba, Series, TimePoint,
    TimeSeriesData, IMPACT_COLOR, INTENSITY_COLOR, LIKELIHOOD_COLOR, RELEVANCE_COLOR,
};
use crate::pipeline::facets::Facets;
use std::collections::BTreeMap;

/// Titles of the four chart views.
pub const SECTOR_BAR_TITLE: &str =
    "Average Intensity, Likelihood, Relevance, and Impact by Sector";
pub const INTENSITY_LINE_TITLE: &str = "Average Intensity Over Time";
pub const TOPIC_RADAR_TITLE: &str =
    "Average Intensity, Likelihood, Relevance, and Impact by Topic";
pub const IMPACT_DOUGHNUT_TITLE: &str = "Impact Distribution by Sector";

/// Running sum and count for one aggregate bucket.
#[derive(Debug, Clone, Copy, Default)]
struct Bucket {
    sum: f64,
    count: usize,
}

impl Bucket {
    fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn average(&self) -> f64 {
        if self.count == 0 {
            f64::NAN
        } else {
            self.sum / self.count as f64
        }
    }
}

/// Average intensity per end year, ordered by ascending year string.
///
/// Ordering is the lexicographic string sort of the year keys, kept as-is
/// rather than parsed numerically; for four-digit years the two coincide.
pub fn intensity_over_time(records: &[Record]) -> Vec<TimePoint> {
    let mut buckets: BTreeMap<&str, Bucket> = BTreeMap::new();

    for record in records {
        buckets
            .entry(record.end_year.as_str())
            .or_default()
            .push(record.intensity);
    }

    buckets
        .into_iter()
        .map(|(year, bucket)| TimePoint {
            year: year.to_string(),
            average_intensity: bucket.average(),
        })
        .collect()
}

/// Per-category averages of the four metrics, one series per metric and one
/// value per category, in the given category order.
///
/// Categories are normally derived from the same filtered collection, so an
/// empty bucket should not occur; when it does the value is NaN, never a
/// panic.
pub fn category_chart_data(
    records: &[Record],
    categories: &[String],
    field: Field,
    title: &str,
) -> ChartData {
    ChartData {
        title: title.to_string(),
        labels: categories.to_vec(),
        datasets: vec![
            average_series(records, categories, field, "Average Intensity", INTENSITY_COLOR, |r| {
                r.intensity
            }),
            average_series(records, categories, field, "Average Likelihood", LIKELIHOOD_COLOR, |r| {
                r.likelihood
            }),
            average_series(records, categories, field, "Average Relevance", RELEVANCE_COLOR, |r| {
                r.relevance
            }),
            average_series(records, categories, field, "Average Impact", IMPACT_COLOR, |r| {
                r.impact
            }),
        ],
    }
}

fn average_series(
    records: &[Record],
    categories: &[String],
    field: Field,
    label: &str,
    color: Rgba,
    metric: fn(&Record) -> f64,
) -> Series {
    let data = categories
        .iter()
        .map(|category| {
            let mut bucket = Bucket::default();
            for record in records.iter().filter(|r| field.value_of(r) == category) {
                bucket.push(metric(record));
            }
            bucket.average()
        })
        .collect();

    Series {
        label: label.to_string(),
        data,
        color,
    }
}

/// Total impact per sector (sum, not average) plus the deterministic slice
/// color per sector index.
pub fn sector_impact_totals(
    records: &[Record],
    sectors: &[String],
    title: &str,
) -> DistributionData {
    let values = sectors
        .iter()
        .map(|sector| {
            records
                .iter()
                .filter(|r| r.sector == *sector)
                .map(|r| r.impact)
                .sum()
        })
        .collect();

    let colors = (0..sectors.len()).map(sector_color).collect();

    DistributionData {
        title: title.to_string(),
        labels: sectors.to_vec(),
        values,
        colors,
    }
}

/// Slice color for sector index `i`: each channel wraps independently at 255.
pub fn sector_color(index: usize) -> Rgba {
    Rgba::new(
        (index * 50 % 255) as u8,
        (index * 80 % 255) as u8,
        (index * 120 % 255) as u8,
        0.6,
    )
}

/// Derive all four chart views from one filtered collection and its facets.
pub fn dashboard_charts(records: &[Record], facets: &Facets) -> DashboardCharts {
    DashboardCharts {
        sector_bar: category_chart_data(records, &facets.sectors, Field::Sector, SECTOR_BAR_TITLE),
        intensity_line: TimeSeriesData {
            title: INTENSITY_LINE_TITLE.to_string(),
            points: intensity_over_time(records),
        },
        topic_radar: category_chart_data(records, &facets.topics, Field::Topic, TOPIC_RADAR_TITLE),
        impact_doughnut: sector_impact_totals(records, &facets.sectors, IMPACT_DOUGHNUT_TITLE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(sector: &str, end_year: &str, intensity: f64, impact: f64) -> Record {
        Record {
            sector: sector.to_string(),
            topic: "topic".to_string(),
            end_year: end_year.to_string(),
            intensity,
            likelihood: 1.0,
            relevance: 1.0,
            impact,
            ..Record::default()
        }
    }

    #[test]
    fn test_intensity_over_time_averages_per_year() {
        let records = vec![
            record("A", "2020", 10.0, 1.0),
            record("A", "2020", 20.0, 1.0),
            record("A", "2021", 30.0, 1.0),
        ];

        let points = intensity_over_time(&records);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].year, "2020");
        assert_eq!(points[0].average_intensity, 15.0);
        assert_eq!(points[1].year, "2021");
        assert_eq!(points[1].average_intensity, 30.0);
    }

    #[test]
    fn test_intensity_over_time_sorts_year_strings_lexicographically() {
        let records = vec![
            record("A", "999", 1.0, 1.0),
            record("A", "2022", 2.0, 1.0),
            record("A", "", 3.0, 1.0),
        ];

        let years: Vec<String> = intensity_over_time(&records)
            .into_iter()
            .map(|p| p.year)
            .collect();
        assert_eq!(years, vec!["", "2022", "999"]);
    }

    #[test]
    fn test_intensity_over_time_empty_input() {
        assert!(intensity_over_time(&[]).is_empty());
    }

    #[test]
    fn test_category_chart_data_average_impact() {
        let records = vec![
            record("A", "2020", 1.0, 2.0),
            record("A", "2020", 1.0, 4.0),
            record("B", "2020", 1.0, 6.0),
        ];
        let categories = vec!["A".to_string(), "B".to_string()];

        let chart = category_chart_data(&records, &categories, Field::Sector, SECTOR_BAR_TITLE);
        assert_eq!(chart.labels, categories);
        assert_eq!(chart.datasets.len(), 4);

        let impact = &chart.datasets[3];
        assert_eq!(impact.label, "Average Impact");
        assert_eq!(impact.data, vec![3.0, 6.0]);
    }

    #[test]
    fn test_category_chart_data_series_order_and_colors() {
        let records = vec![record("A", "2020", 5.0, 1.0)];
        let categories = vec!["A".to_string()];

        let chart = category_chart_data(&records, &categories, Field::Sector, SECTOR_BAR_TITLE);
        let labels: Vec<&str> = chart.datasets.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Average Intensity",
                "Average Likelihood",
                "Average Relevance",
                "Average Impact"
            ]
        );
        assert_eq!(chart.datasets[0].color, INTENSITY_COLOR);
        assert_eq!(chart.datasets[0].data, vec![5.0]);
    }

    #[test]
    fn test_empty_category_bucket_is_nan() {
        let records = vec![record("A", "2020", 1.0, 1.0)];
        let categories = vec!["A".to_string(), "Ghost".to_string()];

        let chart = category_chart_data(&records, &categories, Field::Sector, SECTOR_BAR_TITLE);
        assert!(chart.datasets[0].data[1].is_nan());
    }

    #[test]
    fn test_sector_impact_totals_sums_not_averages() {
        let records = vec![
            record("A", "2020", 1.0, 2.0),
            record("A", "2020", 1.0, 4.0),
            record("B", "2020", 1.0, 6.0),
        ];
        let sectors = vec!["A".to_string(), "B".to_string()];

        let doughnut = sector_impact_totals(&records, &sectors, IMPACT_DOUGHNUT_TITLE);
        assert_eq!(doughnut.values, vec![6.0, 6.0]);
        assert_eq!(doughnut.colors.len(), 2);
    }

    #[test]
    fn test_sector_color_formula() {
        assert_eq!(sector_color(0), Rgba::new(0, 0, 0, 0.6));
        assert_eq!(sector_color(1), Rgba::new(50, 80, 120, 0.6));
        assert_eq!(sector_color(3), Rgba::new(150, 240, 105, 0.6));
        // 6*50 = 300 wraps to 45.
        assert_eq!(sector_color(6).r, 45);
    }

    #[test]
    fn test_dashboard_charts_views() {
        let records = vec![
            record("A", "2020", 10.0, 2.0),
            record("B", "2021", 20.0, 4.0),
        ];
        let facets = Facets::from_records(&records);

        let charts = dashboard_charts(&records, &facets);
        assert_eq!(charts.sector_bar.title, SECTOR_BAR_TITLE);
        assert_eq!(charts.intensity_line.points.len(), 2);
        assert_eq!(charts.topic_radar.labels, vec!["topic"]);
        assert_eq!(charts.impact_doughnut.values, vec![2.0, 4.0]);
    }
}
