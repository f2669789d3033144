//! Data models for the insight dashboard.
//!
//! This module contains the core data structures used throughout the
//! application: survey records, filter state, and chart-ready datasets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// One survey observation fetched from the record source.
///
/// Unknown JSON fields are ignored and missing fields fall back to defaults
/// (empty string / zero), so a partial record fails the validity gate or a
/// filter equality check instead of aborting the whole fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Record {
    /// Economic sector the observation belongs to.
    pub sector: String,
    /// Topic of the observation.
    pub topic: String,
    /// Geographic region.
    pub region: String,
    /// PESTLE category label.
    pub pestle: String,
    /// Publication or source name.
    pub source: String,
    /// Country of the observation.
    pub country: String,
    /// Year expressed as text; may be empty.
    pub end_year: String,
    /// Intensity score, expected > 0 for a valid record.
    pub intensity: f64,
    /// Likelihood score, expected > 0 for a valid record.
    pub likelihood: f64,
    /// Relevance score, expected > 0 for a valid record.
    pub relevance: f64,
    /// Impact score, expected > 0 for a valid record.
    pub impact: f64,
}

impl Record {
    /// A record is valid iff `sector` and `topic` are non-empty and all four
    /// numeric scores are strictly greater than zero.
    pub fn is_valid(&self) -> bool {
        !self.sector.is_empty()
            && !self.topic.is_empty()
            && self.intensity > 0.0
            && self.likelihood > 0.0
            && self.relevance > 0.0
            && self.impact > 0.0
    }
}

/// The seven category fields a filter or facet can address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    EndYear,
    Topic,
    Sector,
    Region,
    Pestle,
    Source,
    Country,
}

impl Field {
    /// All filterable fields, in display order.
    pub const ALL: [Field; 7] = [
        Field::EndYear,
        Field::Topic,
        Field::Sector,
        Field::Region,
        Field::Pestle,
        Field::Source,
        Field::Country,
    ];

    /// The value this field takes on a record.
    pub fn value_of<'a>(&self, record: &'a Record) -> &'a str {
        match self {
            Field::EndYear => &record.end_year,
            Field::Topic => &record.topic,
            Field::Sector => &record.sector,
            Field::Region => &record.region,
            Field::Pestle => &record.pestle,
            Field::Source => &record.source,
            Field::Country => &record.country,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::EndYear => write!(f, "End Year"),
            Field::Topic => write!(f, "Topic"),
            Field::Sector => write!(f, "Sector"),
            Field::Region => write!(f, "Region"),
            Field::Pestle => write!(f, "PEST"),
            Field::Source => write!(f, "Source"),
            Field::Country => write!(f, "Country"),
        }
    }
}

/// User-selected filter values, one per dimension.
///
/// An empty string means "no constraint" for that dimension. Each field is
/// independently optional, so the state is never partially invalid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    pub end_year: String,
    pub topic: String,
    pub sector: String,
    pub region: String,
    pub pestle: String,
    pub source: String,
    pub country: String,
}

impl FilterState {
    /// Returns true when no dimension is constrained.
    pub fn is_unconstrained(&self) -> bool {
        Field::ALL.iter().all(|f| self.get(*f).is_empty())
    }

    /// The selected value for a dimension (empty = no constraint).
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::EndYear => &self.end_year,
            Field::Topic => &self.topic,
            Field::Sector => &self.sector,
            Field::Region => &self.region,
            Field::Pestle => &self.pestle,
            Field::Source => &self.source,
            Field::Country => &self.country,
        }
    }

    /// Set the selected value for a dimension.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::EndYear => self.end_year = value,
            Field::Topic => self.topic = value,
            Field::Sector => self.sector = value,
            Field::Region => self.region = value,
            Field::Pestle => self.pestle = value,
            Field::Source => self.source = value,
            Field::Country => self.country = value,
        }
    }

    /// The currently active (non-empty) selections, in display order.
    pub fn active(&self) -> Vec<(Field, &str)> {
        Field::ALL
            .iter()
            .map(|f| (*f, self.get(*f)))
            .filter(|(_, v)| !v.is_empty())
            .collect()
    }
}

/// RGBA color rendered in CSS functional notation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub alpha: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, alpha: f32) -> Self {
        Self { r, g, b, alpha }
    }

    /// CSS `rgba(...)` notation, as handed to a chart renderer.
    pub fn css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.alpha)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.css())
    }
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.css())
    }
}

/// Series colors for the four metric series used by the sector and topic views.
pub const INTENSITY_COLOR: Rgba = Rgba::new(75, 192, 192, 0.6);
pub const LIKELIHOOD_COLOR: Rgba = Rgba::new(153, 102, 255, 0.6);
pub const RELEVANCE_COLOR: Rgba = Rgba::new(255, 159, 64, 0.6);
pub const IMPACT_COLOR: Rgba = Rgba::new(255, 99, 132, 0.6);

/// One chart series: a label, one value per category label, and a color.
///
/// Values are `f64::NAN` where a category had no matching records; the
/// report layer renders those as gaps.
#[derive(Debug, Clone, Serialize)]
pub struct Series {
    pub label: String,
    pub data: Vec<f64>,
    pub color: Rgba,
}

/// Chart-ready dataset: category labels plus parallel series.
#[derive(Debug, Clone, Serialize)]
pub struct ChartData {
    pub title: String,
    pub labels: Vec<String>,
    pub datasets: Vec<Series>,
}

/// One point of the intensity-over-time series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimePoint {
    pub year: String,
    pub average_intensity: f64,
}

/// Time-series view: points ordered by ascending year string.
#[derive(Debug, Clone, Serialize)]
pub struct TimeSeriesData {
    pub title: String,
    pub points: Vec<TimePoint>,
}

/// Distribution view (doughnut): one value and one color per slice.
#[derive(Debug, Clone, Serialize)]
pub struct DistributionData {
    pub title: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub colors: Vec<Rgba>,
}

/// Metadata attached to a rendered dashboard report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// Record source endpoint the collection came from.
    pub endpoint: String,
    /// When the held collection was fetched.
    pub fetched_at: DateTime<Utc>,
}

/// The four chart views derived from one filtered collection.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardCharts {
    /// Bar: average intensity/likelihood/relevance/impact by sector.
    pub sector_bar: ChartData,
    /// Line: average intensity over time.
    pub intensity_line: TimeSeriesData,
    /// Radar: average intensity/likelihood/relevance/impact by topic.
    pub topic_radar: ChartData,
    /// Doughnut: impact totals by sector.
    pub impact_doughnut: DistributionData,
}
