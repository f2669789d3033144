//! Dashboard state: the single owner of records, filters, and the fetch
//! lifecycle.
//!
//! All mutable state lives here; the pipeline stages stay pure and are
//! re-run from scratch against the held collection on every `view()` call.
//! Refreshes are sequence-numbered so a completion that arrives after a
//! newer one has already been applied is discarded instead of overwriting
//! fresher data.

use crate::client::{FetchError, RecordClient};
use crate::models::{DashboardCharts, Field, FilterState, Record};
use crate::pipeline::{apply_user_filters, dashboard_charts, validate, Facets};
use serde::Serialize;
use tracing::{debug, warn};

/// Fetch lifecycle of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    /// No fetch has been issued yet.
    Idle,
    /// A fetch is in flight.
    Fetching,
    /// The latest issued fetch has completed (successfully or not).
    Ready,
}

/// Result of delivering a fetch completion to the state.
#[derive(Debug, PartialEq)]
pub enum RefreshOutcome {
    /// The collection was replaced with freshly validated records.
    Applied { valid: usize, dropped: usize },
    /// The fetch failed; prior records are kept and the error recorded.
    Failed(String),
    /// The completion was older than one already applied and was discarded.
    Stale,
}

/// The complete view model derived from the current state.
///
/// Everything here is recomputed from the held collection on demand; nothing
/// is cached between renders.
#[derive(Debug, Clone, Serialize)]
pub struct ViewModel {
    /// Validated records currently held.
    pub fetched_records: usize,
    /// Records matching the active filters.
    pub matching_records: usize,
    /// The active filter selections.
    pub filters: FilterState,
    /// Facet lists derived from the filtered collection.
    pub facets: Facets,
    /// The four chart views.
    pub charts: DashboardCharts,
    /// Error from the most recent refresh, if it failed. The held records
    /// are then the last-known-good collection.
    pub last_error: Option<String>,
}

/// Owner of the record collection and filter state.
#[derive(Debug, Default)]
pub struct DashboardState {
    records: Vec<Record>,
    filters: FilterState,
    fetch_seq: u64,
    applied_seq: u64,
    last_error: Option<String>,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current fetch lifecycle status.
    pub fn status(&self) -> FetchStatus {
        if self.fetch_seq == 0 {
            FetchStatus::Idle
        } else if self.applied_seq < self.fetch_seq {
            FetchStatus::Fetching
        } else {
            FetchStatus::Ready
        }
    }

    /// The validated records currently held.
    #[allow(dead_code)] // Accessor for interactive callers
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// The active filter state.
    #[allow(dead_code)] // Accessor for interactive callers
    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// Replace the whole filter state. Does not re-fetch.
    pub fn set_filters(&mut self, filters: FilterState) {
        self.filters = filters;
    }

    /// Set one filter dimension. Does not re-fetch.
    #[allow(dead_code)] // Utility for interactive filter updates
    pub fn set_filter(&mut self, field: Field, value: impl Into<String>) {
        self.filters.set(field, value);
    }

    /// Start a refresh: returns the sequence number to hand back to
    /// [`complete_refresh`].
    pub fn begin_refresh(&mut self) -> u64 {
        self.fetch_seq += 1;
        debug!("Refresh {} started", self.fetch_seq);
        self.fetch_seq
    }

    /// Deliver a fetch completion.
    ///
    /// A completion older than one already applied is discarded, so an
    /// out-of-order arrival never overwrites newer data. A successful
    /// completion replaces the collection wholesale with the validated
    /// subset; a failure keeps the last-known-good collection and records
    /// the error.
    pub fn complete_refresh(
        &mut self,
        seq: u64,
        result: Result<Vec<Record>, FetchError>,
    ) -> RefreshOutcome {
        if seq <= self.applied_seq {
            warn!(
                "Discarding stale fetch completion {} (already applied {})",
                seq, self.applied_seq
            );
            return RefreshOutcome::Stale;
        }
        self.applied_seq = seq;

        match result {
            Ok(raw) => {
                let valid = validate(&raw);
                let dropped = raw.len() - valid.len();
                debug!(
                    "Refresh {} applied: {} valid records, {} dropped",
                    seq,
                    valid.len(),
                    dropped
                );
                let count = valid.len();
                self.records = valid;
                self.last_error = None;
                RefreshOutcome::Applied {
                    valid: count,
                    dropped,
                }
            }
            Err(err) => {
                warn!("Refresh {} failed: {}", seq, err);
                let message = err.to_string();
                self.last_error = Some(message.clone());
                RefreshOutcome::Failed(message)
            }
        }
    }

    /// Fetch through the client and apply the completion.
    pub async fn refresh(&mut self, client: &RecordClient) -> RefreshOutcome {
        let seq = self.begin_refresh();
        let result = client.fetch_records().await;
        self.complete_refresh(seq, result)
    }

    /// Derive the complete view model from the current state.
    ///
    /// Filters are applied first, then facets and every chart are computed
    /// from the filtered collection.
    pub fn view(&self) -> ViewModel {
        let matching = apply_user_filters(&self.records, &self.filters);
        let facets = Facets::from_records(&matching);
        let charts = dashboard_charts(&matching, &facets);

        ViewModel {
            fetched_records: self.records.len(),
            matching_records: matching.len(),
            filters: self.filters.clone(),
            facets,
            charts,
            last_error: self.last_error.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = include_str!("../fixtures/records.json");

    fn fixture_records() -> Vec<Record> {
        serde_json::from_str(FIXTURE).unwrap()
    }

    fn status_error() -> FetchError {
        FetchError::Status {
            url: "http://example.test/api/data".to_string(),
            status: reqwest::StatusCode::BAD_GATEWAY,
        }
    }

    #[test]
    fn test_initial_state() {
        let state = DashboardState::new();
        assert_eq!(state.status(), FetchStatus::Idle);

        let view = state.view();
        assert_eq!(view.fetched_records, 0);
        assert_eq!(view.matching_records, 0);
        assert!(view.facets.sectors.is_empty());
        assert!(view.last_error.is_none());
    }

    #[test]
    fn test_refresh_lifecycle() {
        let mut state = DashboardState::new();

        let seq = state.begin_refresh();
        assert_eq!(state.status(), FetchStatus::Fetching);

        let outcome = state.complete_refresh(seq, Ok(fixture_records()));
        assert_eq!(state.status(), FetchStatus::Ready);
        assert_eq!(outcome, RefreshOutcome::Applied { valid: 3, dropped: 3 });
        assert!(state.records().iter().all(|r| r.is_valid()));
    }

    #[test]
    fn test_stale_completion_is_discarded() {
        let mut state = DashboardState::new();

        let older = state.begin_refresh();
        let newer = state.begin_refresh();

        let fresh = vec![Record {
            sector: "Energy".to_string(),
            topic: "fresh".to_string(),
            intensity: 1.0,
            likelihood: 1.0,
            relevance: 1.0,
            impact: 1.0,
            ..Record::default()
        }];

        assert!(matches!(
            state.complete_refresh(newer, Ok(fresh)),
            RefreshOutcome::Applied { .. }
        ));

        // The older fetch resolves late; its records must not win.
        let outcome = state.complete_refresh(older, Ok(fixture_records()));
        assert_eq!(outcome, RefreshOutcome::Stale);
        assert_eq!(state.records().len(), 1);
        assert_eq!(state.records()[0].topic, "fresh");
    }

    #[test]
    fn test_failed_refresh_keeps_last_known_good() {
        let mut state = DashboardState::new();

        let seq = state.begin_refresh();
        state.complete_refresh(seq, Ok(fixture_records()));
        let held = state.records().len();

        let seq = state.begin_refresh();
        let outcome = state.complete_refresh(seq, Err(status_error()));
        assert!(matches!(outcome, RefreshOutcome::Failed(_)));

        assert_eq!(state.records().len(), held);
        assert_eq!(state.status(), FetchStatus::Ready);

        let view = state.view();
        assert!(view.last_error.is_some());
        assert_eq!(view.fetched_records, held);
    }

    #[test]
    fn test_successful_refresh_clears_error() {
        let mut state = DashboardState::new();

        let seq = state.begin_refresh();
        state.complete_refresh(seq, Err(status_error()));
        assert!(state.view().last_error.is_some());

        let seq = state.begin_refresh();
        state.complete_refresh(seq, Ok(fixture_records()));
        assert!(state.view().last_error.is_none());
    }

    #[test]
    fn test_filter_changes_rerun_pipeline_without_refetch() {
        let mut state = DashboardState::new();
        let seq = state.begin_refresh();
        state.complete_refresh(seq, Ok(fixture_records()));

        let all = state.view();
        assert_eq!(all.matching_records, 3);

        state.set_filter(Field::Sector, "Energy");
        let energy = state.view();
        assert_eq!(energy.fetched_records, 3);
        assert_eq!(energy.matching_records, 2);
        // Facets narrow with the filtered collection.
        assert_eq!(energy.facets.topics, vec!["gas", "oil"]);
        assert_eq!(energy.facets.sectors, vec!["Energy"]);
    }

    #[test]
    fn test_end_to_end_scenario() {
        // Raw fixture: 6 records, 3 invalid. Filter to one sector, then one
        // country, and check the facet and chart derivations line up.
        let mut state = DashboardState::new();
        let seq = state.begin_refresh();
        state.complete_refresh(seq, Ok(fixture_records()));

        state.set_filter(Field::Sector, "Aerospace");
        let view = state.view();
        assert_eq!(view.matching_records, 1);
        assert_eq!(view.facets.topics, vec!["flight"]);
        assert_eq!(view.charts.impact_doughnut.labels, vec!["Aerospace"]);
        assert_eq!(view.charts.impact_doughnut.values, vec![6.0]);
        assert_eq!(view.charts.intensity_line.points.len(), 1);
        assert_eq!(view.charts.intensity_line.points[0].year, "2020");
    }
}
