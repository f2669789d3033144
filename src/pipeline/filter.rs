//! Record filtering: the validity gate and user-selected filters.
//!
//! Both functions are pure, deterministic, and order-preserving.

use crate::models::{Field, FilterState, Record};

/// Returns the subset of records satisfying the validity invariant:
/// non-empty sector and topic, all four scores strictly positive.
///
/// Invalid records are dropped here and never reappear downstream.
/// Idempotent: re-running on its own output is a fixed point.
pub fn validate(records: &[Record]) -> Vec<Record> {
    records.iter().filter(|r| r.is_valid()).cloned().collect()
}

/// Returns the subset of records matching every non-empty filter dimension.
///
/// Matching is exact, case-sensitive string equality. Dimensions left empty
/// impose no constraint, so an all-empty state returns the input unchanged.
/// A record missing a field carries an empty string there and simply fails
/// the equality check against a non-empty selection.
pub fn apply_user_filters(records: &[Record], state: &FilterState) -> Vec<Record> {
    if state.is_unconstrained() {
        return records.to_vec();
    }

    records
        .iter()
        .filter(|record| {
            Field::ALL.iter().all(|field| {
                let selected = state.get(*field);
                selected.is_empty() || field.value_of(record) == selected
            })
        })
        .cloned()
        .collect()
}
