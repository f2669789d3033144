//! Facet extraction: the distinct values available for each filter control.
//!
//! Facets are a pure function of the currently *filtered* collection, not
//! the raw source, so the option lists narrow as filters are applied.

use crate::models::{Field, Record};
use serde::Serialize;
use std::collections::HashSet;

/// Distinct values of `field` across `records`, deduplicated, in
/// first-occurrence order.
///
/// Insertion order is kept (no sort) so control ordering is deterministic
/// given identical input ordering.
pub fn distinct_values(records: &[Record], field: Field) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut values = Vec::new();

    for record in records {
        let value = field.value_of(record);
        if seen.insert(value) {
            values.push(value.to_string());
        }
    }

    values
}

/// The distinct value sets backing the seven filter controls.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Facets {
    pub years: Vec<String>,
    pub topics: Vec<String>,
    pub sectors: Vec<String>,
    pub regions: Vec<String>,
    pub pestles: Vec<String>,
    pub sources: Vec<String>,
    pub countries: Vec<String>,
}

impl Facets {
    /// Compute every facet list from the filtered collection.
    pub fn from_records(records: &[Record]) -> Self {
        Self {
            years: distinct_values(records, Field::EndYear),
            topics: distinct_values(records, Field::Topic),
            sectors: distinct_values(records, Field::Sector),
            regions: distinct_values(records, Field::Region),
            pestles: distinct_values(records, Field::Pestle),
            sources: distinct_values(records, Field::Source),
            countries: distinct_values(records, Field::Country),
        }
    }

    /// The facet list for one field.
    pub fn get(&self, field: Field) -> &[String] {
        match field {
            Field::EndYear => &self.years,
            Field::Topic => &self.topics,
            Field::Sector => &self.sectors,
            Field::Region => &self.regions,
            Field::Pestle => &self.pestles,
            Field::Source => &self.sources,
            Field::Country => &self.countries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FilterState;
    use crate::pipeline::filter::apply_user_filters;

    fn record(sector: &str, topic: &str, region: &str) -> Record {
        Record {
            sector: sector.to_string(),
            topic: topic.to_string(),
            region: region.to_string(),
            intensity: 1.0,
            likelihood: 1.0,
            relevance: 1.0,
            impact: 1.0,
            ..Record::default()
        }
    }

    #[test]
    fn test_distinct_values_dedupes() {
        let records = vec![
            record("Energy", "oil", "World"),
            record("Energy", "gas", "World"),
            record("Aerospace", "flight", "Europe"),
        ];

        let sectors = distinct_values(&records, Field::Sector);
        assert_eq!(sectors, vec!["Energy", "Aerospace"]);
        assert!(sectors.len() <= records.len());
    }

    #[test]
    fn test_first_occurrence_order_is_kept() {
        let records = vec![
            record("Retail", "a", "World"),
            record("Energy", "b", "World"),
            record("Retail", "c", "World"),
            record("Aerospace", "d", "World"),
        ];

        let sectors = distinct_values(&records, Field::Sector);
        assert_eq!(sectors, vec!["Retail", "Energy", "Aerospace"]);
    }

    #[test]
    fn test_no_duplicates_in_output() {
        let records = vec![
            record("Energy", "oil", "World"),
            record("Energy", "oil", "World"),
        ];

        let topics = distinct_values(&records, Field::Topic);
        assert_eq!(topics, vec!["oil"]);
    }

    #[test]
    fn test_facets_from_records() {
        let records = vec![
            record("Energy", "oil", "Northern America"),
            record("Aerospace", "flight", "Europe"),
        ];

        let facets = Facets::from_records(&records);
        assert_eq!(facets.sectors, vec!["Energy", "Aerospace"]);
        assert_eq!(facets.topics, vec!["oil", "flight"]);
        assert_eq!(facets.regions, vec!["Northern America", "Europe"]);
        assert_eq!(facets.get(Field::Sector), facets.sectors.as_slice());
    }

    #[test]
    fn test_facets_narrow_with_the_filtered_collection() {
        let records = vec![
            record("Energy", "oil", "World"),
            record("Aerospace", "flight", "Europe"),
        ];

        let mut state = FilterState::default();
        state.set(Field::Sector, "Energy");
        let filtered = apply_user_filters(&records, &state);

        let facets = Facets::from_records(&filtered);
        assert_eq!(facets.topics, vec!["oil"]);
        assert_eq!(facets.regions, vec!["World"]);
    }
}
