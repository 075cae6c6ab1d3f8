//! Aggregation helpers that turn a fetched plant list into the summaries the
//! analytics charts render. These are pure functions over an in-memory slice;
//! the caller fetches once and derives both breakdowns from the same data.

use std::collections::BTreeMap;

use crate::models::{Plant, PlantState};

/// Label used for plants that have no category assigned, so they still show
/// up as a slice in the category breakdown.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// How many plants sit in each care status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub healthy: usize,
    pub to_check: usize,
    pub sick: usize,
}

impl StatusCounts {
    /// Total number of plants counted, handy for percentage labels.
    pub fn total(&self) -> usize {
        self.healthy + self.to_check + self.sick
    }
}

/// Tally plants by derived care status.
pub fn status_counts(plants: &[Plant]) -> StatusCounts {
    let mut counts = StatusCounts::default();
    for plant in plants {
        match plant.state {
            PlantState::Healthy => counts.healthy += 1,
            PlantState::ToCheck => counts.to_check += 1,
            PlantState::Sick => counts.sick += 1,
        }
    }
    counts
}

/// Tally plants by category label. Uncategorized plants group under
/// [`UNCATEGORIZED`]; the map is ordered so chart slices come out in a
/// stable sequence.
pub fn category_counts(plants: &[Plant]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for plant in plants {
        let label = plant
            .category
            .clone()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| UNCATEGORIZED.to_string());
        *counts.entry(label).or_insert(0) += 1;
    }
    counts
}
