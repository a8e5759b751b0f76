//! Evaluation statistics: metrics, aggregates, and the stats table.

use serde::{Deserialize, Serialize};

/// Per-player metrics evaluated for a bracket.
///
/// Variant order is the reporting order; second-level ("2") metrics count
/// contacts reachable through a partner's or opponent's other contacts.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    DistinctPartners,
    DistinctOpponents,
    DistinctInteractions,
    DistinctPartners2,
    MeanPartners2,
    SpreadPartners2,
    DistinctOpponents2,
    MeanOpponents2,
    SpreadOpponents2,
    DistinctInteractions2,
    MeanInteractions2,
    SpreadInteractions2,
}

impl Metric {
    /// All metrics, in reporting order.
    pub const ALL: [Metric; 12] = [
        Metric::DistinctPartners,
        Metric::DistinctOpponents,
        Metric::DistinctInteractions,
        Metric::DistinctPartners2,
        Metric::MeanPartners2,
        Metric::SpreadPartners2,
        Metric::DistinctOpponents2,
        Metric::MeanOpponents2,
        Metric::SpreadOpponents2,
        Metric::DistinctInteractions2,
        Metric::MeanInteractions2,
        Metric::SpreadInteractions2,
    ];

    /// Human-readable label (for rendering collaborators).
    pub fn label(&self) -> &'static str {
        match self {
            Metric::DistinctPartners => "Distinct Partners",
            Metric::DistinctOpponents => "Distinct Opponents",
            Metric::DistinctInteractions => "Distinct Players (any role)",
            Metric::DistinctPartners2 => "Distinct 2nd-level Partners",
            Metric::MeanPartners2 => "Mean 2nd-level Partnerships",
            Metric::SpreadPartners2 => "Spread of 2nd-level Partnerships",
            Metric::DistinctOpponents2 => "Distinct 2nd-level Opponents",
            Metric::MeanOpponents2 => "Mean 2nd-level Oppositions",
            Metric::SpreadOpponents2 => "Spread of 2nd-level Oppositions",
            Metric::DistinctInteractions2 => "Distinct 2nd-level Players (any role)",
            Metric::MeanInteractions2 => "Mean 2nd-level Interactions (any)",
            Metric::SpreadInteractions2 => "Spread of 2nd-level Interactions (any)",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

/// Divergence of an aggregate from its theoretical-optimal reference.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Divergence {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

/// Cross-player aggregate for one metric.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Population standard deviation across players.
    pub stdev: f64,
    /// Theoretical-optimal reference value, where a closed form exists.
    pub optimal: Option<f64>,
}

impl Aggregate {
    /// `aggregate - reference` for min/max/mean, when a reference exists.
    pub fn divergence(&self) -> Option<Divergence> {
        self.optimal.map(|opt| Divergence {
            min: self.min - opt,
            max: self.max - opt,
            mean: self.mean - opt,
        })
    }
}

/// Aggregates for every metric, in [`Metric::ALL`] order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatsTable {
    entries: Vec<Aggregate>,
}

impl StatsTable {
    pub(crate) fn new(entries: Vec<Aggregate>) -> Self {
        debug_assert_eq!(entries.len(), Metric::ALL.len());
        Self { entries }
    }

    pub fn get(&self, metric: Metric) -> &Aggregate {
        &self.entries[metric.index()]
    }

    /// Iterate metrics with their aggregates, in reporting order.
    pub fn iter(&self) -> impl Iterator<Item = (Metric, &Aggregate)> {
        Metric::ALL.iter().copied().zip(self.entries.iter())
    }
}
