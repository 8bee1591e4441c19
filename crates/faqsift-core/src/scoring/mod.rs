//! Scoring, filtering, representative selection and ranking.
//!
//! - [`metrics`] - size, cohesion, separation and the composite score
//! - [`filter`] - size-band admission
//! - [`representatives`] - members closest to the centroid
//! - [`ranking`] - dataset-wide ordering into [`SelectionRecord`]s

pub mod filter;
pub mod metrics;
pub mod ranking;
pub mod representatives;

pub use filter::{filter_subclusters, is_admissible};
pub use metrics::{
    cohesion, composite, normalize_sizes, score_subclusters, separation, ScoreTriple,
};
pub use ranking::{rank_subclusters, SelectionRecord};
pub use representatives::{order_by_centroid, select_representatives, Representative};

use crate::config::ScoreWeights;

/// A subcluster with its scores and representatives, ready for filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredSubcluster {
    /// `"{parent_id}/{index}"`
    pub subcluster_id: String,
    /// Parent cluster identifier
    pub parent_id: String,
    /// Canonical index inside the parent
    pub index: usize,
    /// k = 1 fallback of a degenerate parent
    pub degenerate: bool,
    /// Metrics and composite
    pub scores: ScoreTriple,
    /// Representatives, closest to the centroid first
    pub representatives: Vec<Representative>,
}

/// Re-normalizes sizes over every candidate of the dataset.
///
/// Replaces the per-parent `Z` and recomputes each composite. Degenerate
/// subclusters are left out of the min/max and keep their scores.
pub fn normalize_sizes_globally(candidates: &mut [ScoredSubcluster], weights: &ScoreWeights) {
    let counts: Vec<usize> = candidates
        .iter()
        .filter(|c| !c.degenerate)
        .map(|c| c.scores.size)
        .collect();
    let sizes = normalize_sizes(&counts);
    for (candidate, z) in candidates.iter_mut().filter(|c| !c.degenerate).zip(sizes) {
        candidate.scores = candidate.scores.with_normalized_size(z, weights);
    }
}
