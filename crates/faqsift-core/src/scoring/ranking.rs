//! Dataset-wide ranking of surviving subclusters.

use super::ScoredSubcluster;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One selected subcluster, as handed to the generation stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionRecord {
    /// 1-based rank
    pub rank: usize,
    /// `"{parent_cluster_id}/{subcluster_index}"`
    pub subcluster_id: String,
    /// Parent cluster identifier
    pub parent_cluster_id: String,
    /// Canonical subcluster index inside the parent
    pub subcluster_index: usize,
    /// Raw member count
    pub size: usize,
    /// Normalized size `Z`
    pub normalized_size: f64,
    /// Cohesion `C`
    pub cohesion: f64,
    /// Separation `S`
    pub separation: f64,
    /// Composite score `Q`
    pub composite_score: f64,
    /// Representative ticket ids, closest to the centroid first
    pub representatives: Vec<String>,
    /// Summaries of the representatives that carry one, same order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub summaries: Vec<String>,
    /// Resolutions of the representatives that carry one, same order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resolutions: Vec<String>,
}

impl SelectionRecord {
    fn from_scored(rank: usize, scored: ScoredSubcluster) -> Self {
        let summaries = scored
            .representatives
            .iter()
            .filter_map(|r| r.summary.clone())
            .collect();
        let resolutions = scored
            .representatives
            .iter()
            .filter_map(|r| r.resolution.clone())
            .collect();
        let representatives = scored
            .representatives
            .into_iter()
            .map(|r| r.ticket_id)
            .collect();

        Self {
            rank,
            subcluster_id: scored.subcluster_id,
            parent_cluster_id: scored.parent_id,
            subcluster_index: scored.index,
            size: scored.scores.size,
            normalized_size: scored.scores.normalized_size,
            cohesion: scored.scores.cohesion,
            separation: scored.scores.separation,
            composite_score: scored.scores.composite,
            representatives,
            summaries,
            resolutions,
        }
    }
}

/// Orders two candidates: higher composite first, then larger normalized size.
fn compare(a: &ScoredSubcluster, b: &ScoredSubcluster) -> Ordering {
    b.scores
        .composite
        .total_cmp(&a.scores.composite)
        .then_with(|| b.scores.normalized_size.total_cmp(&a.scores.normalized_size))
}

/// Ranks `candidates` and keeps the best `top_n`.
///
/// `candidates` must be in creation order (parent first-appearance order,
/// then subcluster index); remaining ties keep that order.
pub fn rank_subclusters(candidates: Vec<ScoredSubcluster>, top_n: usize) -> Vec<SelectionRecord> {
    let mut ordered = candidates;
    ordered.sort_by(compare);
    ordered
        .into_iter()
        .take(top_n)
        .enumerate()
        .map(|(i, scored)| SelectionRecord::from_scored(i + 1, scored))
        .collect()
}
