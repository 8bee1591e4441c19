//! Representative selection: members closest to the subcluster centroid.

use crate::clustering::Subcluster;
use crate::embedding::ParentCluster;
use crate::similarity::cosine_similarity;
use serde::Serialize;

/// A member exposed as representative of its subcluster.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Representative {
    /// Ticket identifier
    pub ticket_id: String,
    /// Cosine similarity to the subcluster centroid
    pub similarity: f64,
    /// Issue summary, if the input carried one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Resolution, if the input carried one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
}

/// Members of `subcluster` ordered by descending similarity to its centroid.
///
/// Returns `(member position, similarity)` pairs. Equal similarities keep
/// the parent's input order.
pub fn order_by_centroid(subcluster: &Subcluster, vectors: &[Vec<f32>]) -> Vec<(usize, f64)> {
    let mut ordered: Vec<(usize, f64)> = subcluster
        .members
        .iter()
        .map(|&m| (m, cosine_similarity(&vectors[m], &subcluster.centroid)))
        .collect();
    // Stable sort: ties stay in member order
    ordered.sort_by(|a, b| b.1.total_cmp(&a.1));
    ordered
}

/// Picks up to `count` representatives of `subcluster`.
///
/// With a `word_budget`, representatives are taken in order while the
/// cumulative summary + resolution word count stays within the budget. The
/// first representative is always kept.
pub fn select_representatives(
    subcluster: &Subcluster,
    parent: &ParentCluster,
    vectors: &[Vec<f32>],
    count: usize,
    word_budget: Option<usize>,
) -> Vec<Representative> {
    let members = parent.members();
    let mut selected = Vec::new();
    let mut words = 0usize;

    for (position, similarity) in order_by_centroid(subcluster, vectors) {
        if selected.len() >= count {
            break;
        }
        let record = &members[position];
        if let Some(budget) = word_budget {
            let entry = record.word_count();
            if !selected.is_empty() && words + entry > budget {
                break;
            }
            words += entry;
        }
        selected.push(Representative {
            ticket_id: record.ticket_id.clone(),
            similarity,
            summary: record.summary.clone(),
            resolution: record.resolution.clone(),
        });
    }

    selected
}
