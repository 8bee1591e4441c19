//! k selection and subcluster partitioning for one parent cluster.

use super::kmeans::{kmeans, KMeansParams, KMeansResult};
use super::silhouette::silhouette_score;
use crate::config::SelectionConfig;
use crate::embedding::l2_normalize;
use crate::error::SelectionError;
use crate::similarity::SimilarityMatrix;
use serde::Serialize;
use tracing::{debug, instrument};

/// Why a candidate k was not eligible for selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum CandidateRejection {
    /// k is not below the member count, so the silhouette is undefined
    TooFewMembers,
    /// k-means converged to fewer non-empty clusters than requested
    Collapsed {
        /// Non-empty clusters found
        found: usize,
    },
    /// A subcluster was smaller than `min_subcluster_members`
    UndersizedSubcluster {
        /// Size of the smallest subcluster
        smallest: usize,
    },
    /// The largest subcluster held more than `max_subcluster_share` of members
    Unbalanced {
        /// Share of the largest subcluster
        largest_share: f64,
    },
}

/// Goodness signals recorded for one candidate k.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateDiagnostics {
    /// Candidate subcluster count
    pub k: usize,
    /// Within-cluster sum of squares (elbow signal), if k-means ran
    pub inertia: Option<f64>,
    /// Mean silhouette, if the candidate was eligible
    pub silhouette: Option<f64>,
    /// Reason the candidate was ineligible
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection: Option<CandidateRejection>,
}

/// Outcome of k selection for one parent cluster.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KSelection {
    /// Chosen subcluster count (1 when degenerate)
    pub k: usize,
    /// k implied by the elbow of the inertia curve, if one could be located
    pub elbow_k: Option<usize>,
    /// True when no candidate produced a positive silhouette
    pub degenerate: bool,
    /// Per-candidate signals, in ascending k order
    pub diagnostics: Vec<CandidateDiagnostics>,
}

/// A partition cell of one parent cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct Subcluster {
    /// Owning parent cluster
    pub parent_id: String,
    /// Canonical index inside the parent (by first member)
    pub index: usize,
    /// Member positions in the parent, ascending (input order)
    pub members: Vec<usize>,
    /// Unit-length mean of the member vectors
    pub centroid: Vec<f32>,
    /// Set for the k = 1 fallback of a degenerate parent
    pub degenerate: bool,
}

impl Subcluster {
    /// Identifier of the form `"{parent_id}/{index}"`.
    pub fn id(&self) -> String {
        format!("{}/{}", self.parent_id, self.index)
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns true if the subcluster has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// A parent cluster split into subclusters.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    /// Parent cluster identifier
    pub parent_id: String,
    /// How k was chosen
    pub selection: KSelection,
    /// Subclusters in canonical order
    pub subclusters: Vec<Subcluster>,
}

/// Chooses k for one parent cluster.
///
/// `vectors` are the parent's normalized vectors and `matrix` their
/// similarity matrix. The candidate with the highest mean silhouette wins,
/// the smallest k on ties, regardless of where the elbow lies. When no
/// candidate reaches a positive silhouette the selection falls back to k = 1
/// and is flagged degenerate.
///
/// # Errors
///
/// `SelectionError::InsufficientMembers` when the parent has fewer than
/// twice the smallest candidate k members.
pub fn select_k(
    parent_id: &str,
    vectors: &[Vec<f32>],
    matrix: &SimilarityMatrix,
    config: &SelectionConfig,
) -> Result<KSelection, SelectionError> {
    evaluate(parent_id, vectors, matrix, config).map(|(selection, _)| selection)
}

/// Partitions one parent cluster into subclusters.
#[instrument(skip_all, fields(parent = %parent_id, members = vectors.len()))]
pub fn partition_parent(
    parent_id: &str,
    vectors: &[Vec<f32>],
    matrix: &SimilarityMatrix,
    config: &SelectionConfig,
) -> Result<Partition, SelectionError> {
    let (selection, fit) = evaluate(parent_id, vectors, matrix, config)?;

    let labels = match fit {
        Some(result) => result.labels,
        None => vec![0; vectors.len()],
    };
    let k = labels.iter().copied().max().map(|m| m + 1).unwrap_or(0);

    let mut groups: Vec<Vec<usize>> = vec![Vec::new(); k];
    for (position, &label) in labels.iter().enumerate() {
        groups[label].push(position);
    }

    let subclusters = groups
        .into_iter()
        .enumerate()
        .map(|(index, members)| Subcluster {
            parent_id: parent_id.to_string(),
            index,
            centroid: centroid(vectors, &members),
            members,
            degenerate: selection.degenerate,
        })
        .collect();

    Ok(Partition {
        parent_id: parent_id.to_string(),
        selection,
        subclusters,
    })
}

/// Runs every candidate k and picks the winner, keeping its fit.
fn evaluate(
    parent_id: &str,
    vectors: &[Vec<f32>],
    matrix: &SimilarityMatrix,
    config: &SelectionConfig,
) -> Result<(KSelection, Option<KMeansResult>), SelectionError> {
    let n = vectors.len();
    let required = 2 * config.min_candidate();
    if n < required {
        return Err(SelectionError::InsufficientMembers {
            parent: parent_id.to_string(),
            members: n,
            required,
        });
    }

    let mut diagnostics = Vec::new();
    let mut fits: Vec<Option<KMeansResult>> = Vec::new();

    for k in config.sorted_candidates() {
        if k >= n {
            diagnostics.push(CandidateDiagnostics {
                k,
                inertia: None,
                silhouette: None,
                rejection: Some(CandidateRejection::TooFewMembers),
            });
            fits.push(None);
            continue;
        }

        let fit = kmeans(
            vectors,
            &KMeansParams {
                k,
                n_init: config.n_init,
                max_iter: config.max_iter,
                seed: config.random_seed,
            },
        );

        let rejection = check_balance(&fit, k, n, config);
        let silhouette = match rejection {
            Some(_) => None,
            None => silhouette_score(&fit.labels, matrix),
        };

        debug!(k, inertia = fit.inertia, silhouette = ?silhouette, "Evaluated candidate");

        diagnostics.push(CandidateDiagnostics {
            k,
            inertia: Some(fit.inertia),
            silhouette,
            rejection,
        });
        fits.push(Some(fit));
    }

    let elbow_k = elbow(&diagnostics);
    let winner = silhouette_winner(&diagnostics)
        .and_then(|position| fits.get_mut(position).and_then(Option::take));

    match winner {
        Some(fit) => {
            let k = fit.k();
            if let Some(elbow) = elbow_k.filter(|&e| e != k) {
                debug!(
                    silhouette_k = k,
                    elbow_k = elbow,
                    "Elbow and silhouette disagree, using silhouette"
                );
            }
            Ok((
                KSelection {
                    k,
                    elbow_k,
                    degenerate: false,
                    diagnostics,
                },
                Some(fit),
            ))
        }
        None => Ok((
            KSelection {
                k: 1,
                elbow_k,
                degenerate: true,
                diagnostics,
            },
            None,
        )),
    }
}

/// Position of the candidate with the highest positive silhouette.
///
/// Candidates are in ascending k order and a later one wins only with a
/// strictly greater silhouette, so ties go to the smallest k. The elbow plays
/// no part.
fn silhouette_winner(diagnostics: &[CandidateDiagnostics]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (position, candidate) in diagnostics.iter().enumerate() {
        let Some(score) = candidate.silhouette.filter(|&s| s > 0.0) else {
            continue;
        };
        if best.map(|(_, best_score)| score > best_score).unwrap_or(true) {
            best = Some((position, score));
        }
    }
    best.map(|(position, _)| position)
}

fn check_balance(
    fit: &KMeansResult,
    k: usize,
    n: usize,
    config: &SelectionConfig,
) -> Option<CandidateRejection> {
    if fit.k() < k {
        return Some(CandidateRejection::Collapsed { found: fit.k() });
    }

    let sizes = fit.cluster_sizes();
    let smallest = sizes.iter().copied().min().unwrap_or(0);
    if smallest < config.min_subcluster_members {
        return Some(CandidateRejection::UndersizedSubcluster { smallest });
    }

    let largest_share = sizes.iter().copied().max().unwrap_or(0) as f64 / n as f64;
    if largest_share > config.max_subcluster_share {
        return Some(CandidateRejection::Unbalanced { largest_share });
    }

    None
}

/// Locates the elbow of the inertia curve.
///
/// Both axes are min-max normalized; the elbow is the point farthest from
/// the chord joining the first and last fitted candidates. Needs at least
/// three fitted candidates.
fn elbow(diagnostics: &[CandidateDiagnostics]) -> Option<usize> {
    let points: Vec<(f64, f64)> = diagnostics
        .iter()
        .filter_map(|d| d.inertia.map(|i| (d.k as f64, i)))
        .collect();
    if points.len() < 3 {
        return None;
    }

    let (k_min, k_max) = (points[0].0, points[points.len() - 1].0);
    let i_min = points.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
    let i_max = points.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
    let scale = |v: f64, lo: f64, hi: f64| if hi > lo { (v - lo) / (hi - lo) } else { 0.0 };

    let normalized: Vec<(f64, f64)> = points
        .iter()
        .map(|&(k, i)| (scale(k, k_min, k_max), scale(i, i_min, i_max)))
        .collect();

    let (x0, y0) = normalized[0];
    let (x1, y1) = normalized[normalized.len() - 1];
    let (dx, dy) = (x1 - x0, y1 - y0);
    let chord = (dx * dx + dy * dy).sqrt();
    if chord == 0.0 {
        return None;
    }

    let mut best: Option<(usize, f64)> = None;
    for (idx, &(x, y)) in normalized.iter().enumerate() {
        let dist = (dy * x - dx * y + x1 * y0 - y1 * x0).abs() / chord;
        if best.map(|(_, d)| dist > d).unwrap_or(true) {
            best = Some((idx, dist));
        }
    }

    best.map(|(idx, _)| points[idx].0 as usize)
}

/// Unit-length mean of the selected vectors.
fn centroid(vectors: &[Vec<f32>], members: &[usize]) -> Vec<f32> {
    let dim = vectors.first().map(|v| v.len()).unwrap_or(0);
    let mut sum = vec![0.0f64; dim];
    for &m in members {
        for (s, &x) in sum.iter_mut().zip(&vectors[m]) {
            *s += x as f64;
        }
    }
    let count = members.len().max(1) as f64;
    let mut mean: Vec<f32> = sum.into_iter().map(|s| (s / count) as f32).collect();
    l2_normalize(&mut mean);
    mean
}
