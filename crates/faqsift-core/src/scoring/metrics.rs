//! Subcluster quality metrics and the composite score.
//!
//! Three metrics describe how useful a subcluster is as an FAQ candidate:
//! - Normalized size `Z` - how common the issue is
//! - Cohesion `C` - how consistent the tickets are
//! - Separation `S` - how distinct the issue is from its siblings
//!
//! They combine linearly into the composite `Q = w_Z·Z + w_C·C + w_S·S`.

use crate::clustering::Subcluster;
use crate::config::ScoreWeights;
use crate::similarity::SimilarityMatrix;
use serde::Serialize;

/// Metrics of one subcluster plus the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreTriple {
    /// Raw member count
    pub size: usize,
    /// Min-max normalized member count `Z` in [0, 1]
    pub normalized_size: f64,
    /// Mean intra-pair cosine `C` in [0, 1]
    pub cohesion: f64,
    /// Mean dissimilarity to sibling subclusters `S` in [0, 2]
    pub separation: f64,
    /// Weighted sum `Q`
    pub composite: f64,
}

impl ScoreTriple {
    /// Builds a triple and computes its composite.
    pub fn new(
        size: usize,
        normalized_size: f64,
        cohesion: f64,
        separation: f64,
        weights: &ScoreWeights,
    ) -> Self {
        Self {
            size,
            normalized_size,
            cohesion,
            separation,
            composite: composite(weights, normalized_size, cohesion, separation),
        }
    }

    /// Same metrics with a new normalized size, composite recomputed.
    pub fn with_normalized_size(&self, normalized_size: f64, weights: &ScoreWeights) -> Self {
        Self::new(
            self.size,
            normalized_size,
            self.cohesion,
            self.separation,
            weights,
        )
    }
}

// =============================================================================
// Size
// =============================================================================

/// Min-max normalizes member counts.
///
/// ```text
/// Z_i = (count_i − min) / (max − min)
/// ```
///
/// When every count is equal (including a single count) all values are 1.0.
pub fn normalize_sizes(counts: &[usize]) -> Vec<f64> {
    let min = counts.iter().copied().min().unwrap_or(0);
    let max = counts.iter().copied().max().unwrap_or(0);
    if max == min {
        return vec![1.0; counts.len()];
    }
    let range = (max - min) as f64;
    counts
        .iter()
        .map(|&c| (c - min) as f64 / range)
        .collect()
}

// =============================================================================
// Cohesion & separation
// =============================================================================

/// Mean intra-pair cosine of `members`, clipped to [0, 1].
///
/// A singleton scores 1.0; its size keeps it in check at the filter.
pub fn cohesion(matrix: &SimilarityMatrix, members: &[usize]) -> f64 {
    matrix.mean_intra(members).clamp(0.0, 1.0)
}

/// Mean dissimilarity of subcluster `target` to every other subcluster.
///
/// ```text
/// S_i = mean over j ≠ i of (1 − mean_cross(i, j))
/// ```
///
/// 0.0 when the parent has a single subcluster.
pub fn separation(matrix: &SimilarityMatrix, subclusters: &[Subcluster], target: usize) -> f64 {
    let others: Vec<&Subcluster> = subclusters
        .iter()
        .enumerate()
        .filter(|(j, _)| *j != target)
        .map(|(_, s)| s)
        .collect();
    if others.is_empty() {
        return 0.0;
    }

    let members = &subclusters[target].members;
    let total: f64 = others
        .iter()
        .map(|other| 1.0 - matrix.mean_cross(members, &other.members))
        .sum();
    (total / others.len() as f64).clamp(0.0, 2.0)
}

// =============================================================================
// Composite
// =============================================================================

/// Weighted composite `Q = w_Z·Z + w_C·C + w_S·S`.
#[inline]
pub fn composite(weights: &ScoreWeights, size: f64, cohesion: f64, separation: f64) -> f64 {
    weights.size * size + weights.cohesion * cohesion + weights.separation * separation
}

/// Scores every subcluster of one parent, normalizing sizes within the parent.
pub fn score_subclusters(
    matrix: &SimilarityMatrix,
    subclusters: &[Subcluster],
    weights: &ScoreWeights,
) -> Vec<ScoreTriple> {
    let counts: Vec<usize> = subclusters.iter().map(|s| s.len()).collect();
    let sizes = normalize_sizes(&counts);

    subclusters
        .iter()
        .enumerate()
        .map(|(i, sub)| {
            ScoreTriple::new(
                sub.len(),
                sizes[i],
                cohesion(matrix, &sub.members),
                separation(matrix, subclusters, i),
                weights,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(index: usize, members: Vec<usize>) -> Subcluster {
        Subcluster {
            parent_id: "p".to_string(),
            index,
            members,
            centroid: Vec::new(),
            degenerate: false,
        }
    }

    #[test]
    fn test_normalize_sizes_range() {
        let z = normalize_sizes(&[10, 20, 30]);
        assert_eq!(z, vec![0.0, 0.5, 1.0]);
        for v in normalize_sizes(&[3, 17, 9, 40, 5]) {
            assert!((0.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn test_uniform_sizes_normalize_to_one() {
        assert_eq!(normalize_sizes(&[7, 7, 7]), vec![1.0, 1.0, 1.0]);
        assert_eq!(normalize_sizes(&[4]), vec![1.0]);
        assert!(normalize_sizes(&[]).is_empty());
    }

    #[test]
    fn test_cohesion_identical_vectors_is_one() {
        let v = vec![0.6f32, 0.8];
        let matrix = SimilarityMatrix::compute(&[v.clone(), v.clone(), v]);
        assert_eq!(cohesion(&matrix, &[0, 1, 2]), 1.0);
    }

    #[test]
    fn test_cohesion_clipped_at_zero() {
        let matrix = SimilarityMatrix::compute(&[vec![1.0, 0.0], vec![-1.0, 0.0]]);
        assert_eq!(cohesion(&matrix, &[0, 1]), 0.0);
    }

    #[test]
    fn test_separation_properties() {
        let vectors = vec![
            vec![1.0f32, 0.0],
            vec![1.0, 0.0],
            vec![0.0, 1.0],
            vec![-1.0, 0.0],
        ];
        let matrix = SimilarityMatrix::compute(&vectors);

        // Identical content
        let same = vec![sub(0, vec![0]), sub(1, vec![1])];
        assert!(separation(&matrix, &same, 0).abs() < 1e-12);

        // Orthogonal
        let ortho = vec![sub(0, vec![0]), sub(1, vec![2])];
        assert!((separation(&matrix, &ortho, 0) - 1.0).abs() < 1e-12);

        // Opposed
        let opposed = vec![sub(0, vec![0]), sub(1, vec![3])];
        assert!((separation(&matrix, &opposed, 0) - 2.0).abs() < 1e-12);

        // Single subcluster
        assert_eq!(separation(&matrix, &[sub(0, vec![0, 1, 2])], 0), 0.0);
    }

    #[test]
    fn test_composite_default_weights() {
        let weights = ScoreWeights::default();
        let q = composite(&weights, 0.5, 0.9, 1.0);
        assert!((q - (0.4 * 0.5 + 1.2 * 0.9 + 0.2 * 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_composite_monotone_in_each_metric() {
        let weights = ScoreWeights::default();
        let base = composite(&weights, 0.3, 0.5, 0.7);
        assert!(composite(&weights, 0.4, 0.5, 0.7) >= base);
        assert!(composite(&weights, 0.3, 0.6, 0.7) >= base);
        assert!(composite(&weights, 0.3, 0.5, 0.8) >= base);
    }

    #[test]
    fn test_score_subclusters() {
        let vectors = vec![
            vec![1.0f32, 0.0],
            vec![1.0, 0.0],
            vec![1.0, 0.0],
            vec![0.0, 1.0],
        ];
        let matrix = SimilarityMatrix::compute(&vectors);
        let subs = vec![sub(0, vec![0, 1, 2]), sub(1, vec![3])];
        let scores = score_subclusters(&matrix, &subs, &ScoreWeights::default());

        assert_eq!(scores[0].size, 3);
        assert_eq!(scores[0].normalized_size, 1.0);
        assert_eq!(scores[1].normalized_size, 0.0);
        assert_eq!(scores[0].cohesion, 1.0);
        assert_eq!(scores[1].cohesion, 1.0);
        assert!((scores[0].separation - 1.0).abs() < 1e-12);
        assert!((scores[0].composite - (0.4 + 1.2 + 0.2)).abs() < 1e-12);
    }

    #[test]
    fn test_with_normalized_size_recomputes_composite() {
        let weights = ScoreWeights::default();
        let triple = ScoreTriple::new(5, 1.0, 0.5, 0.5, &weights);
        let updated = triple.with_normalized_size(0.0, &weights);
        assert_eq!(updated.size, 5);
        assert!((triple.composite - updated.composite - 0.4).abs() < 1e-12);
    }
}
