//! Mean silhouette coefficient over a labelled point set.
//!
//! Distances are Euclidean distances between unit vectors, read from the
//! parent's [`SimilarityMatrix`].

use crate::similarity::SimilarityMatrix;

/// Silhouette coefficient of one point.
///
/// `s(i) = (b − a) / max(a, b)` where `a` is the mean distance to the other
/// members of the point's cluster and `b` the smallest mean distance to any
/// other cluster. Points in singleton clusters score 0.
pub fn silhouette_coefficient(
    point: usize,
    labels: &[usize],
    k: usize,
    matrix: &SimilarityMatrix,
) -> f64 {
    let own = labels[point];
    let mut sums = vec![0.0f64; k];
    let mut counts = vec![0usize; k];

    for (j, &label) in labels.iter().enumerate() {
        if j == point {
            continue;
        }
        sums[label] += matrix.distance(point, j);
        counts[label] += 1;
    }

    if counts[own] == 0 {
        return 0.0;
    }

    let a = sums[own] / counts[own] as f64;
    let b = (0..k)
        .filter(|&c| c != own && counts[c] > 0)
        .map(|c| sums[c] / counts[c] as f64)
        .fold(f64::INFINITY, f64::min);

    if !b.is_finite() {
        return 0.0;
    }

    let max_ab = a.max(b);
    if max_ab <= 0.0 {
        0.0
    } else {
        (b - a) / max_ab
    }
}

/// Mean silhouette coefficient over all points.
///
/// Returns `None` unless `2 <= clusters <= n - 1`, the range in which the
/// silhouette is defined.
pub fn silhouette_score(labels: &[usize], matrix: &SimilarityMatrix) -> Option<f64> {
    let n = labels.len();
    let k = labels.iter().copied().max().map(|m| m + 1).unwrap_or(0);
    let mut present = vec![false; k];
    for &label in labels {
        present[label] = true;
    }
    let clusters = present.iter().filter(|&&p| p).count();
    if clusters < 2 || clusters >= n {
        return None;
    }

    let sum: f64 = (0..n)
        .map(|i| silhouette_coefficient(i, labels, k, matrix))
        .sum();
    Some(sum / n as f64)
}
