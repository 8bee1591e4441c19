//! Cosine similarity primitives and the per-parent similarity matrix.
//!
//! A [`SimilarityMatrix`] is allocated once per parent cluster and read by
//! the silhouette computation, the cohesion metric and the separation
//! metric, so no pair is computed more than once per run.

use rayon::prelude::*;

/// Cosine similarity of two vectors, accumulated in f64.
///
/// Returns 0.0 when either vector has zero norm. The cosine of a vector
/// with itself (or with an identical copy) is exactly 1.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b.iter()) {
        let (x, y) = (x as f64, y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a * norm_b).sqrt()).clamp(-1.0, 1.0)
}

/// Mean cosine similarity over every unordered pair of `vectors`.
///
/// A single vector is maximally self-similar by convention (1.0); an empty
/// set yields 0.0.
pub fn mean_intra_similarity(vectors: &[Vec<f32>]) -> f64 {
    match vectors.len() {
        0 => 0.0,
        1 => 1.0,
        n => {
            let mut sum = 0.0;
            for i in 0..n {
                for j in (i + 1)..n {
                    sum += cosine_similarity(&vectors[i], &vectors[j]);
                }
            }
            sum / (n * (n - 1) / 2) as f64
        }
    }
}

/// Mean cosine similarity over every cross pair of `a` × `b`.
///
/// Returns 0.0 if either set is empty.
pub fn mean_cross_similarity(a: &[Vec<f32>], b: &[Vec<f32>]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let sum: f64 = a
        .iter()
        .flat_map(|x| b.iter().map(move |y| cosine_similarity(x, y)))
        .sum();
    sum / (a.len() * b.len()) as f64
}

/// Dense n × n cosine similarity matrix, stored row-major in one allocation.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    n: usize,
    values: Vec<f64>,
}

impl SimilarityMatrix {
    /// Computes all pairwise similarities. Rows are filled in parallel.
    pub fn compute(vectors: &[Vec<f32>]) -> Self {
        let n = vectors.len();
        let mut values = vec![0.0f64; n * n];
        if n > 0 {
            values.par_chunks_mut(n).enumerate().for_each(|(i, row)| {
                for (j, slot) in row.iter_mut().enumerate() {
                    *slot = cosine_similarity(&vectors[i], &vectors[j]);
                }
            });
        }
        Self { n, values }
    }

    /// Number of vectors covered by the matrix.
    pub fn len(&self) -> usize {
        self.n
    }

    /// Returns true if the matrix covers no vectors.
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Similarity between vectors `i` and `j`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.n + j]
    }

    /// Euclidean distance between unit vectors `i` and `j`, derived from
    /// their cosine (`‖a − b‖² = 2 − 2·cos`).
    #[inline]
    pub fn distance(&self, i: usize, j: usize) -> f64 {
        (2.0 - 2.0 * self.get(i, j)).max(0.0).sqrt()
    }

    /// Mean similarity over every unordered pair of `members`.
    ///
    /// Same conventions as [`mean_intra_similarity`]: 1.0 for a singleton,
    /// 0.0 for an empty set.
    pub fn mean_intra(&self, members: &[usize]) -> f64 {
        match members.len() {
            0 => 0.0,
            1 => 1.0,
            n => {
                let mut sum = 0.0;
                for (pos, &i) in members.iter().enumerate() {
                    for &j in &members[pos + 1..] {
                        sum += self.get(i, j);
                    }
                }
                sum / (n * (n - 1) / 2) as f64
            }
        }
    }

    /// Mean similarity over every cross pair of `a` × `b`.
    pub fn mean_cross(&self, a: &[usize], b: &[usize]) -> f64 {
        if a.is_empty() || b.is_empty() {
            return 0.0;
        }
        let sum: f64 = a
            .iter()
            .flat_map(|&i| b.iter().map(move |&j| self.get(i, j)))
            .sum();
        sum / (a.len() * b.len()) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_basic() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]), -1.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
        let s = cosine_similarity(&[1.0, 1.0], &[1.0, 0.0]);
        assert!((s - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_self_is_exactly_one() {
        let v = vec![0.123f32, -0.456, 0.789, 0.001];
        assert_eq!(cosine_similarity(&v, &v), 1.0);
    }

    #[test]
    fn test_intra_identical_vectors_is_exactly_one() {
        let v = vec![0.3f32, 0.1, -0.7];
        let set = vec![v.clone(), v.clone(), v.clone(), v];
        assert_eq!(mean_intra_similarity(&set), 1.0);
    }

    #[test]
    fn test_intra_singleton_and_empty() {
        assert_eq!(mean_intra_similarity(&[vec![0.2, 0.5]]), 1.0);
        assert_eq!(mean_intra_similarity(&[]), 0.0);
    }

    #[test]
    fn test_cross_orthogonal_and_opposed() {
        let a = vec![vec![1.0f32, 0.0]];
        let b = vec![vec![0.0f32, 1.0]];
        let c = vec![vec![-1.0f32, 0.0]];
        assert_eq!(mean_cross_similarity(&a, &b), 0.0);
        assert_eq!(mean_cross_similarity(&a, &c), -1.0);
        assert_eq!(mean_cross_similarity(&a, &[]), 0.0);
    }

    #[test]
    fn test_matrix_matches_pure_functions() {
        let vectors = vec![
            vec![1.0f32, 0.0, 0.0],
            vec![0.8, 0.6, 0.0],
            vec![0.0, 0.6, 0.8],
            vec![0.0, 0.0, 1.0],
        ];
        let matrix = SimilarityMatrix::compute(&vectors);
        assert_eq!(matrix.len(), 4);

        let a = [0usize, 1];
        let b = [2usize, 3];
        let set_a: Vec<Vec<f32>> = a.iter().map(|&i| vectors[i].clone()).collect();
        let set_b: Vec<Vec<f32>> = b.iter().map(|&i| vectors[i].clone()).collect();

        assert!((matrix.mean_intra(&a) - mean_intra_similarity(&set_a)).abs() < 1e-12);
        assert!((matrix.mean_cross(&a, &b) - mean_cross_similarity(&set_a, &set_b)).abs() < 1e-12);
    }

    #[test]
    fn test_matrix_is_symmetric_with_unit_diagonal() {
        let vectors = vec![vec![0.6f32, 0.8], vec![1.0, 0.0], vec![0.0, 1.0]];
        let matrix = SimilarityMatrix::compute(&vectors);
        for i in 0..3 {
            assert_eq!(matrix.get(i, i), 1.0);
            assert_eq!(matrix.distance(i, i), 0.0);
            for j in 0..3 {
                assert_eq!(matrix.get(i, j), matrix.get(j, i));
            }
        }
        assert!((matrix.distance(1, 2) - 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_matrix_singleton_intra() {
        let matrix = SimilarityMatrix::compute(&[vec![1.0, 0.0]]);
        assert_eq!(matrix.mean_intra(&[0]), 1.0);
        assert!(SimilarityMatrix::compute(&[]).is_empty());
    }
}
