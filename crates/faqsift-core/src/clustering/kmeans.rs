//! Seeded k-means with k-means++ initialization and restarts.
//!
//! Each run seeds centroids with k-means++ and then alternates assignment and
//! mean updates (Lloyd) until assignments stop changing. Of `n_init` runs the
//! one with the lowest inertia is kept. All randomness comes from one
//! `StdRng` seeded by the caller, so results are reproducible.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Parameters of one k-means fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KMeansParams {
    /// Number of clusters
    pub k: usize,
    /// Independent restarts; the lowest-inertia run wins
    pub n_init: usize,
    /// Lloyd iteration cap per run
    pub max_iter: usize,
    /// RNG seed
    pub seed: u64,
}

/// Outcome of a k-means fit.
///
/// Labels are canonical: cluster 0 holds the first point, cluster 1 the first
/// point not in cluster 0, and so on. Centroids follow the same numbering.
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansResult {
    /// Cluster label per input vector
    pub labels: Vec<usize>,
    /// Cluster centroids (means of assigned vectors)
    pub centroids: Vec<Vec<f32>>,
    /// Sum of squared distances to the assigned centroid
    pub inertia: f64,
}

impl KMeansResult {
    /// Number of clusters.
    pub fn k(&self) -> usize {
        self.centroids.len()
    }

    /// Member count per cluster.
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0usize; self.k()];
        for &label in &self.labels {
            sizes[label] += 1;
        }
        sizes
    }
}

/// Runs k-means on `vectors`.
///
/// `k` is clamped to the number of vectors. An empty input yields an empty
/// result.
pub fn kmeans(vectors: &[Vec<f32>], params: &KMeansParams) -> KMeansResult {
    let n = vectors.len();
    let k = params.k.min(n);
    if n == 0 || k == 0 {
        return KMeansResult {
            labels: Vec::new(),
            centroids: Vec::new(),
            inertia: 0.0,
        };
    }

    let data: Vec<Vec<f64>> = vectors
        .iter()
        .map(|v| v.iter().map(|&x| x as f64).collect())
        .collect();

    let mut rng = StdRng::seed_from_u64(params.seed);
    let mut best: Option<(Vec<usize>, Vec<Vec<f64>>, f64)> = None;

    for _ in 0..params.n_init.max(1) {
        let initial = kmeans_plus_plus(&data, k, &mut rng);
        let (labels, centroids, inertia) = lloyd(&data, initial, params.max_iter.max(1));
        let better = best
            .as_ref()
            .map(|(_, _, best_inertia)| inertia < *best_inertia)
            .unwrap_or(true);
        if better {
            best = Some((labels, centroids, inertia));
        }
    }

    let (labels, centroids, inertia) = best.unwrap_or_default();
    canonicalize(labels, centroids, inertia)
}

/// k-means++ seeding: the first centroid is uniform, each next one is drawn
/// with probability proportional to the squared distance to the nearest
/// centroid chosen so far.
fn kmeans_plus_plus(data: &[Vec<f64>], k: usize, rng: &mut StdRng) -> Vec<Vec<f64>> {
    let n = data.len();
    let mut centroids = Vec::with_capacity(k);
    centroids.push(data[rng.gen_range(0..n)].clone());

    let mut min_distances: Vec<f64> = data
        .iter()
        .map(|p| squared_distance(p, &centroids[0]))
        .collect();

    while centroids.len() < k {
        let total: f64 = min_distances.iter().sum();
        let next = if total <= 0.0 {
            // Every point coincides with a centroid
            rng.gen_range(0..n)
        } else {
            let target = rng.gen::<f64>() * total;
            let mut cumulative = 0.0;
            let mut chosen = n - 1;
            for (i, &d) in min_distances.iter().enumerate() {
                cumulative += d;
                if cumulative > target {
                    chosen = i;
                    break;
                }
            }
            chosen
        };

        let centroid = data[next].clone();
        for (slot, point) in min_distances.iter_mut().zip(data) {
            let d = squared_distance(point, &centroid);
            if d < *slot {
                *slot = d;
            }
        }
        centroids.push(centroid);
    }

    centroids
}

/// Lloyd iterations from the given seeds. Returns labels, centroids, inertia.
fn lloyd(
    data: &[Vec<f64>],
    mut centroids: Vec<Vec<f64>>,
    max_iter: usize,
) -> (Vec<usize>, Vec<Vec<f64>>, f64) {
    let k = centroids.len();
    let dim = data[0].len();
    let mut labels: Vec<usize> = data.iter().map(|p| nearest(p, &centroids).0).collect();

    for _ in 0..max_iter {
        // Update step
        let mut sums = vec![vec![0.0f64; dim]; k];
        let mut counts = vec![0usize; k];
        for (point, &label) in data.iter().zip(&labels) {
            counts[label] += 1;
            for (s, &x) in sums[label].iter_mut().zip(point) {
                *s += x;
            }
        }
        for c in 0..k {
            if counts[c] > 0 {
                for s in sums[c].iter_mut() {
                    *s /= counts[c] as f64;
                }
                centroids[c] = std::mem::take(&mut sums[c]);
            }
        }

        // Re-seed empty clusters with the point farthest from its centroid
        for c in 0..k {
            if counts[c] == 0 {
                if let Some(far) = farthest_point(data, &labels, &centroids, &counts) {
                    counts[labels[far]] -= 1;
                    counts[c] = 1;
                    labels[far] = c;
                    centroids[c] = data[far].clone();
                }
            }
        }

        // Assignment step
        let next: Vec<usize> = data.iter().map(|p| nearest(p, &centroids).0).collect();
        if next == labels {
            break;
        }
        labels = next;
    }

    let inertia = data
        .iter()
        .zip(&labels)
        .map(|(p, &l)| squared_distance(p, &centroids[l]))
        .sum();

    (labels, centroids, inertia)
}

/// Point farthest from its own centroid among clusters with more than one member.
fn farthest_point(
    data: &[Vec<f64>],
    labels: &[usize],
    centroids: &[Vec<f64>],
    counts: &[usize],
) -> Option<usize> {
    data.iter()
        .enumerate()
        .filter(|(i, _)| counts[labels[*i]] > 1)
        .map(|(i, p)| (i, squared_distance(p, &centroids[labels[i]])))
        .fold(None, |best: Option<(usize, f64)>, (i, d)| match best {
            Some((_, bd)) if bd >= d => best,
            _ => Some((i, d)),
        })
        .map(|(i, _)| i)
}

/// Nearest centroid index and squared distance. Ties go to the lowest index.
fn nearest(point: &[f64], centroids: &[Vec<f64>]) -> (usize, f64) {
    let mut best_idx = 0;
    let mut best_dist = f64::MAX;
    for (c, centroid) in centroids.iter().enumerate() {
        let d = squared_distance(point, centroid);
        if d < best_dist {
            best_dist = d;
            best_idx = c;
        }
    }
    (best_idx, best_dist)
}

#[inline]
fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Renumbers clusters by first appearance and drops clusters left empty.
fn canonicalize(labels: Vec<usize>, centroids: Vec<Vec<f64>>, inertia: f64) -> KMeansResult {
    let mut mapping: Vec<Option<usize>> = vec![None; centroids.len()];
    let mut order: Vec<usize> = Vec::with_capacity(centroids.len());
    let labels: Vec<usize> = labels
        .into_iter()
        .map(|old| {
            *mapping[old].get_or_insert_with(|| {
                order.push(old);
                order.len() - 1
            })
        })
        .collect();

    let centroids = order
        .iter()
        .map(|&old| centroids[old].iter().map(|&x| x as f32).collect())
        .collect();

    KMeansResult {
        labels,
        centroids,
        inertia,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(k: usize, seed: u64) -> KMeansParams {
        KMeansParams {
            k,
            n_init: 5,
            max_iter: 100,
            seed,
        }
    }

    fn two_blobs() -> Vec<Vec<f32>> {
        let mut v = Vec::new();
        for i in 0..6 {
            v.push(vec![0.0 + i as f32 * 0.01, 0.0]);
        }
        for i in 0..6 {
            v.push(vec![10.0 + i as f32 * 0.01, 10.0]);
        }
        v
    }

    #[test]
    fn test_separates_two_blobs() {
        let result = kmeans(&two_blobs(), &params(2, 42));
        assert_eq!(result.k(), 2);
        assert_eq!(&result.labels[..6], &[0; 6]);
        assert_eq!(&result.labels[6..], &[1; 6]);
        assert_eq!(result.cluster_sizes(), vec![6, 6]);
        assert!(result.inertia < 0.01);
        assert!((result.centroids[1][0] - 10.025).abs() < 1e-3);
    }

    #[test]
    fn test_labels_are_canonical() {
        // Whatever the seed, the first point is always in cluster 0
        for seed in 0..10 {
            let result = kmeans(&two_blobs(), &params(2, seed));
            assert_eq!(result.labels[0], 0);
        }
    }

    #[test]
    fn test_deterministic_for_seed() {
        let data: Vec<Vec<f32>> = (0..30)
            .map(|i| vec![(i as f32 * 0.7).sin(), (i as f32 * 1.3).cos()])
            .collect();
        let a = kmeans(&data, &params(3, 7));
        let b = kmeans(&data, &params(3, 7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_k_clamped_to_point_count() {
        let data = vec![vec![0.0f32, 1.0], vec![1.0, 0.0]];
        let result = kmeans(&data, &params(5, 1));
        assert!(result.k() <= 2);
        assert_eq!(result.labels.len(), 2);
    }

    #[test]
    fn test_empty_input() {
        let result = kmeans(&[], &params(3, 1));
        assert!(result.labels.is_empty());
        assert_eq!(result.k(), 0);
    }

    #[test]
    fn test_identical_points_do_not_panic() {
        let data = vec![vec![0.5f32, 0.5]; 8];
        let result = kmeans(&data, &params(3, 3));
        assert_eq!(result.labels.len(), 8);
        assert_eq!(result.inertia, 0.0);
    }
}
