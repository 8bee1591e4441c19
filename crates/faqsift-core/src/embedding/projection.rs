//! PCA projection fitted by singular value decomposition.
//!
//! The parent's vectors are centered into an n×d matrix and decomposed with a
//! thin SVD; the rows of `Vᵀ` with the largest singular values are the
//! principal axes.

use nalgebra::DMatrix;

/// Components whose variance (squared singular value) falls below this are
/// treated as absent.
const MIN_VARIANCE: f64 = 1e-12;

/// Singular values below this fraction of the largest are numerical noise.
const RANK_TOLERANCE: f64 = 1e-9;

/// Fixed linear projection onto the top principal components.
#[derive(Debug, Clone, PartialEq)]
pub struct Pca {
    mean: Vec<f64>,
    /// Unit-length principal axes, strongest first
    components: Vec<Vec<f64>>,
    /// Output dimension (components plus zero padding)
    output_dim: usize,
}

impl Pca {
    /// Fits a projection onto `n_components` axes.
    ///
    /// Returns `None` when the data has no variance at all. When fewer than
    /// `n_components` axes carry variance, the missing coordinates are zero.
    pub fn fit(vectors: &[Vec<f32>], n_components: usize) -> Option<Self> {
        let n = vectors.len();
        let dim = vectors.first().map(|v| v.len()).unwrap_or(0);
        if n < 2 || dim == 0 || n_components == 0 {
            return None;
        }

        let mut mean = vec![0.0f64; dim];
        for v in vectors {
            for (m, &x) in mean.iter_mut().zip(v.iter()) {
                *m += x as f64;
            }
        }
        for m in mean.iter_mut() {
            *m /= n as f64;
        }

        let data: Vec<f64> = vectors
            .iter()
            .flat_map(|v| v.iter().zip(&mean).map(|(&x, m)| x as f64 - m))
            .collect();
        let centered = DMatrix::from_row_slice(n, dim, &data);

        let svd = centered.svd(false, true);
        let v_t = svd.v_t?;
        let singular = svd.singular_values;

        // Strongest first; equal values keep decomposition order
        let mut order: Vec<usize> = (0..singular.len()).collect();
        order.sort_by(|&a, &b| singular[b].total_cmp(&singular[a]));

        let largest = order.first().map(|&i| singular[i]).unwrap_or(0.0);
        let max_components = n_components.min(dim).min(n - 1);
        let components: Vec<Vec<f64>> = order
            .into_iter()
            .take(max_components)
            .take_while(|&i| {
                let s = singular[i];
                s * s >= MIN_VARIANCE && s >= RANK_TOLERANCE * largest
            })
            .map(|i| canonical_sign(v_t.row(i).iter().copied().collect()))
            .collect();

        if components.is_empty() {
            return None;
        }

        Some(Self {
            mean,
            components,
            output_dim: n_components.min(dim),
        })
    }

    /// Projects one vector.
    pub fn transform(&self, vector: &[f32]) -> Vec<f32> {
        let mut out = vec![0.0f32; self.output_dim];
        for (slot, axis) in out.iter_mut().zip(&self.components) {
            *slot = vector
                .iter()
                .zip(&self.mean)
                .zip(axis)
                .map(|((&x, m), a)| (x as f64 - m) * a)
                .sum::<f64>() as f32;
        }
        out
    }

    /// Dimension of projected vectors.
    pub fn output_dim(&self) -> usize {
        self.output_dim
    }

    /// Number of axes that carry variance.
    pub fn component_count(&self) -> usize {
        self.components.len()
    }
}

/// Flips `axis` so its largest-magnitude coordinate is positive.
fn canonical_sign(mut axis: Vec<f64>) -> Vec<f64> {
    let pivot = axis
        .iter()
        .copied()
        .fold(0.0f64, |acc, x| if x.abs() > acc.abs() { x } else { acc });
    if pivot < 0.0 {
        for x in axis.iter_mut() {
            *x = -*x;
        }
    }
    axis
}
