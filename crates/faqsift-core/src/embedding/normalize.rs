//! Vector validation and normalization.
//!
//! Every member vector is checked (dimension, finiteness), L2-normalized and,
//! when a reduced dimension is configured, projected with a PCA fitted on the
//! parent cluster and re-normalized so downstream cosine math works on unit
//! vectors.

use super::projection::Pca;
use super::types::{EmbeddingRecord, ParentCluster};
use crate::error::SelectionError;
use std::collections::HashMap;
use tracing::debug;

/// Projected vectors shorter than this are treated as collapsed onto the mean.
const MIN_PROJECTED_NORM: f64 = 1e-6;

/// Returns the embedding dimension shared by the most records.
///
/// Ties go to the dimension seen first; an empty input has dimension 0.
pub fn run_dimension(records: &[EmbeddingRecord]) -> usize {
    let mut counts: HashMap<usize, (usize, usize)> = HashMap::new();
    for (position, record) in records.iter().enumerate() {
        counts
            .entry(record.embedding.len())
            .or_insert((0, position))
            .0 += 1;
    }
    counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(dim, _)| dim)
        .unwrap_or(0)
}

/// Scales `vector` to unit length in place.
///
/// Returns false (and leaves the vector untouched) when its norm is zero.
pub fn l2_normalize(vector: &mut [f32]) -> bool {
    let norm = vector
        .iter()
        .map(|&x| (x as f64) * (x as f64))
        .sum::<f64>()
        .sqrt();
    if norm == 0.0 {
        return false;
    }
    for x in vector.iter_mut() {
        *x = (*x as f64 / norm) as f32;
    }
    true
}

/// Checks that a parent cluster is non-empty and that every member vector has
/// dimension `dim` and only finite values.
pub fn validate_parent(parent: &ParentCluster, dim: usize) -> Result<(), SelectionError> {
    let invalid = |reason: String| SelectionError::InvalidInput {
        parent: parent.id.clone(),
        reason,
    };

    if parent.is_empty() {
        return Err(invalid("parent cluster is empty".to_string()));
    }

    for member in parent.members() {
        if member.embedding.len() != dim {
            return Err(invalid(format!(
                "ticket '{}' has dimension {}, expected {}",
                member.ticket_id,
                member.embedding.len(),
                dim
            )));
        }
        if member.embedding.iter().any(|x| !x.is_finite()) {
            return Err(invalid(format!(
                "ticket '{}' contains non-finite values",
                member.ticket_id
            )));
        }
        if member.embedding.iter().all(|&x| x == 0.0) {
            return Err(invalid(format!(
                "ticket '{}' is a zero vector",
                member.ticket_id
            )));
        }
    }

    Ok(())
}

/// Validates and normalizes a parent cluster's vectors.
///
/// Output vectors are unit length and in member order. With `reduced_dim`
/// set below the input dimension, a PCA fitted on this parent projects the
/// vectors first. A parent without variance, or with a member whose
/// projection collapses to the zero vector, keeps its unprojected vectors.
pub fn normalize_parent(
    parent: &ParentCluster,
    dim: usize,
    reduced_dim: Option<usize>,
) -> Result<Vec<Vec<f32>>, SelectionError> {
    validate_parent(parent, dim)?;

    let mut vectors: Vec<Vec<f32>> = parent
        .members()
        .iter()
        .map(|m| {
            let mut v = m.embedding.clone();
            l2_normalize(&mut v);
            v
        })
        .collect();

    if let Some(target) = reduced_dim.filter(|&t| t < dim) {
        match Pca::fit(&vectors, target) {
            Some(pca) => match project(&pca, &vectors) {
                Some(projected) => {
                    debug!(
                        parent = %parent.id,
                        from = dim,
                        to = pca.output_dim(),
                        "Projected parent cluster"
                    );
                    vectors = projected;
                }
                None => {
                    debug!(
                        parent = %parent.id,
                        "Member projects onto the parent mean, skipping projection"
                    );
                }
            },
            None => {
                debug!(parent = %parent.id, "Parent cluster has no variance, skipping projection");
            }
        }
    }

    Ok(vectors)
}

/// Projects and re-normalizes every vector, or `None` if any collapses.
fn project(pca: &Pca, vectors: &[Vec<f32>]) -> Option<Vec<Vec<f32>>> {
    vectors
        .iter()
        .map(|v| {
            let mut projected = pca.transform(v);
            let norm = projected
                .iter()
                .map(|&x| (x as f64) * (x as f64))
                .sum::<f64>()
                .sqrt();
            if norm < MIN_PROJECTED_NORM || !l2_normalize(&mut projected) {
                return None;
            }
            Some(projected)
        })
        .collect()
}
