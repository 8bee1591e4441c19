//! Subcluster partitioning of parent clusters.
//!
//! - [`kmeans`] - seeded k-means++ / Lloyd with restarts
//! - [`silhouette_score`] - mean silhouette over the similarity matrix
//! - [`select_k`] / [`partition_parent`] - candidate evaluation, k choice
//!   and construction of [`Subcluster`]s

pub mod kmeans;
pub mod partition;
pub mod silhouette;

pub use kmeans::{kmeans, KMeansParams, KMeansResult};
pub use partition::{
    partition_parent, select_k, CandidateDiagnostics, CandidateRejection, KSelection, Partition,
    Subcluster,
};
pub use silhouette::{silhouette_coefficient, silhouette_score};
