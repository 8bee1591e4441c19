//! Embedding records, parent clusters and vector preparation.
//!
//! The embedding model itself lives upstream; this module only receives its
//! output. It provides:
//!
//! - [`EmbeddingRecord`] / [`ParentCluster`] - input data model
//! - [`normalize_parent`] - validation, L2 normalization and optional PCA
//! - [`Pca`] - the projection used for dimensionality reduction

pub mod normalize;
pub mod projection;
pub mod types;

pub use normalize::{l2_normalize, normalize_parent, run_dimension, validate_parent};
pub use projection::Pca;
pub use types::{group_by_parent, EmbeddingRecord, ParentCluster};
