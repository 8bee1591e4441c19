//! # faqsift Core
//!
//! Subcluster partitioning, scoring, filtering and ranking of support-ticket
//! embeddings for FAQ candidate selection.
//!
//! Input embeddings arrive already grouped into coarse topic "parent
//! clusters". Each parent is split into subclusters, every subcluster is
//! scored for its usefulness as an FAQ topic, and the best subclusters across
//! the whole dataset are ranked into selection records for the generation
//! stage.
//!
//! ## Modules
//!
//! - [`config`] - `SelectionConfig` and production defaults
//! - [`error`] - Error types for selection, configuration, datasets and artifacts
//! - [`embedding`] - Input records, parent clusters, normalization and PCA
//! - [`similarity`] - Cosine similarity and the per-parent similarity matrix
//! - [`clustering`] - k-means, silhouette and k selection
//! - [`scoring`] - Metrics, filter, representatives and ranking
//! - [`processing`] - The selection pipeline and progress reporting
//! - [`dataset`] - JSON Lines input
//! - [`artifact`] - JSON output

pub mod artifact;
pub mod clustering;
pub mod config;
pub mod dataset;
pub mod embedding;
pub mod error;
pub mod processing;
pub mod scoring;
pub mod similarity;

// Re-export commonly used types at crate root
pub use clustering::{select_k, KSelection, Subcluster};
pub use config::{ScoreWeights, SelectionConfig, SizeBand, SizeNormalization};
pub use embedding::{EmbeddingRecord, ParentCluster};
pub use error::{ArtifactError, ConfigError, DatasetError, SelectionError};
pub use processing::{select_subclusters, RunProgress, RunReport, SelectionPipeline};
pub use scoring::{ScoreTriple, SelectionRecord};
pub use similarity::{cosine_similarity, SimilarityMatrix};
