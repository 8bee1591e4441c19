//! Error types for faqsift-core.
//!
//! Per-parent errors ([`SelectionError`]) are recoverable: the pipeline records
//! them and moves on to the next parent cluster. [`ConfigError`] is fatal and
//! aborts a run before any clustering starts.

use serde::Serialize;
use thiserror::Error;

/// Errors raised while processing a single parent cluster.
///
/// None of these abort a run. The pipeline collects them into the run report
/// so the caller can see which parent clusters were skipped and why.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SelectionError {
    /// Malformed member vectors (wrong dimension, non-finite values) or an
    /// empty parent cluster
    #[error("Invalid input in parent cluster '{parent}': {reason}")]
    InvalidInput {
        /// Parent cluster identifier
        parent: String,
        /// What was wrong with the input
        reason: String,
    },
    /// Too few members for the smallest candidate k
    #[error("Parent cluster '{parent}' has {members} members, at least {required} required")]
    InsufficientMembers {
        /// Parent cluster identifier
        parent: String,
        /// Number of members in the parent cluster
        members: usize,
        /// Minimum number of members (2 × smallest candidate k)
        required: usize,
    },
    /// No candidate k produced a positive mean silhouette
    #[error("Parent cluster '{parent}' has no candidate k with positive silhouette")]
    DegenerateCluster {
        /// Parent cluster identifier
        parent: String,
    },
}

impl SelectionError {
    /// Returns the parent cluster the error refers to.
    pub fn parent(&self) -> &str {
        match self {
            SelectionError::InvalidInput { parent, .. }
            | SelectionError::InsufficientMembers { parent, .. }
            | SelectionError::DegenerateCluster { parent } => parent,
        }
    }
}

/// Invalid pipeline configuration. Fatal for the whole run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A composite weight is negative or not finite
    #[error("Invalid weight {name}={value}: weights must be finite and non-negative")]
    InvalidWeight {
        /// Weight name (`size`, `cohesion`, `separation`)
        name: &'static str,
        /// Offending value
        value: f64,
    },
    /// Size band bounds are not finite, not inside [0, 1], or min >= max
    #[error("Invalid size band ({min}, {max}): need 0 <= min < max <= 1")]
    InvalidSizeBand {
        /// Lower bound
        min: f64,
        /// Upper bound
        max: f64,
    },
    /// Candidate k list is empty or contains values below 2
    #[error("Invalid k candidates: {0}")]
    InvalidCandidates(String),
    /// Any other out-of-range setting
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Errors that can occur while loading an input dataset.
#[derive(Debug, Clone, Error)]
pub enum DatasetError {
    /// Failed to read the dataset source
    #[error("Failed to read dataset: {0}")]
    Read(String),
    /// A line could not be parsed as an input record
    #[error("Malformed record on line {line}: {message}")]
    Malformed {
        /// 1-based line number
        line: usize,
        /// Parser message
        message: String,
    },
    /// The dataset contains no records
    #[error("Dataset is empty")]
    Empty,
}

/// Errors that can occur while writing the selection artifact.
#[derive(Debug, Clone, Error)]
pub enum ArtifactError {
    /// Serialization to JSON failed
    #[error("Failed to serialize artifact: {0}")]
    Serialize(String),
    /// Writing to the destination failed
    #[error("Failed to write artifact: {0}")]
    Write(String),
}

impl From<std::io::Error> for DatasetError {
    fn from(err: std::io::Error) -> Self {
        DatasetError::Read(err.to_string())
    }
}

impl From<std::io::Error> for ArtifactError {
    fn from(err: std::io::Error) -> Self {
        ArtifactError::Write(err.to_string())
    }
}

impl From<serde_json::Error> for ArtifactError {
    fn from(err: serde_json::Error) -> Self {
        ArtifactError::Serialize(err.to_string())
    }
}
