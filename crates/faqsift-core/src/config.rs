//! Pipeline configuration.
//!
//! Production defaults are exposed as constants so the CLI, tests and
//! benchmarks agree on them. [`SelectionConfig`] bundles every tunable into a
//! single immutable value that is validated once and then passed by reference
//! to each stage.
//!
//! # Usage
//!
//! ```
//! use faqsift_core::config::{SelectionConfig, DEFAULT_TOP_N};
//!
//! let config = SelectionConfig::default();
//! assert_eq!(config.top_n, DEFAULT_TOP_N);
//! assert!(config.validate().is_ok());
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

// =============================================================================
// Partitioning
// =============================================================================

/// Candidate subcluster counts tried for every parent cluster.
///
/// Parent clusters in the ticket corpus hold roughly 40-100 summaries; 2-4
/// subclusters balanced over- and under-splitting best.
pub const DEFAULT_K_CANDIDATES: &[usize] = &[2, 3, 4];

/// Independent k-means restarts per candidate k. The lowest-inertia run wins.
pub const DEFAULT_N_INIT: usize = 10;

/// Maximum Lloyd iterations per k-means run.
pub const DEFAULT_MAX_ITER: usize = 300;

/// Seed for k-means++ and projection initialization.
pub const DEFAULT_RANDOM_SEED: u64 = 42;

// =============================================================================
// Scoring
// =============================================================================

/// Default weight of the normalized size metric.
pub const DEFAULT_SIZE_WEIGHT: f64 = 0.4;

/// Default weight of the cohesion metric.
pub const DEFAULT_COHESION_WEIGHT: f64 = 1.2;

/// Default weight of the separation metric.
pub const DEFAULT_SEPARATION_WEIGHT: f64 = 0.2;

/// Smallest admissible normalized size (too niche below this).
pub const DEFAULT_MIN_SIZE: f64 = 0.05;

/// Largest admissible normalized size (too broad above this).
pub const DEFAULT_MAX_SIZE: f64 = 0.80;

// =============================================================================
// Selection
// =============================================================================

/// Number of subclusters kept dataset-wide.
pub const DEFAULT_TOP_N: usize = 12;

/// Representatives exposed per selected subcluster.
pub const DEFAULT_REPRESENTATIVES: usize = 10;

/// Composite score weights `(w_Z, w_C, w_S)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    /// Weight of normalized size `Z`
    pub size: f64,
    /// Weight of cohesion `C`
    pub cohesion: f64,
    /// Weight of separation `S`
    pub separation: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE_WEIGHT,
            cohesion: DEFAULT_COHESION_WEIGHT,
            separation: DEFAULT_SEPARATION_WEIGHT,
        }
    }
}

impl ScoreWeights {
    /// Creates a weight triple.
    pub fn new(size: f64, cohesion: f64, separation: f64) -> Self {
        Self {
            size,
            cohesion,
            separation,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("size", self.size),
            ("cohesion", self.cohesion),
            ("separation", self.separation),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidWeight { name, value });
            }
        }
        Ok(())
    }
}

/// Admissible normalized-size range. Both bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeBand {
    /// Smallest kept `Z`
    pub min: f64,
    /// Largest kept `Z`
    pub max: f64,
}

impl Default for SizeBand {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_SIZE,
            max: DEFAULT_MAX_SIZE,
        }
    }
}

impl SizeBand {
    /// Creates a size band.
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Returns true if `z` lies inside the band (inclusive on both ends).
    #[inline]
    pub fn contains(&self, z: f64) -> bool {
        self.min <= z && z <= self.max
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let in_unit = |v: f64| v.is_finite() && (0.0..=1.0).contains(&v);
        if !in_unit(self.min) || !in_unit(self.max) || self.min >= self.max {
            return Err(ConfigError::InvalidSizeBand {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Scope over which subcluster sizes are min-max normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeNormalization {
    /// Min and max taken over the subclusters of the same parent cluster
    #[default]
    PerParent,
    /// Min and max taken over every subcluster in the dataset
    Global,
}

/// Immutable configuration shared by every pipeline stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Target dimensionality after PCA projection (`None` keeps the input dimension)
    pub reduced_dim: Option<usize>,
    /// Candidate subcluster counts, tried in ascending order
    pub k_candidates: Vec<usize>,
    /// Composite score weights
    pub weights: ScoreWeights,
    /// Admissible normalized-size band
    pub size_band: SizeBand,
    /// Number of subclusters kept dataset-wide
    pub top_n: usize,
    /// Representatives exposed per subcluster
    pub representatives_per_subcluster: usize,
    /// Optional word budget for representative text (summary + resolution)
    pub word_budget: Option<usize>,
    /// Seed for every randomized step
    pub random_seed: u64,
    /// k-means restarts per candidate k
    pub n_init: usize,
    /// Lloyd iteration cap per k-means run
    pub max_iter: usize,
    /// Reject candidate k when any subcluster is smaller than this
    pub min_subcluster_members: usize,
    /// Reject candidate k when the largest subcluster holds more than this share
    pub max_subcluster_share: f64,
    /// Scope of size normalization
    pub size_normalization: SizeNormalization,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            reduced_dim: None,
            k_candidates: DEFAULT_K_CANDIDATES.to_vec(),
            weights: ScoreWeights::default(),
            size_band: SizeBand::default(),
            top_n: DEFAULT_TOP_N,
            representatives_per_subcluster: DEFAULT_REPRESENTATIVES,
            word_budget: None,
            random_seed: DEFAULT_RANDOM_SEED,
            n_init: DEFAULT_N_INIT,
            max_iter: DEFAULT_MAX_ITER,
            min_subcluster_members: 1,
            max_subcluster_share: 1.0,
            size_normalization: SizeNormalization::PerParent,
        }
    }
}

impl SelectionConfig {
    /// Checks every setting. Called once before a run starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.weights.validate()?;
        self.size_band.validate()?;

        if self.k_candidates.is_empty() {
            return Err(ConfigError::InvalidCandidates(
                "at least one candidate k is required".to_string(),
            ));
        }
        if let Some(&k) = self.k_candidates.iter().find(|&&k| k < 2) {
            return Err(ConfigError::InvalidCandidates(format!(
                "candidate k={} is below 2",
                k
            )));
        }
        if self.reduced_dim == Some(0) {
            return Err(ConfigError::Invalid(
                "reduced_dim must be positive".to_string(),
            ));
        }
        if self.top_n == 0 {
            return Err(ConfigError::Invalid("top_n must be positive".to_string()));
        }
        if self.representatives_per_subcluster == 0 {
            return Err(ConfigError::Invalid(
                "representatives_per_subcluster must be positive".to_string(),
            ));
        }
        if self.n_init == 0 || self.max_iter == 0 {
            return Err(ConfigError::Invalid(
                "n_init and max_iter must be positive".to_string(),
            ));
        }
        if !self.max_subcluster_share.is_finite()
            || self.max_subcluster_share <= 0.0
            || self.max_subcluster_share > 1.0
        {
            return Err(ConfigError::Invalid(format!(
                "max_subcluster_share={} must be in (0, 1]",
                self.max_subcluster_share
            )));
        }
        Ok(())
    }

    /// Candidate k values sorted ascending with duplicates removed.
    pub fn sorted_candidates(&self) -> Vec<usize> {
        let mut ks = self.k_candidates.clone();
        ks.sort_unstable();
        ks.dedup();
        ks
    }

    /// Smallest candidate k (0 when the list is empty).
    pub fn min_candidate(&self) -> usize {
        self.k_candidates.iter().copied().min().unwrap_or(0)
    }
}
