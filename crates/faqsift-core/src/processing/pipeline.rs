//! Selection pipeline: from embedding records to ranked selection records.

use super::progress::{ProgressTimer, RunProgress};
use crate::clustering::{partition_parent, KSelection};
use crate::config::{SelectionConfig, SizeNormalization};
use crate::embedding::{
    group_by_parent, normalize_parent, run_dimension, EmbeddingRecord, ParentCluster,
};
use crate::error::{ConfigError, SelectionError};
use crate::scoring::{
    filter_subclusters, normalize_sizes_globally, rank_subclusters, score_subclusters,
    select_representatives, ScoredSubcluster, SelectionRecord,
};
use crate::similarity::SimilarityMatrix;
use rayon::prelude::*;
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info, instrument, warn};

/// k-selection outcome of one parent cluster.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParentDiagnostics {
    /// Parent cluster identifier
    pub parent_cluster_id: String,
    /// Number of members
    pub members: usize,
    /// How k was chosen
    pub selection: KSelection,
}

/// A parent cluster that contributed no subclusters, and why.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedParent {
    /// Parent cluster identifier
    pub parent_cluster_id: String,
    /// Human-readable reason
    pub message: String,
    /// Structured error
    pub error: SelectionError,
}

impl SkippedParent {
    fn new(error: SelectionError) -> Self {
        Self {
            parent_cluster_id: error.parent().to_string(),
            message: error.to_string(),
            error,
        }
    }
}

/// Result of a selection run.
///
/// Serializes to the selection artifact. `elapsed_ms` is left out so that
/// identical inputs produce byte-identical artifacts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    /// Ranked selection records, best first
    pub records: Vec<SelectionRecord>,
    /// Parent clusters that were skipped or degenerate
    pub skipped: Vec<SkippedParent>,
    /// Per-parent k-selection diagnostics, in parent order
    pub parents: Vec<ParentDiagnostics>,
    /// Run time in milliseconds
    #[serde(skip)]
    pub elapsed_ms: u64,
}

impl RunReport {
    /// Returns the number of selection records.
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Returns true if at least one subcluster was selected.
    pub fn has_records(&self) -> bool {
        !self.records.is_empty()
    }
}

/// Outcome of the per-parent stage.
struct ParentOutcome {
    diagnostics: ParentDiagnostics,
    candidates: Vec<ScoredSubcluster>,
}

/// Selection pipeline.
///
/// Coordinates normalization, partitioning, scoring, filtering,
/// representative selection and ranking. The configuration is validated
/// once on construction and shared read-only by every stage.
///
/// # Example
///
/// ```
/// use faqsift_core::config::SelectionConfig;
/// use faqsift_core::embedding::EmbeddingRecord;
/// use faqsift_core::processing::SelectionPipeline;
///
/// let pipeline = SelectionPipeline::new(SelectionConfig::default()).unwrap();
/// let records = vec![EmbeddingRecord::new("t1", "vpn", vec![1.0, 0.0])];
///
/// let report = pipeline.run(records);
/// assert!(report.records.is_empty());
/// assert_eq!(report.skipped.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct SelectionPipeline {
    config: SelectionConfig,
}

impl SelectionPipeline {
    /// Creates a pipeline after validating `config`.
    pub fn new(config: SelectionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    /// Runs the pipeline without progress reporting.
    pub fn run(&self, records: Vec<EmbeddingRecord>) -> RunReport {
        self.run_with_progress(records, |_| {})
    }

    /// Runs the pipeline, reporting after each parent cluster.
    ///
    /// Parent clusters are processed in parallel, so `on_progress` may be
    /// called from several threads; results are still collected in parent
    /// order. The run dimension is the one shared by most records, so a parent
    /// with odd-sized vectors is rejected on its own.
    pub fn run_with_progress<F>(&self, records: Vec<EmbeddingRecord>, on_progress: F) -> RunReport
    where
        F: Fn(RunProgress) + Sync,
    {
        let timer = ProgressTimer::new();
        let dim = run_dimension(&records);
        let parents = group_by_parent(records);
        let total = parents.len();

        info!(parents = total, dim, "Starting selection run");
        on_progress(RunProgress::new(0, total, None, timer.elapsed_ms()));

        let completed = AtomicUsize::new(0);
        let outcomes: Vec<Result<ParentOutcome, SelectionError>> = parents
            .par_iter()
            .map(|parent| {
                let outcome = self.process_parent(parent, dim);
                let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                on_progress(RunProgress::new(
                    done,
                    total,
                    Some(parent.id.clone()),
                    timer.elapsed_ms(),
                ));
                outcome
            })
            .collect();

        let mut candidates = Vec::new();
        let mut skipped = Vec::new();
        let mut diagnostics = Vec::new();

        for outcome in outcomes {
            match outcome {
                Ok(outcome) => {
                    if outcome.diagnostics.selection.degenerate {
                        let error = SelectionError::DegenerateCluster {
                            parent: outcome.diagnostics.parent_cluster_id.clone(),
                        };
                        warn!("{}", error);
                        skipped.push(SkippedParent::new(error));
                    }
                    diagnostics.push(outcome.diagnostics);
                    candidates.extend(outcome.candidates);
                }
                Err(error) => {
                    warn!("Skipping parent cluster: {}", error);
                    skipped.push(SkippedParent::new(error));
                }
            }
        }

        if self.config.size_normalization == SizeNormalization::Global {
            normalize_sizes_globally(&mut candidates, &self.config.weights);
        }

        let scored = candidates.len();
        let survivors = filter_subclusters(candidates, &self.config.size_band);
        let survivor_count = survivors.len();
        let records = rank_subclusters(survivors, self.config.top_n);

        info!(
            scored,
            survivors = survivor_count,
            selected = records.len(),
            skipped = skipped.len(),
            elapsed_ms = timer.elapsed_ms(),
            "Selection run complete"
        );

        RunReport {
            records,
            skipped,
            parents: diagnostics,
            elapsed_ms: timer.elapsed_ms(),
        }
    }

    /// Normalizes, partitions and scores one parent cluster.
    #[instrument(skip_all, fields(parent = %parent.id, members = parent.len()))]
    fn process_parent(
        &self,
        parent: &ParentCluster,
        dim: usize,
    ) -> Result<ParentOutcome, SelectionError> {
        let config = &self.config;
        let vectors = normalize_parent(parent, dim, config.reduced_dim)?;
        let matrix = SimilarityMatrix::compute(&vectors);
        let partition = partition_parent(&parent.id, &vectors, &matrix, config)?;
        let scores = score_subclusters(&matrix, &partition.subclusters, &config.weights);

        let candidates = partition
            .subclusters
            .iter()
            .zip(scores)
            .map(|(subcluster, scores)| ScoredSubcluster {
                subcluster_id: subcluster.id(),
                parent_id: parent.id.clone(),
                index: subcluster.index,
                degenerate: subcluster.degenerate,
                scores,
                representatives: select_representatives(
                    subcluster,
                    parent,
                    &vectors,
                    config.representatives_per_subcluster,
                    config.word_budget,
                ),
            })
            .collect::<Vec<_>>();

        debug!(
            k = partition.selection.k,
            subclusters = candidates.len(),
            "Scored parent cluster"
        );

        Ok(ParentOutcome {
            diagnostics: ParentDiagnostics {
                parent_cluster_id: parent.id.clone(),
                members: parent.len(),
                selection: partition.selection,
            },
            candidates,
        })
    }
}

/// Validates `config` and runs one selection pass over `records`.
pub fn select_subclusters(
    records: Vec<EmbeddingRecord>,
    config: SelectionConfig,
) -> Result<RunReport, ConfigError> {
    Ok(SelectionPipeline::new(config)?.run(records))
}
