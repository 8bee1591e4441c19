//! Selection pipeline and run progress.
//!
//! # Architecture
//!
//! The `SelectionPipeline` coordinates, per parent cluster and in parallel:
//! 1. **Normalization**: validation, L2 normalization, optional PCA
//! 2. **Partitioning**: k selection and subcluster assignment
//! 3. **Scoring**: size, cohesion, separation and composite
//! 4. **Representatives**: members closest to each centroid
//!
//! and then, over the pooled subclusters of the whole dataset:
//! 5. **Filtering**: size band and degenerate removal
//! 6. **Ranking**: composite order, truncated to `top_n`
//!
//! # Example
//!
//! ```ignore
//! use faqsift_core::processing::SelectionPipeline;
//!
//! let pipeline = SelectionPipeline::new(config)?;
//! let report = pipeline.run_with_progress(records, |progress| {
//!     println!("{:.0}% complete", progress.percent_complete());
//! });
//! ```

mod pipeline;
mod progress;

pub use pipeline::{
    select_subclusters, ParentDiagnostics, RunReport, SelectionPipeline, SkippedParent,
};
pub use progress::{ProgressTimer, RunProgress};
