//! Progress tracking types for selection runs.
//!
//! These types provide structured progress information that can be used
//! to log progress or drive a progress display in the CLI.

use std::time::Instant;

/// Progress of a selection run over parent clusters.
#[derive(Debug, Clone, PartialEq)]
pub struct RunProgress {
    /// Number of parent clusters finished (successfully or skipped)
    pub parents_completed: usize,
    /// Total number of parent clusters in the run
    pub parents_total: usize,
    /// Parent cluster that just finished, if any
    pub current_parent: Option<String>,
    /// Time elapsed since run start (milliseconds)
    pub elapsed_ms: u64,
}

impl RunProgress {
    /// Creates a new progress instance.
    pub fn new(
        parents_completed: usize,
        parents_total: usize,
        current_parent: Option<String>,
        elapsed_ms: u64,
    ) -> Self {
        Self {
            parents_completed,
            parents_total,
            current_parent,
            elapsed_ms,
        }
    }

    /// Returns the completion percentage (0.0 to 100.0).
    pub fn percent_complete(&self) -> f64 {
        if self.parents_total == 0 {
            0.0
        } else {
            (self.parents_completed as f64 / self.parents_total as f64) * 100.0
        }
    }

    /// Returns true if every parent cluster has been processed.
    pub fn is_complete(&self) -> bool {
        self.parents_completed >= self.parents_total
    }

    /// Returns estimated time remaining in milliseconds, if computable.
    pub fn estimated_remaining_ms(&self) -> Option<u64> {
        if self.parents_completed == 0 || self.parents_completed >= self.parents_total {
            return None;
        }
        let remaining = self.parents_total - self.parents_completed;
        let ms_per_parent = self.elapsed_ms / self.parents_completed as u64;
        Some(remaining as u64 * ms_per_parent)
    }
}

/// Helper for tracking elapsed time during processing.
pub struct ProgressTimer {
    start: Instant,
}

impl ProgressTimer {
    /// Creates a new timer starting now.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Returns elapsed time in milliseconds.
    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

impl Default for ProgressTimer {
    fn default() -> Self {
        Self::new()
    }
}
