//! JSON Lines dataset loading.
//!
//! One [`EmbeddingRecord`] per line:
//!
//! ```text
//! {"ticket_id": "T-1", "parent_cluster": "vpn", "embedding": [0.1, 0.2], "summary": "..."}
//! ```
//!
//! Blank lines are skipped. Numeric validation (dimension, NaN/Inf) happens
//! later, per parent cluster, so that one bad record only costs its parent.

use crate::embedding::EmbeddingRecord;
use crate::error::DatasetError;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::info;

/// Reads records from any buffered reader.
pub fn read_records<R: BufRead>(reader: R) -> Result<Vec<EmbeddingRecord>, DatasetError> {
    let mut records = Vec::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str(&line) {
            Ok(record) => records.push(record),
            Err(e) => {
                return Err(DatasetError::Malformed {
                    line: line_num + 1,
                    message: e.to_string(),
                });
            }
        }
    }

    if records.is_empty() {
        return Err(DatasetError::Empty);
    }
    Ok(records)
}

/// Loads a JSON Lines dataset from `path`.
pub fn load_records(path: &Path) -> Result<Vec<EmbeddingRecord>, DatasetError> {
    let file = File::open(path)
        .map_err(|e| DatasetError::Read(format!("{}: {}", path.display(), e)))?;
    let records = read_records(BufReader::new(file))?;
    info!(records = records.len(), path = %path.display(), "Loaded dataset");
    Ok(records)
}
