//! Selection artifact output.
//!
//! The artifact is the pretty-printed JSON form of a [`RunReport`]:
//! `{"records": [...], "skipped": [...], "parents": [...]}`. Identical runs
//! produce byte-identical artifacts.

use crate::error::ArtifactError;
use crate::processing::RunReport;
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Serializes `report` to pretty JSON.
pub fn to_json(report: &RunReport) -> Result<String, ArtifactError> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Writes the artifact to any writer, followed by a newline.
pub fn write_artifact<W: Write>(report: &RunReport, mut writer: W) -> Result<(), ArtifactError> {
    let json = to_json(report)?;
    writer.write_all(json.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Writes the artifact to `path`, creating parent directories as needed.
pub fn save_artifact(report: &RunReport, path: &Path) -> Result<(), ArtifactError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let file = fs::File::create(path)
        .map_err(|e| ArtifactError::Write(format!("{}: {}", path.display(), e)))?;
    write_artifact(report, std::io::BufWriter::new(file))?;
    info!(records = report.records.len(), path = %path.display(), "Wrote selection artifact");
    Ok(())
}
