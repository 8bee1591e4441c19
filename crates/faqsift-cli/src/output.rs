//! Output formatting for selection runs.
//!
//! The JSON form is the selection artifact itself; the human form is a short
//! terminal summary.

use faqsift_core::artifact;
use faqsift_core::error::ArtifactError;
use faqsift_core::RunReport;

/// Maximum characters shown per representative summary
const SNIPPET_MAX_LEN: usize = 80;

/// Formats the run as the JSON selection artifact.
pub fn format_json(report: &RunReport) -> Result<String, ArtifactError> {
    artifact::to_json(report)
}

/// Formats the run for human-readable terminal output.
pub fn format_human(report: &RunReport) -> String {
    let mut output = String::new();

    if report.records.is_empty() {
        output.push_str("No subclusters selected.\n");
    } else {
        output.push_str(&format!(
            "Selected {} subcluster{} from {} parent cluster{} ({} ms):\n\n",
            report.records.len(),
            if report.records.len() == 1 { "" } else { "s" },
            report.parents.len(),
            if report.parents.len() == 1 { "" } else { "s" },
            report.elapsed_ms
        ));
    }

    for record in &report.records {
        output.push_str(&format!(
            "{}. {} (score: {:.3})\n",
            record.rank, record.subcluster_id, record.composite_score
        ));
        output.push_str(&format!(
            "   [size: {}, Z: {:.2}, cohesion: {:.2}, separation: {:.2}]\n",
            record.size, record.normalized_size, record.cohesion, record.separation
        ));
        if let Some(summary) = record.summaries.first() {
            output.push_str(&format!(
                "   {}\n",
                truncate_text(summary, SNIPPET_MAX_LEN)
            ));
        } else if !record.representatives.is_empty() {
            output.push_str(&format!(
                "   Representatives: {}\n",
                record.representatives.join(", ")
            ));
        }
        output.push('\n');
    }

    if !report.skipped.is_empty() {
        output.push_str(&format!("Skipped {}:\n", report.skipped.len()));
        for skipped in &report.skipped {
            output.push_str(&format!("   - {}\n", skipped.message));
        }
    }

    output.trim_end().to_string()
}

/// Truncates text to a maximum length, adding ellipsis if needed.
fn truncate_text(text: &str, max_len: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let truncated: String = text.chars().take(max_len).collect();
    match truncated.rfind(' ') {
        Some(last_space) => format!("{}...", &truncated[..last_space]),
        None => format!("{}...", truncated),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faqsift_core::processing::SkippedParent;
    use faqsift_core::{SelectionError, SelectionRecord};

    fn record(rank: usize, id: &str) -> SelectionRecord {
        SelectionRecord {
            rank,
            subcluster_id: id.to_string(),
            parent_cluster_id: id.split('/').next().unwrap_or_default().to_string(),
            subcluster_index: 0,
            size: 12,
            normalized_size: 0.5,
            cohesion: 0.91,
            separation: 0.4,
            composite_score: 1.372,
            representatives: vec!["T-1".to_string(), "T-2".to_string()],
            summaries: vec!["Password reset link expired before use".to_string()],
            resolutions: Vec::new(),
        }
    }

    fn report(records: Vec<SelectionRecord>) -> RunReport {
        RunReport {
            records,
            skipped: Vec::new(),
            parents: Vec::new(),
            elapsed_ms: 42,
        }
    }

    #[test]
    fn test_format_human_empty() {
        let output = format_human(&report(Vec::new()));
        assert!(output.contains("No subclusters selected"));
    }

    #[test]
    fn test_format_human_records() {
        let output = format_human(&report(vec![record(1, "accounts/0")]));
        assert!(output.contains("Selected 1 subcluster"));
        assert!(output.contains("1. accounts/0 (score: 1.372)"));
        assert!(output.contains("cohesion: 0.91"));
        assert!(output.contains("Password reset link"));
    }

    #[test]
    fn test_format_human_lists_skipped() {
        let mut run = report(Vec::new());
        let error = SelectionError::InsufficientMembers {
            parent: "printers".to_string(),
            members: 1,
            required: 4,
        };
        run.skipped.push(SkippedParent {
            parent_cluster_id: "printers".to_string(),
            message: error.to_string(),
            error,
        });
        let output = format_human(&run);
        assert!(output.contains("Skipped 1"));
        assert!(output.contains("printers"));
    }

    #[test]
    fn test_format_json() {
        let output = format_json(&report(vec![record(1, "accounts/0")])).unwrap();
        assert!(output.contains("\"subcluster_id\": \"accounts/0\""));
        assert!(output.contains("\"composite_score\": 1.372"));
        assert!(!output.contains("elapsed_ms"));
    }

    #[test]
    fn test_truncate_text() {
        let short = "Short text";
        assert_eq!(truncate_text(short, 50), short);

        let long = "This is a much longer text that should be truncated at a reasonable point";
        let truncated = truncate_text(long, 30);
        assert!(truncated.ends_with("..."));
        assert!(truncated.len() <= 33);
    }
}
