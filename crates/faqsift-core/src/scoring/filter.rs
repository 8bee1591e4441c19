//! Size-band filtering of scored subclusters.

use super::ScoredSubcluster;
use crate::config::SizeBand;
use tracing::debug;

/// Returns true if the subcluster survives the filter.
///
/// Degenerate subclusters never survive. Everything else survives iff its
/// normalized size lies inside the band, bounds included.
pub fn is_admissible(candidate: &ScoredSubcluster, band: &SizeBand) -> bool {
    !candidate.degenerate && band.contains(candidate.scores.normalized_size)
}

/// Drops subclusters outside the size band, preserving order.
pub fn filter_subclusters(
    candidates: Vec<ScoredSubcluster>,
    band: &SizeBand,
) -> Vec<ScoredSubcluster> {
    let total = candidates.len();
    let kept: Vec<ScoredSubcluster> = candidates
        .into_iter()
        .filter(|c| is_admissible(c, band))
        .collect();
    debug!(total, kept = kept.len(), "Filtered subclusters");
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScoreWeights;
    use crate::scoring::ScoreTriple;

    fn candidate(z: f64, degenerate: bool) -> ScoredSubcluster {
        ScoredSubcluster {
            subcluster_id: "p/0".to_string(),
            parent_id: "p".to_string(),
            index: 0,
            degenerate,
            scores: ScoreTriple::new(10, z, 0.8, 0.5, &ScoreWeights::default()),
            representatives: Vec::new(),
        }
    }

    #[test]
    fn test_band_boundaries() {
        let band = SizeBand::default();
        assert!(is_admissible(&candidate(0.05, false), &band));
        assert!(!is_admissible(&candidate(0.049999, false), &band));
        assert!(is_admissible(&candidate(0.80, false), &band));
        assert!(!is_admissible(&candidate(0.800001, false), &band));
    }

    #[test]
    fn test_degenerate_always_dropped() {
        let band = SizeBand::new(0.0, 1.0);
        assert!(!is_admissible(&candidate(0.5, true), &band));
    }

    #[test]
    fn test_filter_preserves_order() {
        let mut a = candidate(0.5, false);
        a.subcluster_id = "a/0".to_string();
        let mut b = candidate(0.6, false);
        b.subcluster_id = "b/0".to_string();
        let kept = filter_subclusters(
            vec![a, candidate(1.0, false), b, candidate(0.4, true)],
            &SizeBand::default(),
        );
        let ids: Vec<&str> = kept.iter().map(|c| c.subcluster_id.as_str()).collect();
        assert_eq!(ids, vec!["a/0", "b/0"]);
    }
}
