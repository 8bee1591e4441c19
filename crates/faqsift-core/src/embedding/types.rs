//! Input record and parent cluster types.

use serde::{Deserialize, Serialize};

/// One ticket-summary embedding as delivered by the upstream stages.
///
/// `summary` and `resolution` are optional: they are carried through to the
/// selection records so the generation stage does not need a second lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingRecord {
    /// Ticket identifier
    pub ticket_id: String,
    /// Parent cluster (coarse topic) identifier
    pub parent_cluster: String,
    /// Embedding vector (dimension fixed per run)
    pub embedding: Vec<f32>,
    /// Issue summary text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Resolution text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
}

impl EmbeddingRecord {
    /// Creates a record without text.
    pub fn new(
        ticket_id: impl Into<String>,
        parent_cluster: impl Into<String>,
        embedding: Vec<f32>,
    ) -> Self {
        Self {
            ticket_id: ticket_id.into(),
            parent_cluster: parent_cluster.into(),
            embedding,
            summary: None,
            resolution: None,
        }
    }

    /// Attaches summary and resolution text.
    pub fn with_text(mut self, summary: impl Into<String>, resolution: Option<String>) -> Self {
        self.summary = Some(summary.into());
        self.resolution = resolution;
        self
    }

    /// Number of whitespace-separated words in summary + resolution.
    pub fn word_count(&self) -> usize {
        let count = |text: &Option<String>| {
            text.as_deref()
                .map(|t| t.split_whitespace().count())
                .unwrap_or(0)
        };
        count(&self.summary) + count(&self.resolution)
    }
}

/// Immutable group of records sharing a parent cluster label.
///
/// Members keep their input order; that order is the tie-break for
/// representative selection and subcluster numbering.
#[derive(Debug, Clone, PartialEq)]
pub struct ParentCluster {
    /// Parent cluster identifier
    pub id: String,
    members: Vec<EmbeddingRecord>,
}

impl ParentCluster {
    /// Creates a parent cluster from its members.
    pub fn new(id: impl Into<String>, members: Vec<EmbeddingRecord>) -> Self {
        Self {
            id: id.into(),
            members,
        }
    }

    /// Members in input order.
    pub fn members(&self) -> &[EmbeddingRecord] {
        &self.members
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns true if the cluster has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Groups records by parent cluster, ordered by first appearance.
pub fn group_by_parent(records: Vec<EmbeddingRecord>) -> Vec<ParentCluster> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: std::collections::HashMap<String, Vec<EmbeddingRecord>> =
        std::collections::HashMap::new();

    for record in records {
        let entry = groups.entry(record.parent_cluster.clone()).or_default();
        if entry.is_empty() {
            order.push(record.parent_cluster.clone());
        }
        entry.push(record);
    }

    order
        .into_iter()
        .map(|id| {
            let members = groups.remove(&id).unwrap_or_default();
            ParentCluster::new(id, members)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_by_parent_keeps_first_appearance_order() {
        let records = vec![
            EmbeddingRecord::new("t1", "b", vec![1.0]),
            EmbeddingRecord::new("t2", "a", vec![1.0]),
            EmbeddingRecord::new("t3", "b", vec![1.0]),
        ];
        let parents = group_by_parent(records);

        assert_eq!(parents.len(), 2);
        assert_eq!(parents[0].id, "b");
        assert_eq!(parents[1].id, "a");
        let ids: Vec<&str> = parents[0]
            .members()
            .iter()
            .map(|m| m.ticket_id.as_str())
            .collect();
        assert_eq!(ids, vec!["t1", "t3"]);
    }

    #[test]
    fn test_word_count() {
        let record = EmbeddingRecord::new("t1", "p", vec![1.0])
            .with_text("VPN drops hourly", Some("Reinstall  the client".to_string()));
        assert_eq!(record.word_count(), 6);
        assert_eq!(EmbeddingRecord::new("t2", "p", vec![1.0]).word_count(), 0);
    }

    #[test]
    fn test_record_deserializes_without_text() {
        let json = r#"{"ticket_id":"t1","parent_cluster":"p","embedding":[0.5,0.5]}"#;
        let record: EmbeddingRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.summary, None);
        assert_eq!(record.embedding, vec![0.5, 0.5]);
    }
}
