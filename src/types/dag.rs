use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DagRunState {
    Queued,
    Running,
    Success,
    Failed,
    #[serde(other)]
    Unknown,
}

impl DagRunState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Running => "running",
            Self::Success => "success",
            Self::Failed => "failed",
            Self::Unknown => "unknown",
        }
    }
}

// ---------------------------------------------------------------------------
// DAG
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DagTag {
    pub name: String,
    #[serde(default)]
    pub dag_id: Option<String>,
}

/// One row of the DAG list as returned by `GET /api/v2/dags`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dag {
    pub dag_id: String,
    #[serde(default)]
    pub dag_display_name: String,
    #[serde(default)]
    pub is_paused: bool,
    #[serde(default)]
    pub tags: Vec<DagTag>,
    #[serde(default)]
    pub owners: Vec<String>,
    #[serde(default)]
    pub timetable_summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub next_dagrun_run_after: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_parsed_time: Option<DateTime<Utc>>,
    /// Only present in fixtures; the server filters on it but does not echo it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_run_state: Option<DagRunState>,
}

impl Dag {
    /// Display name, falling back to the id.
    pub fn name(&self) -> &str {
        if self.dag_display_name.is_empty() {
            &self.dag_id
        } else {
            &self.dag_display_name
        }
    }

    pub fn tag_names(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(|t| t.name.as_str())
    }
}

// ---------------------------------------------------------------------------
// Collections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DagCollection {
    #[serde(default)]
    pub dags: Vec<Dag>,
    #[serde(default)]
    pub total_entries: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DagTagCollection {
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub total_entries: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_minimal_dag() {
        let dag: Dag = serde_json::from_str(r#"{"dag_id":"etl_daily"}"#).unwrap();
        assert_eq!(dag.name(), "etl_daily");
        assert!(!dag.is_paused);
        assert!(dag.tags.is_empty());
    }

    #[test]
    fn unknown_run_state_maps_to_unknown() {
        let state: DagRunState = serde_json::from_str(r#""up_for_retry""#).unwrap();
        assert_eq!(state, DagRunState::Unknown);
    }

    #[test]
    fn collection_reads_server_shape() {
        let json = r#"{
            "dags": [{"dag_id": "a", "dag_display_name": "A", "is_paused": true,
                      "tags": [{"name": "etl", "dag_id": "a"}], "owners": ["ops"],
                      "timetable_summary": "@daily",
                      "next_dagrun_run_after": "2026-01-02T00:00:00Z"}],
            "total_entries": 7
        }"#;
        let c: DagCollection = serde_json::from_str(json).unwrap();
        assert_eq!(c.total_entries, 7);
        assert_eq!(c.dags[0].name(), "A");
        assert_eq!(c.dags[0].tag_names().collect::<Vec<_>>(), vec!["etl"]);
        assert!(c.dags[0].next_dagrun_run_after.is_some());
    }
}
