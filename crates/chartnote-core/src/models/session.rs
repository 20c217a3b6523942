//! Session model: a saved-but-incomplete single-visit assessment.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// An in-progress multi-step assessment, independent of the episode and
/// encounter models. Created when the assessment begins, deleted when it is
/// finalized into a permanent record or discarded by the user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    /// Unique session ID
    pub session_id: String,
    /// Owning patient ID
    pub patient_id: String,
    /// Workflow step the user was last on
    pub current_step: String,
    /// Partial snapshot of the assessment record
    pub data: AssessmentSnapshot,
    /// Creation timestamp
    pub started_at: String,
    /// Last update timestamp
    pub last_updated: String,
}

impl Session {
    /// Create a new session at the first workflow step.
    pub fn new(patient_id: String) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            patient_id,
            current_step: "patient-info".into(),
            data: AssessmentSnapshot::default(),
            started_at: now.clone(),
            last_updated: now,
        }
    }

    /// Touch the last_updated timestamp.
    pub fn touch(&mut self) {
        self.last_updated = chrono::Utc::now().to_rfc3339();
    }
}

/// Partial snapshot of a single-visit assessment. Every field is optional so
/// a snapshot deserializes from whatever subset a resumed session carries.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AssessmentSnapshot {
    pub chief_complaint: Option<String>,
    pub history_of_present_illness: Option<String>,
    pub physical_exam: SnapshotExam,
    pub doctor_diagnosis: Option<String>,
    pub diagnostic_notes: Option<String>,
    pub selected_tests: Vec<String>,
    /// Test name -> result value
    pub test_results: BTreeMap<String, String>,
    pub final_diagnosis: Option<String>,
    pub treatment_plan: Option<String>,
    pub prescriptions: Vec<String>,
}

/// The exam measurements a snapshot tracks.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SnapshotExam {
    pub blood_pressure: Option<String>,
    pub heart_rate: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session() {
        let session = Session::new("patient-1".into());
        assert_eq!(session.current_step, "patient-info");
        assert_eq!(session.data, AssessmentSnapshot::default());
        assert_eq!(session.started_at, session.last_updated);
    }

    #[test]
    fn test_snapshot_from_partial_json() {
        let json = r#"{"selected_tests":["cbc"],"physical_exam":{"heart_rate":"88"}}"#;
        let snapshot: AssessmentSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.selected_tests, vec!["cbc".to_string()]);
        assert_eq!(snapshot.physical_exam.heart_rate.as_deref(), Some("88"));
        assert!(snapshot.final_diagnosis.is_none());
        assert!(snapshot.test_results.is_empty());
    }
}
