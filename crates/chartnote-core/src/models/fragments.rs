//! Ephemeral SOAP fragments produced by transcript extraction.

use serde::{Deserialize, Serialize};

use super::encounter::VitalSigns;

/// Output of the transcript extraction engine: the shape of a SOAP note with
/// every field optional. Never persisted directly; merged into a draft note
/// only on explicit user confirmation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExtractedSoapFragments {
    pub chief_complaint: Option<String>,
    pub history_of_present_illness: Option<String>,
    pub vital_signs: Option<VitalSigns>,
    pub physical_exam_general: Option<String>,
    pub clinical_impression: Option<String>,
    pub plan: Option<ExtractedPlan>,
}

/// Plan sentences bucketed by the extraction heuristics.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExtractedPlan {
    /// Follow-up sentence; last match wins, not a list
    pub follow_up: Option<String>,
    pub diagnostics: Vec<String>,
    pub treatments: Vec<String>,
}

impl ExtractedPlan {
    pub fn is_empty(&self) -> bool {
        self.follow_up.is_none() && self.diagnostics.is_empty() && self.treatments.is_empty()
    }
}

impl ExtractedSoapFragments {
    /// True if extraction found nothing at all.
    pub fn is_empty(&self) -> bool {
        self.chief_complaint.is_none()
            && self.history_of_present_illness.is_none()
            && self.vital_signs.is_none()
            && self.physical_exam_general.is_none()
            && self.clinical_impression.is_none()
            && self.plan.as_ref().map_or(true, |p| p.is_empty())
    }
}
