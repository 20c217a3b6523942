//! Encounter and SOAP note models.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Encounter status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EncounterStatus {
    /// Documentation in progress, mutable
    Draft,
    /// Signed and locked; terminal
    Signed,
}

/// Visit type for an encounter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum EncounterType {
    InitialVisit,
    FollowUp,
    UrgentCare,
    Telehealth,
    Procedure,
}

/// The clinician documenting an encounter.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Provider {
    pub name: String,
}

/// One of the four SOAP sections.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Subjective,
    Objective,
    Assessment,
    Plan,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Subjective,
        Section::Objective,
        Section::Assessment,
        Section::Plan,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Subjective => "subjective",
            Section::Objective => "objective",
            Section::Assessment => "assessment",
            Section::Plan => "plan",
        }
    }
}

/// Recorded vital signs. Absent values mean "not taken", never zero or "".
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VitalSigns {
    pub blood_pressure: Option<String>,
    pub temperature: Option<String>,
    pub pulse: Option<String>,
    pub respiratory_rate: Option<String>,
    pub oxygen_saturation: Option<String>,
}

impl VitalSigns {
    /// True if at least one vital has been recorded.
    pub fn any_present(&self) -> bool {
        self.blood_pressure.is_some()
            || self.temperature.is_some()
            || self.pulse.is_some()
            || self.respiratory_rate.is_some()
            || self.oxygen_saturation.is_some()
    }
}

/// Physical examination findings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PhysicalExam {
    pub general: String,
    pub additional_findings: String,
}

/// Follow-up instructions in the plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FollowUp {
    pub timeframe: String,
    pub instructions: String,
}

/// Subjective section: the patient's story.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Subjective {
    pub chief_complaint: String,
    pub history_of_present_illness: String,
    /// System name -> findings (e.g. "cardiovascular" -> "denies chest pain")
    pub review_of_systems: BTreeMap<String, String>,
    pub past_medical_history: String,
    pub medications: Vec<String>,
    pub allergies: Vec<String>,
    pub social_history: String,
    pub family_history: String,
}

/// Objective section: measured and observed findings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Objective {
    pub vital_signs: VitalSigns,
    pub physical_exam: PhysicalExam,
    pub diagnostic_tests: Vec<String>,
}

/// Assessment section: the clinician's interpretation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Assessment {
    pub clinical_impression: String,
    pub differential_diagnoses: Vec<String>,
}

/// Plan section: what happens next.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Plan {
    pub medications: Vec<String>,
    pub procedures: Vec<String>,
    pub referrals: Vec<String>,
    pub follow_up: FollowUp,
    pub patient_education: Vec<String>,
    pub activity_instructions: String,
    pub diet_instructions: String,
}

/// The four-part SOAP note embedded in an encounter.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SoapNote {
    pub subjective: Subjective,
    pub objective: Objective,
    pub assessment: Assessment,
    pub plan: Plan,
}

/// One documented clinical visit within an episode.
///
/// Invariant: once status is `Signed` the SOAP content is immutable, and
/// `signed_by`/`signed_at` are set together, only on that transition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Encounter {
    /// Unique encounter ID
    pub encounter_id: String,
    /// Owning episode ID
    pub episode_id: String,
    /// Patient ID (by reference)
    pub patient_id: String,
    /// Visit type
    pub encounter_type: EncounterType,
    /// Draft or signed
    pub status: EncounterStatus,
    /// Visit date
    pub date: String,
    /// Documenting clinician
    pub provider: Provider,
    /// The SOAP note content
    pub soap: SoapNote,
    /// Set together with `signed_at` when signing
    pub signed_by: Option<String>,
    /// Set together with `signed_by` when signing
    pub signed_at: Option<String>,
    /// Per-section last-edit timestamps
    #[serde(default)]
    pub section_updated_at: BTreeMap<Section, String>,
}

impl Encounter {
    /// Create a new draft encounter in an episode.
    pub fn new(
        episode_id: String,
        patient_id: String,
        encounter_type: EncounterType,
        provider_name: String,
    ) -> Self {
        Self {
            encounter_id: uuid::Uuid::new_v4().to_string(),
            episode_id,
            patient_id,
            encounter_type,
            status: EncounterStatus::Draft,
            date: chrono::Utc::now().to_rfc3339(),
            provider: Provider {
                name: provider_name,
            },
            soap: SoapNote::default(),
            signed_by: None,
            signed_at: None,
            section_updated_at: BTreeMap::new(),
        }
    }

    pub fn is_draft(&self) -> bool {
        self.status == EncounterStatus::Draft
    }

    pub fn is_signed(&self) -> bool {
        self.status == EncounterStatus::Signed
    }

    /// Stamp a section's last-edit timestamp.
    pub fn touch_section(&mut self, section: Section) {
        self.section_updated_at
            .insert(section, chrono::Utc::now().to_rfc3339());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_encounter_is_draft() {
        let encounter = Encounter::new(
            "episode-1".into(),
            "patient-1".into(),
            EncounterType::InitialVisit,
            "Dr. Osei".into(),
        );
        assert!(encounter.is_draft());
        assert!(encounter.signed_by.is_none());
        assert!(encounter.signed_at.is_none());
        assert_eq!(encounter.soap, SoapNote::default());
    }

    #[test]
    fn test_vitals_any_present() {
        let mut vitals = VitalSigns::default();
        assert!(!vitals.any_present());
        vitals.pulse = Some("72".into());
        assert!(vitals.any_present());
    }

    #[test]
    fn test_touch_section() {
        let mut encounter = Encounter::new(
            "episode-1".into(),
            "patient-1".into(),
            EncounterType::FollowUp,
            "Dr. Osei".into(),
        );
        assert!(encounter.section_updated_at.is_empty());
        encounter.touch_section(Section::Plan);
        assert!(encounter.section_updated_at.contains_key(&Section::Plan));
        assert!(!encounter
            .section_updated_at
            .contains_key(&Section::Subjective));
    }

    #[test]
    fn test_soap_note_round_trips_partial_json() {
        // Partially specified notes deserialize with defaults filled in.
        let json = r#"{"subjective":{"history_of_present_illness":"3 days of cough"}}"#;
        let note: SoapNote = serde_json::from_str(json).unwrap();
        assert_eq!(note.subjective.history_of_present_illness, "3 days of cough");
        assert!(note.objective.diagnostic_tests.is_empty());
        assert!(note.plan.follow_up.timeframe.is_empty());
    }
}
