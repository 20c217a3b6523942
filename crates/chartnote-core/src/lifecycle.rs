//! Encounter lifecycle: the draft -> signed state machine.
//!
//! A draft is single-editor, so section updates apply synchronously with no
//! write arbitration. Signing is all-or-nothing: either every precondition
//! holds and status/signed_by/signed_at change together, or nothing changes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{
    Encounter, EncounterStatus, FollowUp, PhysicalExam, Section, SoapNote, VitalSigns,
};

/// Errors from encounter state transitions and merges.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EncounterError {
    /// Sign preconditions unmet; every missing requirement is listed.
    #[error("cannot sign: missing {}", .missing.join(", "))]
    Validation { missing: Vec<String> },

    /// Edit or copy-forward attempted against a signed encounter.
    #[error("encounter {0} is signed and immutable")]
    ImmutableRecord(String),

    /// Copy-forward source is not eligible.
    #[error("invalid copy-forward source: {0}")]
    InvalidSource(String),
}

pub type EncounterResult<T> = Result<T, EncounterError>;

/// Sign preconditions: requirement label and predicate. Kept as a table,
/// separate from the completion checklists, so the two lists may diverge.
pub const SIGN_REQUIREMENTS: &[(&str, fn(&SoapNote) -> bool)] = &[
    ("subjective.history_of_present_illness", |n| {
        !n.subjective.history_of_present_illness.trim().is_empty()
    }),
    ("objective.vital_signs", |n| n.objective.vital_signs.any_present()),
    ("assessment.clinical_impression", |n| {
        !n.assessment.clinical_impression.trim().is_empty()
    }),
    ("plan.follow_up.timeframe", |n| {
        !n.plan.follow_up.timeframe.trim().is_empty()
    }),
];

/// Labels of every unmet sign requirement, in table order.
pub fn missing_sign_requirements(note: &SoapNote) -> Vec<String> {
    SIGN_REQUIREMENTS
        .iter()
        .filter(|(_, check)| !check(note))
        .map(|(label, _)| label.to_string())
        .collect()
}

/// Sign a draft encounter, locking its content.
///
/// Fails closed: on any unmet precondition the encounter is untouched and the
/// error names every missing requirement in one report.
pub fn sign(encounter: &mut Encounter, signer_name: &str) -> EncounterResult<()> {
    if encounter.is_signed() {
        return Err(EncounterError::ImmutableRecord(
            encounter.encounter_id.clone(),
        ));
    }

    let missing = missing_sign_requirements(&encounter.soap);
    if !missing.is_empty() {
        return Err(EncounterError::Validation { missing });
    }

    encounter.status = EncounterStatus::Signed;
    encounter.signed_by = Some(signer_name.to_string());
    encounter.signed_at = Some(chrono::Utc::now().to_rfc3339());
    tracing::debug!(
        encounter_id = %encounter.encounter_id,
        signer = signer_name,
        "encounter signed"
    );
    Ok(())
}

/// Apply a patch to one section of a draft encounter.
///
/// Rejected with `ImmutableRecord`, producing no mutation, once the
/// encounter is signed. On success the section's `last_updated` stamp is set.
pub fn update(encounter: &mut Encounter, patch: SectionPatch) -> EncounterResult<()> {
    if encounter.is_signed() {
        return Err(EncounterError::ImmutableRecord(
            encounter.encounter_id.clone(),
        ));
    }

    let section = patch.section();
    patch.apply(&mut encounter.soap);
    encounter.touch_section(section);
    Ok(())
}

/// A field-granularity patch against one SOAP section. `None` fields leave
/// the target untouched; list and map fields replace or extend as noted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum SectionPatch {
    Subjective(SubjectivePatch),
    Objective(ObjectivePatch),
    Assessment(AssessmentPatch),
    Plan(PlanPatch),
}

impl SectionPatch {
    pub fn section(&self) -> Section {
        match self {
            SectionPatch::Subjective(_) => Section::Subjective,
            SectionPatch::Objective(_) => Section::Objective,
            SectionPatch::Assessment(_) => Section::Assessment,
            SectionPatch::Plan(_) => Section::Plan,
        }
    }

    fn apply(self, note: &mut SoapNote) {
        match self {
            SectionPatch::Subjective(p) => p.apply(note),
            SectionPatch::Objective(p) => p.apply(note),
            SectionPatch::Assessment(p) => p.apply(note),
            SectionPatch::Plan(p) => p.apply(note),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SubjectivePatch {
    pub chief_complaint: Option<String>,
    pub history_of_present_illness: Option<String>,
    /// Entries merge into the existing review-of-systems map
    pub review_of_systems: Option<BTreeMap<String, String>>,
    pub past_medical_history: Option<String>,
    pub medications: Option<Vec<String>>,
    pub allergies: Option<Vec<String>>,
    pub social_history: Option<String>,
    pub family_history: Option<String>,
}

impl SubjectivePatch {
    fn apply(self, note: &mut SoapNote) {
        let s = &mut note.subjective;
        if let Some(v) = self.chief_complaint {
            s.chief_complaint = v;
        }
        if let Some(v) = self.history_of_present_illness {
            s.history_of_present_illness = v;
        }
        if let Some(entries) = self.review_of_systems {
            s.review_of_systems.extend(entries);
        }
        if let Some(v) = self.past_medical_history {
            s.past_medical_history = v;
        }
        if let Some(v) = self.medications {
            s.medications = v;
        }
        if let Some(v) = self.allergies {
            s.allergies = v;
        }
        if let Some(v) = self.social_history {
            s.social_history = v;
        }
        if let Some(v) = self.family_history {
            s.family_history = v;
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ObjectivePatch {
    pub vital_signs: Option<VitalSigns>,
    pub physical_exam: Option<PhysicalExam>,
    pub diagnostic_tests: Option<Vec<String>>,
}

impl ObjectivePatch {
    fn apply(self, note: &mut SoapNote) {
        let o = &mut note.objective;
        if let Some(v) = self.vital_signs {
            o.vital_signs = v;
        }
        if let Some(v) = self.physical_exam {
            o.physical_exam = v;
        }
        if let Some(v) = self.diagnostic_tests {
            o.diagnostic_tests = v;
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AssessmentPatch {
    pub clinical_impression: Option<String>,
    pub differential_diagnoses: Option<Vec<String>>,
}

impl AssessmentPatch {
    fn apply(self, note: &mut SoapNote) {
        let a = &mut note.assessment;
        if let Some(v) = self.clinical_impression {
            a.clinical_impression = v;
        }
        if let Some(v) = self.differential_diagnoses {
            a.differential_diagnoses = v;
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlanPatch {
    pub medications: Option<Vec<String>>,
    pub procedures: Option<Vec<String>>,
    pub referrals: Option<Vec<String>>,
    pub follow_up: Option<FollowUp>,
    pub patient_education: Option<Vec<String>>,
    pub activity_instructions: Option<String>,
    pub diet_instructions: Option<String>,
}

impl PlanPatch {
    fn apply(self, note: &mut SoapNote) {
        let p = &mut note.plan;
        if let Some(v) = self.medications {
            p.medications = v;
        }
        if let Some(v) = self.procedures {
            p.procedures = v;
        }
        if let Some(v) = self.referrals {
            p.referrals = v;
        }
        if let Some(v) = self.follow_up {
            p.follow_up = v;
        }
        if let Some(v) = self.patient_education {
            p.patient_education = v;
        }
        if let Some(v) = self.activity_instructions {
            p.activity_instructions = v;
        }
        if let Some(v) = self.diet_instructions {
            p.diet_instructions = v;
        }
    }
}
