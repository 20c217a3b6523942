//! Section-completion scoring for SOAP notes.
//!
//! Each section has a fixed checklist of composite "filled" predicates,
//! represented as a data table so the list stays independently testable and
//! may diverge from the sign-precondition checklist. Completion state is
//! derived, never stored: callers recompute it from the note on every read.

use serde::{Deserialize, Serialize};

use crate::models::{Section, SoapNote};

/// A completion check: a stable label and a predicate over the whole note.
pub type CompletionCheck = (&'static str, fn(&SoapNote) -> bool);

/// Subjective checklist (3 checks).
pub const SUBJECTIVE_CHECKS: &[CompletionCheck] = &[
    ("history_of_present_illness", |n| {
        !n.subjective.history_of_present_illness.trim().is_empty()
    }),
    ("review_of_systems", |n| {
        n.subjective
            .review_of_systems
            .values()
            .any(|v| !v.trim().is_empty())
    }),
    ("histories", |n| {
        let s = &n.subjective;
        !s.past_medical_history.trim().is_empty()
            || !s.medications.is_empty()
            || !s.allergies.is_empty()
            || !s.social_history.trim().is_empty()
            || !s.family_history.trim().is_empty()
    }),
];

/// Objective checklist (3 checks).
pub const OBJECTIVE_CHECKS: &[CompletionCheck] = &[
    ("vital_signs", |n| n.objective.vital_signs.any_present()),
    ("physical_exam", |n| {
        !n.objective.physical_exam.general.trim().is_empty()
            || !n.objective.physical_exam.additional_findings.trim().is_empty()
    }),
    ("diagnostic_tests", |n| !n.objective.diagnostic_tests.is_empty()),
];

/// Assessment checklist (2 checks).
pub const ASSESSMENT_CHECKS: &[CompletionCheck] = &[
    ("clinical_impression", |n| {
        !n.assessment.clinical_impression.trim().is_empty()
    }),
    ("differential_diagnoses", |n| {
        !n.assessment.differential_diagnoses.is_empty()
    }),
];

/// Plan checklist (6 checks).
pub const PLAN_CHECKS: &[CompletionCheck] = &[
    ("medications", |n| !n.plan.medications.is_empty()),
    ("procedures", |n| !n.plan.procedures.is_empty()),
    ("referrals", |n| !n.plan.referrals.is_empty()),
    ("follow_up", |n| !n.plan.follow_up.timeframe.trim().is_empty()),
    ("patient_education", |n| !n.plan.patient_education.is_empty()),
    ("activity_diet", |n| {
        !n.plan.activity_instructions.trim().is_empty()
            || !n.plan.diet_instructions.trim().is_empty()
    }),
];

/// The checklist for a section.
pub fn checks_for(section: Section) -> &'static [CompletionCheck] {
    match section {
        Section::Subjective => SUBJECTIVE_CHECKS,
        Section::Objective => OBJECTIVE_CHECKS,
        Section::Assessment => ASSESSMENT_CHECKS,
        Section::Plan => PLAN_CHECKS,
    }
}

/// Derived completion status of one section.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SectionCompletion {
    Empty,
    Partial,
    Complete,
}

/// Derived completion state of a whole note.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletionState {
    pub subjective: SectionCompletion,
    pub objective: SectionCompletion,
    pub assessment: SectionCompletion,
    pub plan: SectionCompletion,
    /// Overall progress: complete sections earn full credit, partial half.
    pub overall_percent: u8,
}

impl CompletionState {
    pub fn section(&self, section: Section) -> SectionCompletion {
        match section {
            Section::Subjective => self.subjective,
            Section::Objective => self.objective,
            Section::Assessment => self.assessment,
            Section::Plan => self.plan,
        }
    }
}

/// Count of passing checks for a section, with the checklist size.
pub fn filled_counts(note: &SoapNote, section: Section) -> (usize, usize) {
    let checks = checks_for(section);
    let filled = checks.iter().filter(|(_, check)| check(note)).count();
    (filled, checks.len())
}

/// Completion status of one section.
pub fn section_status(note: &SoapNote, section: Section) -> SectionCompletion {
    let (filled, total) = filled_counts(note, section);
    if filled == 0 {
        SectionCompletion::Empty
    } else if filled == total {
        SectionCompletion::Complete
    } else {
        SectionCompletion::Partial
    }
}

/// Score the whole note.
///
/// Overall percentage is `round((100*complete + 50*partial) / sections)`:
/// a partial section contributes exactly half credit.
pub fn score(note: &SoapNote) -> CompletionState {
    let statuses: Vec<SectionCompletion> = Section::ALL
        .iter()
        .map(|&s| section_status(note, s))
        .collect();

    let complete = statuses
        .iter()
        .filter(|s| **s == SectionCompletion::Complete)
        .count();
    let partial = statuses
        .iter()
        .filter(|s| **s == SectionCompletion::Partial)
        .count();
    let total = Section::ALL.len();
    let overall_percent =
        ((100 * complete + 50 * partial) as f64 / total as f64).round() as u8;

    CompletionState {
        subjective: statuses[0],
        objective: statuses[1],
        assessment: statuses[2],
        plan: statuses[3],
        overall_percent,
    }
}
