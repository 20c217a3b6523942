//! Workflow-step inference for resumed assessments.

use serde::{Deserialize, Serialize};

use crate::models::AssessmentSnapshot;

/// The steps of a single-visit assessment, in workflow order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum WorkflowStep {
    PatientInfo,
    ClinicalAssessment,
    PhysicalExam,
    DiagnosticAnalysis,
    RecommendedTests,
    TestResults,
    FinalDiagnosis,
    TreatmentPlan,
}

impl WorkflowStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStep::PatientInfo => "patient-info",
            WorkflowStep::ClinicalAssessment => "clinical-assessment",
            WorkflowStep::PhysicalExam => "physical-exam",
            WorkflowStep::DiagnosticAnalysis => "diagnostic-analysis",
            WorkflowStep::RecommendedTests => "recommended-tests",
            WorkflowStep::TestResults => "test-results",
            WorkflowStep::FinalDiagnosis => "final-diagnosis",
            WorkflowStep::TreatmentPlan => "treatment-plan",
        }
    }
}

impl std::fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Determine which step to resume an interrupted assessment at.
///
/// Evaluates predicates most-advanced-state first and returns the first
/// match, so a snapshot always maps to exactly one step; the empty snapshot
/// maps to the first step. Total function, no error path.
pub fn infer_step(snapshot: &AssessmentSnapshot) -> WorkflowStep {
    if snapshot.treatment_plan.is_some() && !snapshot.prescriptions.is_empty() {
        WorkflowStep::TreatmentPlan
    } else if snapshot.final_diagnosis.is_some() {
        WorkflowStep::FinalDiagnosis
    } else if !snapshot.test_results.is_empty() {
        WorkflowStep::TestResults
    } else if !snapshot.selected_tests.is_empty() {
        WorkflowStep::RecommendedTests
    } else if snapshot.doctor_diagnosis.is_some() || snapshot.diagnostic_notes.is_some() {
        WorkflowStep::DiagnosticAnalysis
    } else if snapshot.physical_exam.blood_pressure.is_some()
        || snapshot.physical_exam.heart_rate.is_some()
    {
        WorkflowStep::PhysicalExam
    } else if snapshot.history_of_present_illness.is_some() || snapshot.chief_complaint.is_some() {
        WorkflowStep::ClinicalAssessment
    } else {
        WorkflowStep::PatientInfo
    }
}
