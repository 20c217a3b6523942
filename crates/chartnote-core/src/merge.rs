//! Group-granularity merges into a draft note.
//!
//! Copy-forward and fragment application share one rule: a requested group
//! overwrites exactly its own sub-object in the target, leaving every sibling
//! field untouched. Neither operation is a whole-section overwrite.

use serde::{Deserialize, Serialize};

use crate::lifecycle::{EncounterError, EncounterResult};
use crate::models::{Encounter, ExtractedSoapFragments, Section};

/// Field groups eligible for copy-forward from a prior signed encounter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum FieldGroup {
    Vitals,
    Medications,
    Allergies,
    PhysicalExam,
    Assessment,
}

impl FieldGroup {
    /// The SOAP section a group lands in.
    pub fn section(&self) -> Section {
        match self {
            FieldGroup::Vitals | FieldGroup::PhysicalExam => Section::Objective,
            FieldGroup::Medications | FieldGroup::Allergies => Section::Subjective,
            FieldGroup::Assessment => Section::Assessment,
        }
    }
}

/// Seed a draft from a prior signed encounter in the same episode.
///
/// The source must be signed, belong to the target's episode, and not be the
/// target itself. An empty group list is a no-op. Each requested group is
/// copied verbatim; nothing outside the requested groups changes.
pub fn copy_forward(
    target: &mut Encounter,
    source: &Encounter,
    groups: &[FieldGroup],
) -> EncounterResult<()> {
    if target.is_signed() {
        return Err(EncounterError::ImmutableRecord(target.encounter_id.clone()));
    }
    if source.encounter_id == target.encounter_id {
        return Err(EncounterError::InvalidSource(
            "source and target are the same encounter".into(),
        ));
    }
    if source.episode_id != target.episode_id {
        return Err(EncounterError::InvalidSource(format!(
            "source belongs to episode {}, target to {}",
            source.episode_id, target.episode_id
        )));
    }
    if !source.is_signed() {
        return Err(EncounterError::InvalidSource(format!(
            "source encounter {} is not signed",
            source.encounter_id
        )));
    }

    for group in groups {
        match group {
            FieldGroup::Vitals => {
                target.soap.objective.vital_signs = source.soap.objective.vital_signs.clone();
            }
            FieldGroup::Medications => {
                target.soap.subjective.medications = source.soap.subjective.medications.clone();
            }
            FieldGroup::Allergies => {
                target.soap.subjective.allergies = source.soap.subjective.allergies.clone();
            }
            FieldGroup::PhysicalExam => {
                target.soap.objective.physical_exam = source.soap.objective.physical_exam.clone();
            }
            FieldGroup::Assessment => {
                target.soap.assessment = source.soap.assessment.clone();
            }
        }
        target.touch_section(group.section());
        tracing::debug!(
            source_id = %source.encounter_id,
            target_id = %target.encounter_id,
            ?group,
            "copied forward"
        );
    }
    Ok(())
}

/// Merge confirmed extraction fragments into a draft note.
///
/// Only sub-objects present in the fragments overwrite their counterparts;
/// absent fragments leave the draft untouched. Extracted plan buckets land in
/// their completion-relevant homes: follow-up fills the plan follow-up
/// timeframe, treatments fill plan medications, diagnostics fill the ordered
/// diagnostic tests.
pub fn apply_fragments(
    target: &mut Encounter,
    fragments: &ExtractedSoapFragments,
) -> EncounterResult<()> {
    if target.is_signed() {
        return Err(EncounterError::ImmutableRecord(target.encounter_id.clone()));
    }

    if let Some(cc) = &fragments.chief_complaint {
        target.soap.subjective.chief_complaint = cc.clone();
        target.touch_section(Section::Subjective);
    }
    if let Some(hpi) = &fragments.history_of_present_illness {
        target.soap.subjective.history_of_present_illness = hpi.clone();
        target.touch_section(Section::Subjective);
    }
    if let Some(vitals) = &fragments.vital_signs {
        target.soap.objective.vital_signs = vitals.clone();
        target.touch_section(Section::Objective);
    }
    if let Some(general) = &fragments.physical_exam_general {
        target.soap.objective.physical_exam.general = general.clone();
        target.touch_section(Section::Objective);
    }
    if let Some(impression) = &fragments.clinical_impression {
        target.soap.assessment.clinical_impression = impression.clone();
        target.touch_section(Section::Assessment);
    }
    if let Some(plan) = &fragments.plan {
        if let Some(follow_up) = &plan.follow_up {
            target.soap.plan.follow_up.timeframe = follow_up.clone();
            target.touch_section(Section::Plan);
        }
        if !plan.treatments.is_empty() {
            target.soap.plan.medications = plan.treatments.clone();
            target.touch_section(Section::Plan);
        }
        if !plan.diagnostics.is_empty() {
            target.soap.objective.diagnostic_tests = plan.diagnostics.clone();
            target.touch_section(Section::Objective);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::sign;
    use crate::models::{EncounterType, ExtractedPlan, VitalSigns};

    fn draft_in(episode_id: &str) -> Encounter {
        Encounter::new(
            episode_id.into(),
            "patient-1".into(),
            EncounterType::FollowUp,
            "Dr. Osei".into(),
        )
    }

    fn signed_source(episode_id: &str) -> Encounter {
        let mut source = draft_in(episode_id);
        source.soap.subjective.history_of_present_illness = "initial visit".into();
        source.soap.subjective.medications = vec!["lisinopril 10mg".into()];
        source.soap.subjective.allergies = vec!["sulfa".into()];
        source.soap.objective.vital_signs = VitalSigns {
            blood_pressure: Some("142/90".into()),
            pulse: Some("80".into()),
            ..Default::default()
        };
        source.soap.objective.physical_exam.general = "well appearing".into();
        source.soap.assessment.clinical_impression = "essential hypertension".into();
        source.soap.assessment.differential_diagnoses = vec!["white coat".into()];
        source.soap.plan.follow_up.timeframe = "2 weeks".into();
        sign(&mut source, "Dr. Osei").unwrap();
        source
    }

    #[test]
    fn test_copy_forward_copies_only_requested_groups() {
        let source = signed_source("episode-1");
        let mut target = draft_in("episode-1");
        target.soap.subjective.medications = vec!["metformin".into()];
        target.soap.assessment.clinical_impression = "own impression".into();

        copy_forward(&mut target, &source, &[FieldGroup::Vitals]).unwrap();

        assert_eq!(
            target.soap.objective.vital_signs.blood_pressure.as_deref(),
            Some("142/90")
        );
        // Siblings untouched even though the source differs there
        assert_eq!(target.soap.subjective.medications, vec!["metformin".to_string()]);
        assert_eq!(target.soap.assessment.clinical_impression, "own impression");
    }

    #[test]
    fn test_copy_forward_assessment_is_whole_group() {
        let source = signed_source("episode-1");
        let mut target = draft_in("episode-1");

        copy_forward(&mut target, &source, &[FieldGroup::Assessment]).unwrap();
        assert_eq!(
            target.soap.assessment.clinical_impression,
            "essential hypertension"
        );
        assert_eq!(
            target.soap.assessment.differential_diagnoses,
            vec!["white coat".to_string()]
        );
    }

    #[test]
    fn test_copy_forward_empty_groups_is_noop() {
        let source = signed_source("episode-1");
        let mut target = draft_in("episode-1");
        let before = target.soap.clone();

        copy_forward(&mut target, &source, &[]).unwrap();
        assert_eq!(target.soap, before);
    }

    #[test]
    fn test_copy_forward_rejects_unsigned_source() {
        let source = draft_in("episode-1");
        let mut target = draft_in("episode-1");

        let err = copy_forward(&mut target, &source, &[FieldGroup::Vitals]).unwrap_err();
        assert!(matches!(err, EncounterError::InvalidSource(_)));
    }

    #[test]
    fn test_copy_forward_rejects_cross_episode_source() {
        let source = signed_source("episode-2");
        let mut target = draft_in("episode-1");

        let err = copy_forward(&mut target, &source, &[FieldGroup::Vitals]).unwrap_err();
        assert!(matches!(err, EncounterError::InvalidSource(_)));
    }

    #[test]
    fn test_copy_forward_rejects_self_source() {
        let mut source = signed_source("episode-1");
        let source_copy = source.clone();

        // Signed target also exercises the self-id check ordering
        let err = copy_forward(&mut source, &source_copy, &[FieldGroup::Vitals]).unwrap_err();
        assert!(matches!(err, EncounterError::ImmutableRecord(_)));

        let mut target = draft_in("episode-1");
        target.encounter_id = source_copy.encounter_id.clone();
        let err = copy_forward(&mut target, &source_copy, &[FieldGroup::Vitals]).unwrap_err();
        assert!(matches!(err, EncounterError::InvalidSource(_)));
    }

    #[test]
    fn test_copy_forward_rejects_signed_target() {
        let source = signed_source("episode-1");
        let mut target = signed_source("episode-1");
        let before = target.soap.clone();

        let err = copy_forward(&mut target, &source, &[FieldGroup::Medications]).unwrap_err();
        assert!(matches!(err, EncounterError::ImmutableRecord(_)));
        assert_eq!(target.soap, before);
    }

    #[test]
    fn test_apply_fragments_overwrites_only_present_groups() {
        let mut target = draft_in("episode-1");
        target.soap.subjective.chief_complaint = "existing complaint".into();
        target.soap.objective.physical_exam.additional_findings = "scar noted".into();

        let fragments = ExtractedSoapFragments {
            vital_signs: Some(VitalSigns {
                temperature: Some("101.5".into()),
                ..Default::default()
            }),
            physical_exam_general: Some("appears fatigued".into()),
            ..Default::default()
        };

        apply_fragments(&mut target, &fragments).unwrap();

        assert_eq!(
            target.soap.objective.vital_signs.temperature.as_deref(),
            Some("101.5")
        );
        assert_eq!(target.soap.objective.physical_exam.general, "appears fatigued");
        // Sibling field inside the exam left alone
        assert_eq!(
            target.soap.objective.physical_exam.additional_findings,
            "scar noted"
        );
        assert_eq!(target.soap.subjective.chief_complaint, "existing complaint");
    }

    #[test]
    fn test_apply_fragments_plan_buckets_land_in_note_paths() {
        let mut target = draft_in("episode-1");
        let fragments = ExtractedSoapFragments {
            plan: Some(ExtractedPlan {
                follow_up: Some("Follow up in one week".into()),
                diagnostics: vec!["order chest x-ray".into()],
                treatments: vec!["prescribe acetaminophen".into()],
            }),
            ..Default::default()
        };

        apply_fragments(&mut target, &fragments).unwrap();

        assert_eq!(target.soap.plan.follow_up.timeframe, "Follow up in one week");
        assert_eq!(
            target.soap.plan.medications,
            vec!["prescribe acetaminophen".to_string()]
        );
        assert_eq!(
            target.soap.objective.diagnostic_tests,
            vec!["order chest x-ray".to_string()]
        );
    }

    #[test]
    fn test_apply_fragments_rejected_on_signed_encounter() {
        let mut target = signed_source("episode-1");
        let before = target.soap.clone();
        let fragments = ExtractedSoapFragments {
            clinical_impression: Some("revised".into()),
            ..Default::default()
        };

        let err = apply_fragments(&mut target, &fragments).unwrap_err();
        assert!(matches!(err, EncounterError::ImmutableRecord(_)));
        assert_eq!(target.soap, before);
    }
}
