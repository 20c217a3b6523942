//! Editing context for one draft encounter.
//!
//! Replaces the capture surface's ambient state (current section, autosave
//! timers) with an explicit struct passed to the core operations.

use std::sync::Arc;
use std::time::Duration;

use crate::completion::{self, CompletionState};
use crate::lifecycle::{self, SectionPatch};
use crate::merge::{self, FieldGroup};
use crate::models::{Encounter, ExtractedSoapFragments, Section};
use crate::store::{Autosaver, EncounterStore, StoreResult};
use crate::ChartnoteError;

/// Single-editor context: one clinician, one draft, one debounce timer.
pub struct EncounterEditor {
    encounter: Encounter,
    current_section: Section,
    store: Arc<dyn EncounterStore>,
    autosaver: Autosaver,
}

impl EncounterEditor {
    pub fn new(encounter: Encounter, store: Arc<dyn EncounterStore>) -> Self {
        Self {
            encounter,
            current_section: Section::Subjective,
            autosaver: Autosaver::new(Arc::clone(&store)),
            store,
        }
    }

    pub fn with_debounce(
        encounter: Encounter,
        store: Arc<dyn EncounterStore>,
        delay: Duration,
    ) -> Self {
        Self {
            encounter,
            current_section: Section::Subjective,
            autosaver: Autosaver::with_delay(Arc::clone(&store), delay),
            store,
        }
    }

    pub fn encounter(&self) -> &Encounter {
        &self.encounter
    }

    pub fn current_section(&self) -> Section {
        self.current_section
    }

    pub fn set_current_section(&mut self, section: Section) {
        self.current_section = section;
    }

    /// Completion state, recomputed from the note on every read.
    pub fn completion(&self) -> CompletionState {
        completion::score(&self.encounter.soap)
    }

    /// Apply a section patch and schedule a debounced save.
    pub fn update_section(&mut self, patch: SectionPatch) -> Result<(), ChartnoteError> {
        let section = patch.section();
        lifecycle::update(&mut self.encounter, patch)?;
        self.current_section = section;
        self.autosaver.schedule(self.encounter.clone());
        Ok(())
    }

    /// Merge confirmed extraction fragments and schedule a debounced save.
    pub fn apply_fragments(
        &mut self,
        fragments: &ExtractedSoapFragments,
    ) -> Result<(), ChartnoteError> {
        merge::apply_fragments(&mut self.encounter, fragments)?;
        self.autosaver.schedule(self.encounter.clone());
        Ok(())
    }

    /// Copy field groups forward from a prior signed encounter and schedule a
    /// debounced save.
    pub fn copy_forward(
        &mut self,
        source: &Encounter,
        groups: &[FieldGroup],
    ) -> Result<(), ChartnoteError> {
        merge::copy_forward(&mut self.encounter, source, groups)?;
        self.autosaver.schedule(self.encounter.clone());
        Ok(())
    }

    /// Sign the draft.
    ///
    /// Serializes behind any in-flight autosave so the signature never lands
    /// over data that has not reached the store, then persists the signed
    /// note immediately. A flush or save failure aborts the sign with the
    /// draft intact in memory.
    pub async fn sign(&mut self, signer_name: &str) -> Result<(), ChartnoteError> {
        self.autosaver.flush().await?;
        lifecycle::sign(&mut self.encounter, signer_name)?;
        self.store.save_encounter(&self.encounter).await?;
        Ok(())
    }

    /// Wait out any pending autosave and surface its outcome.
    pub async fn flush(&mut self) -> StoreResult<()> {
        self.autosaver.flush().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::SectionCompletion;
    use crate::lifecycle::{AssessmentPatch, EncounterError, SubjectivePatch};
    use crate::models::{EncounterType, VitalSigns};
    use crate::store::{MemoryStore, StoreError};

    fn editor_with_store() -> (EncounterEditor, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let encounter = Encounter::new(
            "episode-1".into(),
            "patient-1".into(),
            EncounterType::InitialVisit,
            "Dr. Osei".into(),
        );
        let editor = EncounterEditor::new(encounter, Arc::clone(&store) as Arc<dyn EncounterStore>);
        (editor, store)
    }

    fn fill_signable(editor: &mut EncounterEditor) {
        editor
            .update_section(lifecycle::SectionPatch::Subjective(SubjectivePatch {
                history_of_present_illness: Some("3 days of cough".into()),
                ..Default::default()
            }))
            .unwrap();
        editor
            .update_section(lifecycle::SectionPatch::Objective(
                crate::lifecycle::ObjectivePatch {
                    vital_signs: Some(VitalSigns {
                        temperature: Some("101.5".into()),
                        ..Default::default()
                    }),
                    ..Default::default()
                },
            ))
            .unwrap();
        editor
            .update_section(lifecycle::SectionPatch::Assessment(AssessmentPatch {
                clinical_impression: Some("viral URI".into()),
                ..Default::default()
            }))
            .unwrap();
        editor
            .update_section(lifecycle::SectionPatch::Plan(crate::lifecycle::PlanPatch {
                follow_up: Some(crate::models::FollowUp {
                    timeframe: "1 week".into(),
                    instructions: String::new(),
                }),
                ..Default::default()
            }))
            .unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_update_tracks_current_section_and_completion() {
        let (mut editor, _store) = editor_with_store();
        editor
            .update_section(lifecycle::SectionPatch::Assessment(AssessmentPatch {
                clinical_impression: Some("viral URI".into()),
                ..Default::default()
            }))
            .unwrap();

        assert_eq!(editor.current_section(), Section::Assessment);
        assert_eq!(editor.completion().assessment, SectionCompletion::Partial);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sign_persists_signed_note() {
        let (mut editor, store) = editor_with_store();
        fill_signable(&mut editor);

        editor.sign("Dr. Osei").await.unwrap();

        assert!(editor.encounter().is_signed());
        let saved = store.encounter(&editor.encounter().encounter_id).await.unwrap();
        assert!(saved.is_signed());
        assert_eq!(saved.signed_by.as_deref(), Some("Dr. Osei"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sign_failure_keeps_draft_and_edits() {
        let (mut editor, store) = editor_with_store();
        fill_signable(&mut editor);
        store.set_fail_saves(true);

        let err = editor.sign("Dr. Osei").await.unwrap_err();
        assert!(matches!(err, ChartnoteError::Store(StoreError::Unavailable(_))));

        // Pre-error state retained in memory
        assert!(editor.encounter().is_draft());
        assert_eq!(
            editor.encounter().soap.subjective.history_of_present_illness,
            "3 days of cough"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_sign_validation_error_after_flush() {
        let (mut editor, store) = editor_with_store();
        editor
            .update_section(lifecycle::SectionPatch::Subjective(SubjectivePatch {
                history_of_present_illness: Some("cough".into()),
                ..Default::default()
            }))
            .unwrap();

        let err = editor.sign("Dr. Osei").await.unwrap_err();
        assert!(matches!(
            err,
            ChartnoteError::Encounter(EncounterError::Validation { .. })
        ));
        // The pending edit still reached the store via the flush
        assert_eq!(store.save_count(), 1);
    }
}
