//! Debounced auto-persistence for draft encounters.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use super::{EncounterStore, StoreError, StoreResult};
use crate::models::Encounter;

/// Debounce window observed in the capture surface: edits within this
/// interval coalesce into one persisted write.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_secs(1);

/// Coalesces rapid edits into one store write.
///
/// Each [`schedule`](Autosaver::schedule) resets the pending timer; the write
/// fires after the debounce window passes without another edit. A scheduled
/// write is fire-and-forget if the caller navigates away, but
/// [`flush`](Autosaver::flush) awaits it and surfaces any failure, which is
/// how signing serializes behind an in-flight save.
pub struct Autosaver {
    store: Arc<dyn EncounterStore>,
    delay: Duration,
    pending: Option<JoinHandle<StoreResult<()>>>,
}

impl Autosaver {
    pub fn new(store: Arc<dyn EncounterStore>) -> Self {
        Self::with_delay(store, DEFAULT_DEBOUNCE)
    }

    pub fn with_delay(store: Arc<dyn EncounterStore>, delay: Duration) -> Self {
        Self {
            store,
            delay,
            pending: None,
        }
    }

    /// Schedule a debounced save of this snapshot, cancelling any save still
    /// waiting out its window.
    pub fn schedule(&mut self, encounter: Encounter) {
        if let Some(previous) = self.pending.take() {
            previous.abort();
        }
        let store = Arc::clone(&self.store);
        let delay = self.delay;
        tracing::debug!(encounter_id = %encounter.encounter_id, "autosave scheduled");
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let result = store.save_encounter(&encounter).await;
            if let Err(err) = &result {
                tracing::warn!(
                    encounter_id = %encounter.encounter_id,
                    %err,
                    "autosave failed"
                );
            }
            result
        }));
    }

    /// True while a scheduled save has not been flushed.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Wait for the pending save (including its remaining debounce delay) and
    /// surface its outcome. No-op when nothing is pending.
    pub async fn flush(&mut self) -> StoreResult<()> {
        match self.pending.take() {
            None => Ok(()),
            Some(handle) => match handle.await {
                Ok(result) => result,
                Err(join_err) if join_err.is_cancelled() => Ok(()),
                Err(join_err) => Err(StoreError::Unavailable(format!(
                    "autosave task failed: {join_err}"
                ))),
            },
        }
    }
}
