//! Persistence collaborator interface.
//!
//! The core owns no storage. Encounters and sessions live in an external
//! store reached through [`EncounterStore`]; every call is asynchronous and
//! fallible, and a [`StoreError`] is always recoverable by the caller with
//! the pre-error state retained in memory.

mod autosave;

pub use autosave::*;

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::models::{Encounter, Session};

/// Persistence errors. Recoverable: callers keep the in-memory state and may
/// retry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("record not found: {0}")]
    NotFound(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// The external persistence collaborator.
#[async_trait]
pub trait EncounterStore: Send + Sync {
    /// Load every encounter belonging to an episode.
    async fn load_encounters_for_episode(&self, episode_id: &str) -> StoreResult<Vec<Encounter>>;

    /// Save (insert or replace) an encounter.
    async fn save_encounter(&self, encounter: &Encounter) -> StoreResult<()>;

    /// Load every open session for a patient.
    async fn load_sessions(&self, patient_id: &str) -> StoreResult<Vec<Session>>;

    /// Delete a session after finalization or explicit discard.
    async fn delete_session(&self, session_id: &str) -> StoreResult<()>;
}

#[derive(Default)]
struct MemoryInner {
    encounters: HashMap<String, Encounter>,
    sessions: HashMap<String, Session>,
}

/// In-memory store for tests and embedders without a backend.
///
/// Supports fault injection so save-failure surfacing is testable.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
    fail_saves: AtomicBool,
    save_count: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent saves fail with `StoreError::Unavailable`.
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of saves that reached the store.
    pub fn save_count(&self) -> usize {
        self.save_count.load(Ordering::SeqCst)
    }

    /// Fetch one encounter by id (test helper; the collaborator interface
    /// itself loads per episode).
    pub async fn encounter(&self, encounter_id: &str) -> Option<Encounter> {
        self.inner
            .lock()
            .await
            .encounters
            .get(encounter_id)
            .cloned()
    }

    /// Seed a session directly.
    pub async fn put_session(&self, session: Session) {
        self.inner
            .lock()
            .await
            .sessions
            .insert(session.session_id.clone(), session);
    }
}

#[async_trait]
impl EncounterStore for MemoryStore {
    async fn load_encounters_for_episode(&self, episode_id: &str) -> StoreResult<Vec<Encounter>> {
        let inner = self.inner.lock().await;
        Ok(inner
            .encounters
            .values()
            .filter(|e| e.episode_id == episode_id)
            .cloned()
            .collect())
    }

    async fn save_encounter(&self, encounter: &Encounter) -> StoreResult<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected save failure".into()));
        }
        let mut inner = self.inner.lock().await;
        inner
            .encounters
            .insert(encounter.encounter_id.clone(), encounter.clone());
        self.save_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn load_sessions(&self, patient_id: &str) -> StoreResult<Vec<Session>> {
        let inner = self.inner.lock().await;
        Ok(inner
            .sessions
            .values()
            .filter(|s| s.patient_id == patient_id)
            .cloned()
            .collect())
    }

    async fn delete_session(&self, session_id: &str) -> StoreResult<()> {
        let mut inner = self.inner.lock().await;
        match inner.sessions.remove(session_id) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound(session_id.to_string())),
        }
    }
}
