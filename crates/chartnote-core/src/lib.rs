//! Chartnote Core Library
//!
//! Clinical encounter-documentation core: SOAP note drafting, completion
//! scoring, copy-forward, signing, and workflow resumption.
//!
//! # Architecture
//!
//! ```text
//! Dictation → Transcript Extraction ─┐
//!                                    ▼
//!            Manual edits ──► [DRAFT: encounter.soap]
//!                                    │
//!                     every mutation recomputes completion
//!                                    │
//!                    ┌───────────────┼────────────────┐
//!                    │               │                │
//!                    ▼               ▼                ▼
//!              Copy-forward     Debounced          sign()
//!              (prior signed    autosave       (all-or-nothing,
//!               encounter)     (external          then locked)
//!                                store)
//! ```
//!
//! # Core Principle
//!
//! **A signed encounter is immutable.** Signing is gated on a fixed
//! requirement checklist, fails closed, and locks the note against every
//! subsequent edit path.
//!
//! # Modules
//!
//! - [`models`]: Domain types (Episode, Encounter, SoapNote, Session, etc.)
//! - [`completion`]: Per-section completion scoring
//! - [`lifecycle`]: Draft -> signed state machine and section updates
//! - [`merge`]: Copy-forward and extraction-fragment merging
//! - [`workflow`]: Step inference for resumed assessments
//! - [`store`]: Persistence collaborator interface and debounced autosave
//! - [`editor`]: Explicit editing context for one draft

pub mod completion;
pub mod editor;
pub mod lifecycle;
pub mod merge;
pub mod models;
pub mod store;
pub mod workflow;

// Re-export commonly used types
pub use completion::{score, CompletionState, SectionCompletion};
pub use editor::EncounterEditor;
pub use lifecycle::{EncounterError, SectionPatch};
pub use merge::{apply_fragments, copy_forward, FieldGroup};
pub use models::{
    AssessmentSnapshot, Encounter, EncounterStatus, EncounterType, Episode, EpisodeStatus,
    ExtractedSoapFragments, Section, Session, SoapNote,
};
pub use store::{Autosaver, EncounterStore, MemoryStore, StoreError};
pub use workflow::{infer_step, WorkflowStep};

/// Top-level error for embedders composing lifecycle and persistence calls.
#[derive(Debug, thiserror::Error)]
pub enum ChartnoteError {
    #[error(transparent)]
    Encounter(#[from] lifecycle::EncounterError),

    #[error(transparent)]
    Store(#[from] store::StoreError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
