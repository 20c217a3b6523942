//! Episode model: one clinical problem tracked over time.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Episode status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum EpisodeStatus {
    /// Problem is being actively worked up
    Active,
    /// Problem has resolved
    Resolved,
    /// Long-term management (e.g. hypertension)
    ChronicManagement,
    /// Hidden from the active worklist
    Archived,
}

/// A clinical problem/complaint, owning zero or more encounters.
///
/// Invariants: `resolved_at` is set iff status is `Resolved`; `archived_at`
/// is set iff status is `Archived`. Transitions are one-directional except
/// that an archived episode may be restored to active.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Episode {
    /// Unique episode ID
    pub episode_id: String,
    /// Owning patient ID
    pub patient_id: String,
    /// Presenting complaint that opened the episode
    pub chief_complaint: String,
    /// Episode status
    pub status: EpisodeStatus,
    /// Free-form tags
    pub tags: BTreeSet<String>,
    /// Creation timestamp
    pub created_at: String,
    /// Set when the episode resolves
    pub resolved_at: Option<String>,
    /// Set when the episode is archived
    pub archived_at: Option<String>,
}

impl Episode {
    /// Create a new active episode for a patient's first visit with a problem.
    pub fn new(patient_id: String, chief_complaint: String) -> Self {
        Self {
            episode_id: uuid::Uuid::new_v4().to_string(),
            patient_id,
            chief_complaint,
            status: EpisodeStatus::Active,
            tags: BTreeSet::new(),
            created_at: chrono::Utc::now().to_rfc3339(),
            resolved_at: None,
            archived_at: None,
        }
    }

    /// Mark the episode resolved. Returns false if the transition is not
    /// allowed from the current status.
    pub fn resolve(&mut self) -> bool {
        match self.status {
            EpisodeStatus::Active | EpisodeStatus::ChronicManagement => {
                self.status = EpisodeStatus::Resolved;
                self.resolved_at = Some(chrono::Utc::now().to_rfc3339());
                true
            }
            _ => false,
        }
    }

    /// Move an active episode into long-term management.
    pub fn mark_chronic(&mut self) -> bool {
        if self.status == EpisodeStatus::Active {
            self.status = EpisodeStatus::ChronicManagement;
            true
        } else {
            false
        }
    }

    /// Archive the episode. Clears `resolved_at` so the timestamp invariants
    /// hold when archiving a resolved episode.
    pub fn archive(&mut self) -> bool {
        if self.status == EpisodeStatus::Archived {
            return false;
        }
        self.status = EpisodeStatus::Archived;
        self.resolved_at = None;
        self.archived_at = Some(chrono::Utc::now().to_rfc3339());
        true
    }

    /// Restore an archived episode back to active.
    pub fn restore(&mut self) -> bool {
        if self.status != EpisodeStatus::Archived {
            return false;
        }
        self.status = EpisodeStatus::Active;
        self.archived_at = None;
        true
    }

    /// Add a tag. Returns false if already present.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        self.tags.insert(tag.to_string())
    }

    /// Remove a tag. Returns false if absent.
    pub fn remove_tag(&mut self, tag: &str) -> bool {
        self.tags.remove(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_episode_active() {
        let episode = Episode::new("patient-1".into(), "knee pain".into());
        assert_eq!(episode.status, EpisodeStatus::Active);
        assert!(episode.resolved_at.is_none());
        assert!(episode.archived_at.is_none());
        assert_eq!(episode.episode_id.len(), 36);
    }

    #[test]
    fn test_resolve_sets_only_resolved_at() {
        let mut episode = Episode::new("patient-1".into(), "knee pain".into());
        assert!(episode.resolve());
        assert_eq!(episode.status, EpisodeStatus::Resolved);
        assert!(episode.resolved_at.is_some());
        assert!(episode.archived_at.is_none());

        // Resolution is one-directional
        assert!(!episode.resolve());
        assert!(!episode.mark_chronic());
    }

    #[test]
    fn test_archive_then_restore() {
        let mut episode = Episode::new("patient-1".into(), "knee pain".into());
        assert!(episode.archive());
        assert_eq!(episode.status, EpisodeStatus::Archived);
        assert!(episode.archived_at.is_some());

        assert!(episode.restore());
        assert_eq!(episode.status, EpisodeStatus::Active);
        assert!(episode.archived_at.is_none());
    }

    #[test]
    fn test_archive_resolved_episode_clears_resolved_at() {
        let mut episode = Episode::new("patient-1".into(), "knee pain".into());
        assert!(episode.resolve());
        assert!(episode.archive());
        assert_eq!(episode.status, EpisodeStatus::Archived);
        assert!(episode.resolved_at.is_none());
        assert!(episode.archived_at.is_some());

        // Restoring yields a clean active episode, no stale timestamps
        assert!(episode.restore());
        assert_eq!(episode.status, EpisodeStatus::Active);
        assert!(episode.resolved_at.is_none());
        assert!(episode.archived_at.is_none());
    }

    #[test]
    fn test_restore_requires_archived() {
        let mut episode = Episode::new("patient-1".into(), "knee pain".into());
        assert!(!episode.restore());

        episode.resolve();
        assert!(!episode.restore());
        assert_eq!(episode.status, EpisodeStatus::Resolved);
    }

    #[test]
    fn test_tags() {
        let mut episode = Episode::new("patient-1".into(), "knee pain".into());
        assert!(episode.add_tag("orthopedic"));
        assert!(!episode.add_tag("orthopedic"));
        assert!(episode.remove_tag("orthopedic"));
        assert!(!episode.remove_tag("orthopedic"));
    }
}
