//! Keyword tables driving transcript classification.
//!
//! All matching is case-insensitive substring search. The tables are
//! non-exclusive on purpose: one sentence may land in several buckets when it
//! matches several keyword sets. That duplication matches the capture
//! surface's observed behavior and is kept rather than "fixed".

/// Phrases that introduce the chief complaint. The complaint is the text
/// between the end of the earliest trigger and the next period.
pub const CHIEF_COMPLAINT_TRIGGERS: &[&str] = &[
    "complaining of",
    "presents with",
    "here for",
    "chief complaint",
];

/// Sentences mentioning these belong to the history of present illness.
pub const HPI_KEYWORDS: &[&str] = &[
    "started", "began", "duration", "severity", "location", "quality", "timing",
];

/// Sentences mentioning these belong to the physical exam narrative.
pub const EXAM_KEYWORDS: &[&str] = &[
    "exam",
    "examination",
    "appears",
    "noted",
    "observed",
    "palpation",
    "auscultation",
];

/// Sentences mentioning these belong to the clinical impression.
pub const ASSESSMENT_KEYWORDS: &[&str] = &[
    "assessment",
    "diagnosis",
    "impression",
    "likely",
    "suspect",
    "consistent with",
];

/// Sentences mentioning these belong to the plan. Dictation drops the hyphen
/// in "follow-up" often enough that both spellings are listed.
pub const PLAN_KEYWORDS: &[&str] = &[
    "order",
    "prescribe",
    "recommend",
    "follow-up",
    "follow up",
    "return",
    "start",
    "continue",
];

/// Plan sentences with these markers set the follow-up (last match wins).
pub const FOLLOW_UP_MARKERS: &[&str] = &["follow-up", "follow up", "return"];

/// Plan sentences with these markers are diagnostics orders.
pub const DIAGNOSTIC_MARKERS: &[&str] = &["test", "lab", "imaging"];

/// Case-insensitive "contains any keyword" check over a pre-lowercased
/// sentence.
pub(crate) fn contains_any(sentence_lower: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| sentence_lower.contains(k))
}
