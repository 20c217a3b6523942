//! Chartnote transcript extraction.
//!
//! Deterministic conversion of raw dictation transcripts into SOAP note
//! fragments. No model backend: classification is keyword tables plus five
//! vital-sign regexes, and it never fails, only thins out.
//!
//! ```
//! use chartnote_extract::Extractor;
//!
//! let extractor = Extractor::new();
//! let fragments = extractor.extract("Patient presents with a sore throat. Temp 100.8.");
//! assert_eq!(fragments.chief_complaint.as_deref(), Some("a sore throat"));
//! ```

mod engine;
mod keywords;

pub use engine::Extractor;
pub use keywords::{
    ASSESSMENT_KEYWORDS, CHIEF_COMPLAINT_TRIGGERS, DIAGNOSTIC_MARKERS, EXAM_KEYWORDS,
    FOLLOW_UP_MARKERS, HPI_KEYWORDS, PLAN_KEYWORDS,
};
