//! Transcript extraction engine.
//!
//! Turns a raw dictation transcript into [`ExtractedSoapFragments`] with
//! deterministic keyword and regex heuristics. Extraction never fails: an
//! unrecognized transcript just produces sparser output, and absent vitals
//! stay absent rather than becoming zero or empty strings.

use chartnote_core::models::{ExtractedPlan, ExtractedSoapFragments, VitalSigns};
use regex::Regex;

use crate::keywords::{
    contains_any, ASSESSMENT_KEYWORDS, CHIEF_COMPLAINT_TRIGGERS, DIAGNOSTIC_MARKERS,
    EXAM_KEYWORDS, FOLLOW_UP_MARKERS, HPI_KEYWORDS, PLAN_KEYWORDS,
};

/// When no HPI sentence matches, fall back to this many characters of the
/// raw transcript.
const HPI_FALLBACK_CHARS: usize = 200;

/// Stateless extractor. Compiling the vital-sign patterns once in the
/// constructor keeps [`extract`](Extractor::extract) a pure function of its
/// input.
pub struct Extractor {
    chief_complaint_trigger: Regex,
    blood_pressure: Regex,
    temperature: Regex,
    pulse: Regex,
    respiratory_rate: Regex,
    oxygen_saturation: Regex,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor {
    pub fn new() -> Self {
        let trigger_pattern = format!("(?i){}", CHIEF_COMPLAINT_TRIGGERS.join("|"));
        Self {
            chief_complaint_trigger: Regex::new(&trigger_pattern).expect("static pattern"),
            // [^\d.]* keeps each match inside its own sentence: the skip
            // stops at both digits and periods.
            blood_pressure: Regex::new(
                r"(?i)blood pressure[^\d.]*(\d{2,3})\s*(?:/|over)\s*(\d{2,3})",
            )
            .expect("static pattern"),
            temperature: Regex::new(r"(?i)temp(?:erature)?[^\d.]*(\d{2,3}(?:\.\d+)?)")
                .expect("static pattern"),
            pulse: Regex::new(r"(?i)pulse[^\d.]*(\d{2,3})").expect("static pattern"),
            // \b after the prefix so "respiratory" alone (symptoms, infection)
            // does not read as a rate
            respiratory_rate: Regex::new(r"(?i)resp(?:iratory rate)?\b[^\d.]*(\d{1,2})")
                .expect("static pattern"),
            oxygen_saturation: Regex::new(r"(?i)o2 sat(?:uration)?[^\d.]*(\d{2,3})")
                .expect("static pattern"),
        }
    }

    /// Extract SOAP fragments from a raw transcript.
    ///
    /// The per-bucket steps are independent and order-insensitive, and a
    /// sentence may be counted into several buckets (see the keyword tables).
    pub fn extract(&self, text: &str) -> ExtractedSoapFragments {
        let sentences = split_sentences(text);

        let fragments = ExtractedSoapFragments {
            chief_complaint: self.chief_complaint(text),
            history_of_present_illness: self.history_of_present_illness(text, &sentences),
            vital_signs: self.vital_signs(text),
            physical_exam_general: join_matching(&sentences, EXAM_KEYWORDS),
            clinical_impression: join_matching(&sentences, ASSESSMENT_KEYWORDS),
            plan: self.plan(&sentences),
        };
        tracing::debug!(
            sentences = sentences.len(),
            empty = fragments.is_empty(),
            "transcript extracted"
        );
        fragments
    }

    /// Text between the earliest trigger phrase and the next period.
    fn chief_complaint(&self, text: &str) -> Option<String> {
        let m = self.chief_complaint_trigger.find(text)?;
        let rest = &text[m.end()..];
        let complaint = match rest.find('.') {
            Some(i) => &rest[..i],
            None => rest,
        };
        let complaint = complaint.trim();
        if complaint.is_empty() {
            None
        } else {
            Some(complaint.to_string())
        }
    }

    /// Sentences with HPI keywords, or the head of the raw transcript when
    /// none match.
    fn history_of_present_illness(&self, text: &str, sentences: &[&str]) -> Option<String> {
        if let Some(hpi) = join_matching(sentences, HPI_KEYWORDS) {
            return Some(hpi);
        }
        if text.trim().is_empty() {
            return None;
        }
        let head: String = text.chars().take(HPI_FALLBACK_CHARS).collect();
        Some(format!("{head}..."))
    }

    /// Five independent regexes over the whole transcript. Non-matches leave
    /// their key absent so completion scoring treats them as not-provided.
    fn vital_signs(&self, text: &str) -> Option<VitalSigns> {
        let vitals = VitalSigns {
            blood_pressure: self
                .blood_pressure
                .captures(text)
                .map(|c| format!("{}/{}", &c[1], &c[2])),
            temperature: capture_one(&self.temperature, text),
            pulse: capture_one(&self.pulse, text),
            respiratory_rate: capture_one(&self.respiratory_rate, text),
            oxygen_saturation: capture_one(&self.oxygen_saturation, text),
        };
        if vitals.any_present() {
            Some(vitals)
        } else {
            None
        }
    }

    /// Bucket plan sentences by first-match priority: follow-up markers win
    /// (last such sentence kept), then diagnostics markers, else treatments.
    fn plan(&self, sentences: &[&str]) -> Option<ExtractedPlan> {
        let mut plan = ExtractedPlan::default();
        for sentence in sentences {
            let lower = sentence.to_lowercase();
            if !contains_any(&lower, PLAN_KEYWORDS) {
                continue;
            }
            if contains_any(&lower, FOLLOW_UP_MARKERS) {
                plan.follow_up = Some(sentence.to_string());
            } else if contains_any(&lower, DIAGNOSTIC_MARKERS) {
                plan.diagnostics.push(sentence.to_string());
            } else {
                plan.treatments.push(sentence.to_string());
            }
        }
        if plan.is_empty() {
            None
        } else {
            Some(plan)
        }
    }
}

/// Split on sentence terminators, dropping empty pieces.
fn split_sentences(text: &str) -> Vec<&str> {
    text.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Sentences containing any keyword, joined with ". ".
fn join_matching(sentences: &[&str], keywords: &[&str]) -> Option<String> {
    let matching: Vec<&str> = sentences
        .iter()
        .filter(|s| contains_any(&s.to_lowercase(), keywords))
        .copied()
        .collect();
    if matching.is_empty() {
        None
    } else {
        Some(matching.join(". "))
    }
}

fn capture_one(pattern: &Regex, text: &str) -> Option<String> {
    pattern.captures(text).map(|c| c[1].to_string())
}
