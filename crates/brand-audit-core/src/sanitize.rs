//! Defensive normalization of raw model text.
//!
//! [`sanitize`] never fails. It strips code fences, parses the text, then runs
//! each field through an explicit validator that either accepts the value or
//! substitutes a fixed default. Whether the text parsed at all is reported
//! through [`PayloadStatus`] so the invoker can decide between a scored result
//! and the failure result.

use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::domain::{AuditResult, Pillar, PillarScore, MAX_HARD_QUESTIONS, PILLAR_COUNT};

pub const DEFAULT_VERDICT: &str = "Analysis Incomplete";
pub const MISSING_PILLAR_CRITIQUE: &str = "Data missing: the analysis did not cover this pillar.";
pub const MISSING_CRITIQUE: &str = "No critique provided.";

/// Whether the raw text was usable structured data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadStatus {
    /// Parsed as a JSON object; individual fields may still have been defaulted.
    Parsed,
    /// Not a JSON object even after fence stripping.
    Unparseable(String),
}

/// Sanitized, fully-defaulted payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedPayload {
    pub verdict: String,
    pub pillars: [PillarScore; PILLAR_COUNT],
    pub hard_questions: Vec<String>,
    pub status: PayloadStatus,
}

impl ValidatedPayload {
    fn empty(status: PayloadStatus) -> Self {
        Self {
            verdict: DEFAULT_VERDICT.to_string(),
            pillars: placeholder_pillars(),
            hard_questions: Vec::new(),
            status,
        }
    }

    pub fn is_parsed(&self) -> bool {
        self.status == PayloadStatus::Parsed
    }

    /// Build the final result; the total is recomputed here.
    pub fn into_result(self) -> AuditResult {
        AuditResult::new(self.verdict, self.pillars, self.hard_questions)
    }
}

/// Upstream fields we look at. Anything else, including a model-supplied
/// total, is dropped.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawPayload {
    verdict: Value,
    pillars: Value,
    #[serde(rename = "hardQuestions", alias = "hard_questions")]
    hard_questions: Value,
}

/// Sanitize raw model text into a validated payload.
pub fn sanitize(raw: &str) -> ValidatedPayload {
    let body = strip_code_fence(raw);

    let value: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(e) => return ValidatedPayload::empty(PayloadStatus::Unparseable(e.to_string())),
    };
    if !value.is_object() {
        return ValidatedPayload::empty(PayloadStatus::Unparseable(format!(
            "expected a JSON object, got {}",
            json_type(&value)
        )));
    }
    let payload = match RawPayload::deserialize(&value) {
        Ok(p) => p,
        Err(e) => return ValidatedPayload::empty(PayloadStatus::Unparseable(e.to_string())),
    };

    ValidatedPayload {
        verdict: validate_verdict(&payload.verdict),
        pillars: validate_pillars(&payload.pillars),
        hard_questions: validate_hard_questions(&payload.hard_questions),
        status: PayloadStatus::Parsed,
    }
}

/// Remove one enclosing markdown code fence (with optional language tag).
///
/// A reply cut off before its closing fence still has the opening line
/// stripped.
pub fn strip_code_fence(raw: &str) -> &str {
    if let Some(body) = fence_regex().captures(raw).and_then(|caps| caps.get(1)) {
        return body.as_str().trim();
    }
    match open_fence_regex().find(raw) {
        Some(open) => raw[open.end()..].trim(),
        None => raw.trim(),
    }
}

fn fence_regex() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        Regex::new(r"(?s)^\s*```[A-Za-z0-9_-]*[ \t]*\r?\n?(.*?)```\s*$").expect("valid fence regex")
    })
}

fn open_fence_regex() -> &'static Regex {
    static OPEN_FENCE: OnceLock<Regex> = OnceLock::new();
    OPEN_FENCE.get_or_init(|| {
        Regex::new(r"^\s*```[A-Za-z0-9_-]*[ \t]*\r?\n?").expect("valid opening fence regex")
    })
}

/// The fixed five-entry set used when the model returns no pillars.
pub fn placeholder_pillars() -> [PillarScore; PILLAR_COUNT] {
    Pillar::ALL.map(placeholder)
}

fn placeholder(pillar: Pillar) -> PillarScore {
    PillarScore::for_pillar(pillar, 0, MISSING_PILLAR_CRITIQUE)
}

fn validate_verdict(value: &Value) -> String {
    non_empty_str(value).unwrap_or(DEFAULT_VERDICT).to_string()
}

fn validate_pillars(value: &Value) -> [PillarScore; PILLAR_COUNT] {
    let entries = match value.as_array() {
        Some(list) if !list.is_empty() => list,
        _ => return placeholder_pillars(),
    };

    // Short lists are padded per slot, long lists truncated.
    std::array::from_fn(|slot| {
        let pillar = Pillar::ALL[slot];
        match entries.get(slot).and_then(Value::as_object) {
            Some(entry) => PillarScore {
                code: entry
                    .get("code")
                    .and_then(non_empty_str)
                    .unwrap_or(pillar.code())
                    .to_string(),
                name: entry
                    .get("name")
                    .and_then(non_empty_str)
                    .unwrap_or(pillar.name())
                    .to_string(),
                score: entry.get("score").map_or(0, coerce_score),
                critique: entry
                    .get("critique")
                    .and_then(non_empty_str)
                    .unwrap_or(MISSING_CRITIQUE)
                    .to_string(),
            },
            None => placeholder(pillar),
        }
    })
}

fn validate_hard_questions(value: &Value) -> Vec<String> {
    let Some(list) = value.as_array() else {
        return Vec::new();
    };
    list.iter()
        .filter_map(non_empty_str)
        .take(MAX_HARD_QUESTIONS)
        .map(str::to_string)
        .collect()
}

/// Coerce a score to 0..=10. Non-numeric, negative and non-finite values are 0.
fn coerce_score(value: &Value) -> u8 {
    let raw = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match raw {
        Some(v) if v.is_finite() && v > 0.0 => v.round().min(10.0) as u8,
        _ => 0,
    }
}

fn non_empty_str(value: &Value) -> Option<&str> {
    value.as_str().map(str::trim).filter(|s| !s.is_empty())
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_payload() -> Value {
        json!({
            "totalScore": 9.9,
            "verdict": "Sharp but forgettable.",
            "pillars": [
                {"code": "CLR", "name": "Clarity", "score": 8, "critique": "Clear."},
                {"code": "ORG", "name": "Origin", "score": 3, "critique": "Generic."},
                {"code": "VOX", "name": "One Voice", "score": 6, "critique": "Mostly."},
                {"code": "LNG", "name": "Longevity", "score": 5, "critique": "Trendy."},
                {"code": "OUT", "name": "Outcome", "score": 7, "critique": "Concrete."}
            ],
            "hardQuestions": ["Why you?", "Why now?"]
        })
    }

    #[test]
    fn fenced_and_unfenced_sanitize_identically() {
        let bare = r#"{"verdict":"x","pillars":[],"hardQuestions":[]}"#;
        let fenced = format!("```json\n{bare}\n```");

        let a = sanitize(bare);
        let b = sanitize(&fenced);
        assert_eq!(a, b);
        assert!(a.is_parsed());
        assert_eq!(a.verdict, "x");
        assert_eq!(a.pillars, placeholder_pillars());
        assert!(a.hard_questions.is_empty());
    }

    #[test]
    fn strips_fence_without_language_tag() {
        assert_eq!(strip_code_fence("```\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("  {\"a\":1}  "), "{\"a\":1}");
        assert_eq!(strip_code_fence("```json {\"a\":1}```"), "{\"a\":1}");
    }

    #[test]
    fn fence_patterns_compile() {
        assert!(fence_regex().is_match("```json\n{}\n```"));
        assert!(open_fence_regex().is_match("```json\n{}"));
    }

    #[test]
    fn unclosed_fence_is_recovered() {
        let truncated = format!("```json\n{}", full_payload());
        assert_eq!(strip_code_fence(&truncated), full_payload().to_string());

        let payload = sanitize(&truncated);
        assert!(payload.is_parsed());
        assert_eq!(payload, sanitize(&full_payload().to_string()));
    }

    #[test]
    fn upstream_total_is_discarded() {
        let result = sanitize(&full_payload().to_string()).into_result();
        // (8 + 3 + 6 + 5 + 7) / 5
        assert_eq!(result.total_score(), 5.8);
        assert_eq!(result.verdict(), "Sharp but forgettable.");
        assert_eq!(result.hard_questions().len(), 2);
    }

    #[test]
    fn malformed_text_is_unparseable_with_defaults() {
        let payload = sanitize("Sorry, I can't audit that site.");
        assert!(matches!(payload.status, PayloadStatus::Unparseable(_)));
        assert_eq!(payload.verdict, DEFAULT_VERDICT);
        assert_eq!(payload.pillars, placeholder_pillars());
        assert!(payload.hard_questions.is_empty());
    }

    #[test]
    fn non_object_json_is_unparseable() {
        let payload = sanitize("[1, 2, 3]");
        match payload.status {
            PayloadStatus::Unparseable(reason) => assert!(reason.contains("array")),
            other => panic!("expected unparseable, got {other:?}"),
        }
    }

    #[test]
    fn bad_field_types_fall_back_per_field() {
        let payload = sanitize(r#"{"verdict": 42, "pillars": "none", "hardQuestions": {"a": 1}}"#);
        assert!(payload.is_parsed());
        assert_eq!(payload.verdict, DEFAULT_VERDICT);
        assert_eq!(payload.pillars, placeholder_pillars());
        assert!(payload.hard_questions.is_empty());
    }

    #[test]
    fn short_pillar_list_is_padded() {
        let payload = sanitize(
            r#"{"verdict":"v","pillars":[{"code":"CLR","name":"Clarity","score":6,"critique":"ok"}]}"#,
        );
        assert_eq!(payload.pillars.len(), 5);
        assert_eq!(payload.pillars[0].score, 6);
        for (slot, pillar) in payload.pillars.iter().enumerate().skip(1) {
            assert_eq!(pillar.code, Pillar::ALL[slot].code());
            assert_eq!(pillar.score, 0);
            assert_eq!(pillar.critique, MISSING_PILLAR_CRITIQUE);
        }
    }

    #[test]
    fn long_pillar_list_is_truncated() {
        let entries: Vec<Value> = (0..8)
            .map(|i| json!({"code": format!("P{i}"), "name": "n", "score": 5, "critique": "c"}))
            .collect();
        let payload = sanitize(&json!({"verdict": "v", "pillars": entries}).to_string());
        assert_eq!(payload.pillars[4].code, "P4");
    }

    #[test]
    fn scores_are_coerced() {
        let payload = sanitize(
            &json!({
                "verdict": "v",
                "pillars": [
                    {"score": "7"},
                    {"score": -3},
                    {"score": "high"},
                    {"score": 14},
                    {"score": 4.6}
                ]
            })
            .to_string(),
        );
        let scores: Vec<u8> = payload.pillars.iter().map(|p| p.score).collect();
        assert_eq!(scores, vec![7, 0, 0, 10, 5]);
        // Coerced-to-zero pillars are still present, with canonical labels.
        assert_eq!(payload.pillars[1].code, "ORG");
        assert_eq!(payload.pillars[1].critique, MISSING_CRITIQUE);
        // (7 + 10 + 5) / 3
        assert_eq!(payload.into_result().total_score(), 7.3);
    }

    #[test]
    fn non_object_pillar_entry_becomes_placeholder() {
        let payload = sanitize(r#"{"pillars":[null, {"score": 5, "critique": "fine"}]}"#);
        assert_eq!(payload.pillars[0], placeholder(Pillar::Clarity));
        assert_eq!(payload.pillars[1].score, 5);
        assert_eq!(payload.pillars[1].name, "Origin");
    }

    #[test]
    fn hard_questions_filtered_and_capped() {
        let payload = sanitize(r#"{"hardQuestions":["a", "", 3, "b", "c", "d"]}"#);
        assert_eq!(payload.hard_questions, vec!["a", "b", "c"]);
    }

    #[test]
    fn snake_case_questions_are_accepted() {
        let payload = sanitize(r#"{"hard_questions":["why?"]}"#);
        assert_eq!(payload.hard_questions, vec!["why?"]);
    }
}
