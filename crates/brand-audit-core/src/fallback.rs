//! Hand-authored terminal results.
//!
//! These are returned whole and never merged with partial model output.

use crate::domain::{AuditResult, FailureKind, Pillar, PillarScore};

pub const DEMO_VERDICT: &str = "DEMO MODE (NO API KEY)";
pub const TIMEOUT_VERDICT: &str = "SIGNAL LOST";
pub const FAILURE_VERDICT: &str = "CONNECTION FAILURE";
pub const CONFIGURATION_VERDICT: &str = "CONFIGURATION ERROR";

/// Builders for the demo, failure and configuration-error results.
pub struct FallbackPolicy;

impl FallbackPolicy {
    /// Result served when no credential is configured.
    pub fn demo() -> AuditResult {
        const SCORES: [u8; 5] = [3, 5, 4, 2, 7];
        const CRITIQUES: [&str; 5] = [
            "Demo data. Set GEMINI_API_KEY to audit how clearly the brand states what it does.",
            "Demo data. Configure a credential to evaluate the founding story.",
            "Demo data. A live audit checks tone and visuals for a single voice.",
            "Demo data. A live audit judges whether the identity will age well.",
            "Demo data. A live audit tests the promised customer outcome.",
        ];
        let pillars = std::array::from_fn(|i| {
            PillarScore::for_pillar(Pillar::ALL[i], SCORES[i], CRITIQUES[i])
        });
        AuditResult::new(
            DEMO_VERDICT,
            pillars,
            vec![
                "What would your customers lose if you disappeared tomorrow?".to_string(),
                "Which competitor could paste your tagline onto their site unchanged?".to_string(),
                "What do you refuse to do that your category always does?".to_string(),
            ],
        )
    }

    /// Result for a run that timed out, exhausted its models or got garbage.
    ///
    /// Pillar slots describe the failure instead of the brand.
    pub fn failure(kind: FailureKind) -> AuditResult {
        let first = match kind {
            FailureKind::Timeout => {
                "The model service did not answer before the deadline. Nothing was scored."
            }
            FailureKind::Unparseable => {
                "The model answered with data that could not be read. Nothing was scored."
            }
            FailureKind::Exhausted | FailureKind::Configuration => {
                "Every configured model failed to respond. Nothing was scored."
            }
        };
        let verdict = match kind {
            FailureKind::Timeout => TIMEOUT_VERDICT,
            _ => FAILURE_VERDICT,
        };
        AuditResult::new(
            verdict,
            [
                PillarScore::new("ERROR", "Audit Failed", 0, first),
                PillarScore::new("RETRY", "Try Again", 0, "Run the audit again in a minute; the service may be busy."),
                PillarScore::new("OFFLINE", "Check Connection", 0, "Confirm this machine can reach the internet."),
                PillarScore::new("LOGS", "Inspect Logs", 0, "Server logs carry the per-model error for this run."),
                PillarScore::new("REPORT", "Report Issue", 0, "If this keeps happening, report the target and the time of the run."),
            ],
            Self::diagnostic_questions(),
        )
    }

    /// Result for a server that requires a credential and has none.
    pub fn configuration_error() -> AuditResult {
        AuditResult::new(
            CONFIGURATION_VERDICT,
            Pillar::ALL.map(|p| {
                PillarScore::for_pillar(
                    p,
                    0,
                    "The audit service has no model credential configured. Set GEMINI_API_KEY on the server.",
                )
            }),
            Vec::new(),
        )
    }

    fn diagnostic_questions() -> Vec<String> {
        vec![
            "Is the URL correct?".to_string(),
            "Is the site public?".to_string(),
            "Are you online?".to_string(),
        ]
    }
}
