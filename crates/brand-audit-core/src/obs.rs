//! Structured observability hooks for the audit lifecycle.
//!
//! Events are emitted at `info!` (failures at `warn!`) and filtered through
//! `BRAND_AUDIT_LOG` / `RUST_LOG`. Set `--json-logs` on the binaries for JSON.

use tracing::{info, warn};

/// Span tagged with the audit id.
///
/// Attach it with `Instrument::instrument` rather than entering it: the run
/// suspends across the model call and entered guards must not cross an
/// `.await`.
pub fn audit_span(audit_id: &str) -> tracing::Span {
    tracing::info_span!("brand_audit.run", audit_id = %audit_id)
}

/// Emit event: audit started for a target.
pub fn emit_audit_started(audit_id: &str, url: &str, models: usize) {
    info!(event = "audit.started", audit_id = %audit_id, url = %url, models = models);
}

/// Emit event: one model identifier failed; the loop moves on.
pub fn emit_model_attempt_failed(model: &str, attempt: usize, error: &dyn std::fmt::Display) {
    warn!(
        event = "audit.model_attempt_failed",
        model = %model,
        attempt = attempt,
        error = %error,
    );
}

/// Emit event: the deadline won the race; the in-flight attempt is abandoned.
pub fn emit_deadline_exceeded(audit_id: &str, limit_ms: u64) {
    warn!(event = "audit.deadline_exceeded", audit_id = %audit_id, limit_ms = limit_ms);
}

/// Emit event: audit finished with its outcome kind and total.
pub fn emit_audit_finished(audit_id: &str, outcome: &str, total_score: f64, duration_ms: u64) {
    info!(
        event = "audit.finished",
        audit_id = %audit_id,
        outcome = %outcome,
        total_score = total_score,
        duration_ms = duration_ms,
    );
}
