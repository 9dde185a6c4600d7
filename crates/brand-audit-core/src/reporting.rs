use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use uuid::Uuid;

use crate::domain::{AuditOutcome, AuditRequest, AuditResult};

pub const REPORT_SCHEMA_VERSION: &str = "1.0";

/// Persisted record of one audit: the wire result plus run metadata.
///
/// `audit_id` matches the `audit_id` field on the run's log events.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AuditReport {
    pub schema_version: String,
    pub audit_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub target: String,
    pub outcome_kind: String,
    pub result: AuditResult,
}

impl AuditReport {
    pub fn new(request: &AuditRequest, outcome: &AuditOutcome) -> Self {
        Self {
            schema_version: REPORT_SCHEMA_VERSION.to_string(),
            audit_id: request.audit_id(),
            generated_at: Utc::now(),
            target: request.target().to_string(),
            outcome_kind: outcome.kind().to_string(),
            result: outcome.result(),
        }
    }
}

/// Write the report as pretty JSON.
pub fn write_audit_report_json(path: &Path, report: &AuditReport) -> Result<()> {
    let content = serde_json::to_string_pretty(report).context("serialize audit report")?;
    std::fs::write(path, content).with_context(|| format!("write {:?}", path))?;
    Ok(())
}

/// Render a markdown summary of a result.
pub fn render_audit_md(target: &str, result: &AuditResult) -> String {
    let mut out = String::new();
    out.push_str(&format!("# Brand Audit: {}\n\n", target));
    out.push_str(&format!(
        "**{:.1} / 10**\n\n> {}\n\n",
        result.total_score(),
        result.verdict()
    ));

    out.push_str("| Code | Pillar | Score | Critique |\n");
    out.push_str("|------|--------|------:|----------|\n");
    for p in result.pillars() {
        out.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            p.code,
            p.name,
            p.score,
            p.critique.replace('|', "\\|")
        ));
    }

    if !result.hard_questions().is_empty() {
        out.push_str("\n## Hard Questions\n");
        for (i, q) in result.hard_questions().iter().enumerate() {
            out.push_str(&format!("{}. {}\n", i + 1, q));
        }
    }
    out
}

/// Write the markdown summary.
pub fn write_audit_md(path: &Path, target: &str, result: &AuditResult) -> Result<()> {
    let md = render_audit_md(target, result);
    std::fs::write(path, md).with_context(|| format!("write {:?}", path))?;
    Ok(())
}
