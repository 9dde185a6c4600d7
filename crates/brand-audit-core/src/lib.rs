//! Brand Audit Core Library
//!
//! Turns a target URL into a scored five-pillar brand critique by asking a
//! generative model, then normalizing whatever comes back into a result that
//! is always well formed.
//!
//! Pipeline: [`AuditController`] → [`AuditInvoker`] → ([`build_prompt`],
//! [`ModelClient`]) → [`sanitize`] → [`aggregate`].

pub mod aggregate;
pub mod config;
pub mod controller;
pub mod domain;
pub mod fallback;
pub mod invoker;
pub mod metrics;
pub mod model;
pub mod obs;
pub mod prompt;
pub mod reporting;
pub mod sanitize;
pub mod telemetry;

pub use aggregate::aggregate;
pub use config::AuditConfig;
pub use controller::{AuditController, AuditState, IgnoreReason, RunStatus};
pub use domain::{
    AuditError, AuditOutcome, AuditRequest, AuditResult, ConfigError, FailureKind, FailureResult,
    ModelError, Pillar, PillarScore, MAX_HARD_QUESTIONS, PILLAR_COUNT,
};
pub use fallback::FallbackPolicy;
pub use invoker::{AuditInvoker, Auditor};
pub use metrics::METRICS;
pub use model::{GeminiClient, ModelClient};
pub use prompt::build_prompt;
pub use reporting::{
    render_audit_md, write_audit_md, write_audit_report_json, AuditReport,
};
pub use sanitize::{sanitize, strip_code_fence, PayloadStatus, ValidatedPayload};
pub use telemetry::init_tracing;

/// Brand Audit version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
