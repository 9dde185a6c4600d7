//! Tagged outcome of one audit run.
//!
//! Every variant renders to the same [`AuditResult`] wire shape; the tag keeps
//! failures distinguishable in code.

use serde::{Deserialize, Serialize};

use super::error::AuditError;
use super::result::AuditResult;
use crate::fallback::FallbackPolicy;

/// Why a run ended in a failure result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The deadline elapsed before any model returned text.
    Timeout,
    /// Every model identifier failed or returned empty text.
    Exhausted,
    /// The model answered, but not with a JSON object.
    Unparseable,
    /// A credential is required and absent.
    Configuration,
}

impl FailureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Exhausted => "exhausted",
            Self::Unparseable => "unparseable",
            Self::Configuration => "configuration",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A terminal failure, carried as data rather than as an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureResult {
    pub kind: FailureKind,
    pub detail: String,
}

impl FailureResult {
    pub fn new(kind: FailureKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    /// The canonical wire result for this failure.
    pub fn to_result(&self) -> AuditResult {
        match self.kind {
            FailureKind::Configuration => FallbackPolicy::configuration_error(),
            kind => FallbackPolicy::failure(kind),
        }
    }
}

impl From<&AuditError> for FailureResult {
    fn from(err: &AuditError) -> Self {
        let kind = match err {
            AuditError::Timeout { .. } => FailureKind::Timeout,
            AuditError::ModelsExhausted { .. } => FailureKind::Exhausted,
            AuditError::Unparseable(_) => FailureKind::Unparseable,
            AuditError::MissingCredential | AuditError::EmptyTarget => FailureKind::Configuration,
        };
        FailureResult::new(kind, err.to_string())
    }
}

/// Outcome of a single pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub enum AuditOutcome {
    /// The model answered and the payload was sanitized and scored.
    Scored(AuditResult),
    /// No credential configured; the fixed demo result.
    Demo(AuditResult),
    /// The run failed; rendered through the fallback policy.
    Failed(FailureResult),
}

impl AuditOutcome {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Scored(_) => "scored",
            Self::Demo(_) => "demo",
            Self::Failed(_) => "failed",
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    pub fn result(&self) -> AuditResult {
        match self {
            Self::Scored(r) | Self::Demo(r) => r.clone(),
            Self::Failed(f) => f.to_result(),
        }
    }

    pub fn into_result(self) -> AuditResult {
        match self {
            Self::Scored(r) | Self::Demo(r) => r,
            Self::Failed(f) => f.to_result(),
        }
    }
}
