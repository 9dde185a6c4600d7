//! Error taxonomy for the audit pipeline.
//!
//! None of these cross the [`crate::AuditInvoker`] boundary: each is folded
//! into an [`crate::AuditOutcome`] before the caller sees it.

use std::time::Duration;

/// Errors raised inside one audit run.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("audit target must not be empty")]
    EmptyTarget,

    #[error("no model service credential is configured")]
    MissingCredential,

    #[error("audit exceeded the {}s deadline", .limit.as_secs())]
    Timeout { limit: Duration },

    #[error("all {attempted} model identifier(s) failed to return text")]
    ModelsExhausted { attempted: usize },

    #[error("model returned unparseable output: {0}")]
    Unparseable(String),
}

/// Errors returned by a [`crate::ModelClient`] for a single model identifier.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("http error: {0}")]
    Http(String),

    #[error("model service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("model {model} returned empty text")]
    EmptyResponse { model: String },

    #[error("model response missing content: {0}")]
    MissingContent(String),
}

impl From<reqwest::Error> for ModelError {
    fn from(err: reqwest::Error) -> Self {
        ModelError::Http(err.to_string())
    }
}

/// Errors produced while loading [`crate::AuditConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?} ({reason})")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("model list must contain at least one identifier")]
    EmptyModelList,
}

/// Result type for audit-internal operations.
pub type Result<T> = std::result::Result<T, AuditError>;
