//! Domain types for the audit pipeline.
//!
//! - `AuditRequest`: validated input
//! - `PillarScore` / `AuditResult`: the canonical result shape
//! - `AuditOutcome` / `FailureResult`: tagged run outcome

pub mod error;
pub mod outcome;
pub mod request;
pub mod result;

pub use error::{AuditError, ConfigError, ModelError, Result};
pub use outcome::{AuditOutcome, FailureKind, FailureResult};
pub use request::AuditRequest;
pub use result::{AuditResult, Pillar, PillarScore, MAX_HARD_QUESTIONS, PILLAR_COUNT};
