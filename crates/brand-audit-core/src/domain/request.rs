//! Validated audit input.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::{AuditError, Result};

/// A single audit request: a trimmed, non-empty target identifier.
///
/// Constructing one is the only way into the invoker, so blank input can
/// never reach the model service. Each request carries a fresh `audit_id`
/// that tags its log events and any report written for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditRequest {
    audit_id: Uuid,
    target: String,
}

impl AuditRequest {
    pub fn new(target: &str) -> Result<Self> {
        let trimmed = target.trim();
        if trimmed.is_empty() {
            return Err(AuditError::EmptyTarget);
        }
        Ok(Self {
            audit_id: Uuid::new_v4(),
            target: trimmed.to_string(),
        })
    }

    pub fn audit_id(&self) -> Uuid {
        self.audit_id
    }

    pub fn target(&self) -> &str {
        &self.target
    }
}

impl<'de> Deserialize<'de> for AuditRequest {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            target: String,
        }
        let raw = Raw::deserialize(deserializer)?;
        AuditRequest::new(&raw.target).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for AuditRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.target)
    }
}
