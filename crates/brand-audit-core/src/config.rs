//! Audit configuration.
//!
//! Built once by the binaries from the environment and injected into
//! [`crate::AuditInvoker`]; the pipeline itself never reads process state.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::ConfigError;

pub const ENV_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_MODELS: &str = "BRAND_AUDIT_MODELS";
pub const ENV_DEADLINE_SECS: &str = "BRAND_AUDIT_DEADLINE_SECS";
pub const ENV_DEMO_DELAY_MS: &str = "BRAND_AUDIT_DEMO_DELAY_MS";
pub const ENV_SEARCH_GROUNDING: &str = "BRAND_AUDIT_SEARCH_GROUNDING";
pub const ENV_ENDPOINT: &str = "BRAND_AUDIT_ENDPOINT";

pub const DEFAULT_MODELS: [&str; 3] = ["gemini-2.5-flash", "gemini-2.0-flash", "gemini-1.5-flash"];
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(45);
pub const DEFAULT_DEMO_DELAY: Duration = Duration::from_millis(2_000);

/// Configuration for one audit service instance.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Model service credential. `None` selects demo mode.
    pub api_key: Option<String>,
    /// Model identifiers, tried in order.
    pub models: Vec<String>,
    /// Wall-clock bound on the whole invocation, across all models.
    pub deadline: Duration,
    /// Simulated latency before serving the demo result.
    pub demo_delay: Duration,
    /// Ask the model service to ground answers in web search.
    pub search_grounding: bool,
    /// Base URL of the model service.
    pub endpoint: String,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            models: DEFAULT_MODELS.iter().map(|m| (*m).to_string()).collect(),
            deadline: DEFAULT_DEADLINE,
            demo_delay: DEFAULT_DEMO_DELAY,
            search_grounding: false,
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

// Keeps the credential out of logs.
impl std::fmt::Debug for AuditConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("models", &self.models)
            .field("deadline", &self.deadline)
            .field("demo_delay", &self.demo_delay)
            .field("search_grounding", &self.search_grounding)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl AuditConfig {
    /// Load from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        config.api_key = get(ENV_API_KEY);

        if let Some(models) = get(ENV_MODELS) {
            config.models = parse_models(&models)?;
        }
        if let Some(secs) = get(ENV_DEADLINE_SECS) {
            let secs = parse_u64(ENV_DEADLINE_SECS, &secs)?;
            if secs == 0 {
                return Err(ConfigError::InvalidValue {
                    var: ENV_DEADLINE_SECS,
                    value: "0".to_string(),
                    reason: "deadline must be positive".to_string(),
                });
            }
            config.deadline = Duration::from_secs(secs);
        }
        if let Some(ms) = get(ENV_DEMO_DELAY_MS) {
            config.demo_delay = Duration::from_millis(parse_u64(ENV_DEMO_DELAY_MS, &ms)?);
        }
        if let Some(flag) = get(ENV_SEARCH_GROUNDING) {
            config.search_grounding = parse_bool(ENV_SEARCH_GROUNDING, &flag)?;
        }
        if let Some(endpoint) = get(ENV_ENDPOINT) {
            config.endpoint = endpoint.trim_end_matches('/').to_string();
        }
        Ok(config)
    }

    /// Set the model service credential.
    pub fn with_api_key(mut self, key: &str) -> Self {
        self.api_key = Some(key.to_string());
        self
    }

    /// Replace the model fallback list.
    pub fn with_models<I, S>(mut self, models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.models = models.into_iter().map(Into::into).collect();
        self
    }

    /// Set the wall-clock bound on the whole invocation.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Set the simulated demo latency.
    pub fn with_demo_delay(mut self, delay: Duration) -> Self {
        self.demo_delay = delay;
        self
    }

    /// Toggle search grounding.
    pub fn with_search_grounding(mut self, enabled: bool) -> Self {
        self.search_grounding = enabled;
        self
    }

    /// Override the model service base URL.
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.trim_end_matches('/').to_string();
        self
    }

    /// Whether a credential is configured (otherwise demo mode).
    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

fn parse_models(raw: &str) -> Result<Vec<String>, ConfigError> {
    let models: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .collect();
    if models.is_empty() {
        return Err(ConfigError::EmptyModelList);
    }
    Ok(models)
}

fn parse_u64(var: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.parse().map_err(|e: std::num::ParseIntError| ConfigError::InvalidValue {
        var,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

fn parse_bool(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            var,
            value: raw.to_string(),
            reason: "expected true/false".to_string(),
        }),
    }
}
