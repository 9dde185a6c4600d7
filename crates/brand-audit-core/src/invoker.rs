//! Orchestrates one audit run against the model service.
//!
//! - no credential: demo result after the configured delay, no network
//! - otherwise: models tried strictly in order until one returns text
//! - the whole attempt races a single deadline; on expiry the attempt task
//!   is aborted and the failure result returned
//!
//! [`AuditInvoker::invoke`] always resolves to an [`AuditOutcome`].

use std::sync::Arc;

use async_trait::async_trait;
use tokio::time::Instant;
use tracing::Instrument;

use crate::config::AuditConfig;
use crate::domain::{
    AuditError, AuditOutcome, AuditRequest, FailureResult, ModelError, Result,
};
use crate::fallback::FallbackPolicy;
use crate::metrics::METRICS;
use crate::model::{GeminiClient, ModelClient};
use crate::obs::{
    audit_span, emit_audit_finished, emit_audit_started, emit_deadline_exceeded,
    emit_model_attempt_failed,
};
use crate::prompt::build_prompt;
use crate::sanitize::{sanitize, PayloadStatus};

/// Anything that can turn a request into an outcome.
///
/// The controller and the HTTP daemon depend on this rather than on a
/// concrete invoker.
#[async_trait]
pub trait Auditor: Send + Sync {
    async fn audit(&self, request: &AuditRequest) -> AuditOutcome;

    /// Whether a model credential is configured.
    fn has_credential(&self) -> bool;
}

pub struct AuditInvoker<C> {
    config: Arc<AuditConfig>,
    client: Arc<C>,
}

impl AuditInvoker<GeminiClient> {
    /// Invoker backed by the Gemini REST client.
    pub fn gemini(config: AuditConfig) -> std::result::Result<Self, ModelError> {
        let client = GeminiClient::new(
            &config.endpoint,
            config.api_key.as_deref().unwrap_or_default(),
            config.search_grounding,
        )?;
        Ok(Self::new(config, client))
    }
}

impl<C> AuditInvoker<C>
where
    C: ModelClient + 'static,
{
    pub fn new(config: AuditConfig, client: C) -> Self {
        Self {
            config: Arc::new(config),
            client: Arc::new(client),
        }
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Run the pipeline for `request`. Never fails.
    pub async fn invoke(&self, request: &AuditRequest) -> AuditOutcome {
        let audit_id = request.audit_id().to_string();
        let started = Instant::now();
        METRICS.inc_started();

        let outcome = self
            .run(request, &audit_id)
            .instrument(audit_span(&audit_id))
            .await;

        match &outcome {
            AuditOutcome::Scored(_) => METRICS.inc_scored(),
            AuditOutcome::Demo(_) => METRICS.inc_demo(),
            AuditOutcome::Failed(_) => METRICS.inc_failed(),
        }
        emit_audit_finished(
            &audit_id,
            outcome.kind(),
            outcome.result().total_score(),
            started.elapsed().as_millis() as u64,
        );
        outcome
    }

    async fn run(&self, request: &AuditRequest, audit_id: &str) -> AuditOutcome {
        emit_audit_started(audit_id, request.target(), self.config.models.len());

        if !self.config.has_credential() {
            tracing::info!("no credential configured; serving demo result");
            tokio::time::sleep(self.config.demo_delay).await;
            return AuditOutcome::Demo(FallbackPolicy::demo());
        }

        let prompt = build_prompt(request);
        let text = match self.attempt_with_deadline(prompt, audit_id).await {
            Ok(text) => text,
            Err(err) => return AuditOutcome::Failed(FailureResult::from(&err)),
        };

        let payload = sanitize(&text);
        if let PayloadStatus::Unparseable(reason) = &payload.status {
            tracing::warn!(reason = %reason, "model output was not a JSON object");
            let err = AuditError::Unparseable(reason.clone());
            return AuditOutcome::Failed(FailureResult::from(&err));
        }
        AuditOutcome::Scored(payload.into_result())
    }

    /// Race the model attempts against the deadline.
    ///
    /// The attempts run as their own task so the deadline can abandon them
    /// explicitly; aborting drops any in-flight request at its next await.
    async fn attempt_with_deadline(&self, prompt: String, audit_id: &str) -> Result<String> {
        let limit = self.config.deadline;
        let mut task = tokio::spawn(
            try_models(Arc::clone(&self.client), Arc::clone(&self.config), prompt)
                .in_current_span(),
        );

        match tokio::time::timeout(limit, &mut task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_err)) => {
                tracing::error!(error = %join_err, "model attempt task failed");
                Err(AuditError::ModelsExhausted {
                    attempted: self.config.models.len(),
                })
            }
            Err(_elapsed) => {
                task.abort();
                emit_deadline_exceeded(audit_id, limit.as_millis() as u64);
                Err(AuditError::Timeout { limit })
            }
        }
    }
}

/// Try each model in order; the first non-empty text wins.
async fn try_models<C: ModelClient>(
    client: Arc<C>,
    config: Arc<AuditConfig>,
    prompt: String,
) -> Result<String> {
    for (attempt, model) in config.models.iter().enumerate() {
        let err = match client.generate(model, &prompt).await {
            Ok(text) if !text.trim().is_empty() => {
                tracing::debug!(model = %model, attempt = attempt + 1, "model returned text");
                return Ok(text);
            }
            Ok(_) => ModelError::EmptyResponse {
                model: model.clone(),
            },
            Err(err) => err,
        };
        METRICS.inc_model_attempt_failed();
        emit_model_attempt_failed(model, attempt + 1, &err);
    }
    Err(AuditError::ModelsExhausted {
        attempted: config.models.len(),
    })
}

#[async_trait]
impl<C> Auditor for AuditInvoker<C>
where
    C: ModelClient + 'static,
{
    async fn audit(&self, request: &AuditRequest) -> AuditOutcome {
        self.invoke(request).await
    }

    fn has_credential(&self) -> bool {
        self.config.has_credential()
    }
}
