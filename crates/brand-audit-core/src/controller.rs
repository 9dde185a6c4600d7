//! Client-side state machine driving one audit at a time.
//!
//! `Idle --run--> Scanning --settle--> Results --reset--> Idle`
//!
//! `run` with a blank target, or while not idle, is a no-op. The audit itself
//! runs on its own task, so every accepted run settles into `Results` exactly
//! once even if the caller stops waiting on `run`.

use std::sync::Arc;

use tokio::sync::watch;

use crate::domain::{AuditOutcome, AuditRequest, AuditResult, FailureKind, FailureResult};
use crate::invoker::Auditor;

#[derive(Debug, Clone, PartialEq)]
pub enum AuditState {
    Idle,
    Scanning { target: String },
    Results { target: String, result: AuditResult },
}

impl AuditState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Scanning { .. } => "scanning",
            Self::Results { .. } => "results",
        }
    }

    pub fn target(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Scanning { target } | Self::Results { target, .. } => Some(target),
        }
    }

    pub fn result(&self) -> Option<&AuditResult> {
        match self {
            Self::Results { result, .. } => Some(result),
            _ => None,
        }
    }
}

/// Why a `run` call did not start a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    EmptyTarget,
    NotIdle,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunStatus {
    /// The run went through `Scanning` and settled into `Results`.
    Settled(AuditOutcome),
    /// Guard rejected the call; state unchanged.
    Ignored(IgnoreReason),
}

pub struct AuditController {
    auditor: Arc<dyn Auditor>,
    state: Arc<watch::Sender<AuditState>>,
}

impl AuditController {
    pub fn new(auditor: Arc<dyn Auditor>) -> Self {
        let (state, _) = watch::channel(AuditState::Idle);
        Self {
            auditor,
            state: Arc::new(state),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> AuditState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every transition.
    pub fn subscribe(&self) -> watch::Receiver<AuditState> {
        self.state.subscribe()
    }

    /// Start an audit for `target` and wait for it to settle.
    pub async fn run(&self, target: &str) -> RunStatus {
        match AuditRequest::new(target) {
            Ok(request) => self.run_request(request).await,
            Err(_) => RunStatus::Ignored(IgnoreReason::EmptyTarget),
        }
    }

    /// Start an audit for an already validated request.
    ///
    /// Dropping the returned future detaches the caller only; the audit
    /// keeps running and still moves the state to `Results`.
    pub async fn run_request(&self, request: AuditRequest) -> RunStatus {
        // Check-and-set in one step so concurrent callers cannot both start.
        let started = self.state.send_if_modified(|state| {
            if *state != AuditState::Idle {
                return false;
            }
            *state = AuditState::Scanning {
                target: request.target().to_string(),
            };
            true
        });
        if !started {
            tracing::debug!(state = self.state.borrow().name(), "run ignored");
            return RunStatus::Ignored(IgnoreReason::NotIdle);
        }

        let auditor = Arc::clone(&self.auditor);
        let state = Arc::clone(&self.state);
        let target = request.target().to_string();
        let settle = tokio::spawn(async move {
            let outcome = auditor.audit(&request).await;
            state.send_replace(AuditState::Results {
                target: request.target().to_string(),
                result: outcome.result(),
            });
            outcome
        });

        match settle.await {
            Ok(outcome) => RunStatus::Settled(outcome),
            Err(join_err) => {
                // The auditor panicked before settling; settle with a failure.
                tracing::error!(error = %join_err, "audit task failed");
                let outcome = AuditOutcome::Failed(FailureResult::new(
                    FailureKind::Exhausted,
                    join_err.to_string(),
                ));
                self.state.send_replace(AuditState::Results {
                    target,
                    result: outcome.result(),
                });
                RunStatus::Settled(outcome)
            }
        }
    }

    /// Return to `Idle` from `Results`, clearing target and result.
    /// Returns `false` (and does nothing) from any other state.
    pub fn reset(&self) -> bool {
        self.state.send_if_modified(|state| {
            if !matches!(state, AuditState::Results { .. }) {
                return false;
            }
            *state = AuditState::Idle;
            true
        })
    }
}
