//! Process-wide audit counters.
//!
//! Incremented at the call site; [`Metrics::flush`] emits them as one
//! `tracing::info!` event.

use std::sync::atomic::{AtomicU64, Ordering};

/// Global metrics singleton.
pub static METRICS: Metrics = Metrics::new();

pub struct Metrics {
    audits_started: AtomicU64,
    audits_scored: AtomicU64,
    audits_demo: AtomicU64,
    audits_failed: AtomicU64,
    model_attempts_failed: AtomicU64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub const fn new() -> Self {
        Self {
            audits_started: AtomicU64::new(0),
            audits_scored: AtomicU64::new(0),
            audits_demo: AtomicU64::new(0),
            audits_failed: AtomicU64::new(0),
            model_attempts_failed: AtomicU64::new(0),
        }
    }

    /// Increment the audits-started counter by one.
    pub fn inc_started(&self) {
        self.audits_started.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the audits-scored counter by one.
    pub fn inc_scored(&self) {
        self.audits_scored.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the audits-demo counter by one.
    pub fn inc_demo(&self) {
        self.audits_demo.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the audits-failed counter by one.
    pub fn inc_failed(&self) {
        self.audits_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the model-attempts-failed counter by one.
    pub fn inc_model_attempt_failed(&self) {
        self.model_attempts_failed.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "model_attempts_failed", "counter incremented");
    }

    /// Emit all counters as a single `info!` event.
    pub fn flush(&self) {
        tracing::info!(
            metric = "flush",
            audits_started = self.audits_started(),
            audits_scored = self.audits_scored(),
            audits_demo = self.audits_demo(),
            audits_failed = self.audits_failed(),
            model_attempts_failed = self.model_attempts_failed(),
        );
    }

    /// Read the current audits-started count.
    pub fn audits_started(&self) -> u64 {
        self.audits_started.load(Ordering::Relaxed)
    }

    /// Read the current audits-scored count.
    pub fn audits_scored(&self) -> u64 {
        self.audits_scored.load(Ordering::Relaxed)
    }

    /// Read the current audits-demo count.
    pub fn audits_demo(&self) -> u64 {
        self.audits_demo.load(Ordering::Relaxed)
    }

    /// Read the current audits-failed count.
    pub fn audits_failed(&self) -> u64 {
        self.audits_failed.load(Ordering::Relaxed)
    }

    /// Read the current model-attempts-failed count.
    pub fn model_attempts_failed(&self) -> u64 {
        self.model_attempts_failed.load(Ordering::Relaxed)
    }
}
