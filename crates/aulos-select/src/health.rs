use std::{collections::HashMap, sync::Arc};

use tracing::debug;

#[derive(Debug, Default)]
struct HealthInner {
    counts: HashMap<String, u32>,
    last_failed: Option<String>,
}

/// In-memory ledger of consecutive connection failures per origin.
///
/// Shared between the selector (reader) and the session controller, which
/// is the single writer. Counts only ever move up, except for the exact
/// server that just connected successfully, which resets to zero. Nothing
/// here survives a process restart.
#[derive(Clone, Debug, Default)]
pub struct ServerHealth {
    inner: Arc<parking_lot::Mutex<HealthInner>>,
}

impl ServerHealth {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failed connection; returns the new consecutive count.
    pub fn record_failure(&self, name: &str) -> u32 {
        let mut inner = self.inner.lock();
        let count = inner.counts.entry(name.to_string()).or_insert(0);
        *count += 1;
        let count = *count;
        inner.last_failed = Some(name.to_string());
        debug!(server = name, consecutive_failures = count, "server failure recorded");
        count
    }

    /// Record a successful connection; resets that server's count to zero.
    pub fn record_success(&self, name: &str) {
        let mut inner = self.inner.lock();
        inner.counts.insert(name.to_string(), 0);
        debug!(server = name, "server success recorded");
    }

    #[must_use]
    pub fn consecutive_failures(&self, name: &str) -> u32 {
        self.inner.lock().counts.get(name).copied().unwrap_or(0)
    }

    /// Name of the server that failed most recently, if any ever has.
    /// Deliberately not cleared on success: the count going to zero is
    /// what disarms the avoidance rule.
    #[must_use]
    pub fn last_failed(&self) -> Option<String> {
        self.inner.lock().last_failed.clone()
    }
}
