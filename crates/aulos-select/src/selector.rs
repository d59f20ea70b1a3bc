use std::{sync::Arc, time::Duration};

use aulos_net::Prober;
use futures::future::join_all;
use tokio::time::Instant;
use tracing::{debug, trace};

use crate::{candidate::ServerCandidate, health::ServerHealth};

#[derive(Clone, Debug)]
pub struct SelectorOptions {
    /// Within this window a previous selection is returned without probing.
    /// Guards against probe storms from rapid play/stop/switch actions.
    pub throttle_ttl: Duration,
    /// A selection this old may still serve as a fallback when every probe
    /// fails; beyond it, only the declared default remains.
    pub retention_ttl: Duration,
    /// Per-candidate probe deadline; slower means unreachable.
    pub probe_timeout: Duration,
}

impl Default for SelectorOptions {
    fn default() -> Self {
        Self {
            throttle_ttl: Duration::from_secs(10),
            retention_ttl: Duration::from_secs(2 * 60 * 60),
            probe_timeout: Duration::from_secs(2),
        }
    }
}

#[derive(Clone, Debug)]
struct CachedSelection {
    candidate: ServerCandidate,
    selected_at: Instant,
}

/// Picks the origin to stream from.
///
/// Selection never fails: when nothing is reachable the first declared
/// candidate comes back and the connection attempt itself surfaces the
/// error with proper classification.
pub struct ServerSelector {
    candidates: Vec<ServerCandidate>,
    prober: Arc<dyn Prober>,
    health: ServerHealth,
    options: SelectorOptions,
    cache: parking_lot::Mutex<Option<CachedSelection>>,
}

impl ServerSelector {
    /// # Panics
    ///
    /// Panics if `candidates` is empty.
    #[must_use]
    pub fn new(
        candidates: Vec<ServerCandidate>,
        prober: Arc<dyn Prober>,
        health: ServerHealth,
        options: SelectorOptions,
    ) -> Self {
        assert!(
            !candidates.is_empty(),
            "at least one server candidate is required"
        );
        Self {
            candidates,
            prober,
            health,
            options,
            cache: parking_lot::Mutex::new(None),
        }
    }

    pub fn candidates(&self) -> &[ServerCandidate] {
        &self.candidates
    }

    pub fn health(&self) -> &ServerHealth {
        &self.health
    }

    /// Forget the cached selection. Called on network recovery so the next
    /// attempt re-ranks from the declared default order.
    pub fn invalidate(&self) {
        *self.cache.lock() = None;
        debug!("server selection cache invalidated");
    }

    /// Select an origin.
    ///
    /// Order of play: known-bad avoidance first (no probing), then the
    /// throttle cache, then a concurrent latency probe of every candidate.
    pub async fn select(&self) -> ServerCandidate {
        if let Some(candidate) = self.avoidance_pick() {
            debug!(server = %candidate.name, "avoiding recently failed server");
            return candidate;
        }

        if let Some(candidate) = self.cached(self.options.throttle_ttl) {
            trace!(server = %candidate.name, "selection served from cache");
            return candidate;
        }

        match self.probe_all().await {
            Some(best) => {
                *self.cache.lock() = Some(CachedSelection {
                    candidate: best.clone(),
                    selected_at: Instant::now(),
                });
                best
            }
            None => {
                // Nothing answered. A recent selection beats a blind guess;
                // otherwise fall back to the first declared candidate.
                if let Some(candidate) = self.cached(self.options.retention_ttl) {
                    debug!(server = %candidate.name, "all probes failed, reusing recent selection");
                    return candidate;
                }
                let fallback = self.candidates[0].clone();
                debug!(server = %fallback.name, "all probes failed, using declared default");
                fallback
            }
        }
    }

    /// Fast path around servers with recent failures: when the last failed
    /// server still has a non-zero count and some other candidate is doing
    /// strictly better, take that one without spending a probe.
    fn avoidance_pick(&self) -> Option<ServerCandidate> {
        let last_failed = self.health.last_failed()?;
        let failed_count = self.health.consecutive_failures(&last_failed);
        if failed_count == 0 {
            return None;
        }

        let mut best: Option<(&ServerCandidate, u32)> = None;
        for candidate in &self.candidates {
            let count = self.health.consecutive_failures(&candidate.name);
            // Strict comparisons keep the pick deterministic: first declared
            // candidate wins ties.
            if count < failed_count && best.map_or(true, |(_, best_count)| count < best_count) {
                best = Some((candidate, count));
            }
        }
        best.map(|(candidate, _)| candidate.clone())
    }

    fn cached(&self, ttl: Duration) -> Option<ServerCandidate> {
        let cache = self.cache.lock();
        cache
            .as_ref()
            .filter(|entry| entry.selected_at.elapsed() < ttl)
            .map(|entry| entry.candidate.clone())
    }

    /// Probe every candidate concurrently; `None` when no probe succeeded.
    async fn probe_all(&self) -> Option<ServerCandidate> {
        let probes = self.candidates.iter().map(|candidate| {
            let prober = Arc::clone(&self.prober);
            let url = candidate.ping_url.clone();
            let name = candidate.name.clone();
            let deadline = self.options.probe_timeout;
            async move {
                match tokio::time::timeout(deadline, prober.ping(url)).await {
                    Ok(Ok(latency)) => {
                        trace!(server = %name, ?latency, "probe answered");
                        Some(latency)
                    }
                    Ok(Err(e)) => {
                        debug!(server = %name, error = %e, "probe failed");
                        None
                    }
                    Err(_) => {
                        debug!(server = %name, "probe timed out");
                        None
                    }
                }
            }
        });

        let latencies = join_all(probes).await;

        let mut best: Option<(usize, Duration)> = None;
        for (index, latency) in latencies.into_iter().enumerate() {
            let Some(latency) = latency else { continue };
            // Strict minimum: on equal latency the earlier declaration wins.
            if best.map_or(true, |(_, best_latency)| latency < best_latency) {
                best = Some((index, latency));
            }
        }

        best.map(|(index, latency)| {
            let candidate = self.candidates[index].clone();
            debug!(server = %candidate.name, ?latency, "server selected");
            candidate
        })
    }
}
