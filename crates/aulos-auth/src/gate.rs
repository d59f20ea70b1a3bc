use std::{sync::Arc, time::Duration};

use aulos_net::{Reachability, TxtResolver};
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::state::AuthorizationState;

#[derive(Clone, Debug)]
pub struct GateOptions {
    /// Build-embedded identifier checked against the allow-list.
    pub security_model: String,
    /// Zone holding the allow-list record; the query name is
    /// `securitymodels.{authority_domain}`.
    pub authority_domain: String,
    /// How long a terminal `Authorized` answer is served from cache.
    pub cache_ttl: Duration,
    /// Deadline for one TXT lookup.
    pub lookup_timeout: Duration,
}

impl GateOptions {
    pub fn new(security_model: impl Into<String>, authority_domain: impl Into<String>) -> Self {
        Self {
            security_model: security_model.into(),
            authority_domain: authority_domain.into(),
            cache_ttl: Duration::from_secs(600),
            lookup_timeout: Duration::from_secs(5),
        }
    }

    fn query_name(&self) -> String {
        format!("securitymodels.{}", self.authority_domain)
    }
}

#[derive(Debug)]
struct CacheCell {
    state: AuthorizationState,
    checked_at: Option<Instant>,
    /// Bumped once per completed lookup; lets a caller that queued behind an
    /// in-flight lookup recognize and reuse its outcome.
    epoch: u64,
}

/// Gate deciding whether this build is permitted to stream.
///
/// At most one lookup is ever in flight: concurrent callers queue on an
/// async mutex and adopt the outcome the lookup holder produced instead of
/// issuing a duplicate query. A permanent denial is sticky for the lifetime
/// of the gate; only a restart gets a fresh verdict.
pub struct AuthorizationGate {
    options: GateOptions,
    resolver: Arc<dyn TxtResolver>,
    reachability: Arc<dyn Reachability>,
    cell: parking_lot::Mutex<CacheCell>,
    lookup_gate: tokio::sync::Mutex<()>,
}

impl AuthorizationGate {
    pub fn new(
        options: GateOptions,
        resolver: Arc<dyn TxtResolver>,
        reachability: Arc<dyn Reachability>,
    ) -> Self {
        Self {
            options,
            resolver,
            reachability,
            cell: parking_lot::Mutex::new(CacheCell {
                state: AuthorizationState::Pending,
                checked_at: None,
                epoch: 0,
            }),
            lookup_gate: tokio::sync::Mutex::new(()),
        }
    }

    /// Current state without touching the network.
    pub fn state(&self) -> AuthorizationState {
        self.cell.lock().state
    }

    /// Resolve the authorization state, consulting the network if needed.
    pub async fn check(&self) -> AuthorizationState {
        // Fast path: sticky denial, and a fresh Authorized answer.
        let entry_epoch = {
            let cell = self.cell.lock();
            match cell.state {
                AuthorizationState::FailedPermanent => return AuthorizationState::FailedPermanent,
                AuthorizationState::Authorized if Self::is_fresh(&cell, self.options.cache_ttl) => {
                    return AuthorizationState::Authorized;
                }
                _ => {}
            }
            cell.epoch
        };

        let _guard = self.lookup_gate.lock().await;

        // A lookup completed while we queued; adopt its outcome.
        {
            let cell = self.cell.lock();
            if cell.epoch != entry_epoch {
                debug!(state = ?cell.state, "reusing in-flight authorization outcome");
                return cell.state;
            }
        }

        let state = self.lookup().await;

        let mut cell = self.cell.lock();
        cell.epoch += 1;
        cell.state = state;
        cell.checked_at = Some(Instant::now());
        state
    }

    /// Clear a transient failure so the next check retries. A permanent
    /// denial is untouched.
    pub fn reset_transient(&self) {
        let mut cell = self.cell.lock();
        if cell.state == AuthorizationState::FailedTransient {
            cell.state = AuthorizationState::Pending;
            cell.checked_at = None;
            debug!("transient authorization failure cleared");
        }
    }

    fn is_fresh(cell: &CacheCell, ttl: Duration) -> bool {
        cell.checked_at.is_some_and(|at| at.elapsed() < ttl)
    }

    async fn lookup(&self) -> AuthorizationState {
        if !self.reachability.is_reachable() {
            debug!("authorization lookup skipped: no network route");
            return AuthorizationState::FailedTransient;
        }

        let name = self.options.query_name();
        let records = match tokio::time::timeout(
            self.options.lookup_timeout,
            self.resolver.lookup_txt(&name),
        )
        .await
        {
            Err(_) => {
                warn!(name = %name, "authorization lookup timed out");
                return AuthorizationState::FailedTransient;
            }
            Ok(Err(e)) => {
                warn!(name = %name, error = %e, "authorization lookup failed");
                return AuthorizationState::FailedTransient;
            }
            Ok(Ok(records)) => records,
        };

        let allowed = parse_allow_list(&records);
        if allowed.is_empty() {
            // An empty record is an explicit deny-all, not a misconfiguration.
            warn!(name = %name, "allow-list is empty; denying all builds");
            return AuthorizationState::FailedPermanent;
        }

        let model = self.options.security_model.trim().to_ascii_lowercase();
        if allowed.iter().any(|entry| *entry == model) {
            debug!(model = %model, "build authorized");
            AuthorizationState::Authorized
        } else {
            warn!(model = %model, "build not on the allow-list");
            AuthorizationState::FailedPermanent
        }
    }
}

/// Records are comma-separated identifier lists; entries are trimmed and
/// case-folded, empty entries dropped.
fn parse_allow_list(records: &[String]) -> Vec<String> {
    records
        .iter()
        .flat_map(|record| record.split(','))
        .map(|entry| entry.trim().to_ascii_lowercase())
        .filter(|entry| !entry.is_empty())
        .collect()
}
