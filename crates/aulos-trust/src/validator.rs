use std::{
    sync::Arc,
    time::{Duration, SystemTime},
};

use rustls_pki_types::CertificateDer;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::{
    error::TrustResult,
    fetch::ChainFetcher,
    pin::{Fingerprint, PinnedTrust, TrustMode},
};

#[derive(Clone, Debug)]
pub struct TrustOptions {
    /// How long a successful validation is trusted without recomputation.
    pub cache_ttl: Duration,
    /// TLS port used when fetching a host's chain.
    pub port: u16,
}

impl Default for TrustOptions {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(600),
            port: 443,
        }
    }
}

/// Validates a host's certificate chain against the pinned fingerprint.
///
/// Only successes are cached: a certificate can be re-issued at any moment,
/// so a failed validation must be recomputed on every attempt, while a
/// recent success is safe to reuse for its TTL.
pub struct TrustValidator {
    pin: PinnedTrust,
    fetcher: Arc<dyn ChainFetcher>,
    options: TrustOptions,
    validated_at: parking_lot::Mutex<Option<Instant>>,
}

impl TrustValidator {
    pub fn new(pin: PinnedTrust, fetcher: Arc<dyn ChainFetcher>, options: TrustOptions) -> Self {
        Self {
            pin,
            fetcher,
            options,
            validated_at: parking_lot::Mutex::new(None),
        }
    }

    /// Pure decision over an already-fetched chain.
    ///
    /// Strict mode: some certificate in the chain must hash to the pin.
    /// Lenient mode (inside the rotation window): the chain already passed
    /// ordinary validation during the handshake, so the answer is `true`;
    /// a mismatch is recorded for auditing.
    pub fn evaluate(&self, chain: &[CertificateDer<'_>], now: SystemTime) -> bool {
        let pin_matched = chain
            .iter()
            .any(|der| Fingerprint::of_der(der.as_ref()) == self.pin.fingerprint);

        match self.pin.mode(now) {
            TrustMode::Strict => {
                if !pin_matched {
                    warn!(
                        pinned = %self.pin.fingerprint,
                        presented = %leaf_fingerprint(chain),
                        "certificate pin mismatch outside rotation window"
                    );
                }
                pin_matched
            }
            TrustMode::Lenient => {
                if !pin_matched {
                    // Audit entry: connectivity is preserved, but the
                    // mismatch must be visible after the fact.
                    warn!(
                        pinned = %self.pin.fingerprint,
                        presented = %leaf_fingerprint(chain),
                        "certificate pin mismatch tolerated inside rotation window"
                    );
                }
                true
            }
        }
    }

    /// Fetch `host`'s chain and validate it, short-circuiting on a fresh
    /// prior success.
    pub async fn ensure_valid(&self, host: &str) -> TrustResult<bool> {
        if self.has_fresh_success() {
            debug!(host, "trust validation served from cache");
            return Ok(true);
        }

        let chain = self.fetcher.fetch_chain(host, self.options.port).await?;
        let valid = self.evaluate(&chain, SystemTime::now());
        if valid {
            *self.validated_at.lock() = Some(Instant::now());
        }
        Ok(valid)
    }

    fn has_fresh_success(&self) -> bool {
        self.validated_at
            .lock()
            .is_some_and(|at| at.elapsed() < self.options.cache_ttl)
    }
}

fn leaf_fingerprint(chain: &[CertificateDer<'_>]) -> Fingerprint {
    chain
        .first()
        .map(|der| Fingerprint::of_der(der.as_ref()))
        .unwrap_or(Fingerprint::new([0; 32]))
}
