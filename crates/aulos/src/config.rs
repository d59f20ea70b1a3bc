use std::time::Duration;

use aulos_select::{default_candidates, Region, SelectError, ServerCandidate};
use aulos_session::{HandshakeTiming, StreamSelector};
use aulos_trust::PinnedTrust;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid candidate configuration: {0}")]
    Candidates(#[from] SelectError),
}

/// Everything a client needs to know at construction. All of it is static
/// per build; nothing here changes at runtime and nothing is persisted.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Build-embedded authorization identifier.
    pub security_model: String,
    /// Zone queried for the allow-list TXT record.
    pub authority_domain: String,
    /// Host suffix shared by every origin candidate.
    pub base_host: String,
    /// Stream resource path on each origin.
    pub resource_path: String,
    /// Stream played initially.
    pub default_stream: StreamSelector,
    /// Origin candidates, first entry doubling as the fallback of last
    /// resort.
    pub candidates: Vec<ServerCandidate>,
    /// Pinned certificate fingerprint and its rotation window.
    pub pinned: PinnedTrust,
    /// Rough client location for the cross-continent handshake penalty.
    pub client_region: Option<Region>,
    pub timing: HandshakeTiming,
    /// TTL for cached authorization answers.
    pub authorization_ttl: Duration,
}

impl ClientConfig {
    /// Config with the standard EU/US candidate pair and default timings.
    pub fn new(
        security_model: impl Into<String>,
        authority_domain: impl Into<String>,
        base_host: impl Into<String>,
        resource_path: impl Into<String>,
        pinned: PinnedTrust,
    ) -> Result<Self, ConfigError> {
        let base_host = base_host.into();
        let candidates = default_candidates(&base_host)?;
        Ok(Self {
            security_model: security_model.into(),
            authority_domain: authority_domain.into(),
            base_host,
            resource_path: resource_path.into(),
            default_stream: StreamSelector::new("english"),
            candidates,
            pinned,
            client_region: None,
            timing: HandshakeTiming::default(),
            authorization_ttl: Duration::from_secs(600),
        })
    }

    #[must_use]
    pub fn with_default_stream(mut self, stream: StreamSelector) -> Self {
        self.default_stream = stream;
        self
    }

    #[must_use]
    pub fn with_client_region(mut self, region: Region) -> Self {
        self.client_region = Some(region);
        self
    }

    #[must_use]
    pub fn with_candidates(mut self, candidates: Vec<ServerCandidate>) -> Self {
        self.candidates = candidates;
        self
    }

    #[must_use]
    pub fn with_timing(mut self, timing: HandshakeTiming) -> Self {
        self.timing = timing;
        self
    }
}
