use url::Url;

use crate::error::{SelectError, SelectResult};

/// Rough geography of an origin, for the cross-continent handshake penalty.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Region {
    Europe,
    NorthAmerica,
}

/// A statically configured origin server.
///
/// Candidates are immutable and defined at process start; declaration order
/// is the deterministic tie-break everywhere a choice is otherwise equal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerCandidate {
    /// Display name, also the key in the health ledger ("EU", "US").
    pub name: String,
    /// Subdomain fragment composed into stream hostnames.
    pub subdomain: String,
    pub region: Region,
    /// Host suffix shared by all candidates ("radio.example.org").
    pub base_host: String,
    /// Health endpoint probed for reachability and latency.
    pub ping_url: Url,
}

impl ServerCandidate {
    /// Candidate with the conventional `https://{subdomain}.{base_host}/ping`
    /// health endpoint.
    pub fn new(
        name: impl Into<String>,
        subdomain: impl Into<String>,
        region: Region,
        base_host: impl Into<String>,
    ) -> SelectResult<Self> {
        let name = name.into();
        let subdomain = subdomain.into();
        let base_host = base_host.into();
        let ping_url = Url::parse(&format!("https://{subdomain}.{base_host}/ping"))
            .map_err(|e| SelectError::InvalidUrl(e.to_string()))?;
        Ok(Self {
            name,
            subdomain,
            region,
            base_host,
            ping_url,
        })
    }

    /// Stream URL for a language stream on this origin:
    /// `https://{language}-{subdomain}.{base_host}/{resource}?security_model={id}`.
    ///
    /// Deterministic and never built from user input.
    pub fn stream_url(
        &self,
        language: &str,
        resource: &str,
        security_model: &str,
    ) -> SelectResult<Url> {
        let raw = format!(
            "https://{language}-{subdomain}.{base_host}/{resource}?security_model={security_model}",
            subdomain = self.subdomain,
            base_host = self.base_host,
        );
        Url::parse(&raw).map_err(|e| SelectError::InvalidUrl(e.to_string()))
    }
}

/// The two production origins, EU first (EU is the fallback of last resort).
pub fn default_candidates(base_host: &str) -> SelectResult<Vec<ServerCandidate>> {
    Ok(vec![
        ServerCandidate::new("EU", "eu", Region::Europe, base_host)?,
        ServerCandidate::new("US", "us", Region::NorthAmerica, base_host)?,
    ])
}
