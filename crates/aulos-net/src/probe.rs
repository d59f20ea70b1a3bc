use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::error::{NetError, NetResult};

/// Reachability probe with latency measurement.
///
/// A probe is a single bounded HEAD request against a candidate's health
/// endpoint; the measured value is wall-clock time to a successful response.
#[cfg_attr(any(test, feature = "mocks"), unimock::unimock(api = ProberMock))]
#[async_trait]
pub trait Prober: Send + Sync {
    /// Probe `url` and return the observed round-trip latency.
    ///
    /// Errors and timeouts are both failures; the caller treats them as
    /// infinite latency.
    async fn ping(&self, url: Url) -> NetResult<Duration>;
}

#[derive(Clone, Debug)]
pub struct ProbeOptions {
    /// Per-probe deadline. A candidate slower than this is unreachable.
    pub timeout: Duration,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(2),
        }
    }
}

/// HTTP prober over reqwest with rustls.
#[derive(Clone, Debug)]
pub struct HttpProber {
    inner: reqwest::Client,
    options: ProbeOptions,
}

impl HttpProber {
    /// # Panics
    ///
    /// Panics if the `reqwest::Client` builder fails to build.
    #[must_use]
    pub fn new(options: ProbeOptions) -> Self {
        let inner = reqwest::Client::builder()
            .use_rustls_tls()
            .build()
            .expect("failed to build reqwest client");
        Self { inner, options }
    }
}

impl Default for HttpProber {
    fn default() -> Self {
        Self::new(ProbeOptions::default())
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn ping(&self, url: Url) -> NetResult<Duration> {
        let started = tokio::time::Instant::now();

        let resp = self
            .inner
            .head(url.clone())
            .timeout(self.options.timeout)
            .send()
            .await
            .map_err(NetError::from)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(NetError::http_status(status.as_u16(), url.to_string()));
        }

        Ok(started.elapsed())
    }
}
