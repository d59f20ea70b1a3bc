use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use rustls_pki_types::{CertificateDer, ServerName};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tracing::debug;

use crate::error::{TrustError, TrustResult};

/// Retrieves the certificate chain a host presents.
///
/// Injection point for test doubles; the production implementation performs
/// a real TLS handshake.
#[cfg_attr(any(test, feature = "mocks"), unimock::unimock(api = ChainFetcherMock))]
#[async_trait]
pub trait ChainFetcher: Send + Sync {
    /// Fetch the DER chain presented by `host:port`, leaf first.
    async fn fetch_chain(&self, host: &str, port: u16) -> TrustResult<Vec<CertificateDer<'static>>>;
}

/// Chain fetcher backed by a tokio-rustls handshake.
///
/// The handshake itself validates the chain against the WebPKI roots, the
/// "platform trust" half of the policy. A host whose chain fails ordinary
/// validation never reaches the pin check; this fetcher reports it as a TLS
/// error instead.
pub struct TlsChainFetcher {
    connector: TlsConnector,
    timeout: Duration,
}

impl TlsChainFetcher {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        let mut roots = rustls::RootCertStore::empty();
        roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
        let config = rustls::ClientConfig::builder()
            .with_root_certificates(roots)
            .with_no_client_auth();
        Self {
            connector: TlsConnector::from(Arc::new(config)),
            timeout,
        }
    }
}

impl Default for TlsChainFetcher {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}

#[async_trait]
impl ChainFetcher for TlsChainFetcher {
    async fn fetch_chain(&self, host: &str, port: u16) -> TrustResult<Vec<CertificateDer<'static>>> {
        let name = ServerName::try_from(host.to_string())
            .map_err(|_| TrustError::InvalidName(host.to_string()))?;

        let handshake = async {
            let tcp = TcpStream::connect((host, port))
                .await
                .map_err(|e| TrustError::Tls(e.to_string()))?;
            let tls = self
                .connector
                .connect(name, tcp)
                .await
                .map_err(|e| TrustError::Tls(e.to_string()))?;

            let (_, connection) = tls.get_ref();
            let chain: Vec<CertificateDer<'static>> = connection
                .peer_certificates()
                .map(|certs| certs.iter().map(|der| der.clone().into_owned()).collect())
                .unwrap_or_default();
            Ok(chain)
        };

        let chain = tokio::time::timeout(self.timeout, handshake)
            .await
            .map_err(|_| TrustError::Timeout)??;

        if chain.is_empty() {
            return Err(TrustError::EmptyChain(host.to_string()));
        }

        debug!(host, port, chain_len = chain.len(), "peer chain captured");
        Ok(chain)
    }
}
