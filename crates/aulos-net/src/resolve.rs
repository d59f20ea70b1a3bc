use async_trait::async_trait;
use hickory_resolver::{
    config::{ResolverConfig, ResolverOpts},
    error::ResolveErrorKind,
    TokioAsyncResolver,
};
use tracing::debug;

use crate::error::{NetError, NetResult};

/// DNS TXT lookup seam.
///
/// The authorization gate queries a TXT record holding the allow-list; this
/// trait is the injection point for test doubles. One string is returned per
/// TXT record, character segments concatenated in wire order.
#[cfg_attr(any(test, feature = "mocks"), unimock::unimock(api = TxtResolverMock))]
#[async_trait]
pub trait TxtResolver: Send + Sync {
    /// Look up the TXT records for `name`.
    ///
    /// An authoritative answer with no records is `Ok(vec![])`: the record
    /// being absent is a real answer, not a transport failure. Only
    /// resolution errors (SERVFAIL, no route, malformed responses) are
    /// `Err`.
    async fn lookup_txt(&self, name: &str) -> NetResult<Vec<String>>;
}

/// System resolver backed by hickory.
pub struct HickoryTxtResolver {
    inner: TokioAsyncResolver,
}

impl HickoryTxtResolver {
    /// Resolver using the public default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default()),
        }
    }

    /// Resolver using the host's `/etc/resolv.conf` configuration.
    pub fn from_system_conf() -> NetResult<Self> {
        let inner =
            TokioAsyncResolver::tokio_from_system_conf().map_err(|e| NetError::dns(e.to_string()))?;
        Ok(Self { inner })
    }
}

impl Default for HickoryTxtResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TxtResolver for HickoryTxtResolver {
    async fn lookup_txt(&self, name: &str) -> NetResult<Vec<String>> {
        match self.inner.txt_lookup(name).await {
            Ok(lookup) => {
                let records: Vec<String> = lookup
                    .iter()
                    .map(|txt| {
                        txt.txt_data()
                            .iter()
                            .map(|segment| String::from_utf8_lossy(segment).into_owned())
                            .collect::<String>()
                    })
                    .collect();
                debug!(name, count = records.len(), "TXT lookup answered");
                Ok(records)
            }
            Err(e) if matches!(e.kind(), ResolveErrorKind::NoRecordsFound { .. }) => {
                debug!(name, "TXT lookup returned no records");
                Ok(Vec::new())
            }
            Err(e) => Err(NetError::dns(e.to_string())),
        }
    }
}
