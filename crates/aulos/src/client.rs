use std::sync::Arc;

use aulos_auth::{AuthorizationGate, GateOptions};
use aulos_events::{ClientEvent, StatusUpdate};
use aulos_net::{HickoryTxtResolver, HttpProber, PathMonitor, Prober, TxtResolver};
use aulos_select::{SelectorOptions, ServerHealth, ServerSelector};
use aulos_session::{ControllerConfig, MediaBridge, SessionController, StreamSelector};
use aulos_trust::{ChainFetcher, TlsChainFetcher, TrustOptions, TrustValidator};
use tokio::sync::{broadcast, watch};

use crate::config::ClientConfig;

/// The one object a consumer holds.
///
/// Construct one per consumer and inject it; there is no process-wide
/// shared instance. Surfaces that live in another process (widgets and the
/// like) get their own client against their own bridge; state is never
/// shared through memory.
pub struct StreamClient {
    controller: SessionController,
    monitor: PathMonitor,
}

impl StreamClient {
    /// Client with production collaborators: system DNS, HTTPS probes and
    /// real TLS chain fetching.
    ///
    /// # Panics
    ///
    /// Panics if the underlying HTTP client cannot be built.
    #[must_use]
    pub fn new(config: ClientConfig, bridge: Arc<dyn MediaBridge>) -> Self {
        Self::builder(config, bridge).build()
    }

    #[must_use]
    pub fn builder(config: ClientConfig, bridge: Arc<dyn MediaBridge>) -> StreamClientBuilder {
        StreamClientBuilder {
            config,
            bridge,
            resolver: None,
            prober: None,
            fetcher: None,
            monitor: None,
        }
    }

    /// Start (or restart) playback of the current stream.
    pub fn play(&self) {
        self.controller.play();
    }

    /// Stop playback. Idempotent and synchronous; safe during teardown.
    pub fn stop(&self) {
        self.controller.stop();
    }

    /// Switch language streams. Ignored while a previous switch is still
    /// settling.
    pub fn set_stream(&self, stream: StreamSelector) {
        self.controller.set_stream(stream);
    }

    #[must_use]
    pub fn status(&self) -> StatusUpdate {
        self.controller.status()
    }

    #[must_use]
    pub fn watch_status(&self) -> watch::Receiver<StatusUpdate> {
        self.controller.watch_status()
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ClientEvent> {
        self.controller.subscribe()
    }

    /// The platform's network driver pushes path snapshots here.
    #[must_use]
    pub fn path_monitor(&self) -> &PathMonitor {
        &self.monitor
    }

    /// Synchronous teardown of the controller and any live session.
    pub fn close(&self) {
        self.controller.close();
    }
}

/// Builder exposing every collaborator seam for injection; production
/// defaults fill whatever the caller leaves out.
pub struct StreamClientBuilder {
    config: ClientConfig,
    bridge: Arc<dyn MediaBridge>,
    resolver: Option<Arc<dyn TxtResolver>>,
    prober: Option<Arc<dyn Prober>>,
    fetcher: Option<Arc<dyn ChainFetcher>>,
    monitor: Option<PathMonitor>,
}

impl StreamClientBuilder {
    #[must_use]
    pub fn with_resolver(mut self, resolver: Arc<dyn TxtResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    #[must_use]
    pub fn with_prober(mut self, prober: Arc<dyn Prober>) -> Self {
        self.prober = Some(prober);
        self
    }

    #[must_use]
    pub fn with_chain_fetcher(mut self, fetcher: Arc<dyn ChainFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    #[must_use]
    pub fn with_path_monitor(mut self, monitor: PathMonitor) -> Self {
        self.monitor = Some(monitor);
        self
    }

    /// # Panics
    ///
    /// Panics if the underlying HTTP client cannot be built.
    #[must_use]
    pub fn build(self) -> StreamClient {
        let config = self.config;
        let monitor = self.monitor.unwrap_or_default();
        let resolver = self
            .resolver
            .unwrap_or_else(|| Arc::new(HickoryTxtResolver::new()));
        let prober = self.prober.unwrap_or_else(|| Arc::new(HttpProber::default()));
        let fetcher = self
            .fetcher
            .unwrap_or_else(|| Arc::new(TlsChainFetcher::default()));

        let mut gate_options =
            GateOptions::new(config.security_model.clone(), config.authority_domain.clone());
        gate_options.cache_ttl = config.authorization_ttl;
        let gate = Arc::new(AuthorizationGate::new(
            gate_options,
            resolver,
            Arc::new(monitor.clone()),
        ));

        let selector = Arc::new(ServerSelector::new(
            config.candidates.clone(),
            prober,
            ServerHealth::new(),
            SelectorOptions::default(),
        ));

        let trust = Arc::new(TrustValidator::new(
            config.pinned.clone(),
            fetcher,
            TrustOptions::default(),
        ));

        let controller_config = ControllerConfig {
            security_model: config.security_model,
            resource_path: config.resource_path,
            default_stream: config.default_stream,
            client_region: config.client_region,
            timing: config.timing,
        };
        let controller = SessionController::spawn(
            controller_config,
            gate,
            selector,
            trust,
            self.bridge,
            &monitor,
        );

        StreamClient {
            controller,
            monitor,
        }
    }
}
