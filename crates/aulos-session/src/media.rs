use async_trait::async_trait;
use aulos_events::MediaEvent;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use url::Url;

#[derive(Debug, Error, Clone)]
pub enum MediaError {
    #[error("failed to open media session: {0}")]
    Open(String),
}

/// Handle to one live media session.
///
/// The controller consumes events from it and closes it; nothing else of
/// the engine is visible. Dropping the handle closes the session, so an
/// abandoned attempt can never leave audio running.
pub struct MediaHandle {
    events: mpsc::Receiver<MediaEvent>,
    shutdown: CancellationToken,
}

impl MediaHandle {
    #[must_use]
    pub fn new(events: mpsc::Receiver<MediaEvent>, shutdown: CancellationToken) -> Self {
        Self { events, shutdown }
    }

    /// Next event from the engine; `None` when the engine side is gone.
    pub async fn next_event(&mut self) -> Option<MediaEvent> {
        self.events.recv().await
    }

    /// Tear the session down. Idempotent and synchronous.
    pub fn close(&self) {
        self.shutdown.cancel();
    }
}

impl Drop for MediaHandle {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// The decode/render engine, reduced to the only contract the core needs:
/// open a URL, watch four signals, close.
#[cfg_attr(any(test, feature = "mocks"), unimock::unimock(api = MediaBridgeMock))]
#[async_trait]
pub trait MediaBridge: Send + Sync {
    async fn open(&self, url: Url) -> Result<MediaHandle, MediaError>;
}
