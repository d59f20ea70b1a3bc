use crate::StatusUpdate;

/// Signal from the media resource bridge.
///
/// The bridge is opaque to the core: these four signals are the entire
/// observable surface of the decode/render pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MediaEvent {
    /// The session reached a playable state.
    Ready,
    /// The session failed terminally.
    Failed { reason: String },
    /// Playback is stalling on an empty buffer.
    BufferLow,
    /// The buffer refilled after a stall.
    BufferRecovered,
}

impl MediaEvent {
    /// Terminal events end the session; buffer events do not.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Ready | Self::Failed { .. })
    }
}

/// Unified event published on the client bus.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClientEvent {
    /// A status transition, as handed to the caller.
    Status(StatusUpdate),
    /// A raw media bridge signal, for consumers that track buffering.
    Media(MediaEvent),
}

impl From<StatusUpdate> for ClientEvent {
    fn from(update: StatusUpdate) -> Self {
        Self::Status(update)
    }
}

impl From<MediaEvent> for ClientEvent {
    fn from(event: MediaEvent) -> Self {
        Self::Media(event)
    }
}
