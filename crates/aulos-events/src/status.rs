/// Caller-visible playback status.
///
/// One variant per classified failure plus the lifecycle states the
/// controller passes through on the way to `Playing`. Failure variants are
/// already classified; callers never see raw transport errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerStatus {
    /// No session requested yet.
    Idle,
    /// Checking the build against the remote allow-list.
    Authorizing,
    /// Probing origin candidates.
    SelectingServer,
    /// Checking the selected origin against the pinned certificate.
    ValidatingTrust,
    /// Media session opened, waiting for the first ready signal.
    Connecting,
    /// Audio is flowing.
    Playing,
    /// Transient media stall; the session is still alive.
    Buffering,
    /// Retrying after a candidate failure or a network recovery.
    Reconnecting,
    /// Stopped on request.
    Stopped,
    /// The build is not on the allow-list. Permanent; no automatic retry.
    AuthorizationDenied,
    /// Authorization could not be determined (no route, DNS failure).
    /// Retried automatically on the next attempt or network recovery.
    NoConnection,
    /// Certificate validation failed outside the rotation window.
    SecurityFailed,
    /// Every origin candidate was tried and failed.
    StreamUnavailable,
}

impl PlayerStatus {
    /// Whether audio is (or is about to be) audible. `Buffering` counts as
    /// playing: the session is alive and recovery is automatic.
    #[must_use]
    pub fn is_playing(self) -> bool {
        matches!(self, Self::Playing | Self::Buffering)
    }

    /// Terminal failures that suppress automatic retry until an external
    /// reset or a network transition.
    #[must_use]
    pub fn is_permanent_failure(self) -> bool {
        matches!(self, Self::AuthorizationDenied | Self::SecurityFailed)
    }
}

/// The `(is_playing, status)` pair pushed to callers on every transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusUpdate {
    pub is_playing: bool,
    pub status: PlayerStatus,
}

impl From<PlayerStatus> for StatusUpdate {
    fn from(status: PlayerStatus) -> Self {
        Self {
            is_playing: status.is_playing(),
            status,
        }
    }
}

impl Default for StatusUpdate {
    fn default() -> Self {
        PlayerStatus::Idle.into()
    }
}
