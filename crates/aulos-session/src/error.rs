use aulos_events::PlayerStatus;
use thiserror::Error;

/// Classified failure. Every internal error is reduced to one of these
/// before it crosses the controller boundary; the caller only ever sees the
/// status each fault maps to.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Fault {
    #[error("no network connectivity")]
    NoConnectivity,
    #[error("build is not on the streaming allow-list")]
    AuthorizationDenied,
    #[error("authorization could not be determined")]
    AuthorizationIndeterminate,
    #[error("server certificate failed trust validation")]
    TrustFailure,
    #[error("server {0} unreachable")]
    ServerUnreachable(String),
    #[error("every origin server failed")]
    AllServersExhausted,
    #[error("media session failed")]
    MediaDecodeFailure,
    #[error("handshake deadline exceeded")]
    HandshakeTimeout,
}

impl Fault {
    /// Permanent faults halt automatic retry entirely; everything else may
    /// fall back to another server or retry on network recovery.
    #[must_use]
    pub fn is_permanent(&self) -> bool {
        matches!(self, Self::AuthorizationDenied | Self::TrustFailure)
    }

    /// Status code surfaced for this fault.
    #[must_use]
    pub fn status(&self) -> PlayerStatus {
        match self {
            Self::NoConnectivity | Self::AuthorizationIndeterminate => PlayerStatus::NoConnection,
            Self::AuthorizationDenied => PlayerStatus::AuthorizationDenied,
            Self::TrustFailure => PlayerStatus::SecurityFailed,
            Self::ServerUnreachable(_)
            | Self::AllServersExhausted
            | Self::MediaDecodeFailure
            | Self::HandshakeTimeout => PlayerStatus::StreamUnavailable,
        }
    }
}
