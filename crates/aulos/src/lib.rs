#![forbid(unsafe_code)]

//! # Aulos
//!
//! Resilient audio-stream client core. Decides whether this build may
//! stream, which origin to use, how to validate that origin's certificate
//! under a rotating pin, and how to recover from transient failures, all
//! below an opaque media engine and above an opaque UI.
//!
//! ## Quick start
//!
//! ```ignore
//! use aulos::prelude::*;
//!
//! let pinned = PinnedTrust::new(fingerprint, window_start, window_end);
//! let config = ClientConfig::new("atlanta", "example.org", "radio.example.org",
//!     "stream.aac", pinned)?;
//! let client = StreamClient::new(config, media_bridge);
//!
//! client.play();
//! let mut events = client.subscribe();
//! ```

// ── Re-export sub-crates ────────────────────────────────────────────────

pub mod auth {
    pub use aulos_auth::*;
}

pub mod events {
    pub use aulos_events::*;
}

pub mod net {
    pub use aulos_net::*;
}

pub mod select {
    pub use aulos_select::*;
}

pub mod session {
    pub use aulos_session::*;
}

pub mod trust {
    pub use aulos_trust::*;
}

// ── Client ──────────────────────────────────────────────────────────────

mod client;
mod config;

pub use client::{StreamClient, StreamClientBuilder};
pub use config::{ClientConfig, ConfigError};

// ── Prelude ─────────────────────────────────────────────────────────────

pub mod prelude {
    pub use aulos_auth::AuthorizationState;
    pub use aulos_events::{ClientEvent, MediaEvent, PlayerStatus, StatusUpdate};
    pub use aulos_net::{InterfaceKind, NetworkPath, NetworkPathState, PathMonitor};
    pub use aulos_select::{Region, ServerCandidate};
    pub use aulos_session::{MediaBridge, MediaHandle, StreamSelector};
    pub use aulos_trust::{Fingerprint, PinnedTrust};

    pub use crate::{ClientConfig, StreamClient};
}
