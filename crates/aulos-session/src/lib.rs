#![forbid(unsafe_code)]

//! Stream session controller: the state machine that sequences
//! authorization, server selection, trust validation and media session
//! start, and that recovers from transient failures without ever leaking a
//! raw cause to the caller.
//!
//! One logical owner task per controller holds every piece of mutable
//! state. Network work happens on background tasks whose results come back
//! as messages tagged with an attempt generation; anything from a
//! superseded attempt is discarded on arrival. Cancellation is cooperative
//! via `CancellationToken`: no callback from an abandoned attempt can
//! mutate state or reach the caller.

mod attempt;
mod controller;
mod error;
mod media;
mod timing;
mod types;

#[cfg(any(test, feature = "mocks"))]
pub mod mock;

pub use crate::{
    controller::SessionController,
    error::Fault,
    media::{MediaBridge, MediaError, MediaHandle},
    timing::HandshakeTiming,
    types::{ControllerConfig, StreamSelector},
};

#[cfg(any(test, feature = "mocks"))]
pub use crate::media::MediaBridgeMock;

pub use aulos_events::{ClientEvent, EventBus, MediaEvent, PlayerStatus, StatusUpdate};
