#![forbid(unsafe_code)]

//! Status surface and event bus for the aulos stream client.
//!
//! The caller-facing contract is a single `(is_playing, status)` pair per
//! state transition; everything else (media bridge signals) is observable
//! through the same bus for consumers that want finer detail. Mapping a
//! status to user-visible text is the caller's job; no display strings
//! cross this boundary.

mod bus;
mod event;
mod status;

pub use bus::EventBus;
pub use event::{ClientEvent, MediaEvent};
pub use status::{PlayerStatus, StatusUpdate};
