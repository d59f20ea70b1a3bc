#![forbid(unsafe_code)]

//! Authorization gate: decides whether this build may stream at all.
//!
//! The decision comes from a DNS TXT record naming the permitted build
//! identifiers. The interesting part is the failure classification: a
//! denial must never auto-retry (that would hammer a denylist), while a
//! DNS hiccup must retry on the next attempt or network recovery.

mod gate;
mod state;

pub use crate::{
    gate::{AuthorizationGate, GateOptions},
    state::AuthorizationState,
};
