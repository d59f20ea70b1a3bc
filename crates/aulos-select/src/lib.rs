#![forbid(unsafe_code)]

//! Origin server selection for the aulos stream client.
//!
//! A fixed set of candidate origins is probed for latency; the selector
//! ranks them, avoids servers with recent failures, and throttles probing
//! so rapid UI actions cannot thrash the network. Selection is
//! deterministic: ties resolve in declaration order.

mod candidate;
mod error;
mod health;
mod selector;

pub use crate::{
    candidate::{default_candidates, Region, ServerCandidate},
    error::{SelectError, SelectResult},
    health::ServerHealth,
    selector::{SelectorOptions, ServerSelector},
};
