#![forbid(unsafe_code)]

//! Network plumbing for the aulos stream client: the reachability probe
//! client, the DNS TXT lookup seam used by the authorization gate, and the
//! network path observer.
//!
//! This is deliberately not a general HTTP client. The only requests that
//! exist here are bounded health probes; stream payloads never pass through
//! this crate.

mod error;
mod path;
mod probe;
mod resolve;

pub use crate::{
    error::{NetError, NetResult},
    path::{InterfaceKind, NetworkPath, NetworkPathState, PathMonitor, Reachability},
    probe::{HttpProber, ProbeOptions, Prober},
    resolve::{HickoryTxtResolver, TxtResolver},
};

#[cfg(any(test, feature = "mocks"))]
pub use crate::{
    path::ReachabilityMock, probe::ProberMock, resolve::TxtResolverMock,
};
