#![forbid(unsafe_code)]

//! Certificate trust validation under a rotating-pin regime.
//!
//! A hard pin alone breaks the client on every routine certificate renewal;
//! chain validation alone gives up the extra defense a pin buys. The
//! compromise here is a build-embedded transition window: outside it the
//! pin is law, inside it the WebPKI-validated chain is accepted and a pin
//! mismatch is only logged for post-hoc auditing.

mod error;
mod fetch;
mod pin;
mod validator;

pub use crate::{
    error::{TrustError, TrustResult},
    fetch::{ChainFetcher, TlsChainFetcher},
    pin::{Fingerprint, PinnedTrust, TrustMode},
    validator::{TrustOptions, TrustValidator},
};

#[cfg(any(test, feature = "mocks"))]
pub use crate::fetch::ChainFetcherMock;
