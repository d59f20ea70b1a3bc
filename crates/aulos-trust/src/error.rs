use thiserror::Error;

/// Trust-layer errors. Pin mismatches are not errors, they are a `false`
/// validation result; these variants cover the plumbing around it.
#[derive(Debug, Error, Clone)]
pub enum TrustError {
    #[error("TLS connection failed: {0}")]
    Tls(String),
    #[error("invalid server name: {0}")]
    InvalidName(String),
    #[error("no peer certificates presented by {0}")]
    EmptyChain(String),
    #[error("Timeout")]
    Timeout,
}

impl TrustError {
    /// Everything here is connectivity-shaped and therefore transient; a
    /// pin mismatch (the permanent case) is expressed as a `false` result,
    /// not an error.
    pub fn is_transient(&self) -> bool {
        true
    }
}

pub type TrustResult<T> = Result<T, TrustError>;
