use thiserror::Error;

/// Centralized error type for aulos-net.
///
/// Everything network-shaped is reduced to one of these variants before it
/// leaves the crate; raw `reqwest`/resolver errors never cross a boundary.
#[derive(Debug, Error, Clone)]
pub enum NetError {
    #[error("HTTP request failed: {0}")]
    Http(String),
    #[error("HTTP {status} for URL: {url}")]
    HttpStatus { status: u16, url: String },
    #[error("Timeout")]
    Timeout,
    #[error("DNS lookup failed: {0}")]
    Dns(String),
    #[error("no network route available")]
    Unreachable,
}

impl NetError {
    /// Creates an HTTP status error
    pub fn http_status(status: u16, url: String) -> Self {
        Self::HttpStatus { status, url }
    }

    /// Creates a timeout error
    pub fn timeout() -> Self {
        Self::Timeout
    }

    /// Creates an HTTP error from a generic string
    pub fn http<S: Into<String>>(msg: S) -> Self {
        Self::Http(msg.into())
    }

    /// Creates a DNS error from a generic string
    pub fn dns<S: Into<String>>(msg: S) -> Self {
        Self::Dns(msg.into())
    }

    /// Transient errors clear on their own (retry on the next attempt or on
    /// network recovery); everything else needs a different server or an
    /// external fix.
    pub fn is_transient(&self) -> bool {
        match self {
            NetError::Timeout | NetError::Dns(_) | NetError::Unreachable => true,
            NetError::HttpStatus { status, .. } => {
                *status >= 500 || *status == 429 || *status == 408
            }
            NetError::Http(msg) => {
                msg.contains("timeout") || msg.contains("connection") || msg.contains("network")
            }
        }
    }

    /// Checks if this error indicates a timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, NetError::Timeout)
    }
}

impl From<reqwest::Error> for NetError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(error.to_string())
        }
    }
}

pub type NetResult<T> = Result<T, NetError>;
