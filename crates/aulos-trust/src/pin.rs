use std::{fmt, time::SystemTime};

use sha2::{Digest, Sha256};

/// SHA-256 content hash of a DER-encoded certificate.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    #[must_use]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Hash the raw DER bytes of a certificate.
    #[must_use]
    pub fn of_der(der: &[u8]) -> Self {
        Self(Sha256::digest(der).into())
    }

    /// Parse the usual lowercase/uppercase hex rendering (64 chars).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim();
        if hex.len() != 64 {
            return None;
        }
        let mut bytes = [0u8; 32];
        for (i, chunk) in hex.as_bytes().chunks_exact(2).enumerate() {
            let pair = std::str::from_utf8(chunk).ok()?;
            bytes[i] = u8::from_str_radix(pair, 16).ok()?;
        }
        Some(Self(bytes))
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({self})")
    }
}

/// Strictness of the pin check, derived from the clock and never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrustMode {
    /// Pin match required.
    Strict,
    /// Inside the rotation window: chain validation decides, pin mismatch
    /// is audited but tolerated.
    Lenient,
}

/// Build-embedded pin and its planned rotation window.
#[derive(Clone, Debug)]
pub struct PinnedTrust {
    pub fingerprint: Fingerprint,
    pub window_start: SystemTime,
    pub window_end: SystemTime,
}

impl PinnedTrust {
    #[must_use]
    pub fn new(fingerprint: Fingerprint, window_start: SystemTime, window_end: SystemTime) -> Self {
        Self {
            fingerprint,
            window_start,
            window_end,
        }
    }

    /// Mode in effect at `now`.
    #[must_use]
    pub fn mode(&self, now: SystemTime) -> TrustMode {
        if now >= self.window_start && now <= self.window_end {
            TrustMode::Lenient
        } else {
            TrustMode::Strict
        }
    }
}
