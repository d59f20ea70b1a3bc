use std::fmt;

use aulos_select::Region;

use crate::timing::HandshakeTiming;

/// Which language stream to play. The selector is the only per-stream
/// variable in URL construction; everything else comes from configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StreamSelector {
    language: String,
}

impl StreamSelector {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into().trim().to_ascii_lowercase(),
        }
    }

    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }
}

impl fmt::Display for StreamSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.language)
    }
}

/// Static configuration for one controller instance.
#[derive(Clone, Debug)]
pub struct ControllerConfig {
    /// Build-embedded identifier, appended to stream URLs and checked by
    /// the authorization gate.
    pub security_model: String,
    /// Resource path of the stream on every origin ("stream.aac").
    pub resource_path: String,
    /// Stream played until `set_stream` says otherwise.
    pub default_stream: StreamSelector,
    /// Where this client roughly is; `None` skips the cross-continent
    /// handshake penalty.
    pub client_region: Option<Region>,
    pub timing: HandshakeTiming,
}

impl ControllerConfig {
    pub fn new(
        security_model: impl Into<String>,
        resource_path: impl Into<String>,
        default_stream: StreamSelector,
    ) -> Self {
        Self {
            security_model: security_model.into(),
            resource_path: resource_path.into(),
            default_stream,
            client_region: None,
            timing: HandshakeTiming::default(),
        }
    }
}
