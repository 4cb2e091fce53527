//! Declarative encoder settings.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{Application, Bandwidth, Bitrate};

/// Opus encoder settings.
///
/// Unset fields keep the library defaults. Deserializes from JSON such as:
///
/// ```json
/// { "application": "audio", "bitrate": "auto", "max_bandwidth": "wideband", "dtx": true }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Intended application type, fixed at init.
    pub application: Application,
    /// Target bitrate: `"auto"`, `"max"`, or bits per second.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<Bitrate>,
    /// Computational complexity (0-10).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complexity: Option<i32>,
    /// Maximum bandpass the encoder may select.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_bandwidth: Option<Bandwidth>,
    /// Discontinuous transmission.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dtx: Option<bool>,
    /// In-band forward error correction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inband_fec: Option<bool>,
    /// Expected packet loss in percent (0-100).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub packet_loss_perc: Option<i32>,
    /// Variable bitrate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vbr: Option<bool>,
}

impl EncoderConfig {
    /// Parses settings from JSON.
    pub fn from_json(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Sets the application type.
    pub fn with_application(mut self, application: Application) -> Self {
        self.application = application;
        self
    }

    /// Sets the target bitrate.
    pub fn with_bitrate(mut self, bitrate: Bitrate) -> Self {
        self.bitrate = Some(bitrate);
        self
    }

    /// Sets the complexity.
    pub fn with_complexity(mut self, complexity: i32) -> Self {
        self.complexity = Some(complexity);
        self
    }

    /// Sets the maximum bandwidth.
    pub fn with_max_bandwidth(mut self, bandwidth: Bandwidth) -> Self {
        self.max_bandwidth = Some(bandwidth);
        self
    }

    /// Enables or disables DTX.
    pub fn with_dtx(mut self, enabled: bool) -> Self {
        self.dtx = Some(enabled);
        self
    }

    /// Enables or disables in-band FEC.
    pub fn with_inband_fec(mut self, enabled: bool) -> Self {
        self.inband_fec = Some(enabled);
        self
    }

    /// Sets the expected packet loss.
    pub fn with_packet_loss_perc(mut self, perc: i32) -> Self {
        self.packet_loss_perc = Some(perc);
        self
    }

    /// Enables or disables VBR.
    pub fn with_vbr(mut self, enabled: bool) -> Self {
        self.vbr = Some(enabled);
        self
    }
}
