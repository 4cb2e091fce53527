//! Value types passed to and returned from the encoder.

use std::collections::HashMap;
use std::time::Duration;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::ffi;

/// Opus application type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Application {
    /// Best quality for voice signals.
    #[default]
    #[serde(rename = "voip")]
    VoIP,
    /// Best quality for non-voice signals.
    #[serde(rename = "audio")]
    Audio,
    /// Minimum possible coding delay.
    #[serde(rename = "restricted_lowdelay")]
    RestrictedLowdelay,
}

impl Application {
    pub(crate) fn to_ffi(self) -> i32 {
        match self {
            Self::VoIP => ffi::OPUS_APPLICATION_VOIP,
            Self::Audio => ffi::OPUS_APPLICATION_AUDIO,
            Self::RestrictedLowdelay => ffi::OPUS_APPLICATION_RESTRICTED_LOWDELAY,
        }
    }
}

/// Audio passband ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bandwidth {
    /// 4 kHz passband.
    Narrowband,
    /// 6 kHz passband.
    Mediumband,
    /// 8 kHz passband.
    Wideband,
    /// 12 kHz passband.
    SuperWideband,
    /// 20 kHz passband.
    Fullband,
}

struct BandwidthInfo {
    bandwidth: Bandwidth,
    code: i32,
    passband_hz: u32,
}

static BANDWIDTHS: Lazy<[BandwidthInfo; 5]> = Lazy::new(|| {
    [
        BandwidthInfo {
            bandwidth: Bandwidth::Narrowband,
            code: ffi::OPUS_BANDWIDTH_NARROWBAND,
            passband_hz: 4000,
        },
        BandwidthInfo {
            bandwidth: Bandwidth::Mediumband,
            code: ffi::OPUS_BANDWIDTH_MEDIUMBAND,
            passband_hz: 6000,
        },
        BandwidthInfo {
            bandwidth: Bandwidth::Wideband,
            code: ffi::OPUS_BANDWIDTH_WIDEBAND,
            passband_hz: 8000,
        },
        BandwidthInfo {
            bandwidth: Bandwidth::SuperWideband,
            code: ffi::OPUS_BANDWIDTH_SUPERWIDEBAND,
            passband_hz: 12000,
        },
        BandwidthInfo {
            bandwidth: Bandwidth::Fullband,
            code: ffi::OPUS_BANDWIDTH_FULLBAND,
            passband_hz: 20000,
        },
    ]
});

static BANDWIDTH_BY_CODE: Lazy<HashMap<i32, Bandwidth>> =
    Lazy::new(|| BANDWIDTHS.iter().map(|info| (info.code, info.bandwidth)).collect());

impl Bandwidth {
    /// All tiers, narrowest first.
    pub const ALL: [Bandwidth; 5] = [
        Self::Narrowband,
        Self::Mediumband,
        Self::Wideband,
        Self::SuperWideband,
        Self::Fullband,
    ];

    fn info(self) -> &'static BandwidthInfo {
        // The table holds every variant in declaration order.
        &BANDWIDTHS[self as usize]
    }

    /// Returns the libopus constant for this tier.
    pub fn to_ffi(self) -> i32 {
        self.info().code
    }

    /// Looks up a tier by its libopus constant.
    pub fn from_ffi(code: i32) -> Option<Self> {
        BANDWIDTH_BY_CODE.get(&code).copied()
    }

    /// Returns the upper edge of the passband in Hz.
    pub fn passband_hz(self) -> u32 {
        self.info().passband_hz
    }
}

impl std::fmt::Display for Bandwidth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Narrowband => "NB",
            Self::Mediumband => "MB",
            Self::Wideband => "WB",
            Self::SuperWideband => "SWB",
            Self::Fullband => "FB",
        };
        write!(f, "{}({}kHz)", name, self.passband_hz() / 1000)
    }
}

/// Target bitrate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BitrateRepr", into = "BitrateRepr")]
pub enum Bitrate {
    /// Let the encoder pick a rate from the sample rate and channel count.
    Auto,
    /// Use as much rate as the output buffer allows.
    Max,
    /// Explicit rate in bits per second.
    Bits(i32),
}

impl Bitrate {
    /// Returns the raw value passed to `OPUS_SET_BITRATE`.
    pub fn to_ffi(self) -> i32 {
        match self {
            Self::Auto => ffi::OPUS_AUTO,
            Self::Max => ffi::OPUS_BITRATE_MAX,
            Self::Bits(bps) => bps,
        }
    }

    /// Interprets a raw value reported by `OPUS_GET_BITRATE`.
    pub fn from_ffi(value: i32) -> Self {
        match value {
            ffi::OPUS_AUTO => Self::Auto,
            ffi::OPUS_BITRATE_MAX => Self::Max,
            bps => Self::Bits(bps),
        }
    }
}

#[derive(Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
enum BitrateRepr {
    Sentinel(BitrateSentinel),
    Bits(i32),
}

#[derive(Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum BitrateSentinel {
    Auto,
    Max,
}

impl From<BitrateRepr> for Bitrate {
    fn from(repr: BitrateRepr) -> Self {
        match repr {
            BitrateRepr::Sentinel(BitrateSentinel::Auto) => Self::Auto,
            BitrateRepr::Sentinel(BitrateSentinel::Max) => Self::Max,
            BitrateRepr::Bits(bps) => Self::Bits(bps),
        }
    }
}

impl From<Bitrate> for BitrateRepr {
    fn from(bitrate: Bitrate) -> Self {
        match bitrate {
            Bitrate::Auto => Self::Sentinel(BitrateSentinel::Auto),
            Bitrate::Max => Self::Sentinel(BitrateSentinel::Max),
            Bitrate::Bits(bps) => Self::Bits(bps),
        }
    }
}

/// Frame durations accepted by the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameDuration {
    Duration2500us,
    Duration5ms,
    Duration10ms,
    Duration20ms,
    Duration40ms,
    Duration60ms,
}

impl FrameDuration {
    /// Returns the duration.
    pub fn duration(&self) -> Duration {
        Duration::from_micros(self.micros())
    }

    /// Returns the duration in microseconds.
    pub fn micros(&self) -> u64 {
        match self {
            Self::Duration2500us => 2500,
            Self::Duration5ms => 5000,
            Self::Duration10ms => 10_000,
            Self::Duration20ms => 20_000,
            Self::Duration40ms => 40_000,
            Self::Duration60ms => 60_000,
        }
    }

    /// Returns the number of samples per channel at `sample_rate`.
    pub fn samples(&self, sample_rate: i32) -> i32 {
        (i64::from(sample_rate) * self.micros() as i64 / 1_000_000) as i32
    }
}

impl std::fmt::Display for FrameDuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Duration2500us => write!(f, "2.5ms"),
            _ => write!(f, "{}ms", self.micros() / 1000),
        }
    }
}
