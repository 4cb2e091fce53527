use thiserror::Error;

use crate::ffi;

/// A status code returned by libopus. Negative values are failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorCode(pub i32);

impl ErrorCode {
    pub const BAD_ARG: Self = Self(ffi::OPUS_BAD_ARG);
    pub const BUFFER_TOO_SMALL: Self = Self(ffi::OPUS_BUFFER_TOO_SMALL);
    pub const INTERNAL_ERROR: Self = Self(ffi::OPUS_INTERNAL_ERROR);
    pub const INVALID_PACKET: Self = Self(ffi::OPUS_INVALID_PACKET);
    pub const UNIMPLEMENTED: Self = Self(ffi::OPUS_UNIMPLEMENTED);
    pub const INVALID_STATE: Self = Self(ffi::OPUS_INVALID_STATE);
    pub const ALLOC_FAIL: Self = Self(ffi::OPUS_ALLOC_FAIL);

    /// Returns the raw numeric code.
    pub fn code(self) -> i32 {
        self.0
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", ffi::error_string(self.0), self.0)
    }
}

/// Errors returned by the Opus encoder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncoderError {
    #[error("opus: encoder already initialized")]
    AlreadyInitialized,

    #[error("opus: number of channels must be 1 or 2: {0}")]
    InvalidChannels(i32),

    #[error("opus: encoder uninitialized")]
    Uninitialized,

    #[error("opus: no data supplied")]
    NoData,

    #[error("opus: no target buffer")]
    NoTargetBuffer,

    #[error("opus: input buffer length {len} must be multiple of channels ({channels})")]
    UnalignedInput { len: usize, channels: i32 },

    #[error("opus: {0}")]
    Codec(ErrorCode),
}

impl EncoderError {
    /// Returns the library status code, if this error came from libopus.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Self::Codec(code) => Some(*code),
            _ => None,
        }
    }
}

impl From<ErrorCode> for EncoderError {
    fn from(code: ErrorCode) -> Self {
        Self::Codec(code)
    }
}

/// Errors returned while loading an [`crate::EncoderConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("opus: invalid encoder config: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EncoderError>;
