//! Rust bindings for the libopus encoder.
//!
//! The encoder state is allocated and owned by [`Encoder`]; libopus only
//! initializes and updates it in place. Encoding, rate control and the
//! psychoacoustic model all live in libopus.
//!
//! # Usage
//!
//! ```no_run
//! use giztoy_opus::{Application, Bandwidth, Encoder};
//!
//! let mut encoder = Encoder::new(48000, 2, Application::Audio)?;
//! encoder.set_bitrate(64000)?;
//! encoder.set_max_bandwidth(Bandwidth::Fullband)?;
//!
//! // 20ms of interleaved stereo at 48kHz.
//! let pcm = vec![0i16; 960 * 2];
//! let mut packet = vec![0u8; 4000];
//! let n = encoder.encode(&pcm, &mut packet)?;
//! packet.truncate(n);
//! # Ok::<(), giztoy_opus::EncoderError>(())
//! ```
//!
//! # Linking
//!
//! libopus comes from `audiopus_sys`, which uses the system library when
//! pkg-config finds one and otherwise builds its bundled copy.
//!
//! # Thread Safety
//!
//! An [`Encoder`] can be moved between threads but must not be shared;
//! wrap it in a mutex if several threads need it.

mod config;
mod context;
mod encoder;
mod error;
mod ffi;
mod frame;
mod library;
mod types;

#[cfg(test)]
mod fake;

pub use config::EncoderConfig;
pub use context::CONTEXT_ALIGN;
pub use encoder::Encoder;
pub use error::{ConfigError, EncoderError, ErrorCode, Result};
pub use frame::{Frame, MAX_PACKET_SIZE};
pub use library::{Libopus, Library};
pub use types::{Application, Bandwidth, Bitrate, FrameDuration};
