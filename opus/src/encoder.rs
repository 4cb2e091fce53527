//! Opus encoder.

use tracing::{debug, trace};

use crate::config::EncoderConfig;
use crate::context::Context;
use crate::error::{EncoderError, ErrorCode, Result};
use crate::ffi;
use crate::frame::{Frame, MAX_PACKET_SIZE};
use crate::library::{Libopus, Library};
use crate::types::{Application, Bandwidth, Bitrate, FrameDuration};

/// Opus encoder.
///
/// The native encoder state lives in a region owned by this handle and is
/// freed when the handle is dropped. A handle starts out uninitialized
/// (see [`Encoder::uninit`]) and becomes usable after exactly one
/// successful [`Encoder::init`]; [`Encoder::new`] does both at once.
///
/// An encoder must not be used from two threads at once. It is `Send`
/// but not `Sync`, and every call that reaches the library takes
/// `&mut self`.
pub struct Encoder<L: Library = Libopus> {
    library: L,
    ctx: Option<Context>,
    channels: i32,
}

impl Encoder<Libopus> {
    /// Creates an uninitialized encoder backed by libopus.
    pub fn uninit() -> Self {
        Self::uninit_in(Libopus)
    }

    /// Creates and initializes a new Opus encoder.
    ///
    /// # Parameters
    /// - `sample_rate`: Sample rate (8000, 12000, 16000, 24000, or 48000)
    /// - `channels`: Number of channels (1 or 2)
    /// - `application`: Intended application type
    pub fn new(sample_rate: i32, channels: i32, application: Application) -> Result<Self> {
        Self::new_in(Libopus, sample_rate, channels, application)
    }

    /// Creates a new VoIP encoder.
    pub fn new_voip(sample_rate: i32, channels: i32) -> Result<Self> {
        Self::new(sample_rate, channels, Application::VoIP)
    }

    /// Creates a new audio encoder.
    pub fn new_audio(sample_rate: i32, channels: i32) -> Result<Self> {
        Self::new(sample_rate, channels, Application::Audio)
    }

    /// Creates an encoder and applies every setting in `config`.
    pub fn from_config(sample_rate: i32, channels: i32, config: &EncoderConfig) -> Result<Self> {
        let mut encoder = Self::new(sample_rate, channels, config.application)?;
        encoder.apply_config(config)?;
        Ok(encoder)
    }
}

impl Default for Encoder<Libopus> {
    fn default() -> Self {
        Self::uninit()
    }
}

impl<L: Library> Encoder<L> {
    /// Creates an uninitialized encoder backed by `library`.
    pub fn uninit_in(library: L) -> Self {
        Self {
            library,
            ctx: None,
            channels: 0,
        }
    }

    /// Creates and initializes an encoder backed by `library`.
    pub fn new_in(
        library: L,
        sample_rate: i32,
        channels: i32,
        application: Application,
    ) -> Result<Self> {
        let mut encoder = Self::uninit_in(library);
        encoder.init(sample_rate, channels, application)?;
        Ok(encoder)
    }

    /// Initializes the encoder. Must succeed exactly once before any other
    /// call; the sample rate is validated by the library.
    ///
    /// On failure the encoder stays uninitialized and holds no memory.
    pub fn init(&mut self, sample_rate: i32, channels: i32, application: Application) -> Result<()> {
        if self.ctx.is_some() {
            return Err(EncoderError::AlreadyInitialized);
        }
        if channels != 1 && channels != 2 {
            return Err(EncoderError::InvalidChannels(channels));
        }

        let size = self.library.encoder_size(channels);
        let mut ctx = Context::alloc(size)?;
        let ret = unsafe {
            self.library
                .init(ctx.as_mut_ptr(), sample_rate, channels, application.to_ffi())
        };
        if ret != ffi::OPUS_OK {
            debug!(sample_rate, channels, ret, "opus: encoder init failed");
            return Err(EncoderError::Codec(ErrorCode(ret)));
        }

        debug!(
            sample_rate,
            channels,
            ?application,
            size,
            "opus: encoder initialized"
        );
        self.ctx = Some(ctx);
        self.channels = channels;
        Ok(())
    }

    /// Returns true once [`Encoder::init`] has succeeded.
    pub fn is_initialized(&self) -> bool {
        self.ctx.is_some()
    }

    /// Returns the number of channels, or 0 before initialization.
    pub fn channels(&self) -> i32 {
        self.channels
    }

    /// Encodes interleaved 16-bit PCM into `data`. Returns the number of
    /// bytes written.
    ///
    /// `pcm` holds one frame: `frame_size * channels` samples.
    pub fn encode(&mut self, pcm: &[i16], data: &mut [u8]) -> Result<usize> {
        let (ctx, frame_size, max_data_bytes) = self.prepare(pcm.len(), data.len())?;
        let n = unsafe {
            self.library
                .encode(ctx, pcm.as_ptr(), frame_size, data.as_mut_ptr(), max_data_bytes)
        };
        Self::finish(n, frame_size)
    }

    /// Encodes interleaved float PCM (nominal range -1.0..=1.0) into `data`.
    /// Returns the number of bytes written.
    pub fn encode_float(&mut self, pcm: &[f32], data: &mut [u8]) -> Result<usize> {
        let (ctx, frame_size, max_data_bytes) = self.prepare(pcm.len(), data.len())?;
        let n = unsafe {
            self.library
                .encode_float(ctx, pcm.as_ptr(), frame_size, data.as_mut_ptr(), max_data_bytes)
        };
        Self::finish(n, frame_size)
    }

    /// Encodes 16-bit PCM to a new frame.
    pub fn encode_frame(&mut self, pcm: &[i16]) -> Result<Frame> {
        let mut buf = vec![0u8; MAX_PACKET_SIZE];
        let n = self.encode(pcm, &mut buf)?;
        buf.truncate(n);
        Ok(Frame::new(buf))
    }

    /// Encodes float PCM to a new frame.
    pub fn encode_float_frame(&mut self, pcm: &[f32]) -> Result<Frame> {
        let mut buf = vec![0u8; MAX_PACKET_SIZE];
        let n = self.encode_float(pcm, &mut buf)?;
        buf.truncate(n);
        Ok(Frame::new(buf))
    }

    /// Validates an encode call and returns the context pointer, the frame
    /// size in samples per channel, and the output capacity.
    fn prepare(&mut self, samples: usize, capacity: usize) -> Result<(*mut u8, i32, i32)> {
        let channels = self.channels;
        let ctx = self.ctx_ptr()?;
        if samples == 0 {
            return Err(EncoderError::NoData);
        }
        if capacity == 0 {
            return Err(EncoderError::NoTargetBuffer);
        }
        // libopus counts a sample as one value per channel, so 20 stereo
        // samples are 40 values in the buffer.
        if samples % channels as usize != 0 {
            return Err(EncoderError::UnalignedInput {
                len: samples,
                channels,
            });
        }
        let frame_size = i32::try_from(samples / channels as usize)
            .map_err(|_| EncoderError::Codec(ErrorCode::BAD_ARG))?;
        let max_data_bytes = i32::try_from(capacity).unwrap_or(i32::MAX);
        Ok((ctx, frame_size, max_data_bytes))
    }

    fn finish(n: i32, frame_size: i32) -> Result<usize> {
        if n < 0 {
            debug!(frame_size, ret = n, "opus: encode failed");
            return Err(EncoderError::Codec(ErrorCode(n)));
        }
        trace!(frame_size, bytes = n, "opus: encoded frame");
        Ok(n as usize)
    }

    /// Configures the use of discontinuous transmission (DTX).
    pub fn set_dtx(&mut self, enabled: bool) -> Result<()> {
        self.ctl_set(ffi::OPUS_SET_DTX_REQUEST, i32::from(enabled))
    }

    /// Reports whether discontinuous transmission (DTX) is enabled.
    pub fn dtx(&mut self) -> Result<bool> {
        Ok(self.ctl_get(ffi::OPUS_GET_DTX_REQUEST)? != 0)
    }

    /// Returns the sample rate in Hz.
    pub fn sample_rate(&mut self) -> Result<i32> {
        self.ctl_get(ffi::OPUS_GET_SAMPLE_RATE_REQUEST)
    }

    /// Returns the frame size (samples per channel) for a given duration at
    /// the encoder's sample rate.
    pub fn frame_size(&mut self, duration: FrameDuration) -> Result<i32> {
        Ok(duration.samples(self.sample_rate()?))
    }

    /// Sets the target bitrate in bits per second.
    pub fn set_bitrate(&mut self, bitrate: i32) -> Result<()> {
        self.ctl_set(ffi::OPUS_SET_BITRATE_REQUEST, bitrate)
    }

    /// Lets the encoder pick the bitrate.
    pub fn set_bitrate_auto(&mut self) -> Result<()> {
        self.ctl_set(ffi::OPUS_SET_BITRATE_REQUEST, ffi::OPUS_AUTO)
    }

    /// Uses as much rate as the output buffer allows. This can be used to
    /// control the rate through the output buffer size.
    pub fn set_bitrate_max(&mut self) -> Result<()> {
        self.ctl_set(ffi::OPUS_SET_BITRATE_REQUEST, ffi::OPUS_BITRATE_MAX)
    }

    /// Returns the configured bitrate.
    pub fn bitrate(&mut self) -> Result<Bitrate> {
        Ok(Bitrate::from_ffi(self.bitrate_bps()?))
    }

    /// Returns the raw bitrate value reported by the library, sentinels
    /// included.
    pub fn bitrate_bps(&mut self) -> Result<i32> {
        self.ctl_get(ffi::OPUS_GET_BITRATE_REQUEST)
    }

    /// Sets the encoder complexity (0-10).
    pub fn set_complexity(&mut self, complexity: i32) -> Result<()> {
        self.ctl_set(ffi::OPUS_SET_COMPLEXITY_REQUEST, complexity)
    }

    /// Returns the encoder complexity.
    pub fn complexity(&mut self) -> Result<i32> {
        self.ctl_get(ffi::OPUS_GET_COMPLEXITY_REQUEST)
    }

    /// Sets the maximum bandpass the encoder selects automatically.
    pub fn set_max_bandwidth(&mut self, bandwidth: Bandwidth) -> Result<()> {
        self.ctl_set(ffi::OPUS_SET_MAX_BANDWIDTH_REQUEST, bandwidth.to_ffi())
    }

    /// Returns the configured maximum bandpass.
    pub fn max_bandwidth(&mut self) -> Result<Bandwidth> {
        let code = self.ctl_get(ffi::OPUS_GET_MAX_BANDWIDTH_REQUEST)?;
        Bandwidth::from_ffi(code).ok_or(EncoderError::Codec(ErrorCode::INTERNAL_ERROR))
    }

    /// Enables in-band forward error correction.
    pub fn set_inband_fec(&mut self, enabled: bool) -> Result<()> {
        self.ctl_set(ffi::OPUS_SET_INBAND_FEC_REQUEST, i32::from(enabled))
    }

    /// Reports whether in-band forward error correction is enabled.
    pub fn inband_fec(&mut self) -> Result<bool> {
        Ok(self.ctl_get(ffi::OPUS_GET_INBAND_FEC_REQUEST)? != 0)
    }

    /// Sets the expected packet loss in percent (0-100).
    pub fn set_packet_loss_perc(&mut self, perc: i32) -> Result<()> {
        self.ctl_set(ffi::OPUS_SET_PACKET_LOSS_PERC_REQUEST, perc)
    }

    /// Returns the expected packet loss in percent.
    pub fn packet_loss_perc(&mut self) -> Result<i32> {
        self.ctl_get(ffi::OPUS_GET_PACKET_LOSS_PERC_REQUEST)
    }

    /// Enables variable bitrate.
    pub fn set_vbr(&mut self, enabled: bool) -> Result<()> {
        self.ctl_set(ffi::OPUS_SET_VBR_REQUEST, i32::from(enabled))
    }

    /// Reports whether variable bitrate is enabled.
    pub fn vbr(&mut self) -> Result<bool> {
        Ok(self.ctl_get(ffi::OPUS_GET_VBR_REQUEST)? != 0)
    }

    /// Applies each setting present in `config`, stopping at the first
    /// failure. The application is fixed at init and is not applied here.
    pub fn apply_config(&mut self, config: &EncoderConfig) -> Result<()> {
        if let Some(bitrate) = config.bitrate {
            self.set_bitrate(bitrate.to_ffi())?;
        }
        if let Some(complexity) = config.complexity {
            self.set_complexity(complexity)?;
        }
        if let Some(bandwidth) = config.max_bandwidth {
            self.set_max_bandwidth(bandwidth)?;
        }
        if let Some(dtx) = config.dtx {
            self.set_dtx(dtx)?;
        }
        if let Some(fec) = config.inband_fec {
            self.set_inband_fec(fec)?;
        }
        if let Some(perc) = config.packet_loss_perc {
            self.set_packet_loss_perc(perc)?;
        }
        if let Some(vbr) = config.vbr {
            self.set_vbr(vbr)?;
        }
        Ok(())
    }

    // --- control channel ---

    fn ctx_ptr(&mut self) -> Result<*mut u8> {
        self.ctx
            .as_mut()
            .map(Context::as_mut_ptr)
            .ok_or(EncoderError::Uninitialized)
    }

    fn ctl_set(&mut self, request: i32, value: i32) -> Result<()> {
        let ctx = self.ctx_ptr()?;
        let ret = unsafe { self.library.ctl_set(ctx, request, value) };
        if ret != ffi::OPUS_OK {
            debug!(request, value, ret, "opus: set request failed");
            return Err(EncoderError::Codec(ErrorCode(ret)));
        }
        Ok(())
    }

    fn ctl_get(&mut self, request: i32) -> Result<i32> {
        let ctx = self.ctx_ptr()?;
        let mut value = 0;
        let ret = unsafe { self.library.ctl_get(ctx, request, &mut value) };
        if ret != ffi::OPUS_OK {
            debug!(request, ret, "opus: get request failed");
            return Err(EncoderError::Codec(ErrorCode(ret)));
        }
        Ok(value)
    }
}

impl<L: Library> std::fmt::Debug for Encoder<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Encoder")
            .field("channels", &self.channels)
            .field("initialized", &self.is_initialized())
            .finish()
    }
}
