//! The narrow interface between the encoder handle and the codec library.

use crate::ffi;

/// Entry points of a codec library operating on a caller-owned encoder
/// context.
///
/// The context is an opaque region of [`Library::encoder_size`] bytes
/// aligned to [`crate::CONTEXT_ALIGN`]. The encoder handle owns
/// that region; implementations only read and write through it.
///
/// All parameter get/set operations go through the two multiplexed
/// control calls, keyed by an `OPUS_*_REQUEST` code.
pub trait Library {
    /// Returns the context size in bytes for the given channel count,
    /// or 0 if the count is unsupported.
    fn encoder_size(&self, channels: i32) -> usize;

    /// Initializes the context in place. Returns an `OPUS_*` status.
    ///
    /// # Safety
    /// `ctx` must point to at least `encoder_size(channels)` writable bytes.
    unsafe fn init(&self, ctx: *mut u8, sample_rate: i32, channels: i32, application: i32) -> i32;

    /// Encodes `frame_size` samples per channel of interleaved 16-bit PCM.
    /// Returns the number of bytes written, or a negative status.
    ///
    /// # Safety
    /// `ctx` must be initialized, `pcm` must hold `frame_size * channels`
    /// samples and `data` must hold `max_data_bytes` writable bytes.
    unsafe fn encode(
        &self,
        ctx: *mut u8,
        pcm: *const i16,
        frame_size: i32,
        data: *mut u8,
        max_data_bytes: i32,
    ) -> i32;

    /// Float counterpart of [`Library::encode`].
    ///
    /// # Safety
    /// Same requirements as [`Library::encode`].
    unsafe fn encode_float(
        &self,
        ctx: *mut u8,
        pcm: *const f32,
        frame_size: i32,
        data: *mut u8,
        max_data_bytes: i32,
    ) -> i32;

    /// Issues a setter control request.
    ///
    /// # Safety
    /// `ctx` must be initialized and `request` must be a setter taking an
    /// `opus_int32` argument.
    unsafe fn ctl_set(&self, ctx: *mut u8, request: i32, value: i32) -> i32;

    /// Issues a getter control request.
    ///
    /// # Safety
    /// `ctx` must be initialized and `request` must be a getter writing an
    /// `opus_int32`.
    unsafe fn ctl_get(&self, ctx: *mut u8, request: i32, value: &mut i32) -> i32;
}

/// libopus, linked through `audiopus_sys`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Libopus;

impl Library for Libopus {
    fn encoder_size(&self, channels: i32) -> usize {
        let size = unsafe { ffi::opus_encoder_get_size(channels) };
        usize::try_from(size).unwrap_or(0)
    }

    unsafe fn init(&self, ctx: *mut u8, sample_rate: i32, channels: i32, application: i32) -> i32 {
        unsafe {
            ffi::opus_encoder_init(
                ctx as *mut ffi::OpusEncoder,
                sample_rate,
                channels,
                application,
            )
        }
    }

    unsafe fn encode(
        &self,
        ctx: *mut u8,
        pcm: *const i16,
        frame_size: i32,
        data: *mut u8,
        max_data_bytes: i32,
    ) -> i32 {
        unsafe {
            ffi::opus_encode(
                ctx as *mut ffi::OpusEncoder,
                pcm,
                frame_size,
                data,
                max_data_bytes,
            )
        }
    }

    unsafe fn encode_float(
        &self,
        ctx: *mut u8,
        pcm: *const f32,
        frame_size: i32,
        data: *mut u8,
        max_data_bytes: i32,
    ) -> i32 {
        unsafe {
            ffi::opus_encode_float(
                ctx as *mut ffi::OpusEncoder,
                pcm,
                frame_size,
                data,
                max_data_bytes,
            )
        }
    }

    unsafe fn ctl_set(&self, ctx: *mut u8, request: i32, value: i32) -> i32 {
        unsafe { ffi::opus_encoder_ctl(ctx as *mut ffi::OpusEncoder, request, value) }
    }

    unsafe fn ctl_get(&self, ctx: *mut u8, request: i32, value: &mut i32) -> i32 {
        unsafe {
            ffi::opus_encoder_ctl(
                ctx as *mut ffi::OpusEncoder,
                request,
                value as *mut ffi::OpusInt32,
            )
        }
    }
}
