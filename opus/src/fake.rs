//! In-process stand-in for libopus used by unit tests.
//!
//! Keeps its state in the caller-owned context region, the same way libopus
//! does, and validates arguments along the same lines. Encoded output is
//! a TOC byte followed by filler; it is not a decodable Opus stream.

use std::mem;

use crate::ffi;
use crate::library::Library;

const MAGIC: u32 = 0x4F50_5553;

#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub(crate) struct FakeState {
    magic: u32,
    pub sample_rate: i32,
    pub channels: i32,
    pub application: i32,
    pub bitrate: i32,
    pub complexity: i32,
    pub max_bandwidth: i32,
    pub dtx: i32,
    pub inband_fec: i32,
    pub packet_loss_perc: i32,
    pub vbr: i32,
    pub encode_calls: u32,
    pub last_frame_size: i32,
    pub last_max_data_bytes: i32,
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct FakeLibrary;

unsafe fn state_mut<'a>(ctx: *mut u8) -> Option<&'a mut FakeState> {
    let state = unsafe { &mut *(ctx as *mut FakeState) };
    (state.magic == MAGIC).then_some(state)
}

fn valid_frame_size(sample_rate: i32, frame_size: i32) -> bool {
    let unit = sample_rate / 400;
    [1, 2, 4, 8, 16, 24].iter().any(|k| unit * k == frame_size)
}

impl FakeLibrary {
    fn write_packet(
        state: &mut FakeState,
        silent: bool,
        frame_size: i32,
        data: *mut u8,
        max_data_bytes: i32,
    ) -> i32 {
        state.encode_calls += 1;
        state.last_frame_size = frame_size;
        state.last_max_data_bytes = max_data_bytes;

        if !valid_frame_size(state.sample_rate, frame_size) {
            return ffi::OPUS_BAD_ARG;
        }
        if max_data_bytes < 2 {
            return ffi::OPUS_BUFFER_TOO_SMALL;
        }

        let len = if silent && state.dtx != 0 {
            1
        } else {
            max_data_bytes.min(1 + frame_size / 10)
        };
        let out = unsafe { std::slice::from_raw_parts_mut(data, len as usize) };
        out.fill(0xAA);
        out[0] = if state.channels == 2 { 0xFC } else { 0xF8 };
        len
    }
}

impl Library for FakeLibrary {
    fn encoder_size(&self, channels: i32) -> usize {
        match channels {
            1 | 2 => mem::size_of::<FakeState>(),
            _ => 0,
        }
    }

    unsafe fn init(&self, ctx: *mut u8, sample_rate: i32, channels: i32, application: i32) -> i32 {
        if ![8000, 12000, 16000, 24000, 48000].contains(&sample_rate) {
            return ffi::OPUS_BAD_ARG;
        }
        if channels != 1 && channels != 2 {
            return ffi::OPUS_BAD_ARG;
        }
        if ![
            ffi::OPUS_APPLICATION_VOIP,
            ffi::OPUS_APPLICATION_AUDIO,
            ffi::OPUS_APPLICATION_RESTRICTED_LOWDELAY,
        ]
        .contains(&application)
        {
            return ffi::OPUS_BAD_ARG;
        }

        let state = FakeState {
            magic: MAGIC,
            sample_rate,
            channels,
            application,
            bitrate: ffi::OPUS_AUTO,
            complexity: 9,
            max_bandwidth: ffi::OPUS_BANDWIDTH_FULLBAND,
            dtx: 0,
            inband_fec: 0,
            packet_loss_perc: 0,
            vbr: 1,
            encode_calls: 0,
            last_frame_size: 0,
            last_max_data_bytes: 0,
        };
        unsafe { (ctx as *mut FakeState).write(state) };
        ffi::OPUS_OK
    }

    unsafe fn encode(
        &self,
        ctx: *mut u8,
        pcm: *const i16,
        frame_size: i32,
        data: *mut u8,
        max_data_bytes: i32,
    ) -> i32 {
        let Some(state) = (unsafe { state_mut(ctx) }) else {
            return ffi::OPUS_INVALID_STATE;
        };
        let len = (frame_size.max(0) * state.channels) as usize;
        let samples = unsafe { std::slice::from_raw_parts(pcm, len) };
        let silent = samples.iter().all(|&s| s == 0);
        Self::write_packet(state, silent, frame_size, data, max_data_bytes)
    }

    unsafe fn encode_float(
        &self,
        ctx: *mut u8,
        pcm: *const f32,
        frame_size: i32,
        data: *mut u8,
        max_data_bytes: i32,
    ) -> i32 {
        let Some(state) = (unsafe { state_mut(ctx) }) else {
            return ffi::OPUS_INVALID_STATE;
        };
        let len = (frame_size.max(0) * state.channels) as usize;
        let samples = unsafe { std::slice::from_raw_parts(pcm, len) };
        let silent = samples.iter().all(|&s| s == 0.0);
        Self::write_packet(state, silent, frame_size, data, max_data_bytes)
    }

    unsafe fn ctl_set(&self, ctx: *mut u8, request: i32, value: i32) -> i32 {
        let Some(state) = (unsafe { state_mut(ctx) }) else {
            return ffi::OPUS_INVALID_STATE;
        };
        let (slot, valid) = match request {
            ffi::OPUS_SET_BITRATE_REQUEST => (
                &mut state.bitrate,
                value == ffi::OPUS_AUTO
                    || value == ffi::OPUS_BITRATE_MAX
                    || (500..=512_000).contains(&value),
            ),
            ffi::OPUS_SET_COMPLEXITY_REQUEST => (&mut state.complexity, (0..=10).contains(&value)),
            ffi::OPUS_SET_MAX_BANDWIDTH_REQUEST => (
                &mut state.max_bandwidth,
                (ffi::OPUS_BANDWIDTH_NARROWBAND..=ffi::OPUS_BANDWIDTH_FULLBAND).contains(&value),
            ),
            ffi::OPUS_SET_DTX_REQUEST => (&mut state.dtx, (0..=1).contains(&value)),
            ffi::OPUS_SET_INBAND_FEC_REQUEST => (&mut state.inband_fec, (0..=2).contains(&value)),
            ffi::OPUS_SET_PACKET_LOSS_PERC_REQUEST => {
                (&mut state.packet_loss_perc, (0..=100).contains(&value))
            }
            ffi::OPUS_SET_VBR_REQUEST => (&mut state.vbr, (0..=1).contains(&value)),
            _ => return ffi::OPUS_UNIMPLEMENTED,
        };
        if !valid {
            return ffi::OPUS_BAD_ARG;
        }
        *slot = value;
        ffi::OPUS_OK
    }

    unsafe fn ctl_get(&self, ctx: *mut u8, request: i32, value: &mut i32) -> i32 {
        let Some(state) = (unsafe { state_mut(ctx) }) else {
            return ffi::OPUS_INVALID_STATE;
        };
        *value = match request {
            ffi::OPUS_GET_BITRATE_REQUEST => state.bitrate,
            ffi::OPUS_GET_COMPLEXITY_REQUEST => state.complexity,
            ffi::OPUS_GET_MAX_BANDWIDTH_REQUEST => state.max_bandwidth,
            ffi::OPUS_GET_DTX_REQUEST => state.dtx,
            ffi::OPUS_GET_INBAND_FEC_REQUEST => state.inband_fec,
            ffi::OPUS_GET_PACKET_LOSS_PERC_REQUEST => state.packet_loss_perc,
            ffi::OPUS_GET_VBR_REQUEST => state.vbr,
            ffi::OPUS_GET_SAMPLE_RATE_REQUEST => state.sample_rate,
            _ => return ffi::OPUS_UNIMPLEMENTED,
        };
        ffi::OPUS_OK
    }
}
