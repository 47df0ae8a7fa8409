//! Fixed-buffer test signals
//!
//! Simple byte patterns that are handy for checking a scope or a device by
//! eye or ear before any voice is involved.

use crate::pcm::{encode_frames, PcmFormat};
use rand::Rng;

/// Four flat steps at byte levels 10, 40, 70 and 100
pub fn staircase_bytes(len: usize) -> Vec<u8> {
    let mut data = vec![0u8; len];
    for (i, b) in data.iter_mut().enumerate() {
        *b = match i * 4 / len.max(1) {
            0 => 10,
            1 => 40,
            2 => 70,
            _ => 100,
        };
    }
    data
}

/// Uniform byte noise centred on zero, peak `volume / 2` in two's complement
pub fn noise_bytes(len: usize, volume: f64) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| (((rng.gen::<f64>() - 0.5) * volume) as i8) as u8)
        .collect()
}

/// Byte triangle bouncing between `-volume` and `volume` by `delta` per byte
pub fn ramp_bytes(len: usize, volume: f64, delta: f64) -> Vec<u8> {
    let mut v = 0.0f64;
    let mut delta = delta;
    let mut data = Vec::with_capacity(len);
    for _ in 0..len {
        data.push((v as i8) as u8);
        v += delta;
        if v > volume || v < -volume {
            delta = -delta;
        }
    }
    data
}

/// Encoded triangle of `i32` samples stepping by `step` and bouncing at `±limit`.
///
/// Fills `len` bytes of `format` with whole frames.
pub fn ramp_i32(format: &PcmFormat, len: usize, step: i32, limit: i32) -> Vec<u8> {
    let mut data = vec![0u8; format.whole_frames(len)];
    let mut v = 0i32;
    let mut step = step;
    encode_frames(&mut data, format, || {
        let sample = v;
        v = v.saturating_add(step);
        if v > limit || v < -limit {
            step = -step;
        }
        sample
    });
    data
}
