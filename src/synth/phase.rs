//! Per-sample phase arithmetic
//!
//! The raw phase of sample `i` grows without bound as `i` grows, and large
//! arguments lose precision in `sin()`. Waveforms always work from
//! [`mod_phase`], which reduces the phase into a single period.

use crate::theory::Pitch;
use std::f64::consts::TAU;

/// Unbounded phase of sample `index` at `sample_rate` for `freq`, in radians
pub fn phase(freq: Pitch, index: u64, sample_rate: u32) -> f64 {
    freq.hz() * (index as f64 / sample_rate as f64) * TAU
}

/// [`phase`] reduced modulo 2π (floating-point remainder, sign of the input)
pub fn mod_phase(freq: Pitch, index: u64, sample_rate: u32) -> f64 {
    phase(freq, index, sample_rate) % TAU
}

/// Scale a normalized amplitude by `volume` into the full `i32` range.
///
/// Float-to-int casts saturate, so products outside `[-1, 1]` clamp to
/// `i32::MIN`/`i32::MAX` instead of wrapping.
pub fn volume_i32(value: f64, volume: f64) -> i32 {
    ((value * volume) * i32::MAX as f64) as i32
}

/// Convert an amplitude that already includes volume into an `i32` sample
pub fn amplitude_i32(amplitude: f64) -> i32 {
    volume_i32(amplitude, 1.0)
}
