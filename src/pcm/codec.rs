//! Frame encoding and sample decoding
//!
//! Samples are signed little-endian. 8-bit output keeps the top byte of the
//! 32-bit sample, 16-bit the top two bytes, so every depth carries the same
//! waveform at a different resolution.

use super::format::PcmFormat;

/// Write `sample` into every channel slot of one frame.
///
/// `frame` must be exactly one frame long for `format`, and samples at most
/// four bytes wide.
pub fn encode_frame(frame: &mut [u8], sample: i32, format: &PcmFormat) {
    let width = format.bytes_per_sample();
    for slot in frame.chunks_exact_mut(width) {
        encode_sample(slot, sample);
    }
}

/// Write the top `slot.len()` bytes (at most four) of `sample`, little-endian
pub fn encode_sample(slot: &mut [u8], sample: i32) {
    let bytes = sample.to_le_bytes();
    slot.copy_from_slice(&bytes[4 - slot.len()..]);
}

/// Fill `data` with whole frames, calling `next` once per frame.
///
/// Returns the number of bytes written; trailing space smaller than a frame
/// is left untouched. Formats that cannot carry an `i32` sample write
/// nothing.
pub fn encode_frames<F>(data: &mut [u8], format: &PcmFormat, mut next: F) -> usize
where
    F: FnMut() -> i32,
{
    let width = format.bytes_per_sample();
    if width == 0 || width > 4 || format.channels == 0 {
        return 0;
    }
    let stride = format.frame_stride();
    let mut written = 0;
    for frame in data.chunks_exact_mut(stride) {
        encode_frame(frame, next(), format);
        written += stride;
    }
    written
}

/// Read the sample starting at `bytes` for display as a 16-bit value.
///
/// 8-bit samples are treated as the signed high byte, 32-bit samples are
/// divided by 2^16 (truncating toward zero). Returns 0 when `bytes` is too short.
pub fn decode_sample(bytes: &[u8], bits: u16) -> i16 {
    match bits {
        8 => bytes.first().map(|&b| ((b as i8) as i16) << 8).unwrap_or(0),
        16 if bytes.len() >= 2 => i16::from_le_bytes([bytes[0], bytes[1]]),
        32 if bytes.len() >= 4 => {
            (i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) / 65_536) as i16
        }
        _ => 0,
    }
}

/// Read one full-resolution sample as an `i32`
pub fn decode_i32(bytes: &[u8], bits: u16) -> i32 {
    match bits {
        8 => bytes.first().map(|&b| ((b as i8) as i32) << 24).unwrap_or(0),
        16 if bytes.len() >= 2 => (i16::from_le_bytes([bytes[0], bytes[1]]) as i32) << 16,
        32 if bytes.len() >= 4 => i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
        _ => 0,
    }
}

/// Convert interleaved PCM bytes to `f32` samples in `[-1, 1]`.
///
/// Any trailing partial sample is ignored.
pub fn pcm_to_f32(bytes: &[u8], format: &PcmFormat) -> Vec<f32> {
    let width = format.bytes_per_sample();
    if width == 0 {
        return Vec::new();
    }
    bytes
        .chunks_exact(width)
        .map(|s| decode_i32(s, format.bits) as f32 / 2_147_483_648.0)
        .collect()
}
