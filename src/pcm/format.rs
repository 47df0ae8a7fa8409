//! PCM stream format

use crate::{DawError, Result};
use serde::{Deserialize, Serialize};

/// Sample rate, channel count and bit depth of an interleaved PCM stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct PcmFormat {
    /// Frames per second
    pub sample_rate: u32,
    /// Interleaved channels per frame
    pub channels: u16,
    /// Bits per sample: 8, 16 or 32
    pub bits: u16,
}

/// 44.1 kHz stereo, 32-bit samples
pub const DEFAULT_FORMAT: PcmFormat = PcmFormat {
    sample_rate: 44_100,
    channels: 2,
    bits: 32,
};

impl Default for PcmFormat {
    fn default() -> Self {
        DEFAULT_FORMAT
    }
}

impl PcmFormat {
    /// Build a format without validating it
    pub const fn new(sample_rate: u32, channels: u16, bits: u16) -> Self {
        Self {
            sample_rate,
            channels,
            bits,
        }
    }

    /// Check that the format can be encoded
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(DawError::Format("sample rate must be > 0".into()));
        }
        if self.channels == 0 {
            return Err(DawError::Format("channel count must be > 0".into()));
        }
        if !matches!(self.bits, 8 | 16 | 32) {
            return Err(DawError::Format(format!(
                "{} bits per sample (expected 8, 16 or 32)",
                self.bits
            )));
        }
        Ok(())
    }

    /// Bytes in one sample of one channel
    pub const fn bytes_per_sample(&self) -> usize {
        (self.bits / 8) as usize
    }

    /// Bytes in one interleaved frame
    pub const fn frame_stride(&self) -> usize {
        self.channels as usize * self.bytes_per_sample()
    }

    /// Bytes per second of audio
    pub const fn bytes_per_second(&self) -> usize {
        self.sample_rate as usize * self.frame_stride()
    }

    /// Byte length of `seconds` of audio, rounded down to whole frames
    pub fn buffer_length(&self, seconds: f64) -> usize {
        let stride = self.frame_stride().max(1);
        let frames = (self.sample_rate as f64 * seconds.max(0.0)) as usize;
        frames * stride
    }

    /// Largest prefix of `len` bytes that holds whole frames
    pub fn whole_frames(&self, len: usize) -> usize {
        let stride = self.frame_stride();
        if stride == 0 {
            0
        } else {
            len - len % stride
        }
    }
}

impl std::fmt::Display for PcmFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} Hz, {} ch, {}-bit",
            self.sample_rate, self.channels, self.bits
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_format_sizes() {
        let f = PcmFormat::default();
        assert_eq!(f.frame_stride(), 8);
        assert_eq!(f.bytes_per_second(), 352_800);
        assert_eq!(f.buffer_length(0.5), 176_400);
        assert_eq!(f.whole_frames(12), 8);
    }

    #[test]
    fn test_validate_rejects_odd_depths() {
        assert!(PcmFormat::new(44_100, 2, 24).validate().is_err());
        assert!(PcmFormat::new(0, 2, 16).validate().is_err());
        assert!(PcmFormat::new(44_100, 0, 16).validate().is_err());
        assert!(PcmFormat::new(8_000, 1, 8).validate().is_ok());
    }
}
