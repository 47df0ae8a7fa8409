//! Sums several voices into one stream

use super::phase::amplitude_i32;
use super::pitch_reader::PitchReader;
use crate::pcm::{encode_frames, PcmFormat, PcmReader};
use crate::theory::Pitch;
use crate::Result;

/// Mixes voices sample by sample.
///
/// Amplitudes are added before encoding, and the sum clamps at full scale
/// instead of wrapping. Every voice advances once per output frame whatever
/// its own format says; the mixer's format governs the output.
#[derive(Debug, Clone)]
pub struct Mixer {
    format: PcmFormat,
    voices: Vec<PitchReader>,
}

impl Mixer {
    /// Empty mixer; reads produce silence until a voice is added
    pub fn new(format: PcmFormat) -> Self {
        Self {
            format,
            voices: Vec::new(),
        }
    }

    /// One voice per pitch, all sharing a waveform and volume
    pub fn from_pitches(
        format: PcmFormat,
        pitches: &[Pitch],
        waveform: super::Waveform,
        volume: f64,
    ) -> Self {
        let voices = pitches
            .iter()
            .map(|&p| PitchReader::new(format, p, waveform.clone(), volume))
            .collect();
        Self { format, voices }
    }

    /// Add a voice
    pub fn push(&mut self, voice: PitchReader) {
        self.voices.push(voice);
    }

    /// Current voices
    pub fn voices(&self) -> &[PitchReader] {
        &self.voices
    }

    /// Number of voices
    pub fn len(&self) -> usize {
        self.voices.len()
    }

    /// True when no voice is mixed
    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    /// Summed amplitude of the next frame, advancing every voice
    pub fn next_amplitude(&mut self) -> f64 {
        self.voices.iter_mut().map(|v| v.next_amplitude()).sum()
    }

    fn next_i32(&mut self) -> i32 {
        amplitude_i32(self.next_amplitude())
    }
}

impl PcmReader for Mixer {
    fn format(&self) -> PcmFormat {
        self.format
    }

    fn read_pcm(&mut self, data: &mut [u8]) -> Result<usize> {
        let format = self.format;
        Ok(encode_frames(data, &format, || self.next_i32()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pcm::codec::decode_i32;
    use crate::synth::Waveform;

    #[test]
    fn test_mix_adds_voices() {
        let format = PcmFormat::new(44_100, 1, 32);
        let mut mixer = Mixer::from_pitches(
            format,
            &[Pitch::new(100.0), Pitch::new(100.0)],
            Waveform::Square,
            0.25,
        );
        let mut buf = [0u8; 8];
        mixer.read_pcm(&mut buf).unwrap();
        // index 1 is in the positive half for both voices
        assert_eq!(decode_i32(&buf[4..8], 32), (0.5 * i32::MAX as f64) as i32);
    }

    #[test]
    fn test_mix_saturates() {
        let format = PcmFormat::new(44_100, 1, 32);
        let mut mixer = Mixer::from_pitches(format, &[Pitch::new(50.0); 3], Waveform::Square, 0.9);
        let mut buf = [0u8; 8];
        mixer.read_pcm(&mut buf).unwrap();
        assert_eq!(decode_i32(&buf[0..4], 32), i32::MIN);
        assert_eq!(decode_i32(&buf[4..8], 32), i32::MAX);
    }

    #[test]
    fn test_empty_mixer_is_silent() {
        let mut mixer = Mixer::new(PcmFormat::default());
        let mut buf = [1u8; 16];
        assert_eq!(mixer.read_pcm(&mut buf).unwrap(), 16);
        assert!(buf.iter().all(|&b| b == 0));
    }
}
