//! Pull-based synthesizing voice

use super::phase::amplitude_i32;
use super::shared::{SharedPitch, SharedVolume, SharedWaveform};
use super::waveform::{WaveInput, WaveShape, Waveform};
use crate::pcm::{encode_frames, PcmFormat, PcmReader};
use crate::theory::Pitch;
use crate::Result;

/// Infinite PCM source synthesizing one voice.
///
/// Pitch, volume and waveform live in shared cells so they can be changed
/// from other threads while the voice is playing; every frame reads the
/// current values. The sample index only moves forward, which keeps the
/// waveform phase-continuous across reads and waveform switches.
#[derive(Debug, Clone)]
pub struct PitchReader {
    format: PcmFormat,
    pitch: SharedPitch,
    waveform: SharedWaveform,
    volume: SharedVolume,
    index: u64,
}

impl PitchReader {
    /// Voice with its own fresh parameter cells
    pub fn new(format: PcmFormat, pitch: Pitch, waveform: Waveform, volume: f64) -> Self {
        Self::with_shared(
            format,
            SharedPitch::new(pitch),
            SharedWaveform::new(waveform),
            SharedVolume::new(volume),
        )
    }

    /// Voice driven by existing cells (shared with a controller or other voices)
    pub fn with_shared(
        format: PcmFormat,
        pitch: SharedPitch,
        waveform: SharedWaveform,
        volume: SharedVolume,
    ) -> Self {
        Self {
            format,
            pitch,
            waveform,
            volume,
            index: 0,
        }
    }

    /// Handle to this voice's pitch cell
    pub fn pitch(&self) -> SharedPitch {
        self.pitch.clone()
    }

    /// Handle to this voice's waveform cell
    pub fn waveform(&self) -> SharedWaveform {
        self.waveform.clone()
    }

    /// Handle to this voice's volume cell
    pub fn volume(&self) -> SharedVolume {
        self.volume.clone()
    }

    /// Sample index of the next frame
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Amplitude of the next frame, advancing the phase
    pub fn next_amplitude(&mut self) -> f64 {
        let input = WaveInput {
            pitch: self.pitch.get(),
            index: self.index,
            sample_rate: self.format.sample_rate,
            volume: self.volume.get(),
        };
        let amplitude = self.waveform.load().sample(&input);
        self.index += 1;
        amplitude
    }

    /// Next frame's sample as a full-scale `i32`
    pub fn next_i32(&mut self) -> i32 {
        amplitude_i32(self.next_amplitude())
    }
}

impl PcmReader for PitchReader {
    fn format(&self) -> PcmFormat {
        self.format
    }

    fn read_pcm(&mut self, data: &mut [u8]) -> Result<usize> {
        let format = self.format;
        Ok(encode_frames(data, &format, || self.next_i32()))
    }
}
