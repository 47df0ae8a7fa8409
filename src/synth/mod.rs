//! Voice synthesis: phase math, waveforms, live parameters and readers

pub mod controls;
pub mod generators;
pub mod mixer;
pub mod phase;
pub mod pitch_reader;
pub mod shared;
pub mod waveform;

pub use controls::{VoiceCommand, VoiceControls};
pub use mixer::Mixer;
pub use phase::{mod_phase, phase, volume_i32};
pub use pitch_reader::PitchReader;
pub use shared::{SharedPitch, SharedVolume, SharedWaveform};
pub use waveform::{WaveInput, WaveShape, Waveform};
