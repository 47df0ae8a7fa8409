//! Real-time PCM synthesis toolkit
//!
//! Pull-based PCM generation from a small music-theory model, a looping
//! playback driver, and a ring-buffer oscilloscope that mirrors everything
//! written to an audio device.
//!
//! # Features
//! - Equal-tempered pitches, intervals, chords and key scales
//! - Phase-continuous sine, sawtooth, triangle, square and noise voices
//! - Multi-channel 8/16/32-bit little-endian frame encoding
//! - Live pitch/waveform/volume changes from any thread, no locks on the audio path
//! - Loop driver with cancellation, deadlines and an observable error slot
//! - Oscilloscope tee with adjustable zoom
//!
//! # Crate feature flags
//! - `visualization` (default): terminal oscilloscope (`visualizer::tui`)
//! - `file-sources` (default): WAV and MP3 readers (`sources`)
//! - `streaming` (opt-in): real-time device output (enables optional `rodio` dep)
//!
//! # Quick start
//! ## Pull PCM from a synthesized voice
//! ```
//! use daw::pcm::{PcmFormat, PcmReader};
//! use daw::synth::{PitchReader, Waveform};
//! use daw::theory::pitch;
//!
//! let mut reader = PitchReader::new(PcmFormat::default(), pitch::C5, Waveform::Sine, 0.05);
//! let mut buf = vec![0u8; 4096];
//! let written = reader.read_pcm(&mut buf).unwrap();
//! assert_eq!(written, 4096);
//! ```
//!
//! ## Loop a voice into a monitored writer
//! ```
//! use std::time::Duration;
//! use daw::pcm::{MemoryWriter, PcmFormat};
//! use daw::playback::{loop_with_token, CancelToken};
//! use daw::synth::{PitchReader, Waveform};
//! use daw::theory::pitch;
//! use daw::visualizer::PcmMonitor;
//!
//! let format = PcmFormat::default();
//! let monitor = PcmMonitor::new(MemoryWriter::new(format), 0.5);
//! let scope = monitor.scope();
//! let voice = PitchReader::new(format, pitch::A4, Waveform::Square, 0.1);
//! let token = CancelToken::with_timeout(Duration::from_millis(20));
//! let handle = loop_with_token(token, monitor, voice);
//! handle.join().unwrap();
//! assert_eq!(scope.trace().len(), 640);
//! ```

#![warn(missing_docs)]

pub mod config;
#[cfg(feature = "file-sources")]
pub mod export;
pub mod pcm;
pub mod playback;
pub mod sequence;
#[cfg(feature = "file-sources")]
pub mod sources;
#[cfg(feature = "streaming")]
pub mod streaming;
pub mod synth;
pub mod theory;
pub mod visualizer;

/// Error types for synthesis, playback and file operations
#[derive(thiserror::Error, Debug)]
pub enum DawError {
    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// PCM format the operation cannot handle
    #[error("Unsupported PCM format: {0}")]
    Format(String),

    /// Error while decoding an audio file
    #[error("Decode error: {0}")]
    Decode(String),

    /// Error writing audio file
    #[error("Audio file write error: {0}")]
    AudioFile(String),

    /// Audio device error
    #[error("Audio device error: {0}")]
    AudioDevice(String),

    /// IO error from filesystem or device
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<String> for DawError {
    /// Converts a String into `DawError::Other`.
    ///
    /// Prefer the specific variants (`Config`, `Decode`, `AudioDevice`, ...)
    /// where the failure has a known category.
    fn from(msg: String) -> Self {
        DawError::Other(msg)
    }
}

impl From<&str> for DawError {
    /// Converts a string slice into `DawError::Other`.
    fn from(msg: &str) -> Self {
        DawError::Other(msg.to_string())
    }
}

/// Result type for synthesis and playback operations
pub type Result<T> = std::result::Result<T, DawError>;

// Public API exports
pub use config::{DawConfig, ScopeConfig};
pub use pcm::{PcmFormat, PcmReader, PcmWriter, DEFAULT_FORMAT};
pub use playback::{loop_pcm, loop_with_token, play_to, CancelToken, ErrorPolicy, LoopExit, LoopHandle};
pub use synth::{PitchReader, SharedPitch, SharedVolume, SharedWaveform, Waveform};
pub use theory::{Chord, Key, KeyPattern, Pitch, Step};
pub use visualizer::{PcmMonitor, Scope, ScrollDirection};

#[cfg(feature = "streaming")]
pub use streaming::{AudioDevice, DeviceWriter, SampleQueue};
