//! Render readers to audio files

pub mod wav;

pub use wav::{export_wav, export_wav_with_bits, write_wav};
