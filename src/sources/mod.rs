//! Audio file sources
//!
//! Decoded files are ordinary [`PcmReader`]s in the file's own format, so
//! they loop, monitor and export like synthesized voices.

pub mod mp3;
pub mod wav;

pub use mp3::Mp3Source;
pub use wav::WavSource;

use crate::pcm::PcmReader;
use crate::{DawError, Result};
use std::path::Path;

/// Open a WAV or MP3 file by extension
pub fn open(path: impl AsRef<Path>) -> Result<Box<dyn PcmReader>> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "wav" | "wave" => Ok(Box::new(WavSource::open(path)?)),
        "mp3" => Ok(Box::new(Mp3Source::open(path)?)),
        other => Err(DawError::Decode(format!(
            "unsupported audio file extension '{}' ({})",
            other,
            path.display()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_extension() {
        assert!(matches!(open("notes.flac"), Err(DawError::Decode(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            open(dir.path().join("absent.wav")),
            Err(DawError::Io(_))
        ));
    }
}
