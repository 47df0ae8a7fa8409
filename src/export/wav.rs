//! WAV file export

use crate::pcm::codec::decode_i32;
use crate::pcm::{PcmFormat, PcmReader};
use crate::{DawError, Result};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::io::{Seek, Write};
use std::path::Path;
use tracing::info;

/// Render `frames` frames of `reader` into a WAV file at `path`.
///
/// The file uses the reader's sample rate, channel count and bit depth.
/// Finite readers may end early; the file then holds what they produced.
/// Returns the number of frames written.
///
/// # Examples
///
/// ```no_run
/// use daw::export::export_wav;
/// use daw::pcm::PcmFormat;
/// use daw::synth::{PitchReader, Waveform};
/// use daw::theory::pitch;
///
/// # fn main() -> daw::Result<()> {
/// let mut voice = PitchReader::new(PcmFormat::default(), pitch::A4, Waveform::Triangle, 0.2);
/// export_wav(&mut voice, "a440.wav", 44_100)?;
/// # Ok(())
/// # }
/// ```
pub fn export_wav<R, P>(reader: &mut R, path: P, frames: u64) -> Result<u64>
where
    R: PcmReader + ?Sized,
    P: AsRef<Path>,
{
    let bits = reader.format().bits;
    export_wav_with_bits(reader, path, frames, bits)
}

/// [`export_wav`] with the file's bit depth (16 or 32) chosen explicitly
pub fn export_wav_with_bits<R, P>(reader: &mut R, path: P, frames: u64, bits: u16) -> Result<u64>
where
    R: PcmReader + ?Sized,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let format = reader.format();
    let mut writer = WavWriter::create(path, wav_spec(&format, bits)?)
        .map_err(|e| DawError::AudioFile(format!("Failed to create WAV file: {}", e)))?;
    let written = write_wav(reader, &mut writer, frames, bits)?;
    writer
        .finalize()
        .map_err(|e| DawError::AudioFile(format!("Failed to finalize WAV: {}", e)))?;
    info!(
        path = %path.display(),
        frames = written,
        seconds = written as f64 / format.sample_rate as f64,
        "wav export complete"
    );
    Ok(written)
}

fn wav_spec(format: &PcmFormat, bits: u16) -> Result<WavSpec> {
    format.validate()?;
    if !matches!(bits, 8 | 16 | 32) {
        return Err(DawError::Format(format!("cannot export {}-bit WAV", bits)));
    }
    Ok(WavSpec {
        channels: format.channels,
        sample_rate: format.sample_rate,
        bits_per_sample: bits,
        sample_format: SampleFormat::Int,
    })
}

/// Stream `frames` frames of `reader` into an open hound writer
pub fn write_wav<R, W>(reader: &mut R, writer: &mut WavWriter<W>, frames: u64, bits: u16) -> Result<u64>
where
    R: PcmReader + ?Sized,
    W: Write + Seek,
{
    let format = reader.format();
    let stride = format.frame_stride();
    let width = format.bytes_per_sample();
    let chunk_frames = 4096u64;
    let mut buf = vec![0u8; chunk_frames as usize * stride];
    let mut done = 0u64;

    while done < frames {
        let want = (frames - done).min(chunk_frames) as usize * stride;
        let n = reader.read_pcm(&mut buf[..want])?;
        if n == 0 {
            break;
        }
        for sample in buf[..n].chunks_exact(width) {
            let full = decode_i32(sample, format.bits);
            let result = match bits {
                8 => writer.write_sample((full >> 24) as i8),
                16 => writer.write_sample((full >> 16) as i16),
                _ => writer.write_sample(full),
            };
            result.map_err(|e| DawError::AudioFile(format!("Failed to write sample: {}", e)))?;
        }
        done += (n / stride) as u64;
    }
    Ok(done)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pcm::BufferReader;
    use crate::synth::{PitchReader, Waveform};
    use crate::theory::Pitch;

    #[test]
    fn test_export_roundtrips_through_hound() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        let format = PcmFormat::new(8_000, 2, 32);
        let mut voice = PitchReader::new(format, Pitch::new(440.0), Waveform::Square, 0.5);
        assert_eq!(export_wav_with_bits(&mut voice, &path, 800, 16).unwrap(), 800);

        let reader = hound::WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 2);
        assert_eq!(spec.sample_rate, 8_000);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(reader.duration(), 800);
        let samples: Vec<i16> = reader.into_samples::<i16>().map(|s| s.unwrap()).collect();
        let high = ((0.5 * i32::MAX as f64) as i32 >> 16) as i16;
        assert!(samples.iter().all(|&s| s == high || s == -high - 1 || s == -high));
        assert_eq!(samples[2], samples[3]);
    }

    #[test]
    fn test_finite_reader_stops_early() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.wav");
        let format = PcmFormat::new(8_000, 1, 16);
        let mut src = BufferReader::new(format, vec![0x10, 0x00, 0x20, 0x00]);
        assert_eq!(export_wav(&mut src, &path, 100).unwrap(), 2);
        let samples: Vec<i16> = hound::WavReader::open(&path)
            .unwrap()
            .into_samples::<i16>()
            .map(|s| s.unwrap())
            .collect();
        assert_eq!(samples, vec![0x10, 0x20]);
    }

    #[test]
    fn test_rejects_odd_depth() {
        let dir = tempfile::tempdir().unwrap();
        let mut src = BufferReader::new(PcmFormat::new(8_000, 1, 16), vec![0; 4]);
        assert!(matches!(
            export_wav_with_bits(&mut src, dir.path().join("x.wav"), 2, 12),
            Err(DawError::Format(_))
        ));
    }
}
