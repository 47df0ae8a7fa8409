//! WAV file source (hound)

use crate::pcm::{encode_sample, PcmFormat, PcmReader};
use crate::{DawError, Result};
use hound::{SampleFormat, WavReader};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Encoding {
    I8,
    I16,
    I24,
    I32,
    F32,
}

/// Streams integer or float WAV data as signed little-endian PCM.
///
/// 8- and 16-bit integer files keep their depth; 24-bit, 32-bit and float
/// files are widened to 32-bit integers.
pub struct WavSource<R: Read = BufReader<File>> {
    reader: WavReader<R>,
    encoding: Encoding,
    format: PcmFormat,
    scratch: Vec<u8>,
}

impl WavSource<BufReader<File>> {
    /// Open a WAV file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = WavReader::open(path).map_err(|e| decode_error(path.display(), e))?;
        let source = Self::from_wav_reader(reader)?;
        debug!(path = %path.display(), format = %source.format, frames = source.duration_frames(), "opened wav");
        Ok(source)
    }
}

impl<R: Read + Seek + Send> WavSource<R> {
    /// Wrap any seekable byte stream holding a WAV file
    pub fn new(inner: R) -> Result<Self> {
        let reader = WavReader::new(inner).map_err(|e| decode_error("stream", e))?;
        Self::from_wav_reader(reader)
    }

    fn from_wav_reader(reader: WavReader<R>) -> Result<Self> {
        let spec = reader.spec();
        let encoding = match (spec.sample_format, spec.bits_per_sample) {
            (SampleFormat::Int, 8) => Encoding::I8,
            (SampleFormat::Int, 16) => Encoding::I16,
            (SampleFormat::Int, 24) => Encoding::I24,
            (SampleFormat::Int, 32) => Encoding::I32,
            (SampleFormat::Float, 32) => Encoding::F32,
            (fmt, bits) => {
                return Err(DawError::Decode(format!(
                    "unsupported WAV encoding: {:?} {}-bit",
                    fmt, bits
                )))
            }
        };
        let bits = match encoding {
            Encoding::I8 => 8,
            Encoding::I16 => 16,
            _ => 32,
        };
        let format = PcmFormat::new(spec.sample_rate, spec.channels, bits);
        format.validate()?;
        if reader.len() % u32::from(spec.channels.max(1)) != 0 {
            return Err(DawError::Decode(format!(
                "data chunk holds {} samples, not a whole number of {}-channel frames",
                reader.len(),
                spec.channels
            )));
        }
        Ok(Self {
            reader,
            encoding,
            format,
            scratch: vec![0; format.frame_stride()],
        })
    }

    /// Length of the file in frames
    pub fn duration_frames(&self) -> u32 {
        self.reader.duration()
    }

    fn next_sample(&mut self) -> Option<Result<i32>> {
        let sample = match self.encoding {
            Encoding::I8 => self.reader.samples::<i8>().next().map(|s| s.map(|v| (v as i32) << 24)),
            Encoding::I16 => self.reader.samples::<i16>().next().map(|s| s.map(|v| (v as i32) << 16)),
            Encoding::I24 => self.reader.samples::<i32>().next().map(|s| s.map(|v| v << 8)),
            Encoding::I32 => self.reader.samples::<i32>().next(),
            Encoding::F32 => self
                .reader
                .samples::<f32>()
                .next()
                .map(|s| s.map(|v| (v as f64 * i32::MAX as f64) as i32)),
        };
        sample.map(|s| s.map_err(|e| DawError::Decode(e.to_string())))
    }
}

impl<R: Read + Seek + Send> PcmReader for WavSource<R> {
    fn format(&self) -> PcmFormat {
        self.format
    }

    fn read_pcm(&mut self, data: &mut [u8]) -> Result<usize> {
        let width = self.format.bytes_per_sample();
        let stride = self.format.frame_stride();
        let mut scratch = std::mem::take(&mut self.scratch);
        scratch.resize(stride, 0);
        let mut written = 0;
        'frames: for frame in data.chunks_exact_mut(stride) {
            // decode a whole frame before touching `data`
            for (i, slot) in scratch.chunks_exact_mut(width).enumerate() {
                match self.next_sample() {
                    Some(Ok(sample)) => encode_sample(slot, sample),
                    Some(Err(e)) => {
                        self.scratch = scratch;
                        return Err(e);
                    }
                    None if i == 0 => break 'frames,
                    None => {
                        self.scratch = scratch;
                        return Err(DawError::Decode("data ended mid-frame".into()));
                    }
                }
            }
            frame.copy_from_slice(&scratch);
            written += stride;
        }
        self.scratch = scratch;
        Ok(written)
    }

    fn rewind(&mut self) -> Result<()> {
        self.reader.seek(0)?;
        Ok(())
    }
}

impl<R: Read> std::fmt::Debug for WavSource<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WavSource")
            .field("format", &self.format)
            .field("encoding", &self.encoding)
            .finish()
    }
}

fn decode_error(what: impl std::fmt::Display, e: hound::Error) -> DawError {
    match e {
        hound::Error::IoError(io) => DawError::Io(io),
        other => DawError::Decode(format!("{}: {}", what, other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pcm::read_to_vec;
    use hound::{WavSpec, WavWriter};
    use std::io::Cursor;

    fn wav_bytes(spec: WavSpec, write: impl FnOnce(&mut WavWriter<&mut Cursor<Vec<u8>>>)) -> Cursor<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = WavWriter::new(&mut cursor, spec).unwrap();
            write(&mut writer);
            writer.finalize().unwrap();
        }
        cursor.set_position(0);
        cursor
    }

    #[test]
    fn test_16bit_stereo_passthrough() {
        let spec = WavSpec {
            channels: 2,
            sample_rate: 22_050,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let cursor = wav_bytes(spec, |w| {
            for s in [1i16, -1, 1000, -1000] {
                w.write_sample(s).unwrap();
            }
        });
        let mut source = WavSource::new(cursor).unwrap();
        assert_eq!(source.format(), PcmFormat::new(22_050, 2, 16));
        let bytes = read_to_vec(&mut source, usize::MAX).unwrap();
        assert_eq!(bytes.len(), 8);
        assert_eq!(&bytes[4..8], &[0xE8, 0x03, 0x18, 0xFC]);

        source.rewind().unwrap();
        let again = read_to_vec(&mut source, usize::MAX).unwrap();
        assert_eq!(bytes, again);
    }

    #[test]
    fn test_data_chunk_ending_mid_frame_rejected() {
        // stereo 16-bit: 10 data bytes is two and a half frames
        let mut file = Vec::new();
        file.extend_from_slice(b"RIFF");
        file.extend_from_slice(&46u32.to_le_bytes());
        file.extend_from_slice(b"WAVEfmt ");
        file.extend_from_slice(&16u32.to_le_bytes());
        file.extend_from_slice(&1u16.to_le_bytes());
        file.extend_from_slice(&2u16.to_le_bytes());
        file.extend_from_slice(&22_050u32.to_le_bytes());
        file.extend_from_slice(&88_200u32.to_le_bytes());
        file.extend_from_slice(&4u16.to_le_bytes());
        file.extend_from_slice(&16u16.to_le_bytes());
        file.extend_from_slice(b"data");
        file.extend_from_slice(&10u32.to_le_bytes());
        file.extend_from_slice(&[1, 0, 2, 0, 3, 0, 4, 0, 5, 0]);
        let result = WavSource::new(Cursor::new(file));
        assert!(matches!(result, Err(DawError::Decode(_))));
    }

    #[test]
    fn test_partial_buffer_left_untouched() {
        let spec = WavSpec {
            channels: 2,
            sample_rate: 8_000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let cursor = wav_bytes(spec, |w| {
            for s in [5i16, 6] {
                w.write_sample(s).unwrap();
            }
        });
        let mut source = WavSource::new(cursor).unwrap();
        let mut buf = [0xAAu8; 10];
        assert_eq!(source.read_pcm(&mut buf).unwrap(), 4);
        assert_eq!(&buf[..4], &[5, 0, 6, 0]);
        assert_eq!(&buf[4..], &[0xAA; 6]);
    }

    #[test]
    fn test_float_widened_to_32bit() {
        let spec = WavSpec {
            channels: 1,
            sample_rate: 8_000,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let cursor = wav_bytes(spec, |w| {
            w.write_sample(0.5f32).unwrap();
            w.write_sample(-1.0f32).unwrap();
        });
        let mut source = WavSource::new(cursor).unwrap();
        assert_eq!(source.format().bits, 32);
        let mut buf = [0u8; 8];
        assert_eq!(source.read_pcm(&mut buf).unwrap(), 8);
        let first = i32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);
        let second = i32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);
        assert_eq!(first, (0.5 * i32::MAX as f64) as i32);
        assert_eq!(second, -i32::MAX);
    }

    #[test]
    fn test_garbage_is_decode_error() {
        let result = WavSource::new(Cursor::new(b"definitely not a wav file".to_vec()));
        assert!(matches!(result, Err(DawError::Decode(_))));
    }
}
