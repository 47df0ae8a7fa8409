//! PCM stream traits, format and in-memory adapters

pub mod codec;
pub mod format;
pub mod memory;

pub use codec::{decode_sample, encode_frames, encode_sample, pcm_to_f32};
pub use format::{PcmFormat, DEFAULT_FORMAT};
pub use memory::{BufferReader, IoWriter, LoopReader, MemoryWriter};

use crate::Result;

/// Source of interleaved little-endian PCM frames
pub trait PcmReader: Send {
    /// Format of the bytes this reader produces
    fn format(&self) -> PcmFormat;

    /// Fill `data` with whole frames.
    ///
    /// Returns the number of bytes written, always a multiple of the frame
    /// stride. `Ok(0)` on a non-empty buffer means the source is exhausted.
    fn read_pcm(&mut self, data: &mut [u8]) -> Result<usize>;

    /// Restart from the beginning. Infinite sources ignore this.
    fn rewind(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Sink for interleaved little-endian PCM frames
pub trait PcmWriter: Send {
    /// Format the sink expects
    fn format(&self) -> PcmFormat;

    /// Consume `data`, returning how many bytes were accepted
    fn write_pcm(&mut self, data: &[u8]) -> Result<usize>;
}

impl<R: PcmReader + ?Sized> PcmReader for Box<R> {
    fn format(&self) -> PcmFormat {
        (**self).format()
    }

    fn read_pcm(&mut self, data: &mut [u8]) -> Result<usize> {
        (**self).read_pcm(data)
    }

    fn rewind(&mut self) -> Result<()> {
        (**self).rewind()
    }
}

impl<W: PcmWriter + ?Sized> PcmWriter for Box<W> {
    fn format(&self) -> PcmFormat {
        (**self).format()
    }

    fn write_pcm(&mut self, data: &[u8]) -> Result<usize> {
        (**self).write_pcm(data)
    }
}

/// Pull from `reader` until it is exhausted or `max_bytes` have been read
pub fn read_to_vec<R: PcmReader + ?Sized>(reader: &mut R, max_bytes: usize) -> Result<Vec<u8>> {
    let format = reader.format();
    let chunk = format.frame_stride().max(1) * 1024;
    let mut out = Vec::new();
    let mut buf = vec![0u8; chunk];
    while out.len() < max_bytes {
        let want = format.whole_frames((max_bytes - out.len()).min(chunk));
        if want == 0 {
            break;
        }
        let n = reader.read_pcm(&mut buf[..want])?;
        if n == 0 {
            break;
        }
        out.extend_from_slice(&buf[..n]);
    }
    Ok(out)
}
