//! In-memory readers and writers plus a `std::io::Write` bridge

use super::format::PcmFormat;
use super::{PcmReader, PcmWriter};
use crate::{DawError, Result};
use std::io;

/// Plays back a fixed byte buffer once
#[derive(Debug, Clone)]
pub struct BufferReader {
    format: PcmFormat,
    data: Vec<u8>,
    pos: usize,
}

impl BufferReader {
    /// Wrap `data`, trimming any trailing partial frame
    pub fn new(format: PcmFormat, mut data: Vec<u8>) -> Self {
        data.truncate(format.whole_frames(data.len()));
        Self {
            format,
            data,
            pos: 0,
        }
    }

    /// Bytes not yet read
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Whole buffer
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl PcmReader for BufferReader {
    fn format(&self) -> PcmFormat {
        self.format
    }

    fn read_pcm(&mut self, data: &mut [u8]) -> Result<usize> {
        let n = self.format.whole_frames(data.len().min(self.remaining()));
        data[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }

    fn rewind(&mut self) -> Result<()> {
        self.pos = 0;
        Ok(())
    }
}

/// Collects everything written to it
#[derive(Debug, Clone, Default)]
pub struct MemoryWriter {
    format: PcmFormat,
    data: Vec<u8>,
}

impl MemoryWriter {
    /// Empty writer accepting `format`
    pub fn new(format: PcmFormat) -> Self {
        Self {
            format,
            data: Vec::new(),
        }
    }

    /// Bytes written so far
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Take the collected bytes
    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }
}

impl PcmWriter for MemoryWriter {
    fn format(&self) -> PcmFormat {
        self.format
    }

    fn write_pcm(&mut self, data: &[u8]) -> Result<usize> {
        self.data.extend_from_slice(data);
        Ok(data.len())
    }
}

/// Adapts any [`io::Write`] into a [`PcmWriter`] (raw PCM to a file or pipe)
#[derive(Debug)]
pub struct IoWriter<W> {
    format: PcmFormat,
    inner: W,
}

impl<W: io::Write + Send> IoWriter<W> {
    /// Wrap `inner`, declaring the format of the bytes it will receive
    pub fn new(format: PcmFormat, inner: W) -> Self {
        Self { format, inner }
    }

    /// Unwrap the inner writer
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: io::Write + Send> PcmWriter for IoWriter<W> {
    fn format(&self) -> PcmFormat {
        self.format
    }

    fn write_pcm(&mut self, data: &[u8]) -> Result<usize> {
        self.inner.write_all(data)?;
        Ok(data.len())
    }
}

/// Restarts its inner reader whenever it runs dry
#[derive(Debug)]
pub struct LoopReader<R> {
    inner: R,
}

impl<R: PcmReader> LoopReader<R> {
    /// Loop `inner` forever
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Unwrap the inner reader
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: PcmReader> PcmReader for LoopReader<R> {
    fn format(&self) -> PcmFormat {
        self.inner.format()
    }

    fn read_pcm(&mut self, data: &mut [u8]) -> Result<usize> {
        let n = self.inner.read_pcm(data)?;
        if n > 0 || data.len() < self.format().frame_stride() {
            return Ok(n);
        }
        self.inner.rewind()?;
        let n = self.inner.read_pcm(data)?;
        if n == 0 {
            return Err(DawError::Other("looped reader produced no data after rewind".into()));
        }
        Ok(n)
    }

    fn rewind(&mut self) -> Result<()> {
        self.inner.rewind()
    }
}
