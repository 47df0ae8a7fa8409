//! PCM writer feeding an audio device queue

use super::SampleQueue;
use crate::pcm::{pcm_to_f32, PcmFormat, PcmWriter};
use crate::{DawError, Result};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// Pause between attempts when the queue is full
pub const BUFFER_BACKOFF_MICROS: u64 = 100;

/// Consecutive full-queue retries before a write gives up (about 100 ms)
const MAX_RETRIES: u32 = 1000;

/// Counters for one device writer
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DeviceStats {
    /// Samples queued for playback
    pub samples_written: u64,
    /// Writes that gave up on a full queue
    pub overruns: u64,
    /// Queue fill after the last write
    pub fill_percentage: f32,
}

/// Converts PCM bytes to `f32` and queues them for an [`AudioDevice`](super::AudioDevice).
///
/// Writes block with backpressure while the queue is full, which paces a
/// loop to the device's playback rate.
#[derive(Debug, Clone)]
pub struct DeviceWriter {
    format: PcmFormat,
    queue: Arc<SampleQueue>,
    stats: Arc<Mutex<DeviceStats>>,
}

impl DeviceWriter {
    /// Writer for `format` feeding `queue`
    pub fn new(format: PcmFormat, queue: Arc<SampleQueue>) -> Result<Self> {
        format.validate()?;
        Ok(Self {
            format,
            queue,
            stats: Arc::new(Mutex::new(DeviceStats::default())),
        })
    }

    /// Shared queue
    pub fn queue(&self) -> Arc<SampleQueue> {
        Arc::clone(&self.queue)
    }

    /// Snapshot of the counters
    pub fn stats(&self) -> DeviceStats {
        *self.stats.lock()
    }

    /// Queue `samples`, backing off while full. Returns how many were queued.
    pub fn write_blocking(&self, samples: &[f32]) -> usize {
        let mut total = 0;
        let mut remaining = samples;
        let mut retries = 0;
        while !remaining.is_empty() && retries < MAX_RETRIES {
            let written = self.queue.write(remaining);
            total += written;
            if written == 0 {
                std::thread::sleep(Duration::from_micros(BUFFER_BACKOFF_MICROS));
                retries += 1;
            } else {
                remaining = &remaining[written..];
                retries = 0;
            }
        }
        let mut stats = self.stats.lock();
        stats.samples_written += total as u64;
        stats.fill_percentage = self.queue.fill_percentage();
        if !remaining.is_empty() {
            stats.overruns += 1;
        }
        total
    }
}

impl PcmWriter for DeviceWriter {
    fn format(&self) -> PcmFormat {
        self.format
    }

    fn write_pcm(&mut self, data: &[u8]) -> Result<usize> {
        let samples = pcm_to_f32(data, &self.format);
        let queued = self.write_blocking(&samples);
        if queued == 0 && !samples.is_empty() {
            return Err(DawError::AudioDevice(
                "device queue stayed full; is the device playing?".into(),
            ));
        }
        Ok(queued * self.format.bytes_per_sample())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_become_samples() {
        let queue = Arc::new(SampleQueue::new(64).unwrap());
        let mut writer = DeviceWriter::new(PcmFormat::new(8_000, 1, 16), Arc::clone(&queue)).unwrap();
        assert_eq!(writer.write_pcm(&[0x00, 0x40, 0x00, 0xC0]).unwrap(), 4);
        let mut out = [0.0f32; 2];
        assert_eq!(queue.read(&mut out), 2);
        assert_eq!(out, [0.5, -0.5]);
        assert_eq!(writer.stats().samples_written, 2);
    }

    #[test]
    fn test_full_queue_reports_overrun() {
        let queue = Arc::new(SampleQueue::new(4).unwrap());
        let writer = DeviceWriter::new(PcmFormat::new(8_000, 1, 16), queue).unwrap();
        assert_eq!(writer.write_blocking(&[0.1; 3]), 3);
        assert_eq!(writer.write_blocking(&[0.1; 2]), 0);
        assert_eq!(writer.stats().overruns, 1);
    }
}
