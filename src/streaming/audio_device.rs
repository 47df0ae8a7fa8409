//! Audio device output using rodio
//!
//! The device pulls from a shared [`SampleQueue`] and plays silence when the
//! queue runs dry, so a slow producer causes gaps rather than a stopped
//! stream.

use super::SampleQueue;
use crate::{DawError, Result};
use rodio::{OutputStream, Sink, Source};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Samples pulled from the queue per lock
const BATCH: usize = 1024;

/// rodio source reading the queue
struct QueueSource {
    queue: Arc<SampleQueue>,
    sample_rate: u32,
    channels: u16,
    finished: Arc<AtomicBool>,
    batch: Vec<f32>,
    batch_len: usize,
    batch_pos: usize,
}

impl QueueSource {
    fn new(queue: Arc<SampleQueue>, sample_rate: u32, channels: u16, finished: Arc<AtomicBool>) -> Self {
        Self {
            queue,
            sample_rate,
            channels,
            finished,
            batch: vec![0.0; BATCH],
            batch_len: 0,
            batch_pos: 0,
        }
    }
}

impl Source for QueueSource {
    fn current_frame_len(&self) -> Option<usize> {
        Some(BATCH)
    }

    fn channels(&self) -> u16 {
        self.channels
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        None
    }
}

impl Iterator for QueueSource {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.finished.load(Ordering::Relaxed) {
            return None;
        }
        if self.batch_pos >= self.batch_len {
            // keep whole frames in each batch so channels never swap
            let want = BATCH - BATCH % self.channels.max(1) as usize;
            let read = self.queue.read(&mut self.batch[..want]);
            self.batch_pos = 0;
            self.batch_len = read;
            if read == 0 {
                // underrun; one frame of silence keeps the stream alive
                return Some(0.0);
            }
        }
        let sample = self.batch[self.batch_pos];
        self.batch_pos += 1;
        Some(sample)
    }
}

/// System audio output playing a [`SampleQueue`].
///
/// Holds the platform stream, which must stay on the thread that opened it.
/// Feed the queue from elsewhere through a
/// [`DeviceWriter`](super::DeviceWriter).
pub struct AudioDevice {
    _stream: OutputStream,
    sink: Sink,
    running: Arc<AtomicBool>,
    finished: Arc<AtomicBool>,
}

impl AudioDevice {
    /// Open the default output device and start playing `queue`
    pub fn new(sample_rate: u32, channels: u16, queue: Arc<SampleQueue>) -> Result<Self> {
        let (stream, handle) = OutputStream::try_default()
            .map_err(|e| DawError::AudioDevice(format!("Failed to create audio stream: {}", e)))?;
        let sink = Sink::try_new(&handle)
            .map_err(|e| DawError::AudioDevice(format!("Failed to create audio sink: {}", e)))?;
        let finished = Arc::new(AtomicBool::new(false));
        sink.append(QueueSource::new(queue, sample_rate, channels, Arc::clone(&finished)));
        info!(sample_rate, channels, "audio device opened");
        Ok(Self {
            _stream: stream,
            sink,
            running: Arc::new(AtomicBool::new(true)),
            finished,
        })
    }

    /// Pause playback
    pub fn pause(&self) {
        self.sink.pause();
    }

    /// Resume playback
    pub fn play(&self) {
        self.sink.play();
    }

    /// True until dropped
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Stop the stream after the current batch instead of playing silence forever
    pub fn finish(&self) {
        self.finished.store(true, Ordering::Relaxed);
    }

    /// Block until the stream has ended (after [`finish`](Self::finish))
    pub fn wait_for_finish(&self) {
        self.sink.sleep_until_end();
    }
}

impl Drop for AudioDevice {
    fn drop(&mut self) {
        self.pause();
        self.running.store(false, Ordering::Relaxed);
        debug!("audio device closed");
    }
}
