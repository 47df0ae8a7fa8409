//! Real-time device output
//!
//! A [`DeviceWriter`] converts PCM into a [`SampleQueue`]; an
//! [`AudioDevice`] plays that queue through rodio. Only the writer crosses
//! threads: hand it to a loop and keep the device where it was opened.

pub mod audio_device;
pub mod device_writer;
pub mod sample_queue;

pub use audio_device::AudioDevice;
pub use device_writer::{DeviceStats, DeviceWriter, BUFFER_BACKOFF_MICROS};
pub use sample_queue::SampleQueue;

use crate::pcm::PcmFormat;
use crate::Result;
use std::sync::Arc;

/// Open the default device for `format` with a queue of `queue_samples`
pub fn open_output(format: PcmFormat, queue_samples: usize) -> Result<(AudioDevice, DeviceWriter)> {
    let queue = Arc::new(SampleQueue::new(queue_samples)?);
    let writer = DeviceWriter::new(format, Arc::clone(&queue))?;
    let device = AudioDevice::new(format.sample_rate, format.channels, queue)?;
    Ok((device, writer))
}
