//! Bounded sample queue between a PCM writer and the audio callback
//!
//! One producer (the loop thread writing PCM) and one consumer (the device
//! callback). Storage sits behind a `parking_lot::Mutex`; positions are
//! atomics so fill levels can be read without the lock.

use crate::{DawError, Result};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Largest queue we allocate: 64 MB of `f32`
const MAX_CAPACITY: usize = 64 * 1024 * 1024 / std::mem::size_of::<f32>();

/// Fixed-capacity FIFO of interleaved `f32` samples
#[derive(Debug)]
pub struct SampleQueue {
    buffer: Mutex<Vec<f32>>,
    write_pos: AtomicUsize,
    read_pos: AtomicUsize,
    capacity: usize,
    mask: usize,
}

impl SampleQueue {
    /// Queue holding at least `requested` samples (rounded up to a power of two)
    pub fn new(requested: usize) -> Result<Self> {
        if requested == 0 {
            return Err(DawError::Config(
                "sample queue capacity must be greater than 0".into(),
            ));
        }
        let capacity = requested.next_power_of_two();
        if capacity > MAX_CAPACITY {
            return Err(DawError::Config(format!(
                "sample queue capacity {capacity} exceeds maximum {MAX_CAPACITY}"
            )));
        }
        Ok(Self {
            buffer: Mutex::new(vec![0.0; capacity]),
            write_pos: AtomicUsize::new(0),
            read_pos: AtomicUsize::new(0),
            capacity,
            mask: capacity - 1,
        })
    }

    /// Storage size in samples; one slot always stays free
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Samples waiting to be played
    pub fn available_read(&self) -> usize {
        let write = self.write_pos.load(Ordering::Acquire);
        let read = self.read_pos.load(Ordering::Acquire);
        write.wrapping_sub(read)
    }

    /// Free slots
    pub fn available_write(&self) -> usize {
        self.capacity - 1 - self.available_read()
    }

    /// True when nothing is queued
    pub fn is_empty(&self) -> bool {
        self.available_read() == 0
    }

    /// Queued fraction, 0.0 to 1.0
    pub fn fill_percentage(&self) -> f32 {
        self.available_read() as f32 / self.capacity as f32
    }

    /// Append as many samples as fit; returns how many were queued
    pub fn write(&self, samples: &[f32]) -> usize {
        let mut buf = self.buffer.lock();
        let write_pos = self.write_pos.load(Ordering::Acquire);
        let to_write = samples.len().min(self.available_write());
        if to_write == 0 {
            return 0;
        }
        let idx = write_pos & self.mask;
        let first = to_write.min(self.capacity - idx);
        buf[idx..idx + first].copy_from_slice(&samples[..first]);
        buf[..to_write - first].copy_from_slice(&samples[first..to_write]);
        drop(buf);
        self.write_pos
            .store(write_pos.wrapping_add(to_write), Ordering::Release);
        to_write
    }

    /// Take up to `dest.len()` samples; returns how many were read
    pub fn read(&self, dest: &mut [f32]) -> usize {
        let buf = self.buffer.lock();
        let read_pos = self.read_pos.load(Ordering::Acquire);
        let to_read = dest.len().min(self.available_read());
        if to_read == 0 {
            return 0;
        }
        let idx = read_pos & self.mask;
        let first = to_read.min(self.capacity - idx);
        dest[..first].copy_from_slice(&buf[idx..idx + first]);
        dest[first..to_read].copy_from_slice(&buf[..to_read - first]);
        drop(buf);
        self.read_pos
            .store(read_pos.wrapping_add(to_read), Ordering::Release);
        to_read
    }

    /// Drop everything queued
    pub fn clear(&self) {
        let _guard = self.buffer.lock();
        let write = self.write_pos.load(Ordering::Acquire);
        self.read_pos.store(write, Ordering::Release);
    }
}
