//! Live parameter cells shared between a voice and its controllers
//!
//! Each cell is a cheap clonable handle. The audio thread reads the current
//! value once per sample without taking a lock; controllers (console input,
//! TUI keys, sequencers) write from any thread.

use super::waveform::Waveform;
use crate::theory::{Pitch, Step};
use arc_swap::ArcSwap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Pitch cell stored as the bit pattern of an `f64`
#[derive(Debug, Clone)]
pub struct SharedPitch(Arc<AtomicU64>);

impl SharedPitch {
    /// Create a cell holding `pitch`
    pub fn new(pitch: Pitch) -> Self {
        Self(Arc::new(AtomicU64::new(pitch.hz().to_bits())))
    }

    /// Current pitch
    pub fn get(&self) -> Pitch {
        Pitch::new(f64::from_bits(self.0.load(Ordering::Relaxed)))
    }

    /// Replace the pitch
    pub fn set(&self, pitch: Pitch) {
        self.0.store(pitch.hz().to_bits(), Ordering::Relaxed);
    }

    /// Apply `f` to the current pitch atomically and return the new value
    pub fn update<F: Fn(Pitch) -> Pitch>(&self, f: F) -> Pitch {
        let mut current = self.0.load(Ordering::Relaxed);
        loop {
            let next = f(Pitch::new(f64::from_bits(current))).hz().to_bits();
            match self
                .0
                .compare_exchange_weak(current, next, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => return Pitch::new(f64::from_bits(next)),
                Err(actual) => current = actual,
            }
        }
    }

    /// Raise the pitch by `step`
    pub fn up(&self, step: Step) -> Pitch {
        self.update(|p| p.up(step))
    }

    /// Lower the pitch by `step`
    pub fn down(&self, step: Step) -> Pitch {
        self.update(|p| p.down(step))
    }
}

impl Default for SharedPitch {
    fn default() -> Self {
        Self::new(Pitch::REST)
    }
}

impl From<Pitch> for SharedPitch {
    fn from(pitch: Pitch) -> Self {
        Self::new(pitch)
    }
}

/// Volume cell clamped to `[0, 1]`
#[derive(Debug, Clone)]
pub struct SharedVolume(Arc<AtomicU64>);

impl SharedVolume {
    /// Create a cell holding `volume` (clamped)
    pub fn new(volume: f64) -> Self {
        Self(Arc::new(AtomicU64::new(clamp_volume(volume).to_bits())))
    }

    /// Current volume
    pub fn get(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Relaxed))
    }

    /// Replace the volume; values outside `[0, 1]` are clamped
    pub fn set(&self, volume: f64) {
        self.0.store(clamp_volume(volume).to_bits(), Ordering::Relaxed);
    }
}

impl Default for SharedVolume {
    fn default() -> Self {
        Self::new(1.0)
    }
}

fn clamp_volume(volume: f64) -> f64 {
    if volume.is_nan() {
        0.0
    } else {
        volume.clamp(0.0, 1.0)
    }
}

/// Waveform cell; swaps are lock-free and visible on the next sample
#[derive(Clone)]
pub struct SharedWaveform(Arc<ArcSwap<Waveform>>);

impl SharedWaveform {
    /// Create a cell holding `waveform`
    pub fn new(waveform: Waveform) -> Self {
        Self(Arc::new(ArcSwap::from_pointee(waveform)))
    }

    /// Current waveform
    pub fn get(&self) -> Arc<Waveform> {
        self.0.load_full()
    }

    /// Borrow the current waveform without bumping the refcount
    pub(crate) fn load(&self) -> arc_swap::Guard<Arc<Waveform>> {
        self.0.load()
    }

    /// Replace the waveform
    pub fn set(&self, waveform: Waveform) {
        self.0.store(Arc::new(waveform));
    }
}

impl Default for SharedWaveform {
    fn default() -> Self {
        Self::new(Waveform::Sine)
    }
}

impl std::fmt::Debug for SharedWaveform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SharedWaveform").field(&*self.load()).finish()
    }
}
