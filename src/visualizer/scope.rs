//! Windowed trace of a PCM history

use super::draw::DrawTarget;
use super::history::PcmHistory;
use crate::config::ScopeConfig;
use crate::pcm::decode_sample;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Mouse wheel direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    /// Wheel up; zoom in
    Up,
    /// Wheel down; zoom out
    Down,
}

/// Smallest zoom; shows the whole history
pub const MIN_ZOOM: f64 = 1.0;

/// One plotted point, in scope coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TracePoint {
    /// Column
    pub x: f64,
    /// Row; 0 is full positive scale, `height` full negative
    pub y: f64,
}

/// Read-only view over a monitor's history.
///
/// Clones share the history and the zoom level, so a render thread and an
/// input thread can each hold one.
#[derive(Debug, Clone)]
pub struct Scope {
    history: Arc<PcmHistory>,
    bits: u16,
    zoom: Arc<AtomicU64>,
    config: ScopeConfig,
}

impl Scope {
    pub(crate) fn new(history: Arc<PcmHistory>, bits: u16, config: ScopeConfig) -> Self {
        Self {
            history,
            bits,
            zoom: Arc::new(AtomicU64::new(MIN_ZOOM.to_bits())),
            config,
        }
    }

    /// Current zoom factor
    pub fn zoom(&self) -> f64 {
        f64::from_bits(self.zoom.load(Ordering::Relaxed))
    }

    /// Set the zoom factor, clamped to [`MIN_ZOOM`]
    pub fn set_zoom(&self, zoom: f64) {
        let zoom = if zoom.is_nan() { MIN_ZOOM } else { zoom.max(MIN_ZOOM) };
        self.zoom.store(zoom.to_bits(), Ordering::Relaxed);
    }

    /// Show a narrower time slice
    pub fn zoom_in(&self) {
        self.set_zoom(self.zoom() + self.config.zoom_step);
    }

    /// Show a wider time slice, never past the whole history
    pub fn zoom_out(&self) {
        self.set_zoom(self.zoom() - self.config.zoom_step);
    }

    /// Apply one scroll tick
    pub fn on_scroll(&self, direction: ScrollDirection) {
        match direction {
            ScrollDirection::Up => self.zoom_in(),
            ScrollDirection::Down => self.zoom_out(),
        }
    }

    /// Geometry this scope renders with
    pub fn config(&self) -> &ScopeConfig {
        &self.config
    }

    /// Shared history
    pub fn history(&self) -> &PcmHistory {
        &self.history
    }

    /// Byte distance between sampled columns at the current zoom
    pub fn x_jump(&self) -> usize {
        let width = self.config.width.max(1);
        ((self.history.len() / width) as f64 / self.zoom()) as usize
    }

    /// Decoded 16-bit sample for `column`
    pub fn column_sample(&self, column: usize) -> i16 {
        let mut index = column * self.x_jump();
        let mut raw = [0u8; 4];
        match self.bits {
            16 => index -= index % 2,
            32 => index -= index % 4,
            _ => {}
        }
        let n = self.history.read_at(index, &mut raw);
        decode_sample(&raw[..n], self.bits)
    }

    /// Map a sample to a row: `-32768 → height`, `0 → height / 2`, `32767 → ≈0`
    pub fn sample_to_y(&self, value: i16) -> f64 {
        let half = self.config.height / 2.0;
        if value < 0 {
            half + value as f64 * (half / -32768.0)
        } else {
            half - value as f64 * (half / 32768.0)
        }
    }

    /// One point per column across the configured width
    pub fn trace(&self) -> Vec<TracePoint> {
        (0..self.config.width)
            .map(|column| TracePoint {
                x: column as f64,
                y: self.sample_to_y(self.column_sample(column)),
            })
            .collect()
    }

    /// Plot the current trace onto `target`, offset by `(x_offset, y_offset)`
    pub fn render<T: DrawTarget + ?Sized>(&self, target: &mut T, x_offset: f64, y_offset: f64) {
        for point in self.trace() {
            target.set_pixel((point.x + x_offset) as i32, (point.y + y_offset) as i32);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visualizer::PixelGrid;
    use approx::assert_abs_diff_eq;

    fn scope(len: usize, bits: u16) -> Scope {
        Scope::new(Arc::new(PcmHistory::new(len)), bits, ScopeConfig::default())
    }

    #[test]
    fn test_y_mapping_corners() {
        let s = scope(1280, 16);
        assert_abs_diff_eq!(s.sample_to_y(i16::MIN), 200.0);
        assert_abs_diff_eq!(s.sample_to_y(0), 100.0);
        assert!(s.sample_to_y(i16::MAX) < 0.01);
    }

    #[test]
    fn test_zoom_steps_and_floor() {
        let s = scope(1280, 16);
        let other = s.clone();
        s.on_scroll(ScrollDirection::Up);
        assert_eq!(other.zoom(), 1.5);
        s.on_scroll(ScrollDirection::Down);
        s.on_scroll(ScrollDirection::Down);
        assert_eq!(s.zoom(), 1.0);
    }

    #[test]
    fn test_zoom_narrows_jump() {
        let s = scope(6400, 32);
        assert_eq!(s.x_jump(), 10);
        s.set_zoom(2.0);
        assert_eq!(s.x_jump(), 5);
        s.set_zoom(3.0);
        assert_eq!(s.x_jump(), 3);
    }

    #[test]
    fn test_32bit_columns_align_to_samples() {
        let s = scope(640 * 6, 32);
        // column 1 starts at byte 6, aligned down to 4
        let sample = (-1_i32 << 16).to_le_bytes();
        s.history().write(&[0, 0, 0, 0]);
        s.history().write(&sample);
        assert_eq!(s.column_sample(1), -1);
    }

    #[test]
    fn test_render_plots_every_column() {
        let s = scope(1280, 16);
        let mut grid = PixelGrid::new(700, 220);
        s.render(&mut grid, 10.0, 5.0);
        assert_eq!(grid.count(), 640);
        assert!(grid.is_set(10, 105));
        assert!(grid.is_set(649, 105));
    }
}
