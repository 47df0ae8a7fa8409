//! Lock-free byte history of recently written PCM

use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

/// Fixed-length circular record of the last bytes written.
///
/// One writer and any number of readers share it without a lock. Every byte
/// is its own relaxed atomic, so a reader racing a write may see a mix of old
/// and new bytes. That is fine for display and never undefined behaviour.
#[derive(Debug)]
pub struct PcmHistory {
    bytes: Box<[AtomicU8]>,
    at: AtomicUsize,
}

impl PcmHistory {
    /// History of `len` zeroed bytes
    pub fn new(len: usize) -> Self {
        Self {
            bytes: (0..len).map(|_| AtomicU8::new(0)).collect(),
            at: AtomicUsize::new(0),
        }
    }

    /// Capacity in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True for a zero-length history
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Position the next write starts at
    pub fn cursor(&self) -> usize {
        self.at.load(Ordering::Relaxed)
    }

    /// Record `data` at the cursor, wrapping around the end.
    ///
    /// When `data` is longer than the history only its last `len()` bytes are
    /// kept; byte `k` of the input lands at `(cursor + k) % len()`. The cursor
    /// always advances by the full input length.
    pub fn write(&self, data: &[u8]) {
        let len = self.bytes.len();
        if len == 0 || data.is_empty() {
            return;
        }
        let at = self.at.load(Ordering::Relaxed);
        let skip = data.len().saturating_sub(len);
        let start = (at + skip) % len;
        let kept = &data[skip..];
        let first = kept.len().min(len - start);
        for (slot, &b) in self.bytes[start..start + first].iter().zip(kept) {
            slot.store(b, Ordering::Relaxed);
        }
        for (slot, &b) in self.bytes.iter().zip(&kept[first..]) {
            slot.store(b, Ordering::Relaxed);
        }
        self.at
            .store((at + data.len() % len) % len, Ordering::Relaxed);
    }

    /// Byte at `index`, or 0 past the end
    pub fn byte(&self, index: usize) -> u8 {
        self.bytes
            .get(index)
            .map(|b| b.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Copy up to `out.len()` bytes starting at `index`; returns how many fit
    pub fn read_at(&self, index: usize, out: &mut [u8]) -> usize {
        let available = self.bytes.len().saturating_sub(index).min(out.len());
        for (dst, src) in out.iter_mut().zip(&self.bytes[index.min(self.bytes.len())..]) {
            *dst = src.load(Ordering::Relaxed);
        }
        available
    }

    /// Copy of the whole history in storage order
    pub fn snapshot(&self) -> Vec<u8> {
        self.bytes.iter().map(|b| b.load(Ordering::Relaxed)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_cycle_returns_cursor_to_zero() {
        let h = PcmHistory::new(10);
        h.write(&[1, 2, 3]);
        assert_eq!(h.cursor(), 3);
        h.write(&[4, 5, 6, 7, 8, 9, 10]);
        assert_eq!(h.cursor(), 0);
        assert_eq!(h.snapshot(), (1..=10).collect::<Vec<u8>>());
    }

    #[test]
    fn test_write_splits_across_wrap() {
        let h = PcmHistory::new(8);
        h.write(&[0; 6]);
        h.write(&[1, 2, 3, 4]);
        assert_eq!(h.cursor(), 2);
        assert_eq!(h.snapshot(), vec![3, 4, 0, 0, 0, 0, 1, 2]);
    }

    #[test]
    fn test_long_write_keeps_tail() {
        let h = PcmHistory::new(4);
        h.write(&[9]);
        let data: Vec<u8> = (10..20).collect();
        h.write(&data);
        assert_eq!(h.cursor(), (1 + 10) % 4);
        // byte k lands at (1 + k) % 4 for the last four bytes (k = 6..10)
        let snap = h.snapshot();
        for k in 6..10 {
            assert_eq!(snap[(1 + k) % 4], data[k]);
        }
    }

    #[test]
    fn test_read_at_clips_to_end() {
        let h = PcmHistory::new(4);
        h.write(&[1, 2, 3, 4]);
        let mut out = [0u8; 4];
        assert_eq!(h.read_at(2, &mut out), 2);
        assert_eq!(&out[..2], &[3, 4]);
        assert_eq!(h.read_at(9, &mut out), 0);
        assert_eq!(h.byte(9), 0);
    }

    #[test]
    fn test_zero_length_history_ignores_writes() {
        let h = PcmHistory::new(0);
        h.write(&[1, 2, 3]);
        assert_eq!(h.cursor(), 0);
        assert!(h.is_empty());
    }
}
