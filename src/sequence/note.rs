//! Notes and tempo

use crate::theory::{Chord, Pitch};
use crate::{DawError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Sixteenth note, the smallest beat unit
pub const SIXTEENTH: u32 = 1;
/// Eighth note in sixteenths
pub const EIGHTH: u32 = 2;
/// Quarter note in sixteenths
pub const QUARTER: u32 = 4;
/// Half note in sixteenths
pub const HALF: u32 = 8;
/// Slowest tempo used for timing; lower, zero or non-finite values clamp here
pub const MIN_BPM: f64 = 1.0;

/// Whole note in sixteenths
pub const WHOLE: u32 = 16;

/// Beats per minute, counted in quarter notes (4/4 time)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tempo {
    /// Quarter notes per minute
    pub bpm: f64,
}

impl Tempo {
    /// Tempo of `bpm` quarter notes per minute
    pub const fn new(bpm: f64) -> Self {
        Self { bpm }
    }

    /// Tempo of `bpm`, rejecting zero, negative and non-finite values
    pub fn try_new(bpm: f64) -> Result<Self> {
        if bpm.is_finite() && bpm > 0.0 {
            Ok(Self { bpm })
        } else {
            Err(DawError::Config(format!("tempo must be a positive BPM, got {}", bpm)))
        }
    }

    /// BPM used for timing, at least [`MIN_BPM`]
    pub fn effective_bpm(&self) -> f64 {
        if self.bpm.is_finite() {
            self.bpm.max(MIN_BPM)
        } else {
            MIN_BPM
        }
    }

    /// Length of one sixteenth note
    pub fn sixteenth(&self) -> Duration {
        Duration::from_secs_f64(60.0 / QUARTER as f64 / self.effective_bpm())
    }

    /// Length of `beats` sixteenth notes
    pub fn beats_to_duration(&self, beats: u32) -> Duration {
        self.sixteenth() * beats
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Self::new(120.0)
    }
}

/// A pitch held for a duration; a zero pitch is a rest
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    /// What to play
    pub pitch: Pitch,
    /// How long to play it
    pub duration: Duration,
}

impl Note {
    /// Note of `pitch` lasting `duration`
    pub const fn new(pitch: Pitch, duration: Duration) -> Self {
        Self { pitch, duration }
    }

    /// True for a rest
    pub fn is_rest(&self) -> bool {
        self.pitch.is_rest()
    }
}

/// Every pitch of `chord` on `root`, all lasting `beats` sixteenths
pub fn chord_notes(root: Pitch, chord: &Chord, beats: u32, tempo: Tempo) -> Vec<Note> {
    let duration = tempo.beats_to_duration(beats);
    chord
        .with_root(root)
        .into_iter()
        .map(|pitch| Note::new(pitch, duration))
        .collect()
}

/// Silence lasting `beats` sixteenths
pub fn rest(beats: u32, tempo: Tempo) -> Vec<Note> {
    vec![Note::new(Pitch::REST, tempo.beats_to_duration(beats))]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theory::chord::MAJOR_TRIAD;
    use crate::theory::pitch;

    #[test]
    fn test_sixteenth_at_116_bpm() {
        let tempo = Tempo::new(116.0);
        let expected = 60.0 / 4.0 / 116.0;
        assert!((tempo.sixteenth().as_secs_f64() - expected).abs() < 1e-9);
        let dotted_eighth = tempo.beats_to_duration(EIGHTH + SIXTEENTH);
        assert!((dotted_eighth.as_secs_f64() - 3.0 * expected).abs() < 1e-8);
    }

    #[test]
    fn test_degenerate_tempo_clamps_instead_of_panicking() {
        let slowest = Tempo::new(MIN_BPM).beats_to_duration(4);
        for bpm in [0.0, -10.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY, 1e-300] {
            assert_eq!(Tempo::new(bpm).beats_to_duration(4), slowest, "bpm {}", bpm);
        }
        assert!(Tempo::try_new(0.0).is_err());
        assert!(Tempo::try_new(-10.0).is_err());
        assert!(Tempo::try_new(f64::NAN).is_err());
        assert_eq!(Tempo::try_new(116.0).unwrap(), Tempo::new(116.0));
    }

    #[test]
    fn test_chord_notes_share_duration() {
        let tempo = Tempo::new(120.0);
        let notes = chord_notes(pitch::G5, &MAJOR_TRIAD, QUARTER, tempo);
        assert_eq!(notes.len(), 3);
        assert_eq!(notes[0].pitch, pitch::G5);
        assert!(notes.iter().all(|n| n.duration == Duration::from_millis(500)));
    }

    #[test]
    fn test_rest_is_silent() {
        let r = rest(WHOLE, Tempo::new(60.0));
        assert_eq!(r.len(), 1);
        assert!(r[0].is_rest());
        assert_eq!(r[0].duration, Duration::from_secs(4));
    }
}
