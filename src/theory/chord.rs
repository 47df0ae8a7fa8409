//! Chords as interval lists over an implicit root

use super::pitch::Pitch;
use super::step::*;
use std::borrow::Cow;

/// A chord: intervals measured from the same (implicit) root.
///
/// The intervals are independent offsets, not a cumulative walk:
/// `[MAJOR3, PERFECT5]` is root + 4 and root + 7 semitones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chord(Cow<'static, [Step]>);

impl Chord {
    /// Chord over a static interval table
    pub const fn from_static(steps: &'static [Step]) -> Self {
        Chord(Cow::Borrowed(steps))
    }

    /// Chord over an owned interval list
    pub fn new(steps: Vec<Step>) -> Self {
        Chord(Cow::Owned(steps))
    }

    /// Intervals above the root
    pub fn steps(&self) -> &[Step] {
        &self.0
    }

    /// Number of intervals (the root is not counted)
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the chord has no intervals above its root
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Root first, then each interval applied to the root
    pub fn with_root(&self, root: Pitch) -> Vec<Pitch> {
        let mut out = Vec::with_capacity(self.0.len() + 1);
        out.push(root);
        out.extend(self.0.iter().map(|&step| root.up(step)));
        out
    }

    /// Look up a named chord table (`major`, `minor-seventh`, `dim7`, ...)
    pub fn by_name(name: &str) -> Option<Chord> {
        let normalized = name.to_ascii_lowercase().replace(['_', ' '], "-");
        let chord = match normalized.as_str() {
            "major" | "major-triad" | "maj" => MAJOR_TRIAD,
            "major-sixth" | "maj6" => MAJOR_SIXTH,
            "dominant-seventh" | "dom7" | "7" => DOMINANT_SEVENTH,
            "augmented" | "augmented-triad" | "aug" => AUGMENTED_TRIAD,
            "augmented-seventh" | "aug7" => AUGMENTED_SEVENTH,
            "minor" | "minor-triad" | "min" => MINOR_TRIAD,
            "minor-sixth" | "min6" => MINOR_SIXTH,
            "minor-seventh" | "min7" => MINOR_SEVENTH,
            "minor-major-seventh" | "minmaj7" => MINOR_MAJOR_SEVENTH,
            "diminished" | "diminished-triad" | "dim" => DIMINISHED_TRIAD,
            "diminished-seventh" | "dim7" => DIMINISHED_SEVENTH,
            "half-diminished-seventh" | "m7b5" => HALF_DIMINISHED_SEVENTH,
            _ => return None,
        };
        Some(chord)
    }
}

impl From<Vec<Step>> for Chord {
    fn from(steps: Vec<Step>) -> Self {
        Chord::new(steps)
    }
}

/// Major triad
pub const MAJOR_TRIAD: Chord = Chord::from_static(&[MAJOR3, PERFECT5]);
/// Major sixth
pub const MAJOR_SIXTH: Chord = Chord::from_static(&[MAJOR3, PERFECT5, MAJOR6]);
/// Dominant seventh
pub const DOMINANT_SEVENTH: Chord = Chord::from_static(&[MAJOR3, PERFECT5, MINOR7]);
/// Augmented triad
pub const AUGMENTED_TRIAD: Chord = Chord::from_static(&[MAJOR3, MINOR6, MAJOR7]);
/// Augmented seventh
pub const AUGMENTED_SEVENTH: Chord = Chord::from_static(&[MAJOR3, MINOR6, MINOR7]);

/// Minor triad
pub const MINOR_TRIAD: Chord = Chord::from_static(&[MINOR3, PERFECT5]);
/// Minor sixth
pub const MINOR_SIXTH: Chord = Chord::from_static(&[MINOR3, PERFECT5, MAJOR6]);
/// Minor seventh
pub const MINOR_SEVENTH: Chord = Chord::from_static(&[MINOR3, PERFECT5, MINOR7]);
/// Minor-major seventh
pub const MINOR_MAJOR_SEVENTH: Chord = Chord::from_static(&[MINOR3, PERFECT5, MAJOR7]);
/// Diminished triad
pub const DIMINISHED_TRIAD: Chord = Chord::from_static(&[MINOR3, TRITONE]);
/// Diminished seventh
pub const DIMINISHED_SEVENTH: Chord = Chord::from_static(&[MINOR3, TRITONE, MAJOR6]);
/// Half-diminished seventh
pub const HALF_DIMINISHED_SEVENTH: Chord = Chord::from_static(&[MINOR3, TRITONE, MINOR7]);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theory::pitch::{C5, E5, G5};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_minor_triad_with_root() {
        let pitches = MINOR_TRIAD.with_root(C5);
        assert_eq!(pitches, vec![C5, C5.up(MINOR3), C5.up(PERFECT5)]);
    }

    #[test]
    fn test_with_root_len_and_first() {
        let tables = [
            MAJOR_TRIAD,
            MAJOR_SIXTH,
            DOMINANT_SEVENTH,
            AUGMENTED_TRIAD,
            AUGMENTED_SEVENTH,
            MINOR_TRIAD,
            MINOR_SIXTH,
            MINOR_SEVENTH,
            MINOR_MAJOR_SEVENTH,
            DIMINISHED_TRIAD,
            DIMINISHED_SEVENTH,
            HALF_DIMINISHED_SEVENTH,
        ];
        for chord in tables.iter() {
            let pitches = chord.with_root(C5);
            assert_eq!(pitches.len(), chord.len() + 1);
            assert_eq!(pitches[0], C5);
        }
    }

    #[test]
    fn test_intervals_are_measured_from_root() {
        // Cumulative application would land on G#5 instead of G5
        let pitches = MAJOR_TRIAD.with_root(C5);
        assert_abs_diff_eq!(pitches[1].hz(), E5.hz(), epsilon = 0.01);
        assert_abs_diff_eq!(pitches[2].hz(), G5.hz(), epsilon = 0.01);
    }

    #[test]
    fn test_custom_chord_and_lookup() {
        let chord = Chord::new(vec![PERFECT4, MAJOR6]);
        assert_eq!(chord.with_root(C5).len(), 3);
        assert_eq!(Chord::by_name("Minor Seventh"), Some(MINOR_SEVENTH));
        assert_eq!(Chord::by_name("dim7"), Some(DIMINISHED_SEVENTH));
        assert_eq!(Chord::by_name("cluster"), None);
        assert!(Chord::new(Vec::new()).is_empty());
    }
}
