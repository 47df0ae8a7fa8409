//! Keys and their scales

use super::pitch::{Pitch, C5};
use super::step::{Step, HALF_STEP, WHOLE_STEP};
use std::borrow::Cow;

/// Ordered whole/half steps walked from a key's root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPattern(Cow<'static, [Step]>);

impl KeyPattern {
    /// Pattern over a static step table
    pub const fn from_static(steps: &'static [Step]) -> Self {
        KeyPattern(Cow::Borrowed(steps))
    }

    /// Pattern over an owned step list
    pub fn new(steps: Vec<Step>) -> Self {
        KeyPattern(Cow::Owned(steps))
    }

    /// Steps in walking order
    pub fn steps(&self) -> &[Step] {
        &self.0
    }

    /// Named pattern lookup (`major`, `minor`)
    pub fn by_name(name: &str) -> Option<KeyPattern> {
        match name.to_ascii_lowercase().as_str() {
            "major" | "ionian" => Some(MAJOR_KEY),
            "minor" | "aeolian" | "natural-minor" => Some(MINOR_KEY),
            _ => None,
        }
    }
}

/// Major (Ionian) pattern: W W H W W W H
pub const MAJOR_KEY: KeyPattern = KeyPattern::from_static(&[
    WHOLE_STEP, WHOLE_STEP, HALF_STEP, WHOLE_STEP, WHOLE_STEP, WHOLE_STEP, HALF_STEP,
]);

/// Natural minor (Aeolian) pattern: W H W W H W W
pub const MINOR_KEY: KeyPattern = KeyPattern::from_static(&[
    WHOLE_STEP, HALF_STEP, WHOLE_STEP, WHOLE_STEP, HALF_STEP, WHOLE_STEP, WHOLE_STEP,
]);

// TODO: harmonic and melodic minor (the melodic form differs ascending vs descending)

/// A root pitch and the pattern walked from it
#[derive(Debug, Clone, PartialEq)]
pub struct Key {
    /// First degree of the scale
    pub start: Pitch,
    /// Steps between successive degrees
    pub pattern: KeyPattern,
}

impl Key {
    /// Create a key from a root and a pattern
    pub fn new(start: Pitch, pattern: KeyPattern) -> Self {
        Key { start, pattern }
    }

    /// Walk the pattern from the root.
    ///
    /// Each degree is stepped from the previous one, so rounding accumulates
    /// along the scale rather than being measured from the root.
    pub fn scale(&self) -> Vec<Pitch> {
        let mut out = Vec::with_capacity(self.pattern.steps().len() + 1);
        let mut next = self.start;
        out.push(next);
        for &step in self.pattern.steps() {
            next = next.up(step);
            out.push(next);
        }
        out
    }
}

/// C major starting at C5
pub const C5_MAJOR: Key = Key {
    start: C5,
    pattern: MAJOR_KEY,
};
