//! Semitone intervals

use serde::{Deserialize, Serialize};
use std::ops::{Add, Neg};

/// A signed interval measured in equal-tempered semitones
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Step(pub i32);

impl Step {
    /// Number of semitones in this interval
    pub const fn semitones(self) -> i32 {
        self.0
    }

    /// Frequency ratio of this interval, `2^(semitones/12)`
    pub fn ratio(self) -> f64 {
        2f64.powf(self.0 as f64 / 12.0)
    }
}

impl Add for Step {
    type Output = Step;

    fn add(self, rhs: Step) -> Step {
        Step(self.0 + rhs.0)
    }
}

impl Neg for Step {
    type Output = Step;

    fn neg(self) -> Step {
        Step(-self.0)
    }
}

impl From<i32> for Step {
    fn from(semitones: i32) -> Self {
        Step(semitones)
    }
}

/// Unison
pub const PERFECT1: Step = Step(0);
/// One semitone
pub const HALF_STEP: Step = Step(1);
/// Minor second
pub const MINOR2: Step = Step(1);
/// Two semitones
pub const WHOLE_STEP: Step = Step(2);
/// Major second
pub const MAJOR2: Step = Step(2);
/// Minor third
pub const MINOR3: Step = Step(3);
/// Major third
pub const MAJOR3: Step = Step(4);
/// Perfect fourth
pub const PERFECT4: Step = Step(5);
/// Augmented fourth / diminished fifth
pub const TRITONE: Step = Step(6);
/// Perfect fifth
pub const PERFECT5: Step = Step(7);
/// Minor sixth
pub const MINOR6: Step = Step(8);
/// Major sixth
pub const MAJOR6: Step = Step(9);
/// Minor seventh
pub const MINOR7: Step = Step(10);
/// Major seventh
pub const MAJOR7: Step = Step(11);
/// Octave
pub const OCTAVE: Step = Step(12);
