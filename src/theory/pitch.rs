//! Equal-tempered pitches
//!
//! A [`Pitch`] is a frequency in Hz. Stepping by semitones is multiplicative
//! (`2^(step/12)`), never additive. A frequency of exactly zero is a rest.

use super::step::{Step, HALF_STEP};
use crate::DawError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Reference tuning: A4 in Hz
pub const A4_HZ: f64 = 440.0;

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// A frequency in Hz
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Pitch(pub f64);

impl Pitch {
    /// Silence marker used in note sequences
    pub const REST: Pitch = Pitch(0.0);

    /// Create a pitch from a frequency in Hz
    pub const fn new(hz: f64) -> Self {
        Pitch(hz)
    }

    /// Frequency in Hz
    pub const fn hz(self) -> f64 {
        self.0
    }

    /// True for the zero-frequency rest marker
    pub fn is_rest(self) -> bool {
        self.0 == 0.0
    }

    /// Raise by `step` semitones
    pub fn up(self, step: Step) -> Pitch {
        Pitch(self.0 * step.ratio())
    }

    /// Lower by `step` semitones
    pub fn down(self, step: Step) -> Pitch {
        Pitch(self.0 / step.ratio())
    }

    /// Shift by a fraction of the half step below this pitch.
    ///
    /// `detune(0.2)` raises the pitch by 20% of the distance to the next
    /// lower semitone; negative fractions lower it.
    pub fn detune(self, fraction: f64) -> Pitch {
        let half_down = self.down(HALF_STEP);
        Pitch(self.0 + (self.0 - half_down.0) * fraction)
    }

    /// Pitch of a MIDI note number (69 = A4)
    pub fn from_midi(note: i32) -> Pitch {
        Pitch(A4_HZ * 2f64.powf((note - 69) as f64 / 12.0))
    }

    /// Pitch of a named note in scientific pitch notation (C4 = middle C)
    pub fn from_note(name: NoteName, octave: i32) -> Pitch {
        Pitch::from_midi((octave + 1) * 12 + name as i32)
    }

    /// Nearest MIDI note number, if the pitch lies in the MIDI range
    pub fn nearest_midi(self) -> Option<i32> {
        if !self.0.is_finite() || self.0 <= 0.0 {
            return None;
        }
        let midi = (69.0 + 12.0 * (self.0 / A4_HZ).log2()).round();
        if !(0.0..=127.0).contains(&midi) {
            return None;
        }
        Some(midi as i32)
    }

    /// Label of the nearest note (e.g. "A4")
    pub fn note_label(self) -> Option<String> {
        let midi = self.nearest_midi()?;
        let note_index = midi.rem_euclid(12);
        let octave = (midi / 12) - 1;
        Some(format!("{}{}", NOTE_NAMES[note_index as usize], octave))
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_rest() {
            return f.write_str("rest");
        }
        match self.note_label() {
            Some(label) => write!(f, "{:.2}Hz ({})", self.0, label),
            None => write!(f, "{:.2}Hz", self.0),
        }
    }
}

/// The twelve chromatic note names, valued by semitone offset from C
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum NoteName {
    C = 0,
    CSharp = 1,
    D = 2,
    DSharp = 3,
    E = 4,
    F = 5,
    FSharp = 6,
    G = 7,
    GSharp = 8,
    A = 9,
    ASharp = 10,
    B = 11,
}

impl NoteName {
    const ALL: [NoteName; 12] = [
        NoteName::C,
        NoteName::CSharp,
        NoteName::D,
        NoteName::DSharp,
        NoteName::E,
        NoteName::F,
        NoteName::FSharp,
        NoteName::G,
        NoteName::GSharp,
        NoteName::A,
        NoteName::ASharp,
        NoteName::B,
    ];

    /// Note name for a semitone offset from C (wraps modulo 12)
    pub fn from_semitone(offset: i32) -> NoteName {
        Self::ALL[offset.rem_euclid(12) as usize]
    }
}

impl FromStr for Pitch {
    type Err = DawError;

    /// Parses note names (`C5`, `C#5`, `Cs5`, `Db4`, `rest`) or plain
    /// frequencies (`440`, `261.63hz`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let lower = text.to_ascii_lowercase();
        if lower == "rest" {
            return Ok(Pitch::REST);
        }
        let numeric = lower.strip_suffix("hz").unwrap_or(&lower);
        if let Ok(hz) = numeric.parse::<f64>() {
            if hz.is_finite() && hz >= 0.0 {
                return Ok(Pitch(hz));
            }
            return Err(DawError::Config(format!("Invalid frequency '{}'", s)));
        }

        let mut chars = text.chars();
        let letter = chars
            .next()
            .ok_or_else(|| DawError::Config("Empty pitch name".into()))?;
        let base = match letter.to_ascii_uppercase() {
            'C' => 0,
            'D' => 2,
            'E' => 4,
            'F' => 5,
            'G' => 7,
            'A' => 9,
            'B' => 11,
            _ => return Err(DawError::Config(format!("Unknown pitch name '{}'", s))),
        };
        let rest = chars.as_str();
        let (accidental, octave_text) = match rest.chars().next() {
            Some('#') | Some('s') | Some('S') => (1, &rest[1..]),
            Some('b') => (-1, &rest[1..]),
            _ => (0, rest),
        };
        let octave: i32 = octave_text
            .parse()
            .map_err(|_| DawError::Config(format!("Missing or invalid octave in '{}'", s)))?;
        Ok(Pitch::from_midi((octave + 1) * 12 + base + accidental))
    }
}

// Standard tuning table (A4 = 440 Hz), rounded to 0.01 Hz.
#[allow(missing_docs)]
mod table {
    use super::Pitch;

    // Octave 0
    pub const C0: Pitch = Pitch(16.35);
    pub const CS0: Pitch = Pitch(17.32);
    pub const D0: Pitch = Pitch(18.35);
    pub const DS0: Pitch = Pitch(19.45);
    pub const E0: Pitch = Pitch(20.60);
    pub const F0: Pitch = Pitch(21.83);
    pub const FS0: Pitch = Pitch(23.12);
    pub const G0: Pitch = Pitch(24.50);
    pub const GS0: Pitch = Pitch(25.96);
    pub const A0: Pitch = Pitch(27.50);
    pub const AS0: Pitch = Pitch(29.14);
    pub const B0: Pitch = Pitch(30.87);

    // Octave 1
    pub const C1: Pitch = Pitch(32.70);
    pub const CS1: Pitch = Pitch(34.65);
    pub const D1: Pitch = Pitch(36.71);
    pub const DS1: Pitch = Pitch(38.89);
    pub const E1: Pitch = Pitch(41.20);
    pub const F1: Pitch = Pitch(43.65);
    pub const FS1: Pitch = Pitch(46.25);
    pub const G1: Pitch = Pitch(49.00);
    pub const GS1: Pitch = Pitch(51.91);
    pub const A1: Pitch = Pitch(55.00);
    pub const AS1: Pitch = Pitch(58.27);
    pub const B1: Pitch = Pitch(61.74);

    // Octave 2
    pub const C2: Pitch = Pitch(65.41);
    pub const CS2: Pitch = Pitch(69.30);
    pub const D2: Pitch = Pitch(73.42);
    pub const DS2: Pitch = Pitch(77.78);
    pub const E2: Pitch = Pitch(82.41);
    pub const F2: Pitch = Pitch(87.31);
    pub const FS2: Pitch = Pitch(92.50);
    pub const G2: Pitch = Pitch(98.00);
    pub const GS2: Pitch = Pitch(103.83);
    pub const A2: Pitch = Pitch(110.00);
    pub const AS2: Pitch = Pitch(116.54);
    pub const B2: Pitch = Pitch(123.47);

    // Octave 3
    pub const C3: Pitch = Pitch(130.81);
    pub const CS3: Pitch = Pitch(138.59);
    pub const D3: Pitch = Pitch(146.83);
    pub const DS3: Pitch = Pitch(155.56);
    pub const E3: Pitch = Pitch(164.81);
    pub const F3: Pitch = Pitch(174.61);
    pub const FS3: Pitch = Pitch(185.00);
    pub const G3: Pitch = Pitch(196.00);
    pub const GS3: Pitch = Pitch(207.65);
    pub const A3: Pitch = Pitch(220.00);
    pub const AS3: Pitch = Pitch(233.08);
    pub const B3: Pitch = Pitch(246.94);

    // Octave 4
    pub const C4: Pitch = Pitch(261.63);
    pub const CS4: Pitch = Pitch(277.18);
    pub const D4: Pitch = Pitch(293.66);
    pub const DS4: Pitch = Pitch(311.13);
    pub const E4: Pitch = Pitch(329.63);
    pub const F4: Pitch = Pitch(349.23);
    pub const FS4: Pitch = Pitch(369.99);
    pub const G4: Pitch = Pitch(392.00);
    pub const GS4: Pitch = Pitch(415.30);
    pub const A4: Pitch = Pitch(440.00);
    pub const AS4: Pitch = Pitch(466.16);
    pub const B4: Pitch = Pitch(493.88);

    // Octave 5
    pub const C5: Pitch = Pitch(523.25);
    pub const CS5: Pitch = Pitch(554.37);
    pub const D5: Pitch = Pitch(587.33);
    pub const DS5: Pitch = Pitch(622.25);
    pub const E5: Pitch = Pitch(659.26);
    pub const F5: Pitch = Pitch(698.46);
    pub const FS5: Pitch = Pitch(739.99);
    pub const G5: Pitch = Pitch(783.99);
    pub const GS5: Pitch = Pitch(830.61);
    pub const A5: Pitch = Pitch(880.00);
    pub const AS5: Pitch = Pitch(932.33);
    pub const B5: Pitch = Pitch(987.77);

    // Octave 6
    pub const C6: Pitch = Pitch(1046.50);
    pub const CS6: Pitch = Pitch(1108.73);
    pub const D6: Pitch = Pitch(1174.66);
    pub const DS6: Pitch = Pitch(1244.51);
    pub const E6: Pitch = Pitch(1318.51);
    pub const F6: Pitch = Pitch(1396.91);
    pub const FS6: Pitch = Pitch(1479.98);
    pub const G6: Pitch = Pitch(1567.98);
    pub const GS6: Pitch = Pitch(1661.22);
    pub const A6: Pitch = Pitch(1760.00);
    pub const AS6: Pitch = Pitch(1864.66);
    pub const B6: Pitch = Pitch(1975.53);

    // Octave 7
    pub const C7: Pitch = Pitch(2093.00);
    pub const CS7: Pitch = Pitch(2217.46);
    pub const D7: Pitch = Pitch(2349.32);
    pub const DS7: Pitch = Pitch(2489.02);
    pub const E7: Pitch = Pitch(2637.02);
    pub const F7: Pitch = Pitch(2793.83);
    pub const FS7: Pitch = Pitch(2959.96);
    pub const G7: Pitch = Pitch(3135.96);
    pub const GS7: Pitch = Pitch(3322.44);
    pub const A7: Pitch = Pitch(3520.00);
    pub const AS7: Pitch = Pitch(3729.31);
    pub const B7: Pitch = Pitch(3951.07);

    // Octave 8
    pub const C8: Pitch = Pitch(4186.01);
    pub const CS8: Pitch = Pitch(4434.92);
    pub const D8: Pitch = Pitch(4698.64);
    pub const DS8: Pitch = Pitch(4978.03);
    pub const E8: Pitch = Pitch(5274.04);
    pub const F8: Pitch = Pitch(5587.65);
    pub const FS8: Pitch = Pitch(5919.91);
    pub const G8: Pitch = Pitch(6271.93);
    pub const GS8: Pitch = Pitch(6644.88);
    pub const A8: Pitch = Pitch(7040.00);
    pub const AS8: Pitch = Pitch(7458.62);
    pub const B8: Pitch = Pitch(7902.13);
}

pub use table::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theory::step::{MINOR3, OCTAVE, PERFECT5};
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_up_down_round_trip() {
        for semis in -24..=24 {
            let step = Step(semis);
            let back = C5.up(step).down(step);
            assert_relative_eq!(back.hz(), C5.hz(), max_relative = 1e-12);
        }
    }

    #[test]
    fn test_up_is_multiplicative() {
        assert_relative_eq!(A4.up(OCTAVE).hz(), 880.0);
        assert_relative_eq!(A4.up(PERFECT5).hz(), 440.0 * 2f64.powf(7.0 / 12.0));
        assert_relative_eq!(A4.down(MINOR3).hz(), 440.0 / 2f64.powf(3.0 / 12.0));
    }

    #[test]
    fn test_table_matches_from_note() {
        assert_abs_diff_eq!(C4.hz(), Pitch::from_note(NoteName::C, 4).hz(), epsilon = 0.006);
        assert_abs_diff_eq!(FS3.hz(), Pitch::from_note(NoteName::FSharp, 3).hz(), epsilon = 0.006);
        assert_abs_diff_eq!(B7.hz(), Pitch::from_note(NoteName::B, 7).hz(), epsilon = 0.006);
        assert_abs_diff_eq!(C0.hz(), Pitch::from_note(NoteName::C, 0).hz(), epsilon = 0.006);
        assert_abs_diff_eq!(AS1.hz(), Pitch::from_note(NoteName::ASharp, 1).hz(), epsilon = 0.006);
        assert_abs_diff_eq!(B8.hz(), Pitch::from_note(NoteName::B, 8).hz(), epsilon = 0.006);
    }

    #[test]
    fn test_parse_note_names() {
        assert_abs_diff_eq!("C5".parse::<Pitch>().unwrap().hz(), C5.hz(), epsilon = 0.006);
        assert_abs_diff_eq!("c#5".parse::<Pitch>().unwrap().hz(), CS5.hz(), epsilon = 0.006);
        assert_abs_diff_eq!("Cs5".parse::<Pitch>().unwrap().hz(), CS5.hz(), epsilon = 0.006);
        assert_abs_diff_eq!("Db5".parse::<Pitch>().unwrap().hz(), CS5.hz(), epsilon = 0.006);
        assert_relative_eq!("261.63hz".parse::<Pitch>().unwrap().hz(), 261.63);
        assert!("rest".parse::<Pitch>().unwrap().is_rest());
        assert!("H2".parse::<Pitch>().is_err());
        assert!("C".parse::<Pitch>().is_err());
        assert!("-5".parse::<Pitch>().is_err());
    }

    #[test]
    fn test_note_label() {
        assert_eq!(A4.note_label().as_deref(), Some("A4"));
        assert_eq!(C4.note_label().as_deref(), Some("C4"));
        assert_eq!(Pitch::REST.note_label(), None);
        assert_eq!(format!("{}", Pitch::REST), "rest");
    }

    #[test]
    fn test_detune() {
        let half_down = C5.down(HALF_STEP);
        let detuned = C5.detune(0.2);
        assert_relative_eq!(detuned.hz(), C5.hz() + (C5.hz() - half_down.hz()) * 0.2);
        assert!(detuned > C5);
        assert!(C5.detune(-0.2) < C5);
        assert_eq!(C5.detune(0.0), C5);
    }
}
