//! Music theory model: pitches, intervals, chords and keys

pub mod chord;
pub mod key;
pub mod pitch;
pub mod step;

pub use chord::Chord;
pub use key::{Key, KeyPattern, C5_MAJOR, MAJOR_KEY, MINOR_KEY};
pub use pitch::{NoteName, Pitch};
pub use step::Step;
