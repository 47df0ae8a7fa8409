//! Note sequencing: tempo arithmetic, chords as note groups, songs
//!
//! A [`Song`] renders through [`SongReader`], a finite
//! [`PcmReader`](crate::pcm::PcmReader) that mixes each group's voices for
//! the group's duration.

pub mod note;
pub mod song;

pub use note::{chord_notes, rest, Note, Tempo, EIGHTH, HALF, MIN_BPM, QUARTER, SIXTEENTH, WHOLE};
pub use song::{demo_song, Song, SongReader, DEFAULT_GAP};
