//! Songs as sequences of simultaneous note groups

use super::note::{chord_notes, rest, Note, Tempo, EIGHTH, QUARTER, SIXTEENTH, WHOLE};
use crate::pcm::{encode_frames, PcmFormat, PcmReader};
use crate::synth::phase::amplitude_i32;
use crate::synth::{Mixer, PitchReader, Waveform};
use crate::theory::chord::{Chord, MAJOR_TRIAD, MINOR_TRIAD};
use crate::theory::pitch::{self, Pitch};
use crate::theory::step::{MAJOR6, MINOR3, MINOR6, PERFECT4};
use crate::Result;
use std::time::Duration;

/// Default silence at the end of each group so repeated chords re-attack
pub const DEFAULT_GAP: Duration = Duration::from_millis(10);

/// Groups of notes played one after another.
///
/// Notes inside a group start together; the group lasts as long as its
/// first note.
#[derive(Debug, Clone)]
pub struct Song {
    /// Tempo used by the beat-based builders
    pub tempo: Tempo,
    /// Note groups in playing order
    pub groups: Vec<Vec<Note>>,
    /// Waveform every voice uses
    pub waveform: Waveform,
    /// Per-voice volume
    pub volume: f64,
    /// Silence cut from the end of each group
    pub gap: Duration,
}

impl Song {
    /// Empty song at `tempo`
    pub fn new(tempo: Tempo) -> Self {
        Self {
            tempo,
            groups: Vec::new(),
            waveform: Waveform::Sine,
            volume: 0.05,
            gap: DEFAULT_GAP,
        }
    }

    /// Set the voice waveform
    pub fn with_waveform(mut self, waveform: Waveform) -> Self {
        self.waveform = waveform;
        self
    }

    /// Set the per-voice volume
    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = volume;
        self
    }

    /// Set the gap cut from the end of each group
    pub fn with_gap(mut self, gap: Duration) -> Self {
        self.gap = gap;
        self
    }

    /// Append a group
    pub fn push(&mut self, group: Vec<Note>) -> &mut Self {
        self.groups.push(group);
        self
    }

    /// Append a single pitch
    pub fn note(&mut self, pitch: Pitch, beats: u32) -> &mut Self {
        let duration = self.tempo.beats_to_duration(beats);
        self.push(vec![Note::new(pitch, duration)])
    }

    /// Append `chord` on `root`
    pub fn chord(&mut self, root: Pitch, chord: &Chord, beats: u32) -> &mut Self {
        let notes = chord_notes(root, chord, beats, self.tempo);
        self.push(notes)
    }

    /// Append a rest
    pub fn rest(&mut self, beats: u32) -> &mut Self {
        let notes = rest(beats, self.tempo);
        self.push(notes)
    }

    /// Total playing time
    pub fn duration(&self) -> Duration {
        self.groups.iter().map(|g| group_duration(g)).sum()
    }

    /// Render with `format`
    pub fn reader(&self, format: PcmFormat) -> SongReader {
        SongReader::new(self.clone(), format)
    }
}

fn group_duration(group: &[Note]) -> Duration {
    group.first().map(|n| n.duration).unwrap_or_default()
}

fn frames_for(duration: Duration, sample_rate: u32) -> u64 {
    (duration.as_secs_f64() * sample_rate as f64).round() as u64
}

/// Finite reader that plays a [`Song`] once.
///
/// Every group starts fresh voices, so each chord begins at phase zero.
#[derive(Debug, Clone)]
pub struct SongReader {
    song: Song,
    format: PcmFormat,
    group: usize,
    mixer: Mixer,
    sounding_left: u64,
    silence_left: u64,
}

impl SongReader {
    /// Reader positioned at the start of `song`
    pub fn new(song: Song, format: PcmFormat) -> Self {
        let mut reader = Self {
            song,
            format,
            group: 0,
            mixer: Mixer::new(format),
            sounding_left: 0,
            silence_left: 0,
        };
        reader.enter_group(0);
        reader
    }

    /// Total frames this reader produces
    pub fn total_frames(&self) -> u64 {
        self.song
            .groups
            .iter()
            .map(|g| frames_for(group_duration(g), self.format.sample_rate))
            .sum()
    }

    /// Index of the group currently playing
    pub fn current_group(&self) -> usize {
        self.group
    }

    fn enter_group(&mut self, index: usize) {
        self.group = index;
        self.mixer = Mixer::new(self.format);
        self.sounding_left = 0;
        self.silence_left = 0;
        let Some(group) = self.song.groups.get(index) else {
            return;
        };
        let rate = self.format.sample_rate;
        let total = frames_for(group_duration(group), rate);
        let gap = frames_for(self.song.gap, rate).min(total);
        self.sounding_left = total - gap;
        self.silence_left = gap;
        for note in group.iter().filter(|n| !n.is_rest()) {
            self.mixer.push(PitchReader::new(
                self.format,
                note.pitch,
                self.song.waveform.clone(),
                self.song.volume,
            ));
        }
    }

    /// Next frame's sample, or `None` once the song is over
    fn next_sample(&mut self) -> Option<i32> {
        while self.sounding_left == 0 && self.silence_left == 0 {
            if self.group >= self.song.groups.len() {
                return None;
            }
            self.enter_group(self.group + 1);
        }
        if self.sounding_left > 0 {
            self.sounding_left -= 1;
            Some(amplitude_i32(self.mixer.next_amplitude()))
        } else {
            self.silence_left -= 1;
            Some(0)
        }
    }

    fn frames_left(&self) -> u64 {
        let rate = self.format.sample_rate;
        let later: u64 = self
            .song
            .groups
            .iter()
            .skip(self.group + 1)
            .map(|g| frames_for(group_duration(g), rate))
            .sum();
        self.sounding_left + self.silence_left + later
    }
}

impl PcmReader for SongReader {
    fn format(&self) -> PcmFormat {
        self.format
    }

    fn read_pcm(&mut self, data: &mut [u8]) -> Result<usize> {
        let format = self.format;
        let stride = format.frame_stride().max(1);
        let frames = ((data.len() / stride) as u64).min(self.frames_left()) as usize;
        Ok(encode_frames(&mut data[..frames * stride], &format, || {
            self.next_sample().unwrap_or(0)
        }))
    }

    fn rewind(&mut self) -> Result<()> {
        self.enter_group(0);
        Ok(())
    }
}

/// The 116 BPM chord progression from the sequencing demo
pub fn demo_song() -> Song {
    let mut song = Song::new(Tempo::new(116.0)).with_waveform(Waveform::Sawtooth);
    let fourth_sixth = Chord::from_static(&[PERFECT4, MAJOR6]);
    let minor_pair = Chord::from_static(&[MINOR3, MINOR6]);
    let dotted_eighth = EIGHTH + SIXTEENTH;

    let opening = |song: &mut Song| {
        song.chord(pitch::G5, &MAJOR_TRIAD, dotted_eighth)
            .chord(pitch::G5, &MAJOR_TRIAD, dotted_eighth)
            .chord(pitch::A5, &MAJOR_TRIAD, EIGHTH)
            .chord(pitch::A5, &MAJOR_TRIAD, QUARTER);
    };
    let answer = |song: &mut Song| {
        song.chord(pitch::A5, &MAJOR_TRIAD, dotted_eighth)
            .chord(pitch::A5, &MAJOR_TRIAD, dotted_eighth);
    };

    opening(&mut song);
    song.rest(EIGHTH).chord(pitch::A5, &MAJOR_TRIAD, EIGHTH);
    answer(&mut song);
    song.chord(pitch::B5, &MINOR_TRIAD, EIGHTH)
        .chord(pitch::B5, &MINOR_TRIAD, QUARTER)
        .chord(pitch::A5, &MAJOR_TRIAD, QUARTER);
    opening(&mut song);
    song.chord(pitch::G5, &MAJOR_TRIAD, EIGHTH)
        .chord(pitch::D5, &MAJOR_TRIAD, EIGHTH + WHOLE);
    opening(&mut song);
    song.rest(EIGHTH).chord(pitch::A5, &MAJOR_TRIAD, EIGHTH);
    answer(&mut song);
    song.chord(pitch::D6, &MAJOR_TRIAD, EIGHTH)
        .chord(pitch::A5, &fourth_sixth, QUARTER)
        .chord(pitch::A5, &MAJOR_TRIAD, QUARTER);
    opening(&mut song);
    song.chord(pitch::CS5, &minor_pair, QUARTER)
        .chord(pitch::DS5, &minor_pair, WHOLE);
    song
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pcm::read_to_vec;
    use crate::pcm::codec::decode_i32;

    fn mono() -> PcmFormat {
        PcmFormat::new(1_000, 1, 32)
    }

    #[test]
    fn test_song_length_in_frames() {
        let mut song = Song::new(Tempo::new(60.0)).with_gap(Duration::ZERO);
        song.note(Pitch::new(100.0), QUARTER).rest(QUARTER);
        let mut reader = song.reader(mono());
        assert_eq!(reader.total_frames(), 2_000);
        let bytes = read_to_vec(&mut reader, usize::MAX).unwrap();
        assert_eq!(bytes.len(), 8_000);
        assert!(bytes[4_000..].iter().all(|&b| b == 0));
        assert!(bytes[..4_000].iter().any(|&b| b != 0));
    }

    #[test]
    fn test_gap_silences_group_tail() {
        let mut song = Song::new(Tempo::new(60.0))
            .with_waveform(Waveform::Square)
            .with_volume(0.5)
            .with_gap(Duration::from_millis(100));
        song.note(Pitch::new(50.0), QUARTER);
        let bytes = read_to_vec(&mut song.reader(mono()), usize::MAX).unwrap();
        assert_eq!(bytes.len(), 4_000);
        assert_ne!(decode_i32(&bytes[3_596..3_600], 32), 0);
        assert!(bytes[3_600..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_rewind_replays() {
        let mut song = Song::new(Tempo::new(240.0));
        song.chord(Pitch::new(220.0), &MAJOR_TRIAD, QUARTER);
        let mut reader = song.reader(mono());
        let first = read_to_vec(&mut reader, usize::MAX).unwrap();
        let mut buf = [0u8; 16];
        assert_eq!(reader.read_pcm(&mut buf).unwrap(), 0);
        reader.rewind().unwrap();
        let second = read_to_vec(&mut reader, usize::MAX).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_demo_song_shape() {
        let song = demo_song();
        assert_eq!(song.groups.len(), 34);
        assert_eq!(song.groups[0].len(), 3);
        assert!(song.groups[4][0].is_rest());
        let secs = song.duration().as_secs_f64();
        assert!(secs > 15.0 && secs < 20.0, "demo lasts {secs}s");
    }
}
