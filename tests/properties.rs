//! Behavioural properties of the theory model, voices and scope history

use approx::{assert_abs_diff_eq, assert_relative_eq};
use daw::pcm::{PcmFormat, PcmReader};
use daw::synth::{mod_phase, phase, PitchReader, WaveInput, WaveShape, Waveform};
use daw::theory::chord::MINOR_TRIAD;
use daw::theory::pitch::{self, C5};
use daw::theory::step::{MAJOR3, MINOR3, OCTAVE, PERFECT5, TRITONE};
use daw::theory::{Key, Pitch, MAJOR_KEY};
use daw::visualizer::PcmHistory;
use std::f64::consts::TAU;

fn frame_i32(bytes: &[u8]) -> i32 {
    i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

#[test]
fn test_steps_round_trip_and_scale_by_ratio() {
    for step in [MINOR3, MAJOR3, TRITONE, PERFECT5, OCTAVE] {
        assert_relative_eq!(C5.up(step).down(step).hz(), C5.hz(), max_relative = 1e-12);
        assert_relative_eq!(C5.up(step).hz(), C5.hz() * 2f64.powf(step.0 as f64 / 12.0));
    }
}

#[test]
fn test_mod_phase_stays_in_one_cycle() {
    for index in [0u64, 1, 99, 44_100, 10_000_000] {
        for hz in [0.5, 261.63, 440.0, 12_000.0] {
            let p = Pitch::new(hz);
            let m = mod_phase(p, index, 44_100);
            assert!((0.0..TAU).contains(&m), "mod_phase {} out of range", m);
            let diff = (phase(p, index, 44_100) - m) / TAU;
            assert_abs_diff_eq!(diff, diff.round(), epsilon = 1e-6);
        }
    }
}

#[test]
fn test_builtin_waveforms_bounded_by_volume() {
    let volume = 0.3;
    for waveform in [
        Waveform::Sine,
        Waveform::Sawtooth,
        Waveform::Triangle,
        Waveform::Square,
        Waveform::Noise,
    ] {
        for index in 0..2_000 {
            let input = WaveInput {
                pitch: pitch::A4,
                index,
                sample_rate: 44_100,
                volume,
            };
            let v = waveform.sample(&input);
            assert!(v.abs() <= volume + 1e-12, "{} gave {}", waveform.name(), v);
        }
    }
}

#[test]
fn test_chord_with_root() {
    let pitches = MINOR_TRIAD.with_root(C5);
    assert_eq!(pitches.len(), MINOR_TRIAD.len() + 1);
    assert_eq!(pitches, vec![C5, C5.up(MINOR3), C5.up(PERFECT5)]);
}

#[test]
fn test_major_scale_spans_an_octave() {
    let scale = Key::new(C5, MAJOR_KEY).scale();
    assert_eq!(scale.len(), 8);
    assert_eq!(scale[0], C5);
    assert_relative_eq!(scale[7].hz(), C5.up(OCTAVE).hz(), max_relative = 1e-9);
}

#[test]
fn test_history_cursor_returns_to_start() {
    let history = PcmHistory::new(64);
    history.write(&[1u8; 24]);
    assert_eq!(history.cursor(), 24);
    history.write(&[2u8; 40]);
    assert_eq!(history.cursor(), 0);
}

#[test]
fn test_history_long_write_keeps_tail() {
    let history = PcmHistory::new(8);
    history.write(&[0u8; 6]);
    let data: Vec<u8> = (0..20).collect();
    history.write(&data);
    // the last eight input bytes survive, each at (6 + k) % 8
    for k in 12..20usize {
        assert_eq!(history.byte((6 + k) % 8), k as u8);
    }
    assert_eq!(history.cursor(), (6 + 20) % 8);
}

#[test]
fn test_partial_frame_buffer_fills_whole_frames() {
    let format = PcmFormat::new(44_100, 2, 32);
    let mut reader = PitchReader::new(format, C5, Waveform::Sine, 0.05);
    let mut buf = vec![0xAAu8; 8 * 5 + 3];
    assert_eq!(reader.read_pcm(&mut buf).unwrap(), 40);
    assert_eq!(&buf[40..], &[0xAA; 3]);
}

#[test]
fn test_second_frame_is_index_one() {
    let format = PcmFormat::new(44_100, 2, 32);
    let expected = (TAU * 261.63 / 44_100.0).sin() * 0.05 * i32::MAX as f64;

    // one frame per pull
    let mut reader = PitchReader::new(format, Pitch::new(261.63), Waveform::Sine, 0.05);
    let mut frame = [0u8; 8];
    reader.read_pcm(&mut frame).unwrap();
    assert_eq!(frame_i32(&frame[..4]), 0);
    reader.read_pcm(&mut frame).unwrap();
    assert_abs_diff_eq!(frame_i32(&frame[..4]) as f64, expected, epsilon = 1.0);
    assert_eq!(frame[..4], frame[4..]);

    // two frames in one pull
    let mut reader = PitchReader::new(format, Pitch::new(261.63), Waveform::Sine, 0.05);
    let mut buf = [0u8; 16];
    assert_eq!(reader.read_pcm(&mut buf).unwrap(), 16);
    assert_abs_diff_eq!(frame_i32(&buf[8..12]) as f64, expected, epsilon = 1.0);
    assert_eq!(buf[8..12], buf[12..16]);
}
