//! Subcommand implementations

use super::args::{CliArgs, Command};
use anyhow::{bail, Context, Result};
use daw::pcm::{read_to_vec, MemoryWriter, PcmReader, PcmWriter};
use daw::sequence::{demo_song, Song, Tempo, QUARTER};
use daw::synth::{Mixer, PitchReader, VoiceControls};
use daw::theory::{pitch, Chord, Key, KeyPattern, Pitch};
use daw::visualizer::{PcmMonitor, PixelGrid};
use daw::{DawConfig, Waveform};
use tracing::info;

/// Tempo for `scale` walks
const SCALE_BPM: f64 = 120.0;

/// Text cell size when printing a trace
const ASCII_CELL: (usize, usize) = (8, 10);

/// A source ready to be played, plus live handles when it is a single voice
#[cfg_attr(not(feature = "streaming"), allow(dead_code))]
pub struct Program {
    pub source: Box<dyn PcmReader>,
    pub controls: Option<VoiceControls>,
    pub label: String,
}

/// Defaults, then the `--config` file, then flag overrides
pub fn load_config(args: &CliArgs) -> Result<DawConfig> {
    let mut config = match &args.config {
        Some(path) => DawConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => DawConfig::default(),
    };
    if let Some(volume) = args.volume {
        config.volume = volume;
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn waveform(args: &CliArgs, fallback: Waveform) -> Result<Waveform> {
    match &args.wave {
        Some(name) => name.parse::<Waveform>().with_context(|| format!("unknown waveform '{}'", name)),
        None => Ok(fallback),
    }
}

fn parse_pitch(text: &str) -> Result<Pitch> {
    text.parse::<Pitch>().with_context(|| format!("invalid pitch '{}'", text))
}

fn voice(args: &CliArgs, config: &DawConfig, fallback: Waveform) -> Result<PitchReader> {
    let pitch = match &args.pitch {
        Some(text) => parse_pitch(text)?,
        None => pitch::C5,
    };
    Ok(PitchReader::new(
        config.format,
        pitch,
        waveform(args, fallback)?,
        config.volume,
    ))
}

/// Build the source for a playback command
#[cfg_attr(not(feature = "streaming"), allow(dead_code))]
pub fn build_program(args: &CliArgs, config: &DawConfig) -> Result<Program> {
    let format = config.format;
    let program = match &args.command {
        Command::Tone | Command::Noise => {
            let fallback = if args.command == Command::Noise {
                Waveform::Noise
            } else {
                Waveform::Sine
            };
            let reader = voice(args, config, fallback)?;
            let label = format!("{} {}", reader.waveform().get().name(), reader.pitch().get());
            Program {
                controls: Some(VoiceControls::from(&reader)),
                source: Box::new(reader),
                label,
            }
        }
        Command::Chord { root, name } => {
            let root = parse_pitch(root)?;
            let chord = Chord::by_name(name).with_context(|| format!("unknown chord '{}'", name))?;
            let pitches = chord.with_root(root);
            let mixer = Mixer::from_pitches(format, &pitches, waveform(args, Waveform::Sine)?, config.volume);
            Program {
                source: Box::new(mixer),
                controls: None,
                label: format!("{} {} ({} voices)", root, name, pitches.len()),
            }
        }
        Command::Scale { root, mode } => {
            let root = parse_pitch(root)?;
            let pattern =
                KeyPattern::by_name(mode).with_context(|| format!("unknown scale '{}'", mode))?;
            let mut song = Song::new(Tempo::new(SCALE_BPM))
                .with_waveform(waveform(args, Waveform::Sine)?)
                .with_volume(config.volume);
            for degree in Key::new(root, pattern).scale() {
                song.note(degree, QUARTER);
            }
            Program {
                source: Box::new(song.reader(format)),
                controls: None,
                label: format!("{} {} scale", root, mode),
            }
        }
        Command::Song => {
            let song = demo_song().with_volume(config.volume);
            let label = format!("demo song ({:.1}s)", song.duration().as_secs_f64());
            Program {
                source: Box::new(song.reader(format)),
                controls: None,
                label,
            }
        }
        Command::Play { path } => {
            let source = open_file(path)?;
            Program {
                source,
                controls: None,
                label: path.display().to_string(),
            }
        }
        Command::Export { .. } | Command::Scope => bail!("not a playback command"),
    };
    Ok(program)
}

#[cfg(feature = "file-sources")]
fn open_file(path: &std::path::Path) -> Result<Box<dyn PcmReader>> {
    daw::sources::open(path).with_context(|| format!("failed to open {}", path.display()))
}

#[cfg(not(feature = "file-sources"))]
fn open_file(_path: &std::path::Path) -> Result<Box<dyn PcmReader>> {
    bail!("file playback requires the \"file-sources\" feature")
}

/// Render a voice to a WAV file
#[cfg(feature = "file-sources")]
pub fn export(args: &CliArgs, config: &DawConfig, out: &std::path::Path) -> Result<()> {
    let mut reader = voice(args, config, Waveform::Sine)?;
    let frames = (args.seconds * config.format.sample_rate as f64).round() as u64;
    let written = daw::export::export_wav(&mut reader, out, frames)
        .with_context(|| format!("failed to export {}", out.display()))?;
    println!("Wrote {} frames to {}", written, out.display());
    Ok(())
}

#[cfg(not(feature = "file-sources"))]
pub fn export(_args: &CliArgs, _config: &DawConfig, _out: &std::path::Path) -> Result<()> {
    bail!("WAV export requires the \"file-sources\" feature")
}

/// Fill a monitor's history from a voice and print the trace as text
pub fn print_scope(args: &CliArgs, config: &DawConfig) -> Result<()> {
    let mut reader = voice(args, config, Waveform::Sine)?;
    let mut monitor = PcmMonitor::with_scope_config(
        MemoryWriter::new(config.format),
        config.buffer_length_seconds,
        config.scope,
    );
    let data = read_to_vec(&mut reader, config.history_bytes())?;
    monitor.write_pcm(&data)?;

    let scope = monitor.scope();
    let mut grid = PixelGrid::new(config.scope.width, config.scope.height as usize + 1);
    scope.render(&mut grid, 0.0, 0.0);
    info!(points = grid.count(), zoom = scope.zoom(), "scope rendered");
    print!("{}", grid.to_ascii(ASCII_CELL.0, ASCII_CELL.1));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> CliArgs {
        CliArgs::parse_from(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_chord_program_mixes_every_voice() {
        let args = args(&["chord", "C5", "minor"]);
        let program = build_program(&args, &DawConfig::default()).unwrap();
        assert!(program.controls.is_none());
        assert!(program.label.contains("3 voices"), "{}", program.label);
    }

    #[test]
    fn test_tone_program_exposes_controls() {
        let args = args(&["tone", "--pitch", "A4", "--wave", "square"]);
        let mut program = build_program(&args, &DawConfig::default()).unwrap();
        let controls = program.controls.take().unwrap();
        assert_eq!(controls.pitch.get(), pitch::A4);
        assert_eq!(controls.waveform.get().name(), "square");
        let mut buf = [0u8; 64];
        assert_eq!(program.source.read_pcm(&mut buf).unwrap(), 64);
    }

    #[test]
    fn test_unknown_names_are_errors() {
        let config = DawConfig::default();
        assert!(build_program(&args(&["chord", "C5", "nonsense"]), &config).is_err());
        assert!(build_program(&args(&["scale", "C5", "lydian-ish"]), &config).is_err());
        assert!(build_program(&args(&["tone", "--pitch", "H9"]), &config).is_err());
    }

    #[test]
    fn test_volume_flag_overrides_config() {
        let config = load_config(&args(&["--volume", "0.3"])).unwrap();
        assert_eq!(config.volume, 0.3);
        assert!(load_config(&args(&["--volume", "7"])).is_err());
    }
}
