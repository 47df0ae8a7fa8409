//! Command-line argument parsing for the `daw` demo binary.

use std::env;
use std::path::PathBuf;

/// What the binary should do
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Single live voice
    Tone,
    /// Live noise voice
    Noise,
    /// Chord `name` built on `root`, voices mixed
    Chord { root: String, name: String },
    /// Scale from `root`, one quarter note per degree
    Scale { root: String, mode: String },
    /// Built-in demo progression
    Song,
    /// Loop a WAV or MP3 file
    Play { path: PathBuf },
    /// Render a voice to a WAV file
    Export { out: PathBuf },
    /// Print a synthesized trace as text
    Scope,
}

/// Parsed command-line arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct CliArgs {
    /// Selected subcommand
    pub command: Command,
    /// Show the terminal oscilloscope while playing
    pub viz: bool,
    /// JSON configuration file
    pub config: Option<PathBuf>,
    /// Volume override
    pub volume: Option<f64>,
    /// Length of an export
    pub seconds: f64,
    /// Waveform name for tone, export and scope
    pub wave: Option<String>,
    /// Pitch name or Hz for tone, export and scope
    pub pitch: Option<String>,
    /// Whether help was requested (or parsing failed)
    pub show_help: bool,
}

impl Default for CliArgs {
    fn default() -> Self {
        Self {
            command: Command::Tone,
            viz: false,
            config: None,
            volume: None,
            seconds: 2.0,
            wave: None,
            pitch: None,
            show_help: false,
        }
    }
}

impl CliArgs {
    /// Parse arguments from the command line.
    pub fn parse() -> Self {
        Self::parse_from(env::args().skip(1))
    }

    /// Parse an explicit argument list (without the program name).
    pub fn parse_from<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = Self::default();
        let mut positional = Vec::new();
        let mut iter = iter.into_iter();

        while let Some(arg) = iter.next() {
            let (flag, inline) = match arg.split_once('=') {
                Some((flag, value)) if flag.starts_with("--") => (flag.to_string(), Some(value.to_string())),
                _ => (arg.clone(), None),
            };
            match flag.as_str() {
                "--help" | "-h" => args.show_help = true,
                "--viz" => args.viz = true,
                "--config" | "--volume" | "--seconds" | "--wave" | "--pitch" => {
                    let Some(value) = inline.or_else(|| iter.next()) else {
                        eprintln!("{} requires an argument", flag);
                        args.show_help = true;
                        continue;
                    };
                    args.set_value(&flag, value);
                }
                _ if flag.starts_with('-') && flag.len() > 1 => {
                    eprintln!("Unknown flag: {}", arg);
                    args.show_help = true;
                }
                _ => positional.push(arg),
            }
        }

        match command_from(&positional) {
            Some(command) => args.command = command,
            None => args.show_help = true,
        }
        args
    }

    fn set_value(&mut self, flag: &str, value: String) {
        match flag {
            "--config" => self.config = Some(PathBuf::from(value)),
            "--wave" => self.wave = Some(value),
            "--pitch" => self.pitch = Some(value),
            "--volume" => match value.parse::<f64>() {
                Ok(v) => self.volume = Some(v),
                Err(_) => {
                    eprintln!("Invalid volume: {}", value);
                    self.show_help = true;
                }
            },
            "--seconds" => match value.parse::<f64>() {
                Ok(s) if s > 0.0 && s.is_finite() => self.seconds = s,
                _ => {
                    eprintln!("Invalid length in seconds: {}", value);
                    self.show_help = true;
                }
            },
            _ => {}
        }
    }

    /// Print help text to stderr.
    pub fn print_help() {
        eprintln!(
            "Usage:\n  daw [flags] <command>\n\n\
             Commands:\n\
             \x20 tone                     Live voice (default)\n\
             \x20 noise                    Live noise voice\n\
             \x20 chord <ROOT> <NAME>      Chord, e.g. `chord C5 minor`\n\
             \x20 scale <ROOT> <MODE>      Scale walk, MODE is major or minor\n\
             \x20 song                     Demo progression\n\
             \x20 play <FILE>              Loop a .wav or .mp3 file\n\
             \x20 export <OUT.wav>         Render a voice to a WAV file\n\
             \x20 scope                    Print a voice's trace as text\n\n\
             Flags:\n\
             \x20 --viz                    Terminal oscilloscope while playing\n\
             \x20 --config <PATH>          JSON configuration file\n\
             \x20 --volume <V>             Voice volume, 0.0 to 1.0\n\
             \x20 --seconds <N>            Export length (default 2)\n\
             \x20 --wave <W>               sin, saw, triangle, square or noise\n\
             \x20 --pitch <P>              Note name (C5, F#4) or Hz\n\
             \x20 -h, --help               Show this help\n\n\
             Console (tone, noise):\n\
             \x20 up, down, louder, softer, <wave name>, q to quit\n\n\
             Set RUST_LOG=debug for detailed logs.\n"
        );
    }
}

fn command_from(positional: &[String]) -> Option<Command> {
    let (name, rest) = match positional.split_first() {
        Some((name, rest)) => (name.as_str(), rest),
        None => return Some(Command::Tone),
    };
    let command = match (name, rest) {
        ("tone", []) => Command::Tone,
        ("noise", []) => Command::Noise,
        ("song", []) => Command::Song,
        ("scope", []) => Command::Scope,
        ("chord", [root, chord]) => Command::Chord {
            root: root.clone(),
            name: chord.clone(),
        },
        ("scale", [root, mode]) => Command::Scale {
            root: root.clone(),
            mode: mode.clone(),
        },
        ("play", [path]) => Command::Play { path: path.into() },
        ("export", [out]) => Command::Export { out: out.into() },
        _ => {
            eprintln!("Unrecognized command: {}", positional.join(" "));
            return None;
        }
    };
    Some(command)
}
