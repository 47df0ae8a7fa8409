//! `daw` demo binary
//!
//! Plays synthesized voices, chords, scales, the demo song or audio files
//! through the default output device, with a console or terminal scope for
//! live control. `export` and `scope` work without an audio device.

mod cli;

use anyhow::Result;
use cli::args::{CliArgs, Command};
use cli::commands;
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = CliArgs::parse();
    if args.show_help {
        CliArgs::print_help();
        return Ok(());
    }
    init_logging();
    let config = commands::load_config(&args)?;

    match &args.command {
        Command::Export { out } => commands::export(&args, &config, out),
        Command::Scope => commands::print_scope(&args, &config),
        _ => play(&args, &config),
    }
}

#[cfg(feature = "streaming")]
fn play(args: &CliArgs, config: &daw::DawConfig) -> Result<()> {
    let program = commands::build_program(args, config)?;
    cli::session::run(program, args, config)
}

#[cfg(not(feature = "streaming"))]
fn play(_args: &CliArgs, _config: &daw::DawConfig) -> Result<()> {
    eprintln!(
        "Playback requires the \"streaming\" feature. Rebuild with `--features streaming`, or use `export`/`scope`."
    );
    Ok(())
}
