//! Live playback: loop thread, device, console and optional scope

use super::args::CliArgs;
use super::commands::Program;
use anyhow::{Context, Result};
use daw::playback::{loop_with_options, CancelToken, LoopOptions};
use daw::streaming::open_output;
use daw::synth::VoiceControls;
use daw::visualizer::{PcmMonitor, Scope};
use daw::DawConfig;
use std::io::{self, BufRead};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Main-thread poll interval while the console drives playback
const POLL_MS: u64 = 50;

/// Play `program` on the default device until the user quits
pub fn run(program: Program, args: &CliArgs, config: &DawConfig) -> Result<()> {
    let format = program.source.format();
    let (device, writer) =
        open_output(format, config.queue_samples).context("failed to open audio output")?;
    info!(
        %format,
        latency_ms = format!("{:.1}", config.latency_ms()),
        "playing {}",
        program.label
    );

    let monitor = PcmMonitor::with_scope_config(writer, config.buffer_length_seconds, config.scope);
    let scope = monitor.scope();
    let handle = loop_with_options(
        CancelToken::new(),
        monitor,
        program.source,
        LoopOptions::from(config),
    );

    let running = Arc::new(AtomicBool::new(true));
    if args.viz {
        show_scope(&scope, program.controls.as_ref(), Arc::clone(&running))?;
    } else {
        println!("Playing {}", program.label);
        if program.controls.is_some() {
            println!("Commands: up, down, louder, softer, sin/saw/triangle/square/noise, q to quit");
        } else {
            println!("Type q and press Enter to quit");
        }
        spawn_console(program.controls.clone(), Arc::clone(&running));
        let mut reported = 0;
        while running.load(Ordering::Relaxed) && !handle.is_finished() {
            std::thread::sleep(Duration::from_millis(POLL_MS));
            let stats = handle.stats();
            if stats.errors > reported {
                if let Some(err) = handle.last_error() {
                    warn!(errors = stats.errors, "playback error: {}", err);
                }
                reported = stats.errors;
            }
        }
    }

    handle.cancel();
    let stats = handle.stats();
    let exit = handle.join()?;
    device.finish();
    info!(%exit, iterations = stats.iterations, bytes = stats.bytes_written, "playback stopped");
    Ok(())
}

#[cfg(feature = "visualization")]
fn show_scope(scope: &Scope, controls: Option<&VoiceControls>, running: Arc<AtomicBool>) -> Result<()> {
    use daw::visualizer::tui::{run_scope, terminal_supports_tui, MIN_COLS, MIN_ROWS};
    if !terminal_supports_tui() {
        anyhow::bail!("terminal too small for the scope (need {}x{})", MIN_COLS, MIN_ROWS);
    }
    run_scope(scope, controls, running).context("terminal scope failed")
}

#[cfg(not(feature = "visualization"))]
fn show_scope(_scope: &Scope, _controls: Option<&VoiceControls>, _running: Arc<AtomicBool>) -> Result<()> {
    anyhow::bail!("--viz requires the \"visualization\" feature")
}

fn spawn_console(controls: Option<VoiceControls>, running: Arc<AtomicBool>) {
    std::thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if matches!(line, "q" | "quit" | "exit") {
                break;
            }
            match &controls {
                Some(controls) => match controls.apply_line(line) {
                    Ok(_) => println!(
                        "{} {} vol {:.2}",
                        controls.waveform.get().name(),
                        controls.pitch.get(),
                        controls.volume.get()
                    ),
                    Err(err) => eprintln!("{}", err),
                },
                None => eprintln!("This source has no live controls"),
            }
        }
        running.store(false, Ordering::Relaxed);
    });
}
