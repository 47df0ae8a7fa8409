//! Terminal oscilloscope.
//!
//! Draws a [`Scope`] trace with a Ratatui canvas at the scope's refresh rate.
//! The mouse wheel zooms; with [`VoiceControls`] attached the keyboard also
//! drives the voice:
//!
//! - `↑`/`↓`: pitch up/down a half step
//! - `1`..`5`: sine, saw, triangle, square, noise
//! - `+`/`-`: volume
//! - `q`/`Esc`: quit

use super::scope::{Scope, ScrollDirection};
use crate::synth::{VoiceCommand, VoiceControls, Waveform};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind,
        MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    symbols::Marker,
    widgets::{
        canvas::{Canvas, Line as CanvasLine, Points},
        Block, Borders, Paragraph,
    },
    Frame, Terminal,
};
use std::io::{self, stdout};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Minimum terminal size for the scope
pub const MIN_COLS: u16 = 40;
/// Minimum terminal rows for the scope
pub const MIN_ROWS: u16 = 12;

/// Check if the terminal is large enough to draw the scope
pub fn terminal_supports_tui() -> bool {
    crossterm::terminal::size()
        .map(|(cols, rows)| cols >= MIN_COLS && rows >= MIN_ROWS)
        .unwrap_or(false)
}

fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
}

/// Run `f` with a panic hook that restores the terminal before chaining to
/// the previous hook. The previous hook is put back afterwards, so nested or
/// repeated calls do not stack.
fn with_restore_hook<T>(f: impl FnOnce() -> T) -> T {
    let previous: Arc<dyn Fn(&std::panic::PanicHookInfo<'_>) + Sync + Send + 'static> =
        Arc::from(std::panic::take_hook());
    let chained = Arc::clone(&previous);
    std::panic::set_hook(Box::new(move |panic_info| {
        restore_terminal();
        (*chained)(panic_info);
    }));
    let out = f();
    drop(std::panic::take_hook());
    std::panic::set_hook(Box::new(move |panic_info| (*previous)(panic_info)));
    out
}

/// Map a key to a voice command
pub fn key_command(code: KeyCode) -> Option<VoiceCommand> {
    match code {
        KeyCode::Up => Some(VoiceCommand::Up),
        KeyCode::Down => Some(VoiceCommand::Down),
        KeyCode::Char('1') => Some(VoiceCommand::Wave(Waveform::Sine)),
        KeyCode::Char('2') => Some(VoiceCommand::Wave(Waveform::Sawtooth)),
        KeyCode::Char('3') => Some(VoiceCommand::Wave(Waveform::Triangle)),
        KeyCode::Char('4') => Some(VoiceCommand::Wave(Waveform::Square)),
        KeyCode::Char('5') => Some(VoiceCommand::Wave(Waveform::Noise)),
        KeyCode::Char('+') | KeyCode::Char('=') => Some(VoiceCommand::Louder),
        KeyCode::Char('-') => Some(VoiceCommand::Softer),
        _ => None,
    }
}

/// Run the scope until the user quits or `running` is cleared.
///
/// Clears `running` on exit so producer threads can stop too.
pub fn run_scope(
    scope: &Scope,
    controls: Option<&VoiceControls>,
    running: Arc<AtomicBool>,
) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    let refresh = Duration::from_millis(scope.config().refresh_ms.max(1));
    let result = with_restore_hook(|| -> io::Result<()> {
        while running.load(Ordering::Relaxed) {
            let frame_start = Instant::now();
            terminal.draw(|f| draw(f, scope, controls))?;

            while let Some(remaining) = refresh.checked_sub(frame_start.elapsed()) {
                if !event::poll(remaining)? {
                    break;
                }
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                        code => {
                            if let (Some(controls), Some(command)) = (controls, key_command(code)) {
                                controls.apply(&command);
                            }
                        }
                    },
                    Event::Mouse(mouse) => match mouse.kind {
                        MouseEventKind::ScrollUp => scope.on_scroll(ScrollDirection::Up),
                        MouseEventKind::ScrollDown => scope.on_scroll(ScrollDirection::Down),
                        _ => {}
                    },
                    _ => {}
                }
            }
        }
        Ok(())
    });

    running.store(false, Ordering::Relaxed);
    restore_terminal();
    terminal.show_cursor()?;
    result
}

fn draw(f: &mut Frame, scope: &Scope, controls: Option<&VoiceControls>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(3)])
        .split(f.area());
    draw_trace(f, chunks[0], scope);
    draw_footer(f, chunks[1], scope, controls);
}

fn draw_trace(f: &mut Frame, area: Rect, scope: &Scope) {
    let config = *scope.config();
    let width = config.width as f64;
    let height = config.height;
    // Canvas y grows upward; scope rows grow downward
    let points: Vec<(f64, f64)> = scope
        .trace()
        .into_iter()
        .map(|p| (p.x, height - p.y))
        .collect();

    let canvas = Canvas::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Oscilloscope  zoom {:.1}x ", scope.zoom())),
        )
        .marker(Marker::Braille)
        .x_bounds([0.0, width])
        .y_bounds([0.0, height])
        .paint(move |ctx| {
            ctx.draw(&CanvasLine {
                x1: 0.0,
                y1: height / 2.0,
                x2: width,
                y2: height / 2.0,
                color: Color::DarkGray,
            });
            ctx.draw(&Points {
                coords: &points,
                color: Color::Green,
            });
        });
    f.render_widget(canvas, area);
}

fn draw_footer(f: &mut Frame, area: Rect, scope: &Scope, controls: Option<&VoiceControls>) {
    let status = match controls {
        Some(c) => format!(
            " {} | {} | vol {:.2} | ↑↓ pitch  1-5 wave  +/- vol  wheel zoom  q quit",
            c.pitch.get(),
            c.waveform.get().name(),
            c.volume.get()
        ),
        None => format!(" {} bytes of history | wheel zoom  q quit", scope.history().len()),
    };
    let footer = Paragraph::new(status)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_bindings() {
        assert!(matches!(key_command(KeyCode::Up), Some(VoiceCommand::Up)));
        assert!(matches!(
            key_command(KeyCode::Char('4')),
            Some(VoiceCommand::Wave(Waveform::Square))
        ));
        assert!(key_command(KeyCode::Char('x')).is_none());
    }

    #[test]
    fn test_restore_hook_is_removed_afterwards() {
        use std::sync::atomic::AtomicUsize;

        static SEEN: AtomicUsize = AtomicUsize::new(0);
        const MESSAGE: &str = "scope restore hook check";

        let before = std::panic::take_hook();
        std::panic::set_hook(Box::new(|info| {
            if info.payload().downcast_ref::<&str>() == Some(&MESSAGE) {
                SEEN.fetch_add(1, Ordering::SeqCst);
            }
        }));

        // repeated runs must not chain wrappers onto each other
        for _ in 0..3 {
            assert_eq!(with_restore_hook(|| 7), 7);
        }
        let inside =
            with_restore_hook(|| std::panic::catch_unwind(|| std::panic::panic_any(MESSAGE)));
        assert!(inside.is_err());
        assert_eq!(SEEN.load(Ordering::SeqCst), 1);

        assert!(std::panic::catch_unwind(|| std::panic::panic_any(MESSAGE)).is_err());
        assert_eq!(SEEN.load(Ordering::SeqCst), 2);

        drop(std::panic::take_hook());
        std::panic::set_hook(before);
    }
}
