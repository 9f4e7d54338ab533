//! Board application: wires the control loop to the terminal and speakers.
//!
//! # Architecture
//!
//! - `run_tui()` - Interactive board with keyboard commands
//! - `run_headless()` - Plain status lines for non-TTY environments
//! - `SessionConfig` - Everything a session needs, prepared by `run.rs`
//!
//! The `run.rs` command acts as a thin front controller that:
//! 1. Loads and validates configuration
//! 2. Starts logging, audio and the seat link
//! 3. Delegates to `run_tui()` or `run_headless()`

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::time::{Duration, Instant};

use standfirst::control::{ControlLoop, NoInput, SystemClock, TickOutcome, TickSink};
use standfirst::engine::{Engine, Snapshot};
use standfirst::EngineConfig;

use crate::audio::{AudioCues, Cue};
use crate::error::CliError;
use crate::keyboard::KeyboardFeed;
use crate::link::{LinkItem, LinkStatus};
use crate::ui::utils::{board_changed, format_status_line, seconds_since};
use crate::ui::{Board, BoardView};

/// Minimum gap between redraws when nothing visible changed.
const REDRAW_INTERVAL: Duration = Duration::from_millis(100);

/// Configuration for starting a session.
pub struct SessionConfig {
    /// Validated engine settings.
    pub engine: EngineConfig,
    /// Shutdown signal from the signal handler or the quit key.
    pub shutdown: Arc<AtomicBool>,
    /// Speakers, if any.
    pub audio: Option<AudioCues>,
    /// Decoded seat readings from the link thread.
    pub sensors: Receiver<LinkItem>,
    /// Link connection state for display.
    pub link: LinkStatus,
}

/// Play whatever cues the snapshot carries.
fn play_cues(audio: Option<&AudioCues>, snapshot: &Snapshot) {
    let Some(audio) = audio else {
        return;
    };
    if snapshot.beep {
        audio.play(Cue::Beep);
    }
    if snapshot.ready {
        audio.play(Cue::Ready);
    }
}

/// Run the interactive board until quit or Ctrl+C.
pub fn run_tui(session: SessionConfig) -> Result<(), CliError> {
    let SessionConfig {
        engine: engine_config,
        shutdown,
        audio,
        sensors,
        link,
    } = session;

    let started_at = Instant::now();
    let engine = Engine::new(&engine_config, started_at);
    let keyboard = KeyboardFeed::new(Arc::clone(&shutdown));
    let mut control = ControlLoop::new(
        engine,
        sensors,
        keyboard,
        SystemClock,
        engine_config.poll_interval,
    );

    let mut board = Board::new()?;
    let mut view = BoardView::new(started_at, link);
    let mut last_draw: Option<Instant> = None;
    let mut draw_error: Option<io::Error> = None;

    let mut sink = |outcome: &TickOutcome| {
        play_cues(audio.as_ref(), &outcome.snapshot);

        let changed = view
            .snapshot()
            .map_or(true, |prev| board_changed(prev, &outcome.snapshot))
            || !outcome.errors.is_empty()
            || outcome.dump.is_some();
        view.apply(outcome);

        let due = last_draw.map_or(true, |at| at.elapsed() >= REDRAW_INTERVAL);
        if changed || due {
            if let Err(e) = board.draw(&view) {
                draw_error = Some(e);
                shutdown.store(true, Ordering::SeqCst);
            }
            last_draw = Some(Instant::now());
        }
    };
    control.run(&shutdown, &mut sink);

    board.restore()?;
    if let Some(e) = draw_error {
        return Err(e.into());
    }

    tracing::info!("Board closed");
    Ok(())
}

/// Run in headless mode (non-TTY environments).
///
/// Prints a status line whenever the board changes, plus `BEEP` and `READY`
/// markers, until Ctrl+C. There is no keyboard, so manual commands are not
/// available.
pub fn run_headless(session: SessionConfig) -> Result<(), CliError> {
    let SessionConfig {
        engine: engine_config,
        shutdown,
        audio,
        sensors,
        link,
    } = session;

    println!("Reading seats from {}", link.port().display());
    println!("Press Ctrl+C to stop.");
    println!();

    let started_at = Instant::now();
    let engine = Engine::new(&engine_config, started_at);
    let mut control = ControlLoop::new(
        engine,
        sensors,
        NoInput,
        SystemClock,
        engine_config.poll_interval,
    );

    let mut printer = HeadlessPrinter::new(io::stdout(), started_at);
    let mut sink = |outcome: &TickOutcome| {
        play_cues(audio.as_ref(), &outcome.snapshot);
        printer.on_tick(outcome);
    };
    control.run(&shutdown, &mut sink);

    Ok(())
}

/// Line-oriented renderer for headless mode.
struct HeadlessPrinter<W: Write> {
    out: W,
    started_at: Instant,
    last: Option<Snapshot>,
}

impl<W: Write> HeadlessPrinter<W> {
    fn new(out: W, started_at: Instant) -> Self {
        Self {
            out,
            started_at,
            last: None,
        }
    }

    fn write_tick(&mut self, outcome: &TickOutcome) -> io::Result<()> {
        let snapshot = &outcome.snapshot;
        let t = seconds_since(self.started_at, snapshot.at);

        for error in &outcome.errors {
            writeln!(self.out, "{:9.2} error: {}", t, error)?;
        }

        let changed = self
            .last
            .as_ref()
            .map_or(true, |prev| board_changed(prev, snapshot));
        if changed {
            writeln!(self.out, "{}", format_status_line(snapshot, self.started_at))?;
        }
        if snapshot.beep {
            writeln!(self.out, " BEEP ")?;
        }
        if snapshot.ready {
            writeln!(self.out, " READY ")?;
        }

        if let Some(records) = &outcome.dump {
            let json = serde_json::to_string_pretty(records)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            writeln!(self.out, "{}", json)?;
        }

        self.last = Some(snapshot.clone());
        self.out.flush()
    }
}

impl<W: Write> TickSink for HeadlessPrinter<W> {
    fn on_tick(&mut self, outcome: &TickOutcome) {
        if let Err(e) = self.write_tick(outcome) {
            tracing::warn!(error = %e, "Failed to write status");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use standfirst::engine::{PlayerNum, SeatStatus, SeatView};
    use standfirst::protocol::DecodeError;
    use standfirst::EngineError;

    fn snapshot(at: Instant, standing: bool) -> Snapshot {
        let status = if standing {
            SeatStatus::StandingFirst
        } else {
            SeatStatus::Seated
        };
        Snapshot {
            at,
            seats: vec![SeatView {
                player: PlayerNum::from_index(0),
                status,
            }],
            standing: if standing {
                vec![PlayerNum::from_index(0)]
            } else {
                Vec::new()
            },
            bouncing: Vec::new(),
            next_bounce_deadline: None,
            ready_deadline: None,
            beep: standing,
            ready: false,
        }
    }

    fn outcome(snapshot: Snapshot) -> TickOutcome {
        TickOutcome {
            snapshot,
            errors: Vec::new(),
            dump: None,
            slept: true,
        }
    }

    fn printed(printer: &HeadlessPrinter<Vec<u8>>) -> String {
        String::from_utf8(printer.out.clone()).unwrap()
    }

    #[test]
    fn test_headless_prints_only_on_change() {
        let start = Instant::now();
        let mut printer = HeadlessPrinter::new(Vec::new(), start);

        printer.on_tick(&outcome(snapshot(start, false)));
        printer.on_tick(&outcome(snapshot(start + Duration::from_millis(100), false)));
        assert_eq!(printed(&printer).lines().count(), 1);

        printer.on_tick(&outcome(snapshot(start + Duration::from_millis(200), true)));
        let text = printed(&printer);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with(" *1* "));
        assert_eq!(lines[2], " BEEP ");
    }

    #[test]
    fn test_headless_prints_errors_and_dump() {
        let start = Instant::now();
        let mut printer = HeadlessPrinter::new(Vec::new(), start);

        let mut tick = outcome(snapshot(start, false));
        tick.errors
            .push(EngineError::Decode(DecodeError::Unrecognized("noise".into())));
        tick.dump = Some(Vec::new());
        printer.on_tick(&tick);

        let text = printed(&printer);
        assert!(text.contains("error: Undecodable sensor input"));
        assert!(text.trim_end().ends_with("[]"));
    }

    #[test]
    fn test_play_cues_without_audio() {
        play_cues(None, &snapshot(Instant::now(), true));
    }
}
