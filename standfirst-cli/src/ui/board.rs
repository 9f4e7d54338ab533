//! Full-screen quiz board.
//!
//! [`BoardView`] accumulates what the control loop reports; [`Board`] owns
//! the terminal and draws the view. The terminal is put back in cooked mode
//! when the board is dropped or a panic unwinds through it.

use std::collections::VecDeque;
use std::io::{self, Stdout};
use std::time::Instant;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use standfirst::control::TickOutcome;
use standfirst::engine::{PlayerRecord, Snapshot};
use standfirst::keymap;

use super::utils::{format_duration, seconds_since};
use super::widgets::{QueueWidget, SeatBoardWidget};
use crate::link::LinkStatus;

/// Messages kept in the event log pane.
const MAX_MESSAGES: usize = 8;

/// State rendered by the board.
pub struct BoardView {
    started_at: Instant,
    link: LinkStatus,
    snapshot: Option<Snapshot>,
    dump: Option<(Instant, Vec<PlayerRecord>)>,
    messages: VecDeque<String>,
}

impl BoardView {
    pub fn new(started_at: Instant, link: LinkStatus) -> Self {
        Self {
            started_at,
            link,
            snapshot: None,
            dump: None,
            messages: VecDeque::with_capacity(MAX_MESSAGES),
        }
    }

    /// Fold one tick into the view.
    pub fn apply(&mut self, outcome: &TickOutcome) {
        let snapshot = &outcome.snapshot;
        let t = seconds_since(self.started_at, snapshot.at);

        for error in &outcome.errors {
            self.push_message(format!("{:9.2}  {}", t, error));
        }
        if snapshot.beep {
            let who = snapshot
                .winner()
                .map(|p| format!("player {}", p))
                .unwrap_or_else(|| "nobody".to_string());
            self.push_message(format!("{:9.2}  BEEP {}", t, who));
        }
        if snapshot.ready {
            self.push_message(format!("{:9.2}  READY", t));
        }
        if let Some(records) = &outcome.dump {
            self.dump = Some((snapshot.at, records.clone()));
        }

        self.snapshot = Some(snapshot.clone());
    }

    fn push_message(&mut self, message: String) {
        if self.messages.len() == MAX_MESSAGES {
            self.messages.pop_front();
        }
        self.messages.push_back(message);
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }
}

/// Terminal owner.
pub struct Board {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    restored: bool,
}

impl Board {
    /// Switch the terminal to raw mode on the alternate screen.
    ///
    /// If any step after raw mode fails the terminal is put back first.
    pub fn new() -> io::Result<Self> {
        enable_raw_mode()?;
        let terminal = or_restore(open_terminal, leave_terminal)?;

        let default_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            leave_terminal();
            default_hook(info);
        }));

        Ok(Self {
            terminal,
            restored: false,
        })
    }

    pub fn draw(&mut self, view: &BoardView) -> io::Result<()> {
        self.terminal.draw(|frame| render(frame, view))?;
        Ok(())
    }

    /// Leave the alternate screen. Safe to call more than once.
    pub fn restore(&mut self) -> io::Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;
        let _ = std::panic::take_hook();
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()
    }
}

fn open_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

/// Best-effort return to cooked mode on the main screen.
fn leave_terminal() {
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
    let _ = disable_raw_mode();
}

/// Run `setup`, calling `restore` before handing back its error.
fn or_restore<T>(
    setup: impl FnOnce() -> io::Result<T>,
    restore: impl FnOnce(),
) -> io::Result<T> {
    match setup() {
        Ok(value) => Ok(value),
        Err(e) => {
            restore();
            Err(e)
        }
    }
}

impl Drop for Board {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

fn render(frame: &mut Frame, view: &BoardView) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Length(4), // Seats
            Constraint::Length(5), // Queues
            Constraint::Min(4),    // Log / dump
            Constraint::Length(1), // Footer
        ])
        .split(frame.area());

    render_header(frame, chunks[0], view);

    let seats_block = Block::default().borders(Borders::ALL).title(" Seats ");
    let queues_block = Block::default().borders(Borders::ALL).title(" Order ");
    let seats_inner = seats_block.inner(chunks[1]);
    let queues_inner = queues_block.inner(chunks[2]);
    frame.render_widget(seats_block, chunks[1]);
    frame.render_widget(queues_block, chunks[2]);

    if let Some(snapshot) = &view.snapshot {
        frame.render_widget(SeatBoardWidget::new(&snapshot.seats), seats_inner);
        frame.render_widget(QueueWidget::new(snapshot), queues_inner);
    }

    render_log(frame, chunks[3], view);

    frame.render_widget(
        Paragraph::new(Span::styled(
            keymap::help_line(),
            Style::default().fg(Color::DarkGray),
        )),
        chunks[4],
    );
}

fn render_header(frame: &mut Frame, area: Rect, view: &BoardView) {
    let elapsed = view
        .snapshot
        .as_ref()
        .map(|s| s.at.saturating_duration_since(view.started_at))
        .unwrap_or_default();

    let link = if view.link.is_connected() {
        Span::styled("connected", Style::default().fg(Color::Green))
    } else {
        Span::styled("waiting", Style::default().fg(Color::Yellow))
    };

    let line = Line::from(vec![
        Span::styled(
            format!("Standfirst v{}", standfirst::VERSION),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("  │  "),
        Span::styled("Link: ", Style::default().fg(Color::DarkGray)),
        link,
        Span::styled(
            format!(" ({})", view.link.port().display()),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw("  │  "),
        Span::styled("Up: ", Style::default().fg(Color::DarkGray)),
        Span::raw(format_duration(elapsed)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_log(frame: &mut Frame, area: Rect, view: &BoardView) {
    let (events_area, dump_area) = if view.dump.is_some() {
        let halves = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);
        (halves[0], Some(halves[1]))
    } else {
        (area, None)
    };

    let events: Vec<Line> = view
        .messages
        .iter()
        .map(|m| Line::from(m.as_str()))
        .collect();
    frame.render_widget(
        Paragraph::new(events).block(Block::default().borders(Borders::ALL).title(" Events ")),
        events_area,
    );

    if let (Some((at, records)), Some(dump_area)) = (&view.dump, dump_area) {
        let mut lines = vec![Line::from(Span::styled(
            "player  enable  sit    sit_new  since",
            Style::default().fg(Color::DarkGray),
        ))];
        lines.extend(records.iter().map(|r| {
            Line::from(format!(
                "{:>6}  {:<6}  {:<5}  {:<7}  {}ms",
                r.playernum.to_string(),
                r.enable,
                r.sit,
                r.sit_new,
                r.since_last_change_ms
            ))
        }));
        let title = format!(" State at {:.2}s ", seconds_since(view.started_at, *at));
        frame.render_widget(
            Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title)),
            dump_area,
        );
    }
}
