//! Standing order, bounce set and readiness countdown.

use std::time::{Duration, Instant};

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use standfirst::engine::{PlayerNum, Snapshot};

use crate::ui::utils::format_players;

/// Widget showing who is standing, who is bouncing and when the next
/// question may be asked.
pub struct QueueWidget<'a> {
    snapshot: &'a Snapshot,
}

impl<'a> QueueWidget<'a> {
    pub fn new(snapshot: &'a Snapshot) -> Self {
        Self { snapshot }
    }

    fn countdown(&self, deadline: Instant) -> String {
        format!("{:.2}s", remaining(deadline, self.snapshot.at).as_secs_f64())
    }

    fn standing_line(&self) -> Line<'static> {
        let label = Span::styled("Standing: ", Style::default().fg(Color::DarkGray));
        match self.snapshot.standing.split_first() {
            None => Line::from(vec![
                label,
                Span::styled("nobody", Style::default().fg(Color::DarkGray)),
            ]),
            Some((first, rest)) => {
                let mut spans = vec![
                    label,
                    Span::styled(
                        first.to_string(),
                        Style::default()
                            .fg(Color::Green)
                            .add_modifier(Modifier::BOLD),
                    ),
                ];
                if !rest.is_empty() {
                    spans.push(Span::styled(
                        format!("  then {}", join(rest)),
                        Style::default().fg(Color::Yellow),
                    ));
                }
                Line::from(spans)
            }
        }
    }

    fn bounce_line(&self) -> Line<'static> {
        let mut spans = vec![
            Span::styled("Bouncing: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format_players(&self.snapshot.bouncing),
                Style::default().fg(Color::Cyan),
            ),
        ];
        if let Some(deadline) = self.snapshot.next_bounce_deadline {
            spans.push(Span::styled(
                format!("  next settles in {}", self.countdown(deadline)),
                Style::default().fg(Color::DarkGray),
            ));
        }
        Line::from(spans)
    }

    fn ready_line(&self) -> Line<'static> {
        let label = Span::styled("Next question: ", Style::default().fg(Color::DarkGray));
        let value = match self.snapshot.ready_deadline {
            Some(deadline) if deadline > self.snapshot.at => Span::styled(
                format!("in {}", self.countdown(deadline)),
                Style::default().fg(Color::Yellow),
            ),
            Some(_) => Span::styled("now", Style::default().fg(Color::Green)),
            None => Span::styled("waiting", Style::default().fg(Color::DarkGray)),
        };
        Line::from(vec![label, value])
    }
}

fn join(players: &[PlayerNum]) -> String {
    players
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

impl Widget for QueueWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let text = vec![self.standing_line(), self.bounce_line(), self.ready_line()];
        Paragraph::new(text).render(area, buf);
    }
}

/// Remaining time until `deadline` relative to `now`, zero once passed.
fn remaining(deadline: Instant, now: Instant) -> Duration {
    deadline.saturating_duration_since(now)
}
