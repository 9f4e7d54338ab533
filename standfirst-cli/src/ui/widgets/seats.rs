//! Seat board widget.
//!
//! One cell per seat, coloured by status: green for the player who stood
//! first, yellow for players queued behind them, grey for disabled seats.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use standfirst::engine::{SeatStatus, SeatView};

/// Widget drawing every seat as `*5*`-style cells.
pub struct SeatBoardWidget<'a> {
    seats: &'a [SeatView],
}

impl<'a> SeatBoardWidget<'a> {
    pub fn new(seats: &'a [SeatView]) -> Self {
        Self { seats }
    }

    fn status_style(status: SeatStatus) -> Style {
        match status {
            SeatStatus::Seated => Style::default().fg(Color::White),
            SeatStatus::StandingFirst => Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD),
            SeatStatus::StandingOther => Style::default().fg(Color::Yellow),
            SeatStatus::Disabled => Style::default().fg(Color::DarkGray),
        }
    }
}

impl Widget for SeatBoardWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let spans: Vec<Span> = self
            .seats
            .iter()
            .flat_map(|seat| {
                [
                    Span::styled(
                        format!(" {:^4} ", seat.cell()),
                        Self::status_style(seat.status),
                    ),
                    Span::raw(" "),
                ]
            })
            .collect();

        Paragraph::new(Line::from(spans))
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}
