//! Formatting helpers and the headless status line.

use std::time::{Duration, Instant};

use standfirst::engine::{PlayerNum, Snapshot};

/// Format elapsed time as HH:MM:SS or MM:SS.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    let hours = secs / 3600;
    let mins = (secs % 3600) / 60;
    let secs = secs % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, mins, secs)
    } else {
        format!("{:02}:{:02}", mins, secs)
    }
}

/// Format a player list as `[5, 2, 8]`.
pub fn format_players(players: &[PlayerNum]) -> String {
    let nums: Vec<String> = players.iter().map(|p| p.to_string()).collect();
    format!("[{}]", nums.join(", "))
}

/// Seconds from `start` to `at`, for display.
pub fn seconds_since(start: Instant, at: Instant) -> f64 {
    at.saturating_duration_since(start).as_secs_f64()
}

/// Whether anything a viewer can see differs between two snapshots.
pub fn board_changed(prev: &Snapshot, next: &Snapshot) -> bool {
    prev.seats != next.seats
        || prev.standing != next.standing
        || prev.bouncing != next.bouncing
        || next.beep
        || next.ready
}

/// Single status line: every seat cell, then clock, standing order, bounce
/// set and the next bounce deadline (0 when nothing is bouncing).
pub fn format_status_line(snapshot: &Snapshot, started_at: Instant) -> String {
    let cells: String = snapshot
        .seats
        .iter()
        .map(|seat| format!(" {} ", seat.cell()))
        .collect();
    let deadline = snapshot
        .next_bounce_deadline
        .map(|d| seconds_since(started_at, d))
        .unwrap_or(0.0);

    format!(
        "{} time {:9.2}     stand {} \t bounce {}\t {:9.2} ",
        cells,
        seconds_since(started_at, snapshot.at),
        format_players(&snapshot.standing),
        format_players(&snapshot.bouncing),
        deadline,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use standfirst::engine::{SeatStatus, SeatView};

    fn snapshot(start: Instant) -> Snapshot {
        let seat = |i, status| SeatView {
            player: PlayerNum::from_index(i),
            status,
        };
        Snapshot {
            at: start + Duration::from_millis(12_340),
            seats: vec![
                seat(0, SeatStatus::Seated),
                seat(1, SeatStatus::StandingOther),
                seat(2, SeatStatus::Disabled),
                seat(3, SeatStatus::StandingFirst),
            ],
            standing: vec![PlayerNum::from_index(3), PlayerNum::from_index(1)],
            bouncing: vec![PlayerNum::from_index(0)],
            next_bounce_deadline: Some(start + Duration::from_millis(12_500)),
            ready_deadline: None,
            beep: false,
            ready: false,
        }
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(65)), "01:05");
        assert_eq!(format_duration(Duration::from_secs(3725)), "01:02:05");
    }

    #[test]
    fn test_format_players() {
        assert_eq!(format_players(&[]), "[]");
        assert_eq!(
            format_players(&[PlayerNum::from_index(4), PlayerNum::from_index(1)]),
            "[5, 2]"
        );
    }

    #[test]
    fn test_status_line_layout() {
        let start = Instant::now();
        let line = format_status_line(&snapshot(start), start);

        assert!(line.starts_with("  1   .2.  _3_  *4* "));
        assert!(line.contains("time     12.34"));
        assert!(line.contains("stand [4, 2]"));
        assert!(line.contains("bounce [1]"));
        assert!(line.trim_end().ends_with("12.50"));
    }

    #[test]
    fn test_board_changed_ignores_clock() {
        let start = Instant::now();
        let a = snapshot(start);
        let mut b = a.clone();
        b.at += Duration::from_secs(1);
        assert!(!board_changed(&a, &b));

        b.standing.pop();
        assert!(board_changed(&a, &b));

        let mut c = a.clone();
        c.ready = true;
        assert!(board_changed(&a, &c));
    }
}
