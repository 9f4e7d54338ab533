//! Board widgets for the TUI.

mod queues;
mod seats;

pub use queues::QueueWidget;
pub use seats::SeatBoardWidget;
