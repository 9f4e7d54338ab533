//! Terminal UI for the quiz board.
//!
//! # Module Structure
//!
//! - `board` - Full-screen board and the state it renders
//! - `widgets` - Seat and queue widgets
//! - `utils` - Formatting helpers and the plain status line

pub mod board;
pub mod utils;
pub mod widgets;

pub use board::{Board, BoardView};
