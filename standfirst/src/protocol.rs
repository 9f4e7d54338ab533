//! Seat controller line protocol.
//!
//! The controller reports every seat switch as one text line:
//!
//! ```text
//! pin 1 False 15.9609
//! pin 1 True 16.1797
//! ```
//!
//! - Field 2: the 0-based sensor channel
//! - Field 3: `True` when the seat is occupied, `False` when empty
//! - Field 4: the controller's own uptime in seconds, ignored here
//!
//! Bytes arrive in arbitrary chunks, so [`LineFramer`] reassembles them into
//! lines before [`decode_line`] looks at them.

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// Longest line kept while waiting for a terminator.
///
/// A controller that never sends `\n` would otherwise grow the buffer
/// without bound.
pub const MAX_LINE_LEN: usize = 256;

/// One decoded controller line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinReading {
    /// 0-based sensor channel.
    pub channel: usize,
    /// `true` when the seat is occupied.
    pub seated: bool,
}

/// Error decoding controller input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Line bytes were not valid UTF-8
    #[error("Line is not valid UTF-8")]
    InvalidUtf8,

    /// Line doesn't match the `pin <n> <True|False>` pattern
    #[error("Unrecognized controller line: {0:?}")]
    Unrecognized(String),

    /// Channel number did not fit in a `usize`
    #[error("Invalid channel number: {0}")]
    InvalidChannel(String),

    /// Line exceeded [`MAX_LINE_LEN`] before a terminator arrived
    #[error("Line longer than {} bytes discarded", MAX_LINE_LEN)]
    Overlong,
}

/// Pattern: `pin <channel> <True|False>` at the start of the line.
///
/// We capture:
/// - Group 1: channel (unsigned integer)
/// - Group 2: seat state
fn pin_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^pin (\d+) (True|False)").unwrap())
}

/// Decode one controller line.
///
/// Leading and trailing whitespace (including `\r`) is ignored, as is
/// anything after the state field.
///
/// # Examples
///
/// ```
/// use standfirst::protocol::{decode_line, PinReading};
///
/// let reading = decode_line("pin 3 False 15.9609").unwrap();
/// assert_eq!(reading, PinReading { channel: 3, seated: false });
/// ```
pub fn decode_line(line: &str) -> Result<PinReading, DecodeError> {
    let line = line.trim();
    let caps = pin_pattern()
        .captures(line)
        .ok_or_else(|| DecodeError::Unrecognized(line.to_string()))?;

    let channel = caps[1]
        .parse::<usize>()
        .map_err(|_| DecodeError::InvalidChannel(caps[1].to_string()))?;
    let seated = &caps[2] == "True";

    Ok(PinReading { channel, seated })
}

/// Reassembles `\n`-terminated lines from arbitrary byte chunks.
#[derive(Debug, Default)]
pub struct LineFramer {
    buf: Vec<u8>,
    overflowed: bool,
}

impl LineFramer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append bytes and return every line they complete.
    ///
    /// Blank lines are skipped. Partial input stays buffered until its
    /// terminator arrives.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<Result<String, DecodeError>> {
        let mut lines = Vec::new();

        for &b in bytes {
            if b != b'\n' {
                if self.buf.len() < MAX_LINE_LEN {
                    self.buf.push(b);
                } else {
                    self.overflowed = true;
                }
                continue;
            }

            let raw = std::mem::take(&mut self.buf);
            if std::mem::take(&mut self.overflowed) {
                lines.push(Err(DecodeError::Overlong));
                continue;
            }
            match String::from_utf8(raw) {
                Ok(line) if line.trim().is_empty() => {}
                Ok(line) => lines.push(Ok(line)),
                Err(_) => lines.push(Err(DecodeError::InvalidUtf8)),
            }
        }

        lines
    }

    /// Bytes held waiting for a terminator.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }
}
