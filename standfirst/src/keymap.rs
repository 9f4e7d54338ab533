//! Operator keyboard layout.
//!
//! ```text
//!   1 2 3 4 5 6 7 8 9 0     toggle enable, seats 1-10
//!   ! @ # $ % ^ & * ( )     toggle seat state (testing), seats 1-10
//!   space                   reset
//!   enter                   dump player records
//! ```
//!
//! Keys are mapped by character so the shifted row works regardless of
//! keyboard layout. Indexes past the configured seat count are still
//! produced; the engine rejects them.

use crate::control::ManualCommand;

const ENABLE_ROW: &str = "1234567890";
const TEST_ROW: &str = "!@#$%^&*()";

/// Command for a typed character, if it has one.
pub fn command_for_char(c: char) -> Option<ManualCommand> {
    if let Some(index) = ENABLE_ROW.chars().position(|k| k == c) {
        return Some(ManualCommand::EnableToggle(index));
    }
    if let Some(index) = TEST_ROW.chars().position(|k| k == c) {
        return Some(ManualCommand::TestToggle(index));
    }
    match c {
        ' ' => Some(ManualCommand::Reset),
        '\n' | '\r' => Some(ManualCommand::DumpState),
        _ => None,
    }
}

/// One-line key summary for help text and the board footer.
pub fn help_line() -> &'static str {
    "1-0 enable  shift+1-0 test toggle  space reset  enter dump  q quit"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_row_toggles_enable() {
        assert_eq!(command_for_char('1'), Some(ManualCommand::EnableToggle(0)));
        assert_eq!(command_for_char('5'), Some(ManualCommand::EnableToggle(4)));
        assert_eq!(command_for_char('0'), Some(ManualCommand::EnableToggle(9)));
    }

    #[test]
    fn test_shifted_row_toggles_seat() {
        assert_eq!(command_for_char('!'), Some(ManualCommand::TestToggle(0)));
        assert_eq!(command_for_char('%'), Some(ManualCommand::TestToggle(4)));
        assert_eq!(command_for_char(')'), Some(ManualCommand::TestToggle(9)));
    }

    #[test]
    fn test_reset_and_dump() {
        assert_eq!(command_for_char(' '), Some(ManualCommand::Reset));
        assert_eq!(command_for_char('\n'), Some(ManualCommand::DumpState));
    }

    #[test]
    fn test_unmapped_keys() {
        for c in ['a', 'q', '-', '~'] {
            assert_eq!(command_for_char(c), None);
        }
    }
}
