//! Error types for quiz inputs that arrive as text or raw numbers.

use thiserror::Error;

use crate::leaderboard::BoardFilter;
use crate::types::{Table, OPTION_COUNT};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    #[error("table {0} is not playable (expected 2..=10)")]
    InvalidTable(u8),

    #[error("option {0} does not exist (expected 0..4)")]
    InvalidSlot(usize),

    #[error("could not parse {what} from {value:?}")]
    Parse { what: &'static str, value: String },
}

pub type QuizResult<T> = Result<T, QuizError>;

/// Validate a raw table number.
pub fn table_from_u8(n: u8) -> QuizResult<Table> {
    Table::new(n).ok_or(QuizError::InvalidTable(n))
}

/// Parse a table from text such as `"7"`.
pub fn parse_table(s: &str) -> QuizResult<Table> {
    let n: u8 = s.trim().parse().map_err(|_| QuizError::Parse {
        what: "table",
        value: s.to_string(),
    })?;
    table_from_u8(n)
}

/// Parse a high score filter (`all`, `easy`, `medium`, `hard`).
pub fn parse_filter(s: &str) -> QuizResult<BoardFilter> {
    BoardFilter::from_str(s.trim()).ok_or_else(|| QuizError::Parse {
        what: "difficulty filter",
        value: s.to_string(),
    })
}

/// Validate an option slot.
pub fn slot_from_usize(slot: usize) -> QuizResult<usize> {
    if slot < OPTION_COUNT {
        Ok(slot)
    } else {
        Err(QuizError::InvalidSlot(slot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_table() {
        assert_eq!(parse_table(" 8 ").map(Table::get), Ok(8));
        assert_eq!(parse_table("1"), Err(QuizError::InvalidTable(1)));
        assert!(matches!(parse_table("seven"), Err(QuizError::Parse { .. })));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            QuizError::InvalidTable(12).to_string(),
            "table 12 is not playable (expected 2..=10)"
        );
        assert_eq!(
            QuizError::InvalidSlot(4).to_string(),
            "option 4 does not exist (expected 0..4)"
        );
    }

    #[test]
    fn test_slot_bounds() {
        assert_eq!(slot_from_usize(3), Ok(3));
        assert_eq!(slot_from_usize(4), Err(QuizError::InvalidSlot(4)));
    }

    #[test]
    fn test_parse_filter() {
        assert_eq!(parse_filter("all"), Ok(BoardFilter::All));
        assert!(parse_filter("nope").is_err());
    }
}
