//! Position Types
//!
//! Single source of truth for document coordinates.
//! All analysis works on 0-indexed positions; the CLI converts at the edges.

use serde::{Deserialize, Serialize};

/// Position within a document (0-indexed)
///
/// `character` counts Unicode scalar values from the start of the line.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    /// Column sentinel meaning "through the end of the line"
    pub const END_OF_LINE: u32 = u32::MAX;

    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }

    /// Convert 1-indexed CLI input to 0-indexed position
    pub fn from_cli(line: u32, column: u32) -> Self {
        Self {
            line: line.saturating_sub(1),
            character: column.saturating_sub(1),
        }
    }

    /// Convert 0-indexed position to 1-indexed display position
    pub fn to_display(&self) -> (u32, u32) {
        (
            self.line.saturating_add(1),
            self.character.saturating_add(1),
        )
    }
}

/// Range within a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    /// Build a range, swapping the ends if they are out of order
    pub fn new(start: Position, end: Position) -> Self {
        if end < start {
            Self {
                start: end,
                end: start,
            }
        } else {
            Self { start, end }
        }
    }

    pub fn point(pos: Position) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// Range covering a whole line from `first_column` to the end-of-line sentinel
    pub fn rest_of_line(line: u32, first_column: u32) -> Self {
        Self {
            start: Position::new(line, first_column),
            end: Position::new(line, Position::END_OF_LINE),
        }
    }

    pub fn is_single_line(&self) -> bool {
        self.start.line == self.end.line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_conversion() {
        let pos = Position::from_cli(42, 15);
        assert_eq!(pos, Position::new(41, 14));
        assert_eq!(pos.to_display(), (42, 15));

        // Zero input never underflows
        assert_eq!(Position::from_cli(0, 0), Position::new(0, 0));
    }

    #[test]
    fn test_range_orders_ends() {
        let a = Position::new(3, 4);
        let b = Position::new(1, 9);
        let range = Range::new(a, b);
        assert_eq!(range.start, b);
        assert_eq!(range.end, a);
    }

    #[test]
    fn test_rest_of_line() {
        let range = Range::rest_of_line(8, 4);
        assert!(range.is_single_line());
        assert_eq!(range.end.character, Position::END_OF_LINE);
        assert_eq!(range.end.to_display(), (9, u32::MAX));
    }
}
