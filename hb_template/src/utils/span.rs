//! Source location tracking for template input
//!
//! Positions are tracked per byte as the scanner consumes its input. Lines are
//! 1-based and columns are 0-based, so the first byte of a template sits at
//! `1:0`.
use serde::{Deserialize, Serialize};
use std::fmt;

/// A position in source input with line, column, and byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    /// Byte offset from start of input (0-based)
    pub offset: usize,
    /// Line number (1-based)
    pub line: u32,
    /// Column number (0-based)
    pub column: u32,
}

impl Position {
    pub fn new(offset: usize, line: u32, column: u32) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }

    /// The position of the first byte of any input
    pub fn start() -> Self {
        Self {
            offset: 0,
            line: 1,
            column: 0,
        }
    }

    /// Advance past one consumed byte
    pub fn advance(self, byte: u8) -> Self {
        if byte == b'\n' {
            Self {
                offset: self.offset + 1,
                line: self.line + 1,
                column: 0,
            }
        } else {
            Self {
                offset: self.offset + 1,
                line: self.line,
                column: self.column + 1,
            }
        }
    }

    /// Advance past a run of consumed bytes
    pub fn advance_bytes(self, bytes: &[u8]) -> Self {
        bytes.iter().fold(self, |pos, &b| pos.advance(b))
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::start()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A span of source input from start to end position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    /// Start position (inclusive)
    pub start: Position,
    /// End position (exclusive)
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        debug_assert!(
            start.offset <= end.offset,
            "Span start must not be after end"
        );
        Self { start, end }
    }

    /// An empty span sitting at a single position
    pub fn at(pos: Position) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn end(&self) -> Position {
        self.end
    }

    /// Merge two spans into one covering both
    pub fn merge(self, other: Self) -> Self {
        let start = if self.start.offset < other.start.offset {
            self.start
        } else {
            other.start
        };

        let end = if self.end.offset > other.end.offset {
            self.end
        } else {
            other.end
        };

        Self { start, end }
    }

    /// Byte length of this span
    pub fn len(&self) -> usize {
        self.end.offset - self.start.offset
    }

    pub fn is_empty(&self) -> bool {
        self.start.offset == self.end.offset
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.offset >= self.start.offset && pos.offset < self.end.offset
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start.line == self.end.line {
            write!(
                f,
                "{}:{}-{}",
                self.start.line, self.start.column, self.end.column
            )
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_advance_resets_column_on_newline() {
        let pos = Position::start().advance_bytes(b"ab\nc");

        assert_eq!(pos.offset, 4);
        assert_eq!(pos.line, 2);
        assert_eq!(pos.column, 1);
    }

    #[test]
    fn test_position_display() {
        let pos = Position::start().advance_bytes(b"Text ");
        assert_eq!(pos.to_string(), "1:5");
    }

    #[test]
    fn test_span_merge_and_len() {
        let a = Span::new(Position::new(2, 1, 2), Position::new(4, 1, 4));
        let b = Span::new(Position::new(6, 1, 6), Position::new(9, 1, 9));
        let merged = a.merge(b);

        assert_eq!(merged.start.offset, 2);
        assert_eq!(merged.end.offset, 9);
        assert_eq!(merged.len(), 7);
        assert!(merged.contains(Position::new(5, 1, 5)));
        assert!(!merged.contains(Position::new(9, 1, 9)));
        assert_eq!(merged.to_string(), "1:2-9");
    }

    #[test]
    fn test_empty_span() {
        let span = Span::at(Position::start());
        assert!(span.is_empty());
        assert_eq!(span.len(), 0);
    }
}
