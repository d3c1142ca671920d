//! Source locations for tokens and syntax tree nodes.

use core::fmt;

use serde::Serialize;

/// A 1-based line/column location in the source text.
///
/// Positions are recorded by the tokenizer and copied onto rules, directives
/// and selector lists. Nothing downstream interprets them; they only travel
/// along so diagnostics can point back into the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SourcePosition {
    /// Line number, starting at 1.
    pub line: u32,
    /// Column number in characters, starting at 1.
    pub column: u32,
}

impl SourcePosition {
    /// The first character of the input.
    pub const START: Self = Self { line: 1, column: 1 };

    /// Create a position from a line and column.
    #[must_use]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// Advance past `c`, moving to the next line on a newline.
    #[must_use]
    pub const fn advance(self, c: char) -> Self {
        if c == '\n' {
            Self {
                line: self.line + 1,
                column: 1,
            }
        } else {
            Self {
                line: self.line,
                column: self.column + 1,
            }
        }
    }
}

impl Default for SourcePosition {
    fn default() -> Self {
        Self::START
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_tracks_lines() {
        let pos = SourcePosition::START.advance('a').advance('\n').advance('b');
        assert_eq!(pos, SourcePosition::new(2, 2));
        assert_eq!(pos.to_string(), "2:2");
    }
}
