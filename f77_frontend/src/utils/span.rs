//! Source location tracking
//!
//! Positions are 1-based line/column pairs plus a byte offset. Every
//! character, tab included, advances the column by exactly one.
use serde::{Deserialize, Serialize};
use std::fmt;

/// A position in source text with line, column, and byte offset.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Position {
    /// Byte offset from start of input (0-based)
    pub offset: usize,
    /// Line number (1-based, 0 for synthetic positions)
    pub line: u32,
    /// Column number (1-based, 0 for synthetic positions)
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

    /// Offset 0, line 1, column 1
    pub fn start() -> Self {
        Self::new(0, 1, 1)
    }

    /// Position attached to tokens that do not come from the source,
    /// such as the EOF substituted once a stream is exhausted.
    pub fn synthetic() -> Self {
        Self::new(0, 0, 0)
    }

    pub fn is_synthetic(&self) -> bool {
        self.line == 0
    }

    /// Advance position by one character
    pub fn advance(self, ch: char) -> Self {
        match ch {
            '\n' => Self {
                offset: self.offset + 1,
                line: self.line + 1,
                column: 1,
            },
            _ => Self {
                offset: self.offset + ch.len_utf8(),
                line: self.line,
                column: self.column + 1,
            },
        }
    }

    /// Advance position over every character of a string
    pub fn advance_str(self, s: &str) -> Self {
        s.chars().fold(self, |pos, ch| pos.advance(ch))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A span of source text from start (inclusive) to end (exclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: Position,
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

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn end(&self) -> Position {
        self.end
    }

    /// Zero-width span at a position
    pub fn point(pos: Position) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// Byte length of this span
    pub fn len(&self) -> usize {
        self.end.offset - self.start.offset
    }

    pub fn is_empty(&self) -> bool {
        self.start.offset == self.end.offset
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

/// Line index over a source text, used to render diagnostics with context
#[derive(Debug, Clone)]
pub struct SourceMap {
    pub source: String,
    /// Byte offsets of line starts
    line_starts: Vec<usize>,
}

impl SourceMap {
    pub fn new(source: String) -> Self {
        let mut line_starts = vec![0];
        for (offset, ch) in source.char_indices() {
            if ch == '\n' {
                line_starts.push(offset + 1);
            }
        }
        Self {
            source,
            line_starts,
        }
    }

    /// Line and column for a byte offset
    pub fn position_at(&self, offset: usize) -> Position {
        let line = self
            .line_starts
            .binary_search(&offset)
            .unwrap_or_else(|i| i - 1);

        let line_start = self.line_starts[line];
        let column = self.source[line_start..offset].chars().count();

        Position::new(offset, (line + 1) as u32, (column + 1) as u32)
    }

    /// Text of a 1-based line without its terminator
    pub fn get_line(&self, line_num: u32) -> Option<&str> {
        if line_num == 0 {
            return None;
        }

        let line_idx = (line_num - 1) as usize;
        let start = *self.line_starts.get(line_idx)?;
        let end = self
            .line_starts
            .get(line_idx + 1)
            .map(|next| next - 1)
            .unwrap_or(self.source.len());

        Some(self.source[start..end].trim_end_matches('\r'))
    }

    /// Render a message with the offending line and a caret underline
    pub fn format_error(&self, pos: Position, width: usize, message: &str) -> String {
        let mut result = format!("error: {}\n", message);

        if pos.is_synthetic() {
            result.push_str("  --> <end of input>\n");
            return result;
        }

        result.push_str(&format!("  --> {}:{}\n", pos.line, pos.column));

        if let Some(line) = self.get_line(pos.line) {
            let line_num_str = pos.line.to_string();
            let padding = " ".repeat(line_num_str.len());

            result.push_str(&format!("{} |\n", padding));
            result.push_str(&format!("{} | {}\n", line_num_str, line));
            result.push_str(&format!(
                "{} | {}{}\n",
                padding,
                " ".repeat((pos.column as usize).saturating_sub(1)),
                "^".repeat(width.max(1))
            ));
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_advances_one_column() {
        let pos = Position::start().advance('\t');
        assert_eq!(pos.column, 2);
        assert_eq!(pos.line, 1);
    }

    #[test]
    fn test_newline_resets_column() {
        let pos = Position::start().advance_str("ab\ncd");
        assert_eq!((pos.line, pos.column, pos.offset), (2, 3, 5));
    }

    #[test]
    fn test_source_map_lookup() {
        let map = SourceMap::new("PROGRAM X\n  A = 1\nEND\n".to_string());
        assert_eq!(map.get_line(2), Some("  A = 1"));
        assert_eq!(map.position_at(12), Position::new(12, 2, 3));
        assert_eq!(map.get_line(0), None);
    }

    #[test]
    fn test_format_error_underlines_token() {
        let map = SourceMap::new("X = $\n".to_string());
        let rendered = map.format_error(Position::new(4, 1, 5), 1, "unexpected character");
        assert!(rendered.contains("--> 1:5"));
        assert!(rendered.contains("1 | X = $"));
        assert!(rendered.ends_with("    ^\n"));
    }
}
