use serde::{Deserialize, Serialize};

/// Position in a text (line and column numbers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed, in characters)
    pub column: usize,
}

/// Half-open character range `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    /// Starting character offset
    pub start: usize,
    /// Ending character offset (exclusive)
    pub end: usize,
}

impl Span {
    #[inline]
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "Span start must be <= end");
        Self { start, end }
    }

    /// Empty span located at `at`
    #[inline]
    pub fn empty(at: usize) -> Self {
        Self { start: at, end: at }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    #[inline]
    pub fn contains(&self, pos: usize) -> bool {
        self.start <= pos && pos < self.end
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Line-start table for repeated offset to line/column lookups
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Character offset of the first character of each line
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(content: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, ch) in content.chars().enumerate() {
            if ch == '\n' {
                line_starts.push(i + 1);
            }
        }
        Self { line_starts }
    }

    /// Position of the character at `char_offset`
    pub fn position(&self, char_offset: usize) -> Position {
        let line = self.line_starts.partition_point(|&start| start <= char_offset);
        Position {
            line,
            column: char_offset - self.line_starts[line - 1] + 1,
        }
    }
}

/// Convert a character offset to line and column position
///
/// # Arguments
/// * `content` - The text
/// * `char_offset` - The character offset to convert
///
/// # Returns
/// * `Position` with line and column (both 1-indexed)
/// * Offsets past the end continue counting columns on the last line
pub fn char_to_position(content: &str, char_offset: usize) -> Position {
    LineIndex::new(content).position(char_offset)
}
