//! Source span and position types for locating chunks.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// A line and column position within a source file.
///
/// Both fields are zero-indexed to match Tree-sitter conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LineCol {
    /// Zero-indexed line number.
    pub line: u32,
    /// Zero-indexed column number (byte offset within the line).
    pub column: u32,
}

impl LineCol {
    /// Creates a new line/column position.
    #[must_use]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// Returns the zero-indexed line number.
    #[must_use]
    pub const fn line(&self) -> u32 {
        self.line
    }

    /// Returns the zero-indexed column number.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Returns the one-based line number used for display and synthesised
    /// names.
    #[must_use]
    pub const fn display_line(&self) -> u32 {
        self.line.saturating_add(1)
    }
}

/// A byte and line/column span in a UTF-8 source.
///
/// The byte range is half-open: `start_byte` is inclusive and `end_byte` is
/// exclusive. The `start` and `end` positions provide human-readable
/// line/column equivalents.
///
/// # Example
///
/// ```
/// use tagchunk_core::{LineCol, Span};
///
/// let outer = Span::new(0, 40, LineCol::new(0, 0), LineCol::new(3, 1));
/// let inner = Span::new(10, 20, LineCol::new(1, 4), LineCol::new(1, 14));
/// assert!(outer.strictly_contains(&inner));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start_byte: usize,
    /// End byte offset (exclusive).
    pub end_byte: usize,
    /// Start position as line and column.
    pub start: LineCol,
    /// End position as line and column.
    pub end: LineCol,
}

impl Span {
    /// Creates a new span from byte offsets and line/column positions.
    #[must_use]
    pub const fn new(start_byte: usize, end_byte: usize, start: LineCol, end: LineCol) -> Self {
        Self {
            start_byte,
            end_byte,
            start,
            end,
        }
    }

    /// Returns the inclusive start byte offset.
    #[must_use]
    pub const fn start_byte(&self) -> usize {
        self.start_byte
    }

    /// Returns the exclusive end byte offset.
    #[must_use]
    pub const fn end_byte(&self) -> usize {
        self.end_byte
    }

    /// Returns the start line/column position.
    #[must_use]
    pub const fn start(&self) -> &LineCol {
        &self.start
    }

    /// Returns the end line/column position.
    #[must_use]
    pub const fn end(&self) -> &LineCol {
        &self.end
    }

    /// Returns the byte range covered by the span.
    #[must_use]
    pub const fn byte_range(&self) -> Range<usize> {
        self.start_byte..self.end_byte
    }

    /// Returns the number of bytes covered, or zero for inverted spans.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end_byte.saturating_sub(self.start_byte)
    }

    /// Returns `true` when the span covers no bytes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start_byte == self.end_byte
    }

    /// Returns `true` when the end lies before the start.
    #[must_use]
    pub const fn is_inverted(&self) -> bool {
        self.end_byte < self.start_byte
    }

    /// Returns `true` when `other` lies within this span (`other ⊆ self`).
    #[must_use]
    pub const fn contains(&self, other: &Self) -> bool {
        self.start_byte <= other.start_byte && other.end_byte <= self.end_byte
    }

    /// Returns `true` when `other` lies within this span and the two spans
    /// are not identical.
    #[must_use]
    pub const fn strictly_contains(&self, other: &Self) -> bool {
        self.contains(other)
            && (self.start_byte != other.start_byte || self.end_byte != other.end_byte)
    }

    /// Returns `true` when the byte ranges share at least one byte.
    #[must_use]
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.start_byte < other.end_byte && other.start_byte < self.end_byte
    }

    /// Returns `true` when both spans cover the same bytes.
    #[must_use]
    pub const fn same_bytes(&self, other: &Self) -> bool {
        self.start_byte == other.start_byte && self.end_byte == other.end_byte
    }
}
