//! Position conversion from Tree-sitter points.

use tagchunk_core::LineCol;

/// Converts a zero-based Tree-sitter point into a [`LineCol`].
///
/// Rows and columns beyond `u32::MAX` saturate.
#[must_use]
pub(crate) fn point_to_line_col(point: tree_sitter::Point) -> LineCol {
    let line = u32::try_from(point.row).unwrap_or(u32::MAX);
    let column = u32::try_from(point.column).unwrap_or(u32::MAX);
    LineCol::new(line, column)
}
