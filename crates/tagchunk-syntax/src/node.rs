//! The uniform tree-walking interface consumed by the engine.

use std::ops::Range;

use tagchunk_core::{LineCol, Span};

use crate::position::point_to_line_col;

/// A direct child of a [`SyntaxNode`] together with the grammar field it
/// occupies, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildNode<'t, N> {
    /// Field name under which the parent holds this child.
    pub field: Option<&'t str>,
    /// The child node.
    pub node: N,
}

/// Read-only view of one node in a parsed syntax tree.
///
/// Implementations are cheap handles (`Copy`) borrowing a tree that lives
/// for `'t`. Byte offsets index the UTF-8 source the tree was parsed from.
/// Children are reported in source order and include anonymous tokens and
/// extras such as comments.
pub trait SyntaxNode<'t>: Copy {
    /// Returns the grammar kind of the node, e.g. `function_item`.
    fn kind(&self) -> &'t str;

    /// Returns `true` for named nodes; anonymous tokens return `false`.
    fn is_named(&self) -> bool;

    /// Returns the half-open byte range covered by the node.
    fn byte_range(&self) -> Range<usize>;

    /// Returns the zero-based start position.
    fn start_position(&self) -> LineCol;

    /// Returns the zero-based end position.
    fn end_position(&self) -> LineCol;

    /// Returns the direct children in source order.
    fn children(&self) -> Vec<ChildNode<'t, Self>>;

    /// Returns the node's byte and line/column span.
    fn span(&self) -> Span {
        let range = self.byte_range();
        Span::new(
            range.start,
            range.end,
            self.start_position(),
            self.end_position(),
        )
    }
}

impl<'t> SyntaxNode<'t> for tree_sitter::Node<'t> {
    fn kind(&self) -> &'t str {
        tree_sitter::Node::kind(self)
    }

    fn is_named(&self) -> bool {
        tree_sitter::Node::is_named(self)
    }

    fn byte_range(&self) -> Range<usize> {
        tree_sitter::Node::byte_range(self)
    }

    fn start_position(&self) -> LineCol {
        point_to_line_col(tree_sitter::Node::start_position(self))
    }

    fn end_position(&self) -> LineCol {
        point_to_line_col(tree_sitter::Node::end_position(self))
    }

    fn children(&self) -> Vec<ChildNode<'t, Self>> {
        let mut cursor = self.walk();
        let mut children = Vec::with_capacity(self.child_count());
        if cursor.goto_first_child() {
            loop {
                children.push(ChildNode {
                    field: cursor.field_name(),
                    node: cursor.node(),
                });
                if !cursor.goto_next_sibling() {
                    break;
                }
            }
        }
        children
    }
}
