//! An in-memory syntax tree for parsers that are not Tree-sitter.
//!
//! [`MemoryTree::build`] writes the source text and the tree in one pass, so
//! byte offsets and line/column positions always agree with the text. Text
//! appended with [`MemoryTreeBuilder::text`] belongs to the enclosing node
//! but to none of its children, which is how whitespace is modelled.
//!
//! # Example
//!
//! ```
//! use tagchunk_syntax::{MemoryTree, SyntaxNode};
//!
//! let tree = MemoryTree::build("source_file", |b| {
//!     b.node("function_item", |b| {
//!         b.token("fn").text(" ");
//!         b.field_leaf("name", "identifier", "main");
//!         b.token("(").token(")").text(" ");
//!         b.field_node("body", "block", |b| {
//!             b.token("{").token("}");
//!         });
//!     });
//! });
//!
//! assert_eq!(tree.source(), "fn main() {}");
//! assert_eq!(tree.root().children().len(), 1);
//! ```

use std::ops::Range;

use tagchunk_core::LineCol;

use crate::node::{ChildNode, SyntaxNode};

#[derive(Debug, Clone, PartialEq, Eq)]
struct NodeData {
    kind: String,
    named: bool,
    start_byte: usize,
    end_byte: usize,
    start: LineCol,
    end: LineCol,
    children: Vec<MemoryChild>,
}

impl NodeData {
    fn open(kind: &str, named: bool, start_byte: usize, start: LineCol) -> Self {
        Self {
            kind: kind.to_owned(),
            named,
            start_byte,
            end_byte: start_byte,
            start,
            end: start,
            children: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct MemoryChild {
    field: Option<String>,
    node: NodeData,
}

/// A syntax tree and the source text it describes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryTree {
    source: String,
    root: NodeData,
}

impl MemoryTree {
    /// Builds a tree whose root node has kind `root_kind` and spans the
    /// whole source.
    #[must_use]
    pub fn build(root_kind: &str, build: impl FnOnce(&mut MemoryTreeBuilder)) -> Self {
        let mut builder = MemoryTreeBuilder {
            source: String::new(),
            position: LineCol::new(0, 0),
            root: NodeData::open(root_kind, true, 0, LineCol::new(0, 0)),
            open: Vec::new(),
        };
        build(&mut builder);
        builder.finish()
    }

    /// Returns the source text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the root node.
    #[must_use]
    pub const fn root(&self) -> MemoryNode<'_> {
        MemoryNode { data: &self.root }
    }
}

/// Incremental writer used inside [`MemoryTree::build`].
///
/// Every method appends to the source in order; nodes opened with
/// [`node`](Self::node) cover everything their closure appends.
#[derive(Debug)]
pub struct MemoryTreeBuilder {
    source: String,
    position: LineCol,
    root: NodeData,
    open: Vec<(Option<String>, NodeData)>,
}

impl MemoryTreeBuilder {
    /// Appends a named node whose children are written by `build`.
    pub fn node(&mut self, kind: &str, build: impl FnOnce(&mut Self)) -> &mut Self {
        self.nested(None, kind, build)
    }

    /// Appends a named node held under `field` by its parent.
    pub fn field_node(
        &mut self,
        field: &str,
        kind: &str,
        build: impl FnOnce(&mut Self),
    ) -> &mut Self {
        self.nested(Some(field), kind, build)
    }

    /// Appends a named node with no children covering `text`.
    pub fn leaf(&mut self, kind: &str, text: &str) -> &mut Self {
        self.terminal(None, kind, true, text)
    }

    /// Appends a named leaf held under `field` by its parent.
    pub fn field_leaf(&mut self, field: &str, kind: &str, text: &str) -> &mut Self {
        self.terminal(Some(field), kind, true, text)
    }

    /// Appends an anonymous token whose kind is its own text.
    pub fn token(&mut self, text: &str) -> &mut Self {
        self.terminal(None, text, false, text)
    }

    /// Appends text covered by the enclosing node only.
    pub fn text(&mut self, text: &str) -> &mut Self {
        self.append(text);
        self
    }

    fn nested(
        &mut self,
        field: Option<&str>,
        kind: &str,
        build: impl FnOnce(&mut Self),
    ) -> &mut Self {
        self.open_node(field, kind, true);
        build(self);
        self.close_node();
        self
    }

    fn terminal(&mut self, field: Option<&str>, kind: &str, named: bool, text: &str) -> &mut Self {
        self.open_node(field, kind, named);
        self.append(text);
        self.close_node();
        self
    }

    fn open_node(&mut self, field: Option<&str>, kind: &str, named: bool) {
        let data = NodeData::open(kind, named, self.source.len(), self.position);
        self.open.push((field.map(str::to_owned), data));
    }

    fn close_node(&mut self) {
        let Some((field, mut node)) = self.open.pop() else {
            return;
        };
        node.end_byte = self.source.len();
        node.end = self.position;
        let parent = match self.open.last_mut() {
            Some((_, parent)) => parent,
            None => &mut self.root,
        };
        parent.children.push(MemoryChild { field, node });
    }

    fn append(&mut self, text: &str) {
        for ch in text.chars() {
            if ch == '\n' {
                self.position = LineCol::new(self.position.line.saturating_add(1), 0);
            } else {
                let width = u32::try_from(ch.len_utf8()).unwrap_or(u32::MAX);
                self.position.column = self.position.column.saturating_add(width);
            }
        }
        self.source.push_str(text);
    }

    fn finish(mut self) -> MemoryTree {
        while !self.open.is_empty() {
            self.close_node();
        }
        self.root.end_byte = self.source.len();
        self.root.end = self.position;
        MemoryTree {
            source: self.source,
            root: self.root,
        }
    }
}

/// A handle to one node of a [`MemoryTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryNode<'t> {
    data: &'t NodeData,
}

impl<'t> SyntaxNode<'t> for MemoryNode<'t> {
    fn kind(&self) -> &'t str {
        &self.data.kind
    }

    fn is_named(&self) -> bool {
        self.data.named
    }

    fn byte_range(&self) -> Range<usize> {
        self.data.start_byte..self.data.end_byte
    }

    fn start_position(&self) -> LineCol {
        self.data.start
    }

    fn end_position(&self) -> LineCol {
        self.data.end
    }

    fn children(&self) -> Vec<ChildNode<'t, Self>> {
        self.data
            .children
            .iter()
            .map(|child| ChildNode {
                field: child.field.as_deref(),
                node: MemoryNode { data: &child.node },
            })
            .collect()
    }
}
