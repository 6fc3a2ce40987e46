//! The externally visible chunk shape.
//!
//! A [`Chunk`] is produced by the normaliser once nesting, names, and
//! documentation have been resolved. Chunks own their strings so callers can
//! keep them after the source buffer is dropped.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::span::Span;
use crate::tag::Tag;

/// Stable identifier of a chunk.
///
/// Identifiers are lower-case hexadecimal digests. Recomputing the digest
/// over the same inputs yields the same identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChunkId(String);

impl ChunkId {
    /// Wraps an already computed digest.
    #[must_use]
    pub const fn new(digest: String) -> Self {
        Self(digest)
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A tagged, spanned unit of source produced by extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Stable identifier.
    pub id: ChunkId,
    /// The chunk's tag.
    pub kind: Tag,
    /// Resolved or synthesised name. Never empty.
    pub name: String,
    /// Language identifier of the rule set that produced the chunk.
    pub language: String,
    /// Byte and line/column span within the source.
    pub span: Span,
    /// Identifier of the enclosing chunk, if any.
    pub parent: Option<ChunkId>,
    /// Identifiers of the directly nested chunks, ordered by start offset.
    pub children: Vec<ChunkId>,
    /// Documentation text attached from preceding documentation chunks.
    pub documentation: Option<String>,
    /// Ancestor names joined with `::`; empty for roots.
    pub breadcrumb: String,
    /// Ancestor names, outermost first.
    pub ancestry: Vec<String>,
    /// Nesting depth; roots have depth zero.
    pub depth: usize,
    /// Number of bytes covered by the span.
    pub byte_length: usize,
    /// Rough token estimate for the chunk's text.
    pub estimated_tokens: usize,
    /// Untagged lines directly above the chunk, such as attributes,
    /// decorators and plain comments, trimmed and in source order.
    #[serde(default)]
    pub leading_trivia: Vec<String>,
    /// Text after the chunk on its last line, such as a trailing comment.
    #[serde(default)]
    pub trailing_trivia: Vec<String>,
    /// The chunk's source text, when the engine is configured to include it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Chunk {
    /// Returns the chunk identifier.
    #[must_use]
    pub const fn id(&self) -> &ChunkId {
        &self.id
    }

    /// Returns the chunk tag.
    #[must_use]
    pub const fn kind(&self) -> Tag {
        self.kind
    }

    /// Returns the chunk name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the chunk span.
    #[must_use]
    pub const fn span(&self) -> &Span {
        &self.span
    }

    /// Returns the parent identifier, if any.
    #[must_use]
    pub const fn parent(&self) -> Option<&ChunkId> {
        self.parent.as_ref()
    }

    /// Returns the child identifiers in source order.
    #[must_use]
    pub fn children(&self) -> &[ChunkId] {
        &self.children
    }

    /// Returns the attached documentation, if any.
    #[must_use]
    pub fn documentation(&self) -> Option<&str> {
        self.documentation.as_deref()
    }

    /// Returns the untagged lines directly above the chunk.
    #[must_use]
    pub fn leading_trivia(&self) -> &[String] {
        &self.leading_trivia
    }

    /// Returns the text trailing the chunk on its last line.
    #[must_use]
    pub fn trailing_trivia(&self) -> &[String] {
        &self.trailing_trivia
    }

    /// Returns `true` for chunks without a parent.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Estimates tokens for a byte length: four bytes per token, rounded
    /// up, never less than one.
    #[must_use]
    pub const fn estimate_tokens(byte_length: usize) -> usize {
        let estimate = byte_length.div_ceil(4);
        if estimate == 0 { 1 } else { estimate }
    }
}
