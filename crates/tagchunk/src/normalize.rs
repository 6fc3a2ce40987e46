//! Converts a chunk tree into owned, identified [`Chunk`] values.
//!
//! Identifiers are content-derived: a SHA-256 digest over the chunk's
//! language, kind, name, parent identifier and parent-relative offsets,
//! truncated to 16 bytes and hex encoded. Nothing positional in memory and
//! no counter feeds the digest, so unchanged code keeps its identifier when
//! unrelated code elsewhere in the file moves.

use sha2::{Digest, Sha256};
use tagchunk_core::{Chunk, ChunkId, EngineConfig, Tag};

use crate::builder::ChunkTree;

/// Bytes of the digest kept in an identifier.
const ID_BYTES: usize = 16;

/// Inputs that determine a chunk identifier.
#[derive(Debug, Clone, Copy)]
pub struct IdInputs<'a> {
    /// Language of the producing rule set.
    pub language: &'a str,
    /// Chunk kind.
    pub kind: Tag,
    /// Resolved name.
    pub name: &'a str,
    /// Identifier of the enclosing chunk, if any.
    pub parent: Option<&'a ChunkId>,
    /// Start offset relative to the parent's start, or absolute for roots.
    pub relative_start: usize,
    /// End offset relative to the parent's start, or absolute for roots.
    pub relative_end: usize,
}

impl IdInputs<'_> {
    /// Computes the identifier.
    #[must_use]
    pub fn digest(&self) -> ChunkId {
        let mut hasher = Sha256::new();
        for field in [
            self.language,
            self.kind.as_str(),
            self.name,
            self.parent.map(ChunkId::as_str).unwrap_or_default(),
        ] {
            hasher.update(field.as_bytes());
            hasher.update(b"\0");
        }
        hasher.update(self.relative_start.to_string().as_bytes());
        hasher.update(b"\0");
        hasher.update(self.relative_end.to_string().as_bytes());
        let digest = hasher.finalize();
        ChunkId::new(hex::encode(digest.get(..ID_BYTES).unwrap_or_default()))
    }
}

/// Produces the public chunk list in pre-order.
///
/// Chunks are emitted root by root, each followed by its descendants. Rule
/// and capture bookkeeping is not carried over; trivia lines are copied
/// out of the source.
#[must_use]
pub fn normalize(tree: &ChunkTree<'_>, config: &EngineConfig) -> Vec<Chunk> {
    let mut chunks: Vec<Chunk> = Vec::with_capacity(tree.len());

    // Pre-order guarantees every parent is emitted before its children.
    for draft in tree.chunks() {
        let parent = draft.parent().and_then(|index| chunks.get(index));
        let parent_start = parent.map_or(0, |outer| outer.span.start_byte);
        let span = *draft.span();
        let id = IdInputs {
            language: tree.language(),
            kind: draft.tag(),
            name: draft.name(),
            parent: parent.map(Chunk::id),
            relative_start: span.start_byte.saturating_sub(parent_start),
            relative_end: span.end_byte.saturating_sub(parent_start),
        }
        .digest();

        let mut ancestry = parent.map(|outer| outer.ancestry.clone()).unwrap_or_default();
        if let Some(outer) = parent {
            ancestry.push(outer.name.clone());
        }

        let chunk = Chunk {
            id,
            kind: draft.tag(),
            name: draft.name().to_owned(),
            language: tree.language().to_owned(),
            span,
            parent: parent.map(|outer| outer.id.clone()),
            children: Vec::new(),
            documentation: draft.documentation().map(str::to_owned),
            breadcrumb: ancestry.join("::"),
            depth: ancestry.len(),
            ancestry,
            byte_length: span.len(),
            estimated_tokens: Chunk::estimate_tokens(span.len()),
            leading_trivia: owned_lines(draft.leading_trivia()),
            trailing_trivia: owned_lines(draft.trailing_trivia()),
            text: config.include_text().then(|| draft.text().to_owned()),
        };

        if let Some(outer) = draft.parent().and_then(|index| chunks.get_mut(index)) {
            outer.children.push(chunk.id.clone());
        }
        chunks.push(chunk);
    }

    chunks
}

fn owned_lines(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|&line| line.to_owned()).collect()
}
