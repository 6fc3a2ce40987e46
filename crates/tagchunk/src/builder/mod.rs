//! Turns filtered rule matches into a nested chunk tree.
//!
//! Building runs in fixed steps: tagged captures become candidates, spans
//! that cannot be chunks are dropped, identical spans are reduced to one
//! winner, the survivors are nested by containment, and finally names and
//! documentation are resolved. Every step is a pure function of its input,
//! so the same matches always give the same tree.

mod candidates;
mod docs;
mod naming;
mod nesting;
mod trivia;

use std::borrow::Cow;

use tagchunk_core::{Diagnostic, EngineConfig, Span, Tag};
use tagchunk_syntax::SyntaxNode;
use tracing::debug;

use crate::TARGET;
use crate::matcher::RuleMatch;
use crate::rule::LanguageRuleSet;
use nesting::Forest;

/// A chunk that has been placed in the tree but not yet normalised.
///
/// Text is borrowed from the source buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftChunk<'s> {
    tag: Tag,
    name: Cow<'s, str>,
    span: Span,
    text: &'s str,
    parent: Option<usize>,
    children: Vec<usize>,
    documentation: Option<Cow<'s, str>>,
    leading_trivia: Vec<&'s str>,
    trailing_trivia: Vec<&'s str>,
    rule: usize,
}

impl<'s> DraftChunk<'s> {
    /// Returns the chunk tag.
    #[must_use]
    pub const fn tag(&self) -> Tag {
        self.tag
    }

    /// Returns the resolved name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the chunk span.
    #[must_use]
    pub const fn span(&self) -> &Span {
        &self.span
    }

    /// Returns the source text covered by the span.
    #[must_use]
    pub const fn text(&self) -> &'s str {
        self.text
    }

    /// Returns the index of the enclosing chunk.
    #[must_use]
    pub const fn parent(&self) -> Option<usize> {
        self.parent
    }

    /// Returns the indices of the nested chunks in source order.
    #[must_use]
    pub fn children(&self) -> &[usize] {
        &self.children
    }

    /// Returns attached documentation.
    #[must_use]
    pub fn documentation(&self) -> Option<&str> {
        self.documentation.as_deref()
    }

    /// Returns the untagged lines directly above the chunk.
    #[must_use]
    pub fn leading_trivia(&self) -> &[&'s str] {
        &self.leading_trivia
    }

    /// Returns the text trailing the chunk on its last line.
    #[must_use]
    pub fn trailing_trivia(&self) -> &[&'s str] {
        &self.trailing_trivia
    }

    /// Returns the declaration index of the rule that produced the chunk.
    #[must_use]
    pub const fn rule(&self) -> usize {
        self.rule
    }
}

/// Chunks for one file, stored in pre-order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkTree<'s> {
    language: String,
    source: &'s str,
    chunks: Vec<DraftChunk<'s>>,
    roots: Vec<usize>,
}

impl<'s> ChunkTree<'s> {
    /// Returns the language of the rules that built the tree.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Returns the source the chunks borrow from.
    #[must_use]
    pub const fn source(&self) -> &'s str {
        self.source
    }

    /// Returns every chunk in pre-order.
    #[must_use]
    pub fn chunks(&self) -> &[DraftChunk<'s>] {
        &self.chunks
    }

    /// Returns the chunk at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&DraftChunk<'s>> {
        self.chunks.get(index)
    }

    /// Returns the indices of top-level chunks.
    #[must_use]
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    /// Returns the number of chunks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Returns `true` when no chunk was built.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

/// Builds the chunk tree for one file from predicate-filtered matches.
///
/// Matches that cannot become chunks are dropped and reported through
/// `diagnostics`.
pub fn build<'s, 't, N: SyntaxNode<'t>>(
    matches: &[RuleMatch<N>],
    rules: &LanguageRuleSet,
    source: &'s str,
    config: &EngineConfig,
    diagnostics: &mut Vec<Diagnostic>,
) -> ChunkTree<'s> {
    let mut found = candidates::collect(matches, rules, source, diagnostics);
    let collected = found.len();
    candidates::resolve_overlaps(&mut found);
    debug!(
        target: TARGET,
        language = rules.language(),
        candidates = collected,
        kept = found.len(),
        "resolved overlapping candidates"
    );

    let forest = nesting::nest(found, rules, diagnostics);
    let names: Vec<Cow<'s, str>> = forest
        .nodes
        .iter()
        .map(|node| naming::resolve(&node.candidate, rules, source, config.max_name_bytes()))
        .collect();

    let mut absorbed = vec![false; forest.nodes.len()];
    let mut documentation: Vec<Option<Cow<'s, str>>> = vec![None; forest.nodes.len()];
    if config.attach_documentation() {
        for attachment in docs::plan(&forest) {
            for &doc in &attachment.docs {
                if let Some(flag) = absorbed.get_mut(doc) {
                    *flag = true;
                }
            }
            if let Some(slot) = documentation.get_mut(attachment.target) {
                *slot = docs::join(&attachment.docs, &forest, source);
            }
        }
    }

    assemble(
        rules.language(),
        source,
        &forest,
        Resolved {
            names,
            documentation,
            trivia: trivia::collect(&forest, source),
            absorbed,
        },
    )
}

/// Per-node results computed after nesting.
struct Resolved<'s> {
    names: Vec<Cow<'s, str>>,
    documentation: Vec<Option<Cow<'s, str>>>,
    trivia: Vec<trivia::Trivia<'s>>,
    absorbed: Vec<bool>,
}

/// Lays the forest out in pre-order, skipping absorbed documentation.
fn assemble<'s, N>(
    language: &str,
    source: &'s str,
    forest: &Forest<'_, N>,
    mut resolved: Resolved<'s>,
) -> ChunkTree<'s> {
    let mut chunks: Vec<DraftChunk<'s>> = Vec::with_capacity(forest.nodes.len());
    let mut roots = Vec::new();
    let mut pending: Vec<(usize, Option<usize>)> =
        forest.roots.iter().rev().map(|&index| (index, None)).collect();

    while let Some((index, parent)) = pending.pop() {
        let Some(node) = forest.nodes.get(index) else {
            continue;
        };
        if resolved.absorbed.get(index).copied().unwrap_or(false) {
            continue;
        }
        let span = node.candidate.span;
        let mut around = resolved
            .trivia
            .get_mut(index)
            .map(std::mem::take)
            .unwrap_or_default();
        let position = chunks.len();
        match parent.and_then(|outer| chunks.get_mut(outer)) {
            Some(outer) => outer.children.push(position),
            None => roots.push(position),
        }
        chunks.push(DraftChunk {
            tag: node.candidate.tag,
            name: resolved
                .names
                .get_mut(index)
                .map(std::mem::take)
                .unwrap_or_default(),
            span,
            text: source.get(span.byte_range()).unwrap_or_default(),
            parent,
            children: Vec::new(),
            documentation: resolved
                .documentation
                .get_mut(index)
                .and_then(Option::take),
            leading_trivia: std::mem::take(&mut around.leading),
            trailing_trivia: std::mem::take(&mut around.trailing),
            rule: node.candidate.rule,
        });
        pending.extend(
            node.children
                .iter()
                .rev()
                .map(|&child| (child, Some(position))),
        );
    }

    ChunkTree {
        language: language.to_owned(),
        source,
        chunks,
        roots,
    }
}
