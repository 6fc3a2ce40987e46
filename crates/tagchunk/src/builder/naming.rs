//! Chunk name resolution.

use std::borrow::Cow;

use tagchunk_syntax::SyntaxNode;

use super::candidates::Candidate;
use crate::rule::{CaptureRole, LanguageRuleSet};

/// Resolves a candidate's display name.
///
/// The first `@name` binding inside the chunk wins. Failing that, the
/// identifier-shaped binding closest to the chunk's start is used. Chunks
/// with neither get a synthesised `kind@line` name.
pub(super) fn resolve<'s, 't, N: SyntaxNode<'t>>(
    candidate: &Candidate<'_, N>,
    rules: &LanguageRuleSet,
    source: &'s str,
    max_bytes: usize,
) -> Cow<'s, str> {
    let declared = rules.rule(candidate.rule).and_then(|rule| {
        candidate
            .found
            .bindings()
            .iter()
            .filter(|binding| rule.capture_role(binding.capture) == Some(CaptureRole::Name))
            .filter_map(|binding| binding_text(binding.node, candidate, source))
            .min_by_key(|(start, _)| *start)
    });
    let inferred = || {
        candidate
            .found
            .bindings()
            .iter()
            .filter(|binding| is_identifier_shaped(binding.node, source))
            .filter_map(|binding| binding_text(binding.node, candidate, source))
            .min_by_key(|(start, _)| *start)
    };

    declared
        .or_else(inferred)
        .map(|(_, text)| truncate(text, max_bytes))
        .filter(|name| !name.is_empty())
        .map_or_else(|| Cow::Owned(synthesised(candidate)), Cow::Borrowed)
}

/// Trimmed, non-empty text of a binding lying inside the candidate.
fn binding_text<'s, 't, N: SyntaxNode<'t>>(
    node: N,
    candidate: &Candidate<'_, N>,
    source: &'s str,
) -> Option<(usize, &'s str)> {
    let span = node.span();
    if !candidate.span.contains(&span) {
        return None;
    }
    let text = source.get(span.byte_range())?.trim();
    (!text.is_empty()).then_some((span.start_byte, text))
}

fn is_identifier_shaped<'t, N: SyntaxNode<'t>>(node: N, source: &str) -> bool {
    node.kind().contains("identifier")
        || source
            .get(node.byte_range())
            .is_some_and(is_identifier_token)
}

/// `true` for a single word made of letters, digits and underscores that
/// does not start with a digit.
pub(super) fn is_identifier_token(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .is_some_and(|first| first == '_' || first.is_alphabetic())
        && chars.all(|rest| rest == '_' || rest.is_alphanumeric())
}

/// Cuts `text` to at most `max_bytes`, backing off to a character boundary.
pub(super) fn truncate(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }
    let boundary = (0..=max_bytes)
        .rev()
        .find(|&end| text.is_char_boundary(end))
        .unwrap_or(0);
    text.get(..boundary).unwrap_or_default().trim_end()
}

fn synthesised<N>(candidate: &Candidate<'_, N>) -> String {
    format!(
        "{}@{}",
        candidate.tag.as_str(),
        candidate.span.start.display_line()
    )
}
