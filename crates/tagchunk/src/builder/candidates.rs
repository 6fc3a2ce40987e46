//! Tagged captures turned into chunk candidates, and overlap resolution.

use std::cmp::Reverse;

use tagchunk_core::{Diagnostic, DiagnosticCode, Span, Tag};
use tagchunk_syntax::SyntaxNode;

use crate::matcher::RuleMatch;
use crate::rule::{CaptureRole, LanguageRuleSet};

/// A tag-bearing capture that may become a chunk.
#[derive(Debug)]
pub(super) struct Candidate<'m, N> {
    pub(super) tag: Tag,
    pub(super) span: Span,
    pub(super) rule: usize,
    pub(super) capture: usize,
    pub(super) generic: bool,
    pub(super) found: &'m RuleMatch<N>,
}

impl<N> Candidate<'_, N> {
    /// Sort key: source position first, outer spans before inner ones, then
    /// the winner among identical spans.
    const fn order_key(&self) -> (usize, Reverse<usize>, bool, Reverse<u8>, usize, usize) {
        (
            self.span.start_byte,
            Reverse(self.span.end_byte),
            self.generic,
            Reverse(self.tag.specificity()),
            self.rule,
            self.capture,
        )
    }
}

/// Flattens matches into candidates, dropping malformed spans.
pub(super) fn collect<'m, 't, N: SyntaxNode<'t>>(
    matches: &'m [RuleMatch<N>],
    rules: &LanguageRuleSet,
    source: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<Candidate<'m, N>> {
    let mut candidates = Vec::new();
    for found in matches {
        let Some(rule) = rules.rule(found.rule()) else {
            continue;
        };
        for binding in found.bindings() {
            let Some(tag) = rule.capture_role(binding.capture).and_then(CaptureRole::tag) else {
                continue;
            };
            let span = binding.node.span();
            if let Some((code, problem)) = span_problem(&span, source) {
                let message = format!("'{}' capture {problem}; match dropped", tag.capture_name());
                diagnostics.push(
                    Diagnostic::new(code, message)
                        .with_span(span)
                        .with_rule(rules.rule_label(rule.index()).to_string()),
                );
                continue;
            }
            candidates.push(Candidate {
                tag,
                span,
                rule: rule.index(),
                capture: binding.capture,
                generic: rule.is_generic(),
                found,
            });
        }
    }
    candidates
}

fn span_problem(span: &Span, source: &str) -> Option<(DiagnosticCode, &'static str)> {
    if span.is_inverted() {
        Some((DiagnosticCode::InvertedSpan, "ends before it starts"))
    } else if span.is_empty() {
        Some((DiagnosticCode::EmptySpan, "is empty"))
    } else if source.get(span.byte_range()).is_none() {
        Some((DiagnosticCode::SpanOutOfBounds, "lies outside the source"))
    } else {
        None
    }
}

/// Sorts candidates into nesting order and keeps one winner per span.
///
/// Among identical spans a non-generic rule beats a generic one, then the
/// more specific tag wins, then the earlier rule, then the earlier capture.
pub(super) fn resolve_overlaps<N>(candidates: &mut Vec<Candidate<'_, N>>) {
    candidates.sort_by_key(Candidate::order_key);
    candidates.dedup_by(|later, kept| later.span.same_bytes(&kept.span));
}
