//! Parent/child assignment by span containment.

use tagchunk_core::{Diagnostic, DiagnosticCode};

use super::candidates::Candidate;
use crate::rule::LanguageRuleSet;

/// A candidate with its place in the hierarchy.
#[derive(Debug)]
pub(super) struct Placed<'m, N> {
    pub(super) candidate: Candidate<'m, N>,
    pub(super) children: Vec<usize>,
}

/// The forest produced by [`nest`].
#[derive(Debug)]
pub(super) struct Forest<'m, N> {
    pub(super) nodes: Vec<Placed<'m, N>>,
    pub(super) roots: Vec<usize>,
}

/// Nests candidates sorted by `(start asc, end desc)` without duplicates.
///
/// Each candidate becomes a child of the innermost open candidate that
/// contains it. A candidate that starts inside an open candidate but ends
/// past it crosses that boundary and is dropped.
pub(super) fn nest<'m, N>(
    candidates: Vec<Candidate<'m, N>>,
    rules: &LanguageRuleSet,
    diagnostics: &mut Vec<Diagnostic>,
) -> Forest<'m, N> {
    let mut nodes: Vec<Placed<'m, N>> = Vec::with_capacity(candidates.len());
    let mut roots = Vec::new();
    let mut open: Vec<usize> = Vec::new();

    for candidate in candidates {
        while let Some(top) = open.last().and_then(|&index| nodes.get(index)) {
            if top.candidate.span.end_byte <= candidate.span.start_byte {
                open.pop();
            } else {
                break;
            }
        }

        let parent = open.last().copied();
        if let Some(outer) = parent.and_then(|index| nodes.get(index))
            && !outer.candidate.span.contains(&candidate.span)
        {
            diagnostics.push(
                Diagnostic::new(
                    DiagnosticCode::CrossingSpan,
                    format!(
                        "'{}' capture crosses the boundary of an enclosing '{}' chunk; match dropped",
                        candidate.tag.capture_name(),
                        outer.candidate.tag.capture_name()
                    ),
                )
                .with_span(candidate.span)
                .with_rule(rules.rule_label(candidate.rule).to_string()),
            );
            continue;
        }

        let index = nodes.len();
        match parent.and_then(|outer| nodes.get_mut(outer)) {
            Some(outer) => outer.children.push(index),
            None => roots.push(index),
        }
        nodes.push(Placed {
            candidate,
            children: Vec::new(),
        });
        open.push(index);
    }

    Forest { nodes, roots }
}
