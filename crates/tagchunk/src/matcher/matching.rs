//! Structural matching of compiled patterns against syntax nodes.
//!
//! Matching is written in continuation-passing style so that every way a
//! pattern can bind is reported: `next` is called once per successful
//! binding set and answers whether it accepted the match or wants the
//! enumeration stopped. Bindings are pushed onto a
//! shared vector and truncated on the way back, so alternatives never see
//! each other's captures.

use tagchunk_syntax::{ChildNode, SyntaxNode};

use super::Binding;
use crate::query::ast::{ChildSequence, Pattern, PatternKind, Quantifier};

/// Outcome of offering binding sets to a continuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Flow {
    /// Nothing was accepted; keep enumerating.
    Continue,
    /// At least one complete match was accepted; keep enumerating.
    Accepted,
    /// Stop enumerating.
    Stop,
}

impl Flow {
    /// Combines the outcomes of two enumeration branches.
    const fn or(self, other: Self) -> Self {
        match (self, other) {
            (Self::Stop, _) | (_, Self::Stop) => Self::Stop,
            (Self::Accepted, _) | (_, Self::Accepted) => Self::Accepted,
            (Self::Continue, Self::Continue) => Self::Continue,
        }
    }
}

pub(super) type Next<'a, N> = dyn FnMut(&mut Vec<Binding<N>>) -> Flow + 'a;

/// Reports every binding set under which `node` matches `pattern`.
pub(super) fn match_pattern<'t, N: SyntaxNode<'t>>(
    node: N,
    pattern: &Pattern,
    bindings: &mut Vec<Binding<N>>,
    next: &mut Next<'_, N>,
) -> Flow {
    let mut bind_self = |bound: &mut Vec<Binding<N>>| {
        let mark = bound.len();
        bound.extend(pattern.captures.iter().map(|&capture| Binding { capture, node }));
        let flow = next(bound);
        bound.truncate(mark);
        flow
    };

    match &pattern.kind {
        PatternKind::Wildcard => bind_self(bindings),
        PatternKind::Anonymous(text) => {
            if !node.is_named() && node.kind() == text {
                bind_self(bindings)
            } else {
                Flow::Continue
            }
        }
        PatternKind::Alternation(alternatives) => {
            let mut outcome = Flow::Continue;
            for alternative in alternatives {
                outcome = outcome.or(match_pattern(node, alternative, bindings, &mut bind_self));
                if outcome == Flow::Stop {
                    break;
                }
            }
            outcome
        }
        PatternKind::Named {
            kind,
            children,
            absent_fields,
        } => {
            if !node.is_named() || kind.as_deref().is_some_and(|expected| node.kind() != expected) {
                return Flow::Continue;
            }
            let node_children = node.children();
            let has_absent_field = absent_fields.iter().any(|field| {
                node_children
                    .iter()
                    .any(|child| child.field == Some(field.as_str()))
            });
            if has_absent_field {
                return Flow::Continue;
            }
            SequenceMatcher {
                children: &node_children,
                sequence: children,
            }
            .matches(Cursor::START, bindings, &mut bind_self)
        }
    }
}

/// Position within the child list and the pattern's child items.
#[derive(Debug, Clone, Copy)]
struct Cursor {
    /// Next candidate child index.
    child: usize,
    /// Current pattern item.
    item: usize,
    /// Repetitions of the current item matched so far.
    repeats: usize,
    /// Index of the last child consumed by any item.
    last: Option<usize>,
}

impl Cursor {
    const START: Self = Self {
        child: 0,
        item: 0,
        repeats: 0,
        last: None,
    };
}

/// Backtracking matcher for a node pattern's child items.
///
/// Items match an ordered subsequence of the children. An unquantified item
/// is tried against every remaining child, so a rule matches once per
/// qualifying child. Quantified items are greedy: once taking another child
/// leads to an accepted match, fewer repetitions are not tried. When it
/// leads nowhere the item falls back to later children and then to fewer
/// repetitions. Named patterns never match anonymous tokens, so tokens
/// between items are skipped naturally. Anchors forbid named children
/// between the anchored positions.
struct SequenceMatcher<'c, 't, N> {
    children: &'c [ChildNode<'t, N>],
    sequence: &'c ChildSequence,
}

impl<'t, N: SyntaxNode<'t>> SequenceMatcher<'_, 't, N> {
    fn matches(
        &self,
        cursor: Cursor,
        bindings: &mut Vec<Binding<N>>,
        next: &mut Next<'_, N>,
    ) -> Flow {
        let Some(item) = self.sequence.items.get(cursor.item) else {
            let trailing = self.only_anonymous(after(cursor.last), self.children.len());
            if self.sequence.anchored_end && !trailing {
                return Flow::Continue;
            }
            return next(bindings);
        };

        let mut outcome = Flow::Continue;
        if cursor.repeats < item.quantifier.max() {
            let touching = cursor.repeats == 0
                && (item.adjacent || (cursor.item == 0 && self.sequence.anchored_start));
            let greedy = item.quantifier != Quantifier::One;

            for index in cursor.child..self.children.len() {
                if touching && !self.only_anonymous(after(cursor.last), index) {
                    break;
                }
                let Some(child) = self.children.get(index) else {
                    break;
                };
                if item
                    .field
                    .as_deref()
                    .is_some_and(|field| child.field != Some(field))
                {
                    continue;
                }

                let flow = match_pattern(child.node, &item.pattern, bindings, &mut |bound| {
                    self.matches(
                        Cursor {
                            child: index + 1,
                            item: cursor.item,
                            repeats: cursor.repeats + 1,
                            last: Some(index),
                        },
                        bound,
                        &mut *next,
                    )
                });
                outcome = outcome.or(flow);
                if outcome == Flow::Stop || (greedy && outcome == Flow::Accepted) {
                    return outcome;
                }
            }
        }

        if cursor.repeats >= item.quantifier.min() {
            let skipped = self.matches(
                Cursor {
                    child: cursor.child,
                    item: cursor.item + 1,
                    repeats: 0,
                    last: cursor.last,
                },
                bindings,
                next,
            );
            return outcome.or(skipped);
        }
        outcome
    }

    /// Returns `true` when no named child lies in `start..end`.
    fn only_anonymous(&self, start: usize, end: usize) -> bool {
        self.children
            .get(start..end)
            .is_none_or(|between| between.iter().all(|child| !child.node.is_named()))
    }
}

const fn after(last: Option<usize>) -> usize {
    match last {
        Some(index) => index + 1,
        None => 0,
    }
}
