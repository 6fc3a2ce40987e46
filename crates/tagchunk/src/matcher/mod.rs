//! Applies a language's rules to a syntax tree.
//!
//! The tree is walked in pre-order. At every node each rule is tried in
//! declaration order, and every distinct way the rule binds at that node is
//! reported as a [`RuleMatch`]. Overlapping or nested matches are all kept;
//! choosing between them is the chunk builder's job.

mod matching;

use std::collections::HashSet;

use tagchunk_core::{Diagnostic, DiagnosticCode, EngineConfig, Span, Tag};
use tagchunk_syntax::SyntaxNode;
use tracing::warn;

use crate::TARGET;
use crate::cancel::CancellationToken;
use crate::error::ExtractError;
use crate::rule::{LanguageRuleSet, PatternRule};
use matching::{Flow, match_pattern};

/// A capture bound to a node in one match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding<N> {
    /// Index into the rule's capture table.
    pub capture: usize,
    /// The bound node.
    pub node: N,
}

/// One successful structural match of a rule at a node.
#[derive(Debug, Clone)]
pub struct RuleMatch<N> {
    rule: usize,
    node: N,
    bindings: Vec<Binding<N>>,
}

impl<'t, N: SyntaxNode<'t>> RuleMatch<N> {
    /// Returns the declaration index of the matching rule.
    #[must_use]
    pub const fn rule(&self) -> usize {
        self.rule
    }

    /// Returns the node the rule's outermost pattern matched.
    #[must_use]
    pub const fn node(&self) -> N {
        self.node
    }

    /// Returns every binding, including `name` and internal captures.
    #[must_use]
    pub fn bindings(&self) -> &[Binding<N>] {
        &self.bindings
    }

    /// Describes each binding as a [`CaptureMatch`].
    #[must_use]
    pub fn captures<'r>(&self, rule: &'r PatternRule) -> Vec<CaptureMatch<'r>> {
        let match_span = self.node.span();
        self.bindings
            .iter()
            .map(|binding| CaptureMatch {
                rule: self.rule,
                capture: rule.capture_name(binding.capture).unwrap_or_default(),
                tag: rule.capture_role(binding.capture).and_then(|role| role.tag()),
                span: binding.node.span(),
                match_span,
            })
            .collect()
    }

    /// Like [`captures`](Self::captures), restricted to tag-bearing
    /// captures.
    #[must_use]
    pub fn tagged_captures<'r>(&self, rule: &'r PatternRule) -> Vec<CaptureMatch<'r>> {
        let mut captures = self.captures(rule);
        captures.retain(|capture| capture.tag.is_some());
        captures
    }
}

/// A capture as seen from outside the matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureMatch<'r> {
    /// Declaration index of the producing rule.
    pub rule: usize,
    /// Capture name without the `@`.
    pub capture: &'r str,
    /// Tag carried by the capture, if it is tag-bearing.
    pub tag: Option<Tag>,
    /// Span of the captured node.
    pub span: Span,
    /// Span of the node the whole rule matched.
    pub match_span: Span,
}

/// Raw matches for one tree plus any limit diagnostics.
#[derive(Debug, Clone)]
pub struct MatchOutput<N> {
    /// Matches in pre-order of their node, then rule declaration order.
    pub matches: Vec<RuleMatch<N>>,
    /// Diagnostics for rules that hit the per-rule match limit.
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Default, Clone, Copy)]
struct RuleBudget {
    kept: usize,
    exhausted: bool,
}

/// Finds every structural match of `rules` in the tree rooted at `root`.
///
/// # Errors
///
/// Returns [`ExtractError::Cancelled`] if `cancel` fires; the token is
/// checked once per visited node.
pub fn match_tree<'t, N: SyntaxNode<'t>>(
    root: N,
    rules: &LanguageRuleSet,
    config: &EngineConfig,
    cancel: &CancellationToken,
) -> Result<MatchOutput<N>, ExtractError> {
    let limit = config.max_matches_per_rule();
    let mut budgets = vec![RuleBudget::default(); rules.len()];
    let mut matches = Vec::new();
    let mut diagnostics = Vec::new();
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        if cancel.is_cancelled() {
            return Err(ExtractError::Cancelled);
        }

        for (rule, budget) in rules.rules().iter().zip(budgets.iter_mut()) {
            if budget.exhausted {
                continue;
            }
            let found = matches_at(node, rule, budget, limit);
            if budget.exhausted {
                warn!(
                    target: TARGET,
                    language = rules.language(),
                    rule = rule.index(),
                    limit,
                    "rule exceeded its match limit"
                );
                diagnostics.push(
                    Diagnostic::new(
                        DiagnosticCode::MatchLimitExceeded,
                        format!("rule produced more than {limit} matches; the rest were discarded"),
                    )
                    .with_rule(rules.rule_label(rule.index()).to_string()),
                );
            }
            matches.extend(found);
        }

        stack.extend(node.children().into_iter().rev().map(|child| child.node));
    }

    Ok(MatchOutput {
        matches,
        diagnostics,
    })
}

fn matches_at<'t, N: SyntaxNode<'t>>(
    node: N,
    rule: &PatternRule,
    budget: &mut RuleBudget,
    limit: usize,
) -> Vec<RuleMatch<N>> {
    let mut seen: HashSet<Vec<(usize, usize, usize)>> = HashSet::new();
    let mut found = Vec::new();
    let mut scratch = Vec::new();

    match_pattern(node, rule.pattern(), &mut scratch, &mut |bindings| {
        let key = bindings
            .iter()
            .map(|binding| {
                let range = binding.node.byte_range();
                (binding.capture, range.start, range.end)
            })
            .collect();
        if !seen.insert(key) {
            return Flow::Accepted;
        }
        if budget.kept >= limit {
            budget.exhausted = true;
            return Flow::Stop;
        }
        budget.kept += 1;
        found.push(RuleMatch {
            rule: rule.index(),
            node,
            bindings: bindings.clone(),
        });
        Flow::Accepted
    });

    found
}
