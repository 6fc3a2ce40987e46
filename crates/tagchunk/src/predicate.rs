//! Text predicates on captures and their per-file cache.
//!
//! A rule's predicates are checked against the source text of every binding
//! of the capture they name. A match survives only if every predicate holds
//! for every binding. Results are memoised per predicate and text for the
//! lifetime of one [`PredicateEvaluator`], which covers a single file.

use std::collections::HashMap;

use regex::Regex;
use tagchunk_core::{Diagnostic, DiagnosticCode};
use tagchunk_syntax::SyntaxNode;
use tracing::debug;

use crate::TARGET;
use crate::error::ConfigError;
use crate::matcher::{Binding, RuleMatch};
use crate::query::ast::CaptureId;
use crate::query::{PredicateArg, RawPredicate};
use crate::rule::{LanguageRuleSet, PatternRule};

#[derive(Debug, Clone)]
enum TextTest {
    /// The text equals one of the alternatives.
    OneOf(Vec<String>),
    /// The regex finds a match anywhere in the text.
    Matches(Regex),
}

/// A compiled `#eq?`, `#any-of?` or `#match?` predicate, possibly negated.
#[derive(Debug, Clone)]
pub struct Predicate {
    capture: CaptureId,
    test: TextTest,
    negated: bool,
}

impl Predicate {
    /// Returns the capture this predicate inspects.
    #[must_use]
    pub(crate) const fn capture(&self) -> CaptureId {
        self.capture
    }

    /// Evaluates the predicate against one capture text.
    #[must_use]
    pub fn test(&self, text: &str) -> bool {
        let hit = match &self.test {
            TextTest::OneOf(alternatives) => alternatives.iter().any(|alt| alt == text),
            TextTest::Matches(regex) => regex.is_match(text),
        };
        hit != self.negated
    }
}

/// What a `#...` form in rule text turned out to be.
#[derive(Debug, Clone)]
pub(crate) enum Directive {
    Predicate(Predicate),
    /// `(#set! generic)`: the rule is a generic fallback.
    Generic,
}

/// Identifies the rule being compiled, for error reporting.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RuleContext<'a> {
    pub(crate) language: &'a str,
    pub(crate) rule: usize,
}

impl RuleContext<'_> {
    fn invalid(self, message: impl Into<String>) -> ConfigError {
        ConfigError::InvalidPredicate {
            language: self.language.to_owned(),
            rule: self.rule,
            message: message.into(),
        }
    }
}

/// Compiles a raw predicate against the rule's capture table.
pub(crate) fn compile(
    raw: &RawPredicate,
    captures: &[String],
    ctx: RuleContext<'_>,
) -> Result<Directive, ConfigError> {
    let name = raw.name.as_str();
    if name == "set!" {
        return compile_property(raw, ctx);
    }

    let (negated, base) = name
        .strip_prefix("not-")
        .map_or((false, name), |rest| (true, rest));

    let mut args = raw.args.iter();
    let capture = match args.next() {
        Some(PredicateArg::Capture(capture)) => capture,
        _ => return Err(ctx.invalid(format!("#{name} expects a capture first"))),
    };
    let Some(capture_id) = captures.iter().position(|known| known == capture) else {
        return Err(ConfigError::UnboundPredicateCapture {
            language: ctx.language.to_owned(),
            rule: ctx.rule,
            capture: capture.clone(),
        });
    };

    let literals = args
        .map(|arg| match arg {
            PredicateArg::Literal(text) => Ok(text.clone()),
            PredicateArg::Capture(other) => Err(ctx.invalid(format!(
                "#{name} compares against '@{other}'; only literal arguments are supported"
            ))),
        })
        .collect::<Result<Vec<_>, _>>()?;

    let test = match base {
        "eq?" => TextTest::OneOf(exactly_one(literals, name, ctx)?.into_iter().collect()),
        "any-of?" => {
            if literals.is_empty() {
                return Err(ctx.invalid(format!("#{name} expects at least one string")));
            }
            TextTest::OneOf(literals)
        }
        "match?" => {
            let pattern = exactly_one(literals, name, ctx)?.unwrap_or_default();
            let regex = Regex::new(&pattern).map_err(|err| ConfigError::InvalidRegex {
                language: ctx.language.to_owned(),
                rule: ctx.rule,
                pattern: pattern.clone(),
                message: err.to_string(),
            })?;
            TextTest::Matches(regex)
        }
        _ => return Err(ctx.invalid(format!("unknown predicate #{name}"))),
    };

    Ok(Directive::Predicate(Predicate {
        capture: capture_id,
        test,
        negated,
    }))
}

fn exactly_one(
    literals: Vec<String>,
    name: &str,
    ctx: RuleContext<'_>,
) -> Result<Option<String>, ConfigError> {
    if literals.len() != 1 {
        return Err(ctx.invalid(format!("#{name} expects exactly one string")));
    }
    Ok(literals.into_iter().next())
}

fn compile_property(raw: &RawPredicate, ctx: RuleContext<'_>) -> Result<Directive, ConfigError> {
    let mut args = raw.args.iter();
    let key = match args.next() {
        Some(PredicateArg::Literal(key)) => key.as_str(),
        _ => return Err(ctx.invalid("#set! expects a property name")),
    };
    let value = match args.next() {
        None => None,
        Some(PredicateArg::Literal(value)) => Some(value.as_str()),
        Some(PredicateArg::Capture(_)) => {
            return Err(ctx.invalid("#set! values must be literals"));
        }
    };
    if args.next().is_some() {
        return Err(ctx.invalid("#set! takes a property name and an optional value"));
    }
    match (key, value) {
        ("generic", None | Some("true")) => Ok(Directive::Generic),
        ("generic", Some(other)) => Err(ctx.invalid(format!(
            "property 'generic' only accepts \"true\", got \"{other}\""
        ))),
        (other, _) => Err(ctx.invalid(format!("unknown property '{other}'"))),
    }
}

/// Outcome of checking one rule match against its predicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Verdict {
    Keep,
    Reject,
    /// A predicate named a capture that did not bind in this match.
    Unbound(String),
}

/// Evaluates predicates for one file, caching results by text.
#[derive(Debug)]
pub(crate) struct PredicateEvaluator<'s> {
    source: &'s str,
    cache: HashMap<(usize, usize, &'s str), bool>,
}

impl<'s> PredicateEvaluator<'s> {
    pub(crate) fn new(source: &'s str) -> Self {
        Self {
            source,
            cache: HashMap::new(),
        }
    }

    /// Checks every predicate of `rule` against a match's bindings.
    pub(crate) fn evaluate<'t, N: SyntaxNode<'t>>(
        &mut self,
        rule: &PatternRule,
        bindings: &[Binding<N>],
    ) -> Verdict {
        for (index, predicate) in rule.predicates().iter().enumerate() {
            let mut bound = false;
            for binding in bindings.iter().filter(|b| b.capture == predicate.capture()) {
                bound = true;
                let text = self.source.get(binding.node.byte_range()).unwrap_or_default();
                let key = (rule.index(), index, text);
                let passed = *self
                    .cache
                    .entry(key)
                    .or_insert_with(|| predicate.test(text));
                if !passed {
                    return Verdict::Reject;
                }
            }
            if !bound {
                let name = rule.capture_name(predicate.capture()).unwrap_or_default();
                return Verdict::Unbound(name.to_owned());
            }
        }
        Verdict::Keep
    }

    #[cfg(test)]
    pub(crate) fn cached_results(&self) -> usize {
        self.cache.len()
    }
}

/// Drops matches whose predicates fail.
///
/// A match whose predicate names a capture that did not bind is dropped
/// too, and reported as a diagnostic.
pub fn filter_matches<'t, N: SyntaxNode<'t>>(
    matches: &mut Vec<RuleMatch<N>>,
    rules: &LanguageRuleSet,
    source: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let mut evaluator = PredicateEvaluator::new(source);
    let before = matches.len();
    matches.retain(|found| {
        let Some(rule) = rules.rule(found.rule()) else {
            return false;
        };
        match evaluator.evaluate(rule, found.bindings()) {
            Verdict::Keep => true,
            Verdict::Reject => false,
            Verdict::Unbound(capture) => {
                diagnostics.push(
                    Diagnostic::new(
                        DiagnosticCode::UnboundPredicateCapture,
                        format!("predicate capture '@{capture}' did not bind; match dropped"),
                    )
                    .with_span(found.node().span())
                    .with_rule(rules.rule_label(rule.index()).to_string()),
                );
                false
            }
        }
    });
    debug!(
        target: TARGET,
        language = rules.language(),
        kept = matches.len(),
        rejected = before - matches.len(),
        "applied predicates"
    );
}
