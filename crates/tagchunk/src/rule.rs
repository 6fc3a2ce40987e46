//! Compiled rules and per-language rule sets.

use std::fmt;

use tagchunk_core::Tag;

use crate::error::ConfigError;
use crate::predicate::{self, Directive, Predicate, RuleContext};
use crate::query::ast::{CaptureId, Pattern};
use crate::query::{ParsedRule, parse_rules};

/// Capture name that supplies a chunk's name.
pub const NAME_CAPTURE: &str = "name";

/// Prefix reserved for captures used only by predicates.
pub const INTERNAL_PREFIX: char = '_';

/// What a capture contributes to extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureRole {
    /// Marks a chunk of the given kind.
    Tag(Tag),
    /// Supplies the enclosing chunk's name.
    Name,
    /// Visible to predicates and name lookup only; never emitted.
    Internal,
}

impl CaptureRole {
    /// Classifies a capture name, or returns `None` when it is outside the
    /// capture vocabulary.
    #[must_use]
    pub fn classify(name: &str) -> Option<Self> {
        if name == NAME_CAPTURE {
            return Some(Self::Name);
        }
        if name.starts_with(INTERNAL_PREFIX) {
            return Some(Self::Internal);
        }
        Tag::from_capture_name(name).map(Self::Tag)
    }

    /// Returns the tag for tag-bearing captures.
    #[must_use]
    pub const fn tag(self) -> Option<Tag> {
        match self {
            Self::Tag(tag) => Some(tag),
            Self::Name | Self::Internal => None,
        }
    }
}

#[derive(Debug, Clone)]
struct CaptureSpec {
    name: String,
    role: CaptureRole,
}

/// One compiled rule: a structural pattern with classified captures and
/// predicates.
#[derive(Debug, Clone)]
pub struct PatternRule {
    index: usize,
    pattern: Pattern,
    captures: Vec<CaptureSpec>,
    predicates: Vec<Predicate>,
    generic: bool,
}

impl PatternRule {
    fn compile(language: &str, index: usize, parsed: ParsedRule) -> Result<Self, ConfigError> {
        let captures = parsed
            .captures
            .iter()
            .map(|name| {
                CaptureRole::classify(name)
                    .map(|role| CaptureSpec {
                        name: name.clone(),
                        role,
                    })
                    .ok_or_else(|| ConfigError::UnknownCapture {
                        language: language.to_owned(),
                        rule: index,
                        capture: name.clone(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if !captures.iter().any(|spec| spec.role.tag().is_some()) {
            return Err(ConfigError::MissingTag {
                language: language.to_owned(),
                rule: index,
            });
        }

        let ctx = RuleContext {
            language,
            rule: index,
        };
        let mut predicates = Vec::new();
        let mut generic = false;
        for raw in &parsed.predicates {
            match predicate::compile(raw, &parsed.captures, ctx)? {
                Directive::Predicate(compiled) => predicates.push(compiled),
                Directive::Generic => generic = true,
            }
        }

        Ok(Self {
            index,
            pattern: parsed.pattern,
            captures,
            predicates,
            generic,
        })
    }

    /// Returns the rule's declaration index within its language.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Returns `true` for rules marked `(#set! generic)`.
    #[must_use]
    pub const fn is_generic(&self) -> bool {
        self.generic
    }

    /// Returns the compiled predicates in declaration order.
    #[must_use]
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Returns the capture names in order of first appearance.
    pub fn capture_names(&self) -> impl Iterator<Item = &str> {
        self.captures.iter().map(|spec| spec.name.as_str())
    }

    /// Returns the tags this rule can emit, in capture order.
    pub fn tags(&self) -> impl Iterator<Item = Tag> + '_ {
        self.captures.iter().filter_map(|spec| spec.role.tag())
    }

    pub(crate) const fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub(crate) fn capture_name(&self, capture: CaptureId) -> Option<&str> {
        self.captures.get(capture).map(|spec| spec.name.as_str())
    }

    pub(crate) fn capture_role(&self, capture: CaptureId) -> Option<CaptureRole> {
        self.captures.get(capture).map(|spec| spec.role)
    }
}

/// The ordered, immutable rules for one language.
///
/// Declaration order is significant: it breaks ties between matches that
/// cover the same span with equally specific tags.
#[derive(Debug, Clone)]
pub struct LanguageRuleSet {
    language: String,
    rules: Vec<PatternRule>,
}

impl LanguageRuleSet {
    /// Parses and validates rule definitions for `language`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the text cannot be parsed, a capture
    /// is outside the vocabulary, a rule has no tag capture, or a predicate
    /// is malformed or references a capture the rule never binds.
    pub fn parse(language: &str, definitions: &str) -> Result<Self, ConfigError> {
        let parsed = parse_rules(definitions).map_err(|issue| ConfigError::Syntax {
            language: language.to_owned(),
            offset: issue.offset,
            message: issue.message,
        })?;
        let rules = parsed
            .into_iter()
            .enumerate()
            .map(|(index, rule)| PatternRule::compile(language, index, rule))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            language: language.to_owned(),
            rules,
        })
    }

    /// Returns the language identifier.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Returns the rules in declaration order.
    #[must_use]
    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    /// Returns the rule with the given declaration index.
    #[must_use]
    pub fn rule(&self, index: usize) -> Option<&PatternRule> {
        self.rules.get(index)
    }

    /// Returns the number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` when the set has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns a label such as `rust#3` identifying a rule in diagnostics.
    #[must_use]
    pub(crate) fn rule_label(&self, index: usize) -> RuleLabel<'_> {
        RuleLabel {
            language: &self.language,
            index,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct RuleLabel<'a> {
    language: &'a str,
    index: usize,
}

impl fmt::Display for RuleLabel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.language, self.index)
    }
}
