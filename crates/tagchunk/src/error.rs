//! Error types for rule loading and extraction.

use thiserror::Error;

/// Errors raised while loading a language's rule definitions.
///
/// A `ConfigError` is fatal for the language it names only; registries
/// built with [`crate::RuleRegistry::from_definitions`] keep loading the
/// remaining languages.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    /// The rule text could not be parsed into a pattern.
    #[error("{language}: syntax error at byte {offset}: {message}")]
    Syntax {
        /// Language whose rules failed to load.
        language: String,
        /// Byte offset of the problem within the rule text.
        offset: usize,
        /// Description of the problem.
        message: String,
    },

    /// A capture name is neither a taxonomy tag, `name`, nor `_`-prefixed.
    #[error("{language}: rule {rule} uses unknown capture '@{capture}'")]
    UnknownCapture {
        /// Language whose rules failed to load.
        language: String,
        /// Declaration index of the offending rule.
        rule: usize,
        /// The capture name, without the `@`.
        capture: String,
    },

    /// A rule declares no tag-bearing capture and could never emit a chunk.
    #[error("{language}: rule {rule} has no tag capture")]
    MissingTag {
        /// Language whose rules failed to load.
        language: String,
        /// Declaration index of the offending rule.
        rule: usize,
    },

    /// A predicate references a capture the rule never binds.
    #[error("{language}: rule {rule} predicate references unbound capture '@{capture}'")]
    UnboundPredicateCapture {
        /// Language whose rules failed to load.
        language: String,
        /// Declaration index of the offending rule.
        rule: usize,
        /// The capture name, without the `@`.
        capture: String,
    },

    /// A predicate is unknown or has malformed arguments.
    #[error("{language}: rule {rule} has an invalid predicate: {message}")]
    InvalidPredicate {
        /// Language whose rules failed to load.
        language: String,
        /// Declaration index of the offending rule.
        rule: usize,
        /// Description of the problem.
        message: String,
    },

    /// A `#match?` pattern is not a valid regular expression.
    #[error("{language}: rule {rule} has an invalid regex '{pattern}': {message}")]
    InvalidRegex {
        /// Language whose rules failed to load.
        language: String,
        /// Declaration index of the offending rule.
        rule: usize,
        /// The regular expression as written.
        pattern: String,
        /// The regex compiler's message.
        message: String,
    },
}

impl ConfigError {
    /// Returns the language whose rule set failed to load.
    #[must_use]
    pub fn language(&self) -> &str {
        match self {
            Self::Syntax { language, .. }
            | Self::UnknownCapture { language, .. }
            | Self::MissingTag { language, .. }
            | Self::UnboundPredicateCapture { language, .. }
            | Self::InvalidPredicate { language, .. }
            | Self::InvalidRegex { language, .. } => language,
        }
    }
}

/// Errors that abort extraction for a single file.
///
/// Malformed matches and missing trees are not errors; they are reported
/// as diagnostics on the [`crate::Extraction`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExtractError {
    /// The caller cancelled the extraction.
    #[error("extraction was cancelled")]
    Cancelled,
}
