//! Immutable registry of per-language rule sets.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::TARGET;
use crate::error::ConfigError;
use crate::rule::LanguageRuleSet;

/// Parses rule definitions for one language.
///
/// # Errors
///
/// Returns a [`ConfigError`] describing the first problem found; see
/// [`LanguageRuleSet::parse`].
///
/// # Example
///
/// ```
/// let rules = tagchunk::load(
///     "rust",
///     "(function_item name: (identifier) @name) @definition.function",
/// )?;
/// assert_eq!(rules.len(), 1);
/// # Ok::<(), tagchunk::ConfigError>(())
/// ```
pub fn load(language: &str, definitions: &str) -> Result<LanguageRuleSet, ConfigError> {
    LanguageRuleSet::parse(language, definitions)
}

/// Rule sets keyed by language identifier.
///
/// A registry is assembled once and then only read. Languages whose
/// definitions failed to load are remembered with their [`ConfigError`] so
/// hosts can report them, while every other language stays usable.
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    sets: BTreeMap<String, LanguageRuleSet>,
    failures: BTreeMap<String, ConfigError>,
}

impl RuleRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads `(language, definitions)` pairs into a registry.
    ///
    /// Definitions given more than once for the same language are
    /// concatenated in order. A language that fails to load is recorded
    /// in [`failures`](Self::failures) and skipped.
    #[must_use]
    pub fn from_definitions<I, L, D>(definitions: I) -> Self
    where
        I: IntoIterator<Item = (L, D)>,
        L: AsRef<str>,
        D: AsRef<str>,
    {
        let mut merged: BTreeMap<String, String> = BTreeMap::new();
        for (language, text) in definitions {
            let entry = merged.entry(language.as_ref().to_owned()).or_default();
            if !entry.is_empty() {
                entry.push('\n');
            }
            entry.push_str(text.as_ref());
        }

        let mut registry = Self::new();
        for (language, text) in merged {
            match load(&language, &text) {
                Ok(set) => {
                    debug!(
                        target: TARGET,
                        language = %language,
                        rules = set.len(),
                        "loaded rule set"
                    );
                    registry.insert(set);
                }
                Err(err) => {
                    warn!(
                        target: TARGET,
                        language = %language,
                        error = %err,
                        "rule set failed to load"
                    );
                    registry.failures.insert(language, err);
                }
            }
        }
        registry
    }

    /// Adds or replaces the rule set for its language.
    ///
    /// Returns the set previously registered for that language.
    pub fn insert(&mut self, set: LanguageRuleSet) -> Option<LanguageRuleSet> {
        self.failures.remove(set.language());
        self.sets.insert(set.language().to_owned(), set)
    }

    /// Returns the rule set for `language`, if one loaded.
    #[must_use]
    pub fn get(&self, language: &str) -> Option<&LanguageRuleSet> {
        self.sets.get(language)
    }

    /// Returns the identifiers of loaded languages in sorted order.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.sets.keys().map(String::as_str)
    }

    /// Returns the load failures keyed by language.
    #[must_use]
    pub const fn failures(&self) -> &BTreeMap<String, ConfigError> {
        &self.failures
    }

    /// Returns the load failure for `language`, if any.
    #[must_use]
    pub fn failure(&self, language: &str) -> Option<&ConfigError> {
        self.failures.get(language)
    }
}
