//! The extraction pipeline for one file.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tagchunk_core::{Chunk, ChunkId, Diagnostic, DiagnosticCode, EngineConfig};
use tagchunk_syntax::{Parser, SupportedLanguage, SyntaxNode};
use tracing::{debug, warn};

use crate::TARGET;
use crate::builder::build;
use crate::builtin;
use crate::cancel::CancellationToken;
use crate::error::ExtractError;
use crate::matcher::match_tree;
use crate::normalize::normalize;
use crate::predicate::filter_matches;
use crate::registry::RuleRegistry;

/// Runs matching, predicate filtering, chunk building and normalisation.
///
/// An extractor is immutable and cheap to clone; the registry is shared.
/// All intermediate state lives on the stack of a single call, so one
/// extractor can serve many threads at once.
///
/// # Example
///
/// ```
/// use tagchunk::{EngineConfig, Extractor};
///
/// let extractor = Extractor::with_builtin_rules(EngineConfig::default());
/// let extraction = extractor.extract_source("rust", "fn main() {}")?;
/// assert_eq!(extraction.chunks()[0].name(), "main");
/// # Ok::<(), tagchunk::ExtractError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Extractor {
    registry: Arc<RuleRegistry>,
    config: EngineConfig,
}

impl Extractor {
    /// Creates an extractor over `registry`.
    #[must_use]
    pub fn new(registry: impl Into<Arc<RuleRegistry>>, config: EngineConfig) -> Self {
        Self {
            registry: registry.into(),
            config,
        }
    }

    /// Creates an extractor over the bundled Rust, Python and TypeScript
    /// rules.
    #[must_use]
    pub fn with_builtin_rules(config: EngineConfig) -> Self {
        Self {
            registry: builtin::registry(),
            config,
        }
    }

    /// Returns the rule registry.
    #[must_use]
    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Returns the engine configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Extracts chunks from an already parsed tree.
    ///
    /// A language without a rule set yields an empty extraction.
    ///
    /// # Errors
    ///
    /// Never fails without a cancellation token; the `Result` mirrors
    /// [`extract_with_cancellation`](Self::extract_with_cancellation).
    pub fn extract<'t, N: SyntaxNode<'t>>(
        &self,
        language: &str,
        root: N,
        source: &str,
    ) -> Result<Extraction, ExtractError> {
        self.extract_with_cancellation(language, root, source, &CancellationToken::new())
    }

    /// Extracts chunks, stopping early once `cancel` fires.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Cancelled`] if the token is cancelled before
    /// the chunks are built.
    pub fn extract_with_cancellation<'t, N: SyntaxNode<'t>>(
        &self,
        language: &str,
        root: N,
        source: &str,
        cancel: &CancellationToken,
    ) -> Result<Extraction, ExtractError> {
        let Some(rules) = self.registry.get(language) else {
            self.note_unconfigured(language);
            return Ok(Extraction::new(language, Vec::new(), Vec::new()));
        };

        let output = match_tree(root, rules, &self.config, cancel)?;
        let mut matches = output.matches;
        let mut diagnostics = output.diagnostics;
        filter_matches(&mut matches, rules, source, &mut diagnostics);
        if cancel.is_cancelled() {
            return Err(ExtractError::Cancelled);
        }

        let tree = build(&matches, rules, source, &self.config, &mut diagnostics);
        let chunks = normalize(&tree, &self.config);
        debug!(
            target: TARGET,
            language,
            matches = matches.len(),
            chunks = chunks.len(),
            diagnostics = diagnostics.len(),
            "extracted chunks"
        );
        Ok(Extraction::new(language, chunks, diagnostics))
    }

    /// Parses `source` with the bundled Tree-sitter grammar for `language`
    /// and extracts chunks from the result.
    ///
    /// When no tree can be produced the extraction is empty and carries a
    /// single [`DiagnosticCode::PartialExtraction`] diagnostic. Trees with
    /// syntax errors are still processed.
    ///
    /// # Errors
    ///
    /// See [`extract`](Self::extract).
    pub fn extract_source(&self, language: &str, source: &str) -> Result<Extraction, ExtractError> {
        if self.registry.get(language).is_none() {
            self.note_unconfigured(language);
            return Ok(Extraction::new(language, Vec::new(), Vec::new()));
        }

        let outcome = language
            .parse::<SupportedLanguage>()
            .map_err(|error| error.to_string())
            .and_then(|grammar| {
                Parser::new(grammar)
                    .and_then(|mut parser| parser.parse(source))
                    .map_err(|error| error.to_string())
            });
        let parsed = match outcome {
            Ok(result) => result,
            Err(message) => {
                warn!(target: TARGET, language, %message, "no syntax tree; extraction skipped");
                let diagnostic = Diagnostic::new(
                    DiagnosticCode::PartialExtraction,
                    format!("no syntax tree for {language}: {message}"),
                );
                return Ok(Extraction::new(language, Vec::new(), vec![diagnostic]));
            }
        };

        if parsed.has_errors() {
            debug!(
                target: TARGET,
                language,
                errors = parsed.error_count(),
                "syntax tree contains errors"
            );
        }
        self.extract(language, parsed.root_node(), source)
    }

    fn note_unconfigured(&self, language: &str) {
        match self.registry.failure(language) {
            Some(error) => warn!(target: TARGET, language, %error, "rule set failed to load"),
            None => debug!(target: TARGET, language, "no rule set for language"),
        }
    }
}

/// The chunks and diagnostics produced for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Extraction {
    language: String,
    chunks: Vec<Chunk>,
    diagnostics: Vec<Diagnostic>,
    #[serde(skip)]
    index: HashMap<ChunkId, usize>,
}

impl Extraction {
    fn new(language: &str, chunks: Vec<Chunk>, diagnostics: Vec<Diagnostic>) -> Self {
        let index = chunks
            .iter()
            .enumerate()
            .map(|(position, chunk)| (chunk.id.clone(), position))
            .collect();
        Self {
            language: language.to_owned(),
            chunks,
            diagnostics,
            index,
        }
    }

    /// Returns the language identifier the extraction ran for.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Returns every chunk in pre-order.
    #[must_use]
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Returns the non-fatal problems recorded for the file.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Returns `true` when no chunk was produced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Looks a chunk up by identifier.
    #[must_use]
    pub fn get(&self, id: &ChunkId) -> Option<&Chunk> {
        self.index.get(id).and_then(|&position| self.chunks.get(position))
    }

    /// Returns the top-level chunks in source order.
    pub fn roots(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.iter().filter(|chunk| chunk.is_root())
    }

    /// Returns the direct children of `id` in source order.
    ///
    /// Unknown identifiers have no children.
    pub fn children_of<'a>(&'a self, id: &ChunkId) -> impl Iterator<Item = &'a Chunk> + 'a {
        self.get(id)
            .map(Chunk::children)
            .unwrap_or_default()
            .iter()
            .filter_map(|child| self.get(child))
    }

    /// Returns the deepest nesting level, or zero when there are no chunks.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.chunks.iter().map(|chunk| chunk.depth).max().unwrap_or(0)
    }

    /// Consumes the extraction, returning its chunks and diagnostics.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Chunk>, Vec<Diagnostic>) {
        (self.chunks, self.diagnostics)
    }
}
