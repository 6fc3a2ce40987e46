//! Tree-sitter parsing wrapper.
//!
//! Tree-sitter is error-tolerant: a source with syntax errors still yields a
//! tree containing `ERROR` and missing nodes. The engine extracts from such
//! trees as-is; callers can consult [`ParseResult::has_errors`] when they
//! need to know.

use crate::error::SyntaxError;
use crate::language::SupportedLanguage;

/// Result of parsing source code.
#[derive(Debug)]
pub struct ParseResult {
    tree: tree_sitter::Tree,
    source: String,
    language: SupportedLanguage,
}

impl ParseResult {
    /// Returns the parsed syntax tree.
    #[must_use]
    pub const fn tree(&self) -> &tree_sitter::Tree {
        &self.tree
    }

    /// Returns the source code that was parsed.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the language of the parsed code.
    #[must_use]
    pub const fn language(&self) -> SupportedLanguage {
        self.language
    }

    /// Returns the root node of the syntax tree.
    #[must_use]
    pub fn root_node(&self) -> tree_sitter::Node<'_> {
        self.tree.root_node()
    }

    /// Returns whether the tree contains `ERROR` or missing nodes.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }

    /// Counts `ERROR` and missing nodes in the tree.
    #[must_use]
    pub fn error_count(&self) -> usize {
        count_error_nodes(self.tree.root_node())
    }
}

/// Tree-sitter parser wrapper for a specific language.
///
/// Each parser instance is configured for a single language and holds
/// mutable parser state, so it is not shared between threads.
pub struct Parser {
    inner: tree_sitter::Parser,
    language: SupportedLanguage,
}

impl Parser {
    /// Creates a new parser for the given language.
    ///
    /// # Errors
    ///
    /// Returns an error if the Tree-sitter parser rejects the grammar, which
    /// happens when the grammar's ABI version is incompatible.
    pub fn new(language: SupportedLanguage) -> Result<Self, SyntaxError> {
        let mut inner = tree_sitter::Parser::new();
        inner
            .set_language(&language.tree_sitter_language())
            .map_err(|e| SyntaxError::parser_init(language, e.to_string()))?;

        Ok(Self { inner, language })
    }

    /// Returns the language this parser is configured for.
    #[must_use]
    pub const fn language(&self) -> SupportedLanguage {
        self.language
    }

    /// Parses source code and returns the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the parser produces no tree at all.
    pub fn parse(&mut self, source: &str) -> Result<ParseResult, SyntaxError> {
        let tree = self
            .inner
            .parse(source, None)
            .ok_or_else(|| SyntaxError::parse(self.language, "parser produced no tree"))?;

        Ok(ParseResult {
            tree,
            source: source.to_owned(),
            language: self.language,
        })
    }
}

fn count_error_nodes(node: tree_sitter::Node<'_>) -> usize {
    let own = usize::from(node.is_error() || node.is_missing());
    if !node.has_error() {
        return own;
    }
    let mut cursor = node.walk();
    let nested: usize = node
        .children(&mut cursor)
        .map(count_error_nodes)
        .sum();
    own + nested
}
