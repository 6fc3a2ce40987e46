//! Parse adapters for the tagchunk extraction engine.
//!
//! The engine never parses source text itself. It walks any tree exposed
//! through the [`SyntaxNode`] trait. This crate provides two adapters:
//!
//! - a Tree-sitter adapter: [`Parser`] produces a [`ParseResult`] whose
//!   [`tree_sitter::Node`] values implement [`SyntaxNode`] directly;
//! - an in-memory adapter: [`MemoryTree`] lets hosts (and tests) describe
//!   a tree produced by some other parser, together with its source text.
//!
//! # Supported Languages
//!
//! The Tree-sitter adapter bundles grammars for:
//! - Rust (`.rs`)
//! - Python (`.py`, `.pyi`)
//! - TypeScript (`.ts`, `.tsx`, `.mts`, `.cts`)
//!
//! # Example
//!
//! ```
//! use tagchunk_syntax::{Parser, SupportedLanguage, SyntaxNode};
//!
//! let mut parser = Parser::new(SupportedLanguage::Rust)?;
//! let parsed = parser.parse("fn main() {}")?;
//! let root = parsed.root_node();
//! assert_eq!(SyntaxNode::kind(&root), "source_file");
//! # Ok::<(), tagchunk_syntax::SyntaxError>(())
//! ```

mod error;
mod language;
mod memory;
mod node;
mod parser;
mod position;

pub use error::SyntaxError;
pub use language::{LanguageParseError, SupportedLanguage};
pub use memory::{MemoryNode, MemoryTree, MemoryTreeBuilder};
pub use node::{ChildNode, SyntaxNode};
pub use parser::{ParseResult, Parser};

#[cfg(test)]
mod tests;
