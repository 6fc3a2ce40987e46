//! Tag-based chunk extraction over syntax trees.
//!
//! Rules written in a Tree-sitter-style pattern language mark the nodes of
//! interest with tag captures such as `@definition.function`. For each file
//! the engine:
//!
//! 1. matches every rule of the file's language against the tree;
//! 2. drops matches whose predicates fail;
//! 3. resolves overlaps, nests the survivors by containment, and resolves
//!    names and documentation;
//! 4. emits [`Chunk`] values with stable, content-derived identifiers.
//!
//! Malformed matches are reported as [`Diagnostic`]s instead of failing the
//! file. Malformed rules fail only their own language, with a
//! [`ConfigError`].
//!
//! # Example
//!
//! ```
//! use tagchunk::{EngineConfig, Extractor, Tag};
//!
//! let extractor = Extractor::with_builtin_rules(EngineConfig::default());
//! let source = "struct Point { x: i32 }\n\nimpl Point {\n    fn x(&self) -> i32 { self.x }\n}\n";
//! let extraction = extractor.extract_source("rust", source)?;
//!
//! let kinds: Vec<Tag> = extraction.chunks().iter().map(|chunk| chunk.kind).collect();
//! assert_eq!(kinds, [Tag::Class, Tag::Class, Tag::Method]);
//! # Ok::<(), tagchunk::ExtractError>(())
//! ```

mod builder;
mod builtin;
mod cancel;
mod engine;
mod error;
mod matcher;
mod normalize;
mod predicate;
mod query;
mod registry;
mod rule;

pub use builder::{ChunkTree, DraftChunk, build};
pub use builtin::{definitions as builtin_definitions, registry as builtin_registry};
pub use cancel::CancellationToken;
pub use engine::{Extraction, Extractor};
pub use error::{ConfigError, ExtractError};
pub use matcher::{Binding, CaptureMatch, MatchOutput, RuleMatch, match_tree};
pub use normalize::{IdInputs, normalize};
pub use predicate::{Predicate, filter_matches};
pub use registry::{RuleRegistry, load};
pub use rule::{CaptureRole, INTERNAL_PREFIX, LanguageRuleSet, NAME_CAPTURE, PatternRule};
pub use tagchunk_core::{
    Chunk, ChunkId, Diagnostic, DiagnosticCode, EngineConfig, LineCol, Span, Tag, UnknownTag,
};

/// Tracing target for events emitted by this crate.
pub(crate) const TARGET: &str = "tagchunk";

#[cfg(test)]
mod tests;
