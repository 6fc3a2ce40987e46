//! Rule definition syntax: a subset of the Tree-sitter query language.
//!
//! Rule text is tokenised by [`lexer`] and parsed by [`parser`] into the
//! pattern tree of [`ast`]. Capture names and predicates are kept raw at this
//! stage; [`crate::rule`] assigns roles and validates them.

pub(crate) mod ast;
mod lexer;
mod parser;

pub(crate) use parser::{ParsedRule, PredicateArg, RawPredicate, parse_rules};

/// A syntax problem found while reading rule text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SyntaxIssue {
    pub(crate) offset: usize,
    pub(crate) message: String,
}

impl SyntaxIssue {
    pub(crate) fn new(offset: usize, message: impl Into<String>) -> Self {
        Self {
            offset,
            message: message.into(),
        }
    }
}
