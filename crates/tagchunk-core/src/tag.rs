//! The fixed chunk taxonomy.
//!
//! Rule files mark capture points with one of six tag captures. The tag
//! decides the emitted chunk's kind and its rank when several rules claim
//! the same span.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The kind of an extracted chunk.
///
/// # Example
///
/// ```
/// use tagchunk_core::Tag;
///
/// assert_eq!(Tag::from_capture_name("definition.method"), Some(Tag::Method));
/// assert_eq!(Tag::Method.as_str(), "method");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tag {
    /// A module, namespace, or file-level grouping construct.
    Module,
    /// A class, struct, enum, trait, or interface definition.
    Class,
    /// A free-standing function.
    Function,
    /// A function defined inside a class-like construct.
    Method,
    /// A type alias or other type-level definition.
    Type,
    /// A documentation comment or attribute.
    Documentation,
}

impl Tag {
    /// All tags in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Module,
        Self::Class,
        Self::Function,
        Self::Method,
        Self::Type,
        Self::Documentation,
    ];

    /// Maps a rule capture name such as `definition.function` to its tag.
    ///
    /// Returns `None` for names outside the taxonomy.
    #[must_use]
    pub fn from_capture_name(name: &str) -> Option<Self> {
        match name {
            "module" => Some(Self::Module),
            "definition.class" => Some(Self::Class),
            "definition.function" => Some(Self::Function),
            "definition.method" => Some(Self::Method),
            "definition.type" => Some(Self::Type),
            "definition.documentation" => Some(Self::Documentation),
            _ => None,
        }
    }

    /// Returns the capture name that selects this tag in rule files.
    #[must_use]
    pub const fn capture_name(self) -> &'static str {
        match self {
            Self::Module => "module",
            Self::Class => "definition.class",
            Self::Function => "definition.function",
            Self::Method => "definition.method",
            Self::Type => "definition.type",
            Self::Documentation => "definition.documentation",
        }
    }

    /// Returns the short lower-case kind name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Module => "module",
            Self::Class => "class",
            Self::Function => "function",
            Self::Method => "method",
            Self::Type => "type",
            Self::Documentation => "documentation",
        }
    }

    /// Rank used when several matches cover the same span. Higher wins.
    ///
    /// `module` > `class` = `method` > `function` = `type` >
    /// `documentation`.
    #[must_use]
    pub const fn specificity(self) -> u8 {
        match self {
            Self::Module => 3,
            Self::Class | Self::Method => 2,
            Self::Function | Self::Type => 1,
            Self::Documentation => 0,
        }
    }

    /// Returns `true` for [`Tag::Documentation`].
    #[must_use]
    pub const fn is_documentation(self) -> bool {
        matches!(self, Self::Documentation)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised when a tag name is outside the taxonomy.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown chunk tag: '{0}'")]
pub struct UnknownTag(String);

impl UnknownTag {
    /// Returns the input that failed to parse.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.0
    }
}

impl FromStr for Tag {
    type Err = UnknownTag;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalised = input.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|tag| tag.as_str() == normalised || tag.capture_name() == normalised)
            .ok_or(UnknownTag(normalised))
    }
}
