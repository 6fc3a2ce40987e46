//! Diagnostic types for non-fatal extraction problems.
//!
//! A malformed match never aborts extraction for a file. Instead the match is
//! dropped and a [`Diagnostic`] is recorded alongside the chunks that did
//! resolve. Each diagnostic carries a stable [`DiagnosticCode`], a message,
//! the offending span when one is known, and the rule that produced it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::span::Span;

/// Stable codes for extraction diagnostics.
///
/// # Example
///
/// ```
/// use tagchunk_core::DiagnosticCode;
///
/// let code = DiagnosticCode::EmptySpan;
/// assert_eq!(format!("{code}"), "E_TAGCHUNK_EMPTY_SPAN");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum DiagnosticCode {
    /// A tagged capture covered no bytes.
    EmptySpan,
    /// A tagged capture ended before it started.
    InvertedSpan,
    /// A tagged capture reached past the end of the source.
    SpanOutOfBounds,
    /// A tagged capture partially overlapped an enclosing candidate.
    CrossingSpan,
    /// A predicate referenced a capture that did not bind in this match.
    UnboundPredicateCapture,
    /// A rule produced more matches than the configured limit.
    MatchLimitExceeded,
    /// No syntax tree was available for the file.
    PartialExtraction,
}

impl DiagnosticCode {
    /// Returns the stable code string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EmptySpan => "E_TAGCHUNK_EMPTY_SPAN",
            Self::InvertedSpan => "E_TAGCHUNK_INVERTED_SPAN",
            Self::SpanOutOfBounds => "E_TAGCHUNK_SPAN_OUT_OF_BOUNDS",
            Self::CrossingSpan => "E_TAGCHUNK_CROSSING_SPAN",
            Self::UnboundPredicateCapture => "E_TAGCHUNK_UNBOUND_PREDICATE_CAPTURE",
            Self::MatchLimitExceeded => "E_TAGCHUNK_MATCH_LIMIT_EXCEEDED",
            Self::PartialExtraction => "E_TAGCHUNK_PARTIAL_EXTRACTION",
        }
    }

    /// Returns `true` for codes describing a single dropped match.
    #[must_use]
    pub const fn is_match_error(self) -> bool {
        !matches!(self, Self::PartialExtraction)
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single non-fatal problem recorded while extracting one file.
///
/// # Example
///
/// ```
/// use tagchunk_core::{Diagnostic, DiagnosticCode};
///
/// let diag = Diagnostic::new(
///     DiagnosticCode::EmptySpan,
///     String::from("capture 'definition.function' is empty"),
/// );
/// assert_eq!(diag.code(), DiagnosticCode::EmptySpan);
/// assert!(diag.span().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The stable code.
    code: DiagnosticCode,
    /// A human-readable description of the problem.
    message: String,
    /// The source span involved, if known.
    span: Option<Span>,
    /// The rule that produced the dropped match, formatted as
    /// `language#index`.
    rule: Option<String>,
}

impl Diagnostic {
    /// Creates a diagnostic without location details.
    #[must_use]
    pub const fn new(code: DiagnosticCode, message: String) -> Self {
        Self {
            code,
            message,
            span: None,
            rule: None,
        }
    }

    /// Attaches the span involved.
    #[must_use]
    pub const fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Attaches the producing rule.
    #[must_use]
    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        self.rule = Some(rule.into());
        self
    }

    /// Returns the diagnostic code.
    #[must_use]
    pub const fn code(&self) -> DiagnosticCode {
        self.code
    }

    /// Returns the diagnostic message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the span involved, if known.
    #[must_use]
    pub const fn span(&self) -> Option<&Span> {
        self.span.as_ref()
    }

    /// Returns the producing rule, if known.
    #[must_use]
    pub fn rule(&self) -> Option<&str> {
        self.rule.as_deref()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)?;
        if let Some(rule) = &self.rule {
            write!(f, " (rule {rule})")?;
        }
        Ok(())
    }
}
