//! Compiled pattern tree.

/// Index into a rule's capture table.
pub(crate) type CaptureId = usize;

/// One pattern node and the captures attached to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Pattern {
    pub(crate) kind: PatternKind,
    pub(crate) captures: Vec<CaptureId>,
}

impl Pattern {
    pub(crate) const fn new(kind: PatternKind) -> Self {
        Self {
            kind,
            captures: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PatternKind {
    /// `(kind ...)`, or `(_ ...)` when `kind` is `None`.
    Named {
        kind: Option<String>,
        children: ChildSequence,
        absent_fields: Vec<String>,
    },
    /// `"text"`: an anonymous node whose kind equals the text.
    Anonymous(String),
    /// `_`: any node, named or anonymous.
    Wildcard,
    /// `[ a b ... ]`: every alternative that matches, in declaration order.
    Alternation(Vec<Pattern>),
}

/// Child patterns of a named node pattern, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ChildSequence {
    pub(crate) items: Vec<ChildPattern>,
    /// The first item must match the first named child.
    pub(crate) anchored_start: bool,
    /// The last item must match the last named child.
    pub(crate) anchored_end: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ChildPattern {
    pub(crate) field: Option<String>,
    pub(crate) pattern: Pattern,
    pub(crate) quantifier: Quantifier,
    /// No named sibling may sit between this item and the previous one.
    pub(crate) adjacent: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Quantifier {
    One,
    Optional,
    ZeroOrMore,
    OneOrMore,
}

impl Quantifier {
    pub(crate) const fn min(self) -> usize {
        match self {
            Self::One | Self::OneOrMore => 1,
            Self::Optional | Self::ZeroOrMore => 0,
        }
    }

    pub(crate) const fn max(self) -> usize {
        match self {
            Self::One | Self::Optional => 1,
            Self::ZeroOrMore | Self::OneOrMore => usize::MAX,
        }
    }
}
