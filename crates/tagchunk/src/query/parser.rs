//! Recursive-descent parser from tokens to [`ParsedRule`]s.

use super::SyntaxIssue;
use super::ast::{CaptureId, ChildPattern, ChildSequence, Pattern, PatternKind, Quantifier};
use super::lexer::{Spanned, Token, tokenize};

/// One top-level pattern with its captures and predicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParsedRule {
    pub(crate) pattern: Pattern,
    /// Capture names in order of first appearance.
    pub(crate) captures: Vec<String>,
    pub(crate) predicates: Vec<RawPredicate>,
    pub(crate) offset: usize,
}

/// A predicate as written, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawPredicate {
    pub(crate) name: String,
    pub(crate) args: Vec<PredicateArg>,
    pub(crate) offset: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PredicateArg {
    Capture(String),
    Literal(String),
}

/// Parses rule text into its top-level patterns, in source order.
pub(crate) fn parse_rules(text: &str) -> Result<Vec<ParsedRule>, SyntaxIssue> {
    let tokens = tokenize(text)?;
    let mut parser = QueryParser {
        tokens: &tokens,
        pos: 0,
        end_offset: text.len(),
        captures: Vec::new(),
        predicates: Vec::new(),
    };

    let mut rules = Vec::new();
    while parser.peek().is_some() {
        let offset = parser.offset();
        let pattern = parser.parse_top_level()?;
        rules.push(ParsedRule {
            pattern,
            captures: std::mem::take(&mut parser.captures),
            predicates: std::mem::take(&mut parser.predicates),
            offset,
        });
    }
    Ok(rules)
}

struct QueryParser<'q> {
    tokens: &'q [Spanned],
    pos: usize,
    end_offset: usize,
    captures: Vec<String>,
    predicates: Vec<RawPredicate>,
}

impl QueryParser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|spanned| &spanned.token)
    }

    fn peek_second(&self) -> Option<&Token> {
        self.tokens.get(self.pos + 1).map(|spanned| &spanned.token)
    }

    fn offset(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map_or(self.end_offset, |spanned| spanned.offset)
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|spanned| spanned.token.clone());
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn error<T>(&self, message: impl Into<String>) -> Result<T, SyntaxIssue> {
        Err(SyntaxIssue::new(self.offset(), message))
    }

    fn expect(&mut self, expected: &Token, what: &str) -> Result<(), SyntaxIssue> {
        if self.peek() == Some(expected) {
            self.pos += 1;
            Ok(())
        } else {
            self.error(format!("expected {what}"))
        }
    }

    fn capture_id(&mut self, name: String) -> CaptureId {
        if let Some(existing) = self.captures.iter().position(|known| *known == name) {
            return existing;
        }
        self.captures.push(name);
        self.captures.len() - 1
    }

    fn parse_top_level(&mut self) -> Result<Pattern, SyntaxIssue> {
        if matches!(self.peek(), Some(Token::LParen))
            && matches!(self.peek_second(), Some(Token::Predicate(_)))
        {
            return self.error("predicate outside of a pattern");
        }
        let (pattern, quantifier) = self.parse_quantified()?;
        if quantifier != Quantifier::One {
            return self.error("quantifiers are only allowed on child patterns");
        }
        Ok(pattern)
    }

    /// Parses an atom, an optional quantifier, then any captures.
    fn parse_quantified(&mut self) -> Result<(Pattern, Quantifier), SyntaxIssue> {
        let mut pattern = self.parse_atom()?;
        let quantifier = match self.peek() {
            Some(Token::Question) => Quantifier::Optional,
            Some(Token::Star) => Quantifier::ZeroOrMore,
            Some(Token::Plus) => Quantifier::OneOrMore,
            _ => Quantifier::One,
        };
        if quantifier != Quantifier::One {
            self.pos += 1;
        }
        self.parse_captures(&mut pattern);
        Ok((pattern, quantifier))
    }

    fn parse_captures(&mut self, pattern: &mut Pattern) {
        while let Some(Token::Capture(name)) = self.peek().cloned() {
            self.pos += 1;
            let id = self.capture_id(name);
            pattern.captures.push(id);
        }
    }

    fn parse_atom(&mut self) -> Result<Pattern, SyntaxIssue> {
        match self.peek() {
            Some(Token::LParen) => match self.peek_second() {
                Some(Token::Ident(_)) => self.parse_named(),
                Some(Token::LParen | Token::LBracket | Token::Str(_)) => self.parse_group(),
                Some(Token::RParen) => self.error("empty pattern"),
                _ => self.error("expected a node kind after '('"),
            },
            Some(Token::LBracket) => self.parse_alternation(),
            Some(Token::Str(_)) => match self.bump() {
                Some(Token::Str(text)) => Ok(Pattern::new(PatternKind::Anonymous(text))),
                _ => self.error("expected a string"),
            },
            Some(Token::Ident(name)) if name == "_" => {
                self.pos += 1;
                Ok(Pattern::new(PatternKind::Wildcard))
            }
            Some(_) => self.error("expected a pattern"),
            None => self.error("unexpected end of rule text"),
        }
    }

    /// `( pattern predicates... )`: grouping around a single pattern.
    fn parse_group(&mut self) -> Result<Pattern, SyntaxIssue> {
        let open = self.offset();
        self.expect(&Token::LParen, "'('")?;
        let mut patterns = Vec::new();
        loop {
            match self.peek() {
                Some(Token::RParen) => {
                    self.pos += 1;
                    break;
                }
                Some(Token::LParen) if matches!(self.peek_second(), Some(Token::Predicate(_))) => {
                    self.parse_predicate()?;
                }
                Some(_) => {
                    let (pattern, quantifier) = self.parse_quantified()?;
                    if quantifier != Quantifier::One {
                        return self.error("quantified sibling sequences are not supported");
                    }
                    patterns.push(pattern);
                }
                None => return Err(SyntaxIssue::new(open, "unclosed '('")),
            }
        }

        let mut only = patterns.into_iter();
        match (only.next(), only.next()) {
            (Some(pattern), None) => Ok(pattern),
            (None, _) => Err(SyntaxIssue::new(open, "empty group")),
            (Some(_), Some(_)) => Err(SyntaxIssue::new(
                open,
                "sibling sequences are not supported",
            )),
        }
    }

    fn parse_alternation(&mut self) -> Result<Pattern, SyntaxIssue> {
        let open = self.offset();
        self.expect(&Token::LBracket, "'['")?;
        let mut alternatives = Vec::new();
        loop {
            match self.peek() {
                Some(Token::RBracket) => {
                    self.pos += 1;
                    break;
                }
                Some(_) => {
                    let mut pattern = self.parse_atom()?;
                    self.parse_captures(&mut pattern);
                    alternatives.push(pattern);
                }
                None => return Err(SyntaxIssue::new(open, "unclosed '['")),
            }
        }
        if alternatives.is_empty() {
            return Err(SyntaxIssue::new(open, "empty alternation"));
        }
        Ok(Pattern::new(PatternKind::Alternation(alternatives)))
    }

    fn parse_named(&mut self) -> Result<Pattern, SyntaxIssue> {
        let open = self.offset();
        self.expect(&Token::LParen, "'('")?;
        let kind = match self.bump() {
            Some(Token::Ident(name)) if name == "_" => None,
            Some(Token::Ident(name)) => Some(name),
            _ => return Err(SyntaxIssue::new(open, "expected a node kind")),
        };

        let mut children = ChildSequence::default();
        let mut absent_fields = Vec::new();
        let mut pending_anchor = false;

        loop {
            match self.peek() {
                Some(Token::RParen) => {
                    self.pos += 1;
                    if pending_anchor {
                        if children.items.is_empty() {
                            children.anchored_start = true;
                        } else {
                            children.anchored_end = true;
                        }
                    }
                    break;
                }
                Some(Token::Dot) => {
                    self.pos += 1;
                    pending_anchor = true;
                }
                Some(Token::Bang) => {
                    self.pos += 1;
                    match self.bump() {
                        Some(Token::Ident(field)) => absent_fields.push(field),
                        _ => return self.error("expected a field name after '!'"),
                    }
                }
                Some(Token::LParen) if matches!(self.peek_second(), Some(Token::Predicate(_))) => {
                    self.parse_predicate()?;
                }
                Some(Token::Ident(name))
                    if name != "_" && matches!(self.peek_second(), Some(Token::Colon)) =>
                {
                    let field = name.clone();
                    self.pos += 2;
                    self.parse_child(Some(field), pending_anchor, &mut children)?;
                    pending_anchor = false;
                }
                Some(_) => {
                    self.parse_child(None, pending_anchor, &mut children)?;
                    pending_anchor = false;
                }
                None => return Err(SyntaxIssue::new(open, "unclosed '('")),
            }
        }

        Ok(Pattern::new(PatternKind::Named {
            kind,
            children,
            absent_fields,
        }))
    }

    fn parse_child(
        &mut self,
        field: Option<String>,
        anchored: bool,
        children: &mut ChildSequence,
    ) -> Result<(), SyntaxIssue> {
        let (pattern, quantifier) = self.parse_quantified()?;
        let first = children.items.is_empty();
        if anchored && first {
            children.anchored_start = true;
        }
        children.items.push(ChildPattern {
            field,
            pattern,
            quantifier,
            adjacent: anchored && !first,
        });
        Ok(())
    }

    /// `(#name? args...)`; the predicate is attached to the current rule.
    fn parse_predicate(&mut self) -> Result<(), SyntaxIssue> {
        let open = self.offset();
        self.expect(&Token::LParen, "'('")?;
        let Some(Token::Predicate(name)) = self.bump() else {
            return Err(SyntaxIssue::new(open, "expected a predicate name"));
        };
        let mut args = Vec::new();
        loop {
            match self.bump() {
                Some(Token::RParen) => break,
                Some(Token::Capture(capture)) => args.push(PredicateArg::Capture(capture)),
                Some(Token::Str(text) | Token::Ident(text)) => {
                    args.push(PredicateArg::Literal(text));
                }
                Some(_) => return self.error("expected a capture or string argument"),
                None => return Err(SyntaxIssue::new(open, "unclosed predicate")),
            }
        }
        self.predicates.push(RawPredicate {
            name,
            args,
            offset: open,
        });
        Ok(())
    }
}
