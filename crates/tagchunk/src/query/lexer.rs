//! Tokeniser for rule text.

use std::iter::Peekable;
use std::str::CharIndices;

use super::SyntaxIssue;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Token {
    LParen,
    RParen,
    LBracket,
    RBracket,
    Colon,
    Dot,
    Bang,
    Question,
    Star,
    Plus,
    /// `@name`, stored without the `@`.
    Capture(String),
    /// `#eq?`, stored without the `#`.
    Predicate(String),
    /// A double-quoted string with escapes resolved.
    Str(String),
    /// A node kind, field name, or `_`.
    Ident(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Spanned {
    pub(super) token: Token,
    pub(super) offset: usize,
}

const fn is_ident_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

const fn is_capture_char(ch: char) -> bool {
    is_ident_char(ch) || ch == '.' || ch == '-'
}

pub(super) fn tokenize(text: &str) -> Result<Vec<Spanned>, SyntaxIssue> {
    let mut chars = text.char_indices().peekable();
    let mut tokens = Vec::new();

    while let Some((offset, ch)) = chars.next() {
        let token = match ch {
            c if c.is_whitespace() => continue,
            ';' => {
                skip_line(&mut chars);
                continue;
            }
            '(' => Token::LParen,
            ')' => Token::RParen,
            '[' => Token::LBracket,
            ']' => Token::RBracket,
            ':' => Token::Colon,
            '.' => Token::Dot,
            '!' => Token::Bang,
            '?' => Token::Question,
            '*' => Token::Star,
            '+' => Token::Plus,
            '"' => Token::Str(read_string(&mut chars, offset)?),
            '@' => {
                let name = take_while(&mut chars, is_capture_char);
                if name.is_empty() {
                    return Err(SyntaxIssue::new(offset, "expected a capture name after '@'"));
                }
                Token::Capture(name)
            }
            '#' => {
                let mut name = take_while(&mut chars, |c| is_ident_char(c) || c == '-');
                if let Some((_, suffix @ ('?' | '!'))) = chars.peek().copied() {
                    chars.next();
                    name.push(suffix);
                }
                if name.is_empty() {
                    return Err(SyntaxIssue::new(offset, "expected a predicate name after '#'"));
                }
                Token::Predicate(name)
            }
            c if is_ident_char(c) => {
                let mut name = String::from(c);
                name.push_str(&take_while(&mut chars, is_ident_char));
                Token::Ident(name)
            }
            other => {
                return Err(SyntaxIssue::new(
                    offset,
                    format!("unexpected character '{other}'"),
                ));
            }
        };
        tokens.push(Spanned { token, offset });
    }

    Ok(tokens)
}

fn skip_line(chars: &mut Peekable<CharIndices<'_>>) {
    for (_, ch) in chars.by_ref() {
        if ch == '\n' {
            break;
        }
    }
}

fn take_while(chars: &mut Peekable<CharIndices<'_>>, accept: impl Fn(char) -> bool) -> String {
    let mut out = String::new();
    while let Some((_, ch)) = chars.peek().copied() {
        if !accept(ch) {
            break;
        }
        out.push(ch);
        chars.next();
    }
    out
}

fn read_string(chars: &mut Peekable<CharIndices<'_>>, start: usize) -> Result<String, SyntaxIssue> {
    let mut out = String::new();
    while let Some((offset, ch)) = chars.next() {
        match ch {
            '"' => return Ok(out),
            '\\' => {
                let Some((_, escaped)) = chars.next() else {
                    break;
                };
                out.push(match escaped {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    '0' => '\0',
                    other => other,
                });
            }
            '\n' => {
                return Err(SyntaxIssue::new(offset, "unterminated string literal"));
            }
            other => out.push(other),
        }
    }
    Err(SyntaxIssue::new(start, "unterminated string literal"))
}
