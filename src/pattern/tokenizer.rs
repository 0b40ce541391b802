//! Pattern tokenizer.
//!
//! Scans a pattern into lexical events delivered to a [`TokenSink`]. There is
//! no tree structure here: the parser builds one from the events.
//!
//! | Syntax | Event |
//! |---|---|
//! | `/` | [`TokenSink::path_separator`] |
//! | `:name` | [`TokenSink::variable`] |
//! | `{` `,` `}` | [`TokenSink::alt_start`], [`TokenSink::alt_separator`], [`TokenSink::alt_end`] |
//! | `*`, `**` | [`TokenSink::wildcard`] |
//! | `(...)` | [`TokenSink::reg_exp`] |
//! | `"..."`, `'...'`, bare text | [`TokenSink::text`] |
//!
//! Whitespace outside of quotes and raw regexps separates tokens and is never
//! emitted. All offsets are character offsets.

use std::convert::Infallible;
use std::fmt;

/// Receives tokenizer events.
///
/// Every method defaults to ignoring the event. Returning an error stops
/// tokenization and is propagated by [`tokenize`].
pub trait TokenSink {
    type Error;

    fn text(&mut self, _value: &str, _start: usize, _end: usize) -> Result<(), Self::Error> {
        Ok(())
    }

    fn variable(&mut self, _name: &str, _start: usize, _end: usize) -> Result<(), Self::Error> {
        Ok(())
    }

    /// `greedy` is `true` for `**`, which also matches path separators.
    fn wildcard(&mut self, _greedy: bool, _start: usize, _end: usize) -> Result<(), Self::Error> {
        Ok(())
    }

    /// `pattern` is the fragment between the outer parentheses and
    /// `group_count` the number of capturing groups it opens.
    fn reg_exp(
        &mut self,
        _pattern: &str,
        _group_count: usize,
        _start: usize,
        _end: usize,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    fn alt_start(&mut self, _start: usize, _end: usize) -> Result<(), Self::Error> {
        Ok(())
    }

    fn alt_end(&mut self, _start: usize, _end: usize) -> Result<(), Self::Error> {
        Ok(())
    }

    fn alt_separator(&mut self, _start: usize, _end: usize) -> Result<(), Self::Error> {
        Ok(())
    }

    fn path_separator(&mut self, _start: usize, _end: usize) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// A recorded tokenizer event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Text {
        value: String,
        start: usize,
        end: usize,
    },
    Variable {
        name: String,
        start: usize,
        end: usize,
    },
    Wildcard {
        greedy: bool,
        start: usize,
        end: usize,
    },
    RegExp {
        pattern: String,
        group_count: usize,
        start: usize,
        end: usize,
    },
    AltStart {
        start: usize,
        end: usize,
    },
    AltEnd {
        start: usize,
        end: usize,
    },
    AltSeparator {
        start: usize,
        end: usize,
    },
    PathSeparator {
        start: usize,
        end: usize,
    },
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Text { value, start, end } => write!(f, "text {value:?} {start}..{end}"),
            Token::Variable { name, start, end } => write!(f, "variable {name} {start}..{end}"),
            Token::Wildcard {
                greedy: true,
                start,
                end,
            } => write!(f, "wildcard greedy {start}..{end}"),
            Token::Wildcard { start, end, .. } => write!(f, "wildcard {start}..{end}"),
            Token::RegExp {
                pattern,
                group_count,
                start,
                end,
            } => write!(f, "regexp {pattern:?} groups={group_count} {start}..{end}"),
            Token::AltStart { start, end } => write!(f, "alt-start {start}..{end}"),
            Token::AltEnd { start, end } => write!(f, "alt-end {start}..{end}"),
            Token::AltSeparator { start, end } => write!(f, "alt-separator {start}..{end}"),
            Token::PathSeparator { start, end } => write!(f, "path-separator {start}..{end}"),
        }
    }
}

impl TokenSink for Vec<Token> {
    type Error = Infallible;

    fn text(&mut self, value: &str, start: usize, end: usize) -> Result<(), Infallible> {
        self.push(Token::Text {
            value: value.to_owned(),
            start,
            end,
        });
        Ok(())
    }

    fn variable(&mut self, name: &str, start: usize, end: usize) -> Result<(), Infallible> {
        self.push(Token::Variable {
            name: name.to_owned(),
            start,
            end,
        });
        Ok(())
    }

    fn wildcard(&mut self, greedy: bool, start: usize, end: usize) -> Result<(), Infallible> {
        self.push(Token::Wildcard { greedy, start, end });
        Ok(())
    }

    fn reg_exp(
        &mut self,
        pattern: &str,
        group_count: usize,
        start: usize,
        end: usize,
    ) -> Result<(), Infallible> {
        self.push(Token::RegExp {
            pattern: pattern.to_owned(),
            group_count,
            start,
            end,
        });
        Ok(())
    }

    fn alt_start(&mut self, start: usize, end: usize) -> Result<(), Infallible> {
        self.push(Token::AltStart { start, end });
        Ok(())
    }

    fn alt_end(&mut self, start: usize, end: usize) -> Result<(), Infallible> {
        self.push(Token::AltEnd { start, end });
        Ok(())
    }

    fn alt_separator(&mut self, start: usize, end: usize) -> Result<(), Infallible> {
        self.push(Token::AltSeparator { start, end });
        Ok(())
    }

    fn path_separator(&mut self, start: usize, end: usize) -> Result<(), Infallible> {
        self.push(Token::PathSeparator { start, end });
        Ok(())
    }
}

/// Collects every event of `pattern` into a list.
///
/// Returns the tokens and the number of consumed characters; a count below
/// the pattern length marks the offset of a syntax error.
#[must_use]
pub fn tokens(pattern: &str) -> (Vec<Token>, usize) {
    let mut tokens = Vec::new();
    let consumed = match tokenize(pattern, &mut tokens) {
        Ok(consumed) => consumed,
        Err(never) => match never {},
    };
    (tokens, consumed)
}

#[inline]
fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

#[inline]
fn is_variable_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '$' || c == '_'
}

#[inline]
fn is_variable_name_char(c: char) -> bool {
    is_variable_name_start(c) || c.is_ascii_digit()
}

/// Index past the variable name starting after the `:` at `i`, or `None` if
/// no valid name follows.
fn take_variable(chars: &[char], i: usize) -> Option<usize> {
    let first = *chars.get(i + 1)?;
    if !is_variable_name_start(first) {
        return None;
    }
    let mut j = i + 2;
    while j < chars.len() && is_variable_name_char(chars[j]) {
        j += 1;
    }
    Some(j)
}

/// Unescaped text and the index past the closing quote of the quoted text
/// opening at `i`. A backslash makes the next character literal.
fn take_quoted_text(chars: &[char], i: usize) -> Option<(String, usize)> {
    let quote = chars[i];
    let mut value = String::new();
    let mut j = i + 1;

    while j < chars.len() {
        match chars[j] {
            c if c == quote => return Some((value, j + 1)),
            '\\' => {
                j += 1;
                if let Some(&escaped) = chars.get(j) {
                    value.push(escaped);
                }
            }
            c => value.push(c),
        }
        j += 1;
    }
    None
}

/// `true` if the `(` at `i` opens a capturing group: a plain group or a named
/// one (`(?<name>`, `(?P<name>`).
fn opens_capture(chars: &[char], i: usize) -> bool {
    match chars.get(i + 1) {
        Some('?') => match chars.get(i + 2) {
            Some('P') => chars.get(i + 3) == Some(&'<'),
            Some('<') => !matches!(chars.get(i + 3), Some('=' | '!')),
            _ => false,
        },
        _ => true,
    }
}

/// Body, capturing group count and index past the closing parenthesis of the
/// raw regexp opening at `i`. Escaped parentheses do not change the depth.
fn take_reg_exp(chars: &[char], i: usize) -> Option<(String, usize, usize)> {
    let mut depth = 0usize;
    let mut group_count = 0;
    let mut j = i + 1;

    while j < chars.len() {
        match chars[j] {
            '(' => {
                if opens_capture(chars, j) {
                    group_count += 1;
                }
                depth += 1;
            }
            ')' => {
                if depth == 0 {
                    let body = chars[i + 1..j].iter().collect();
                    return Some((body, group_count, j + 1));
                }
                depth -= 1;
            }
            '\\' => j += 1,
            _ => {}
        }
        j += 1;
    }
    None
}

/// Bare text run waiting for a delimiter.
struct PendingText {
    start: Option<usize>,
}

impl PendingText {
    fn flush<S: TokenSink>(&mut self, chars: &[char], end: usize, sink: &mut S) -> Result<(), S::Error> {
        if let Some(start) = self.start.take() {
            let value: String = chars[start..end].iter().collect();
            sink.text(&value, start, end)?;
        }
        Ok(())
    }
}

/// Tokenizes `pattern`, delivering events to `sink` in source order.
///
/// Returns the number of characters successfully tokenized. A value below
/// the character length of `pattern` is the offset of a syntax error: an
/// unterminated quote, an unterminated raw regexp, or a `:` that is not
/// followed by a valid variable name.
pub fn tokenize<S: TokenSink>(pattern: &str, sink: &mut S) -> Result<usize, S::Error> {
    let chars: Vec<char> = pattern.chars().collect();
    let len = chars.len();
    let mut text = PendingText { start: None };
    let mut i = 0;

    while i < len {
        if is_space(chars[i]) {
            text.flush(&chars, i, sink)?;
            while i < len && is_space(chars[i]) {
                i += 1;
            }
            continue;
        }

        match chars[i] {
            ':' => {
                let Some(j) = take_variable(&chars, i) else {
                    return Ok(i);
                };
                text.flush(&chars, i, sink)?;
                let name: String = chars[i + 1..j].iter().collect();
                sink.variable(&name, i, j)?;
                i = j;
            }
            '{' => {
                text.flush(&chars, i, sink)?;
                sink.alt_start(i, i + 1)?;
                i += 1;
            }
            '}' => {
                text.flush(&chars, i, sink)?;
                sink.alt_end(i, i + 1)?;
                i += 1;
            }
            ',' => {
                text.flush(&chars, i, sink)?;
                sink.alt_separator(i, i + 1)?;
                i += 1;
            }
            '*' => {
                text.flush(&chars, i, sink)?;
                if chars.get(i + 1) == Some(&'*') {
                    sink.wildcard(true, i, i + 2)?;
                    i += 2;
                } else {
                    sink.wildcard(false, i, i + 1)?;
                    i += 1;
                }
            }
            '/' => {
                text.flush(&chars, i, sink)?;
                sink.path_separator(i, i + 1)?;
                i += 1;
            }
            '"' | '\'' => {
                let Some((value, j)) = take_quoted_text(&chars, i) else {
                    return Ok(i);
                };
                text.flush(&chars, i, sink)?;
                sink.text(&value, i, j)?;
                i = j;
            }
            '(' => {
                let Some((body, group_count, j)) = take_reg_exp(&chars, i) else {
                    return Ok(i);
                };
                text.flush(&chars, i, sink)?;
                sink.reg_exp(&body, group_count, i, j)?;
                i = j;
            }
            _ => {
                if text.start.is_none() {
                    text.start = Some(i);
                }
                i += 1;
            }
        }
    }

    text.flush(&chars, i, sink)?;
    Ok(i)
}
