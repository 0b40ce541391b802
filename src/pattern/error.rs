use std::fmt;

/// Pattern compilation error
///
/// Returned by [`parse`](super::parse), [`compile`](super::compile) and the
/// path builder. Syntax variants carry the character offset where the
/// pattern stopped making sense; offsets count `char`s, not bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// The tokenizer could not consume the input at `offset`
    ///
    /// Raised for an unterminated quote, an unterminated raw regexp, an
    /// invalid variable name, or a token that cannot appear where it was met.
    UnexpectedSyntax {
        /// Offset of the first unconsumed character
        offset: usize,
    },
    /// The pattern ended while an alternation was still open
    UnterminatedAlternation {
        /// Offset of the end of input
        offset: usize,
    },
    /// A `,` was met outside of any alternation
    UnexpectedAltSeparator {
        /// Offset of the separator
        offset: usize,
    },
    /// A `}` was met outside of any alternation
    UnexpectedAltEnd {
        /// Offset of the closing bracket
        offset: usize,
    },
    /// A configured default sub-pattern introduces capturing groups
    CapturingSubPattern {
        /// Name of the matcher option holding the pattern
        option: &'static str,
        /// The offending sub-pattern
        pattern: String,
    },
    /// The assembled matcher was rejected by the regex engine
    InvalidRegex {
        /// The matcher source handed to the engine
        pattern: String,
        /// Engine error message
        message: String,
    },
    /// The compiled regex disagrees with the capture slots allocated for it
    GroupCountMismatch {
        /// Number of capture groups the compiler accounted for
        expected: usize,
        /// Number of capture groups the regex engine reported
        actual: usize,
    },
    /// A raw regexp outside a variable constraint cannot be rebuilt into a path
    RegExpOutsideVariable {
        /// Offset of the raw regexp in the pattern
        offset: usize,
    },
}

impl PatternError {
    /// Character offset of a syntax error, if this is one
    #[must_use]
    pub fn offset(&self) -> Option<usize> {
        match self {
            PatternError::UnexpectedSyntax { offset }
            | PatternError::UnterminatedAlternation { offset }
            | PatternError::UnexpectedAltSeparator { offset }
            | PatternError::UnexpectedAltEnd { offset }
            | PatternError::RegExpOutsideVariable { offset } => Some(*offset),
            _ => None,
        }
    }
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternError::UnexpectedSyntax { offset } => {
                write!(f, "Unexpected syntax at {offset}")
            }
            PatternError::UnterminatedAlternation { offset } => {
                write!(f, "Unterminated alternation at {offset}")
            }
            PatternError::UnexpectedAltSeparator { offset } => {
                write!(f, "Unexpected alternation separator at {offset}")
            }
            PatternError::UnexpectedAltEnd { offset } => {
                write!(f, "Unexpected alternation end at {offset}")
            }
            PatternError::CapturingSubPattern { option, pattern } => {
                write!(
                    f,
                    "Matcher option `{option}` must not contain capturing groups: '{pattern}'"
                )
            }
            PatternError::InvalidRegex { pattern, message } => {
                write!(f, "Invalid matcher regex '{pattern}': {message}")
            }
            PatternError::GroupCountMismatch { expected, actual } => {
                write!(
                    f,
                    "Matcher accounts for {expected} capture groups but the regex has {actual}"
                )
            }
            PatternError::RegExpOutsideVariable { offset } => {
                write!(
                    f,
                    "Regular expression outside of a variable constraint at {offset}"
                )
            }
        }
    }
}

impl std::error::Error for PatternError {}
