//! AST to matcher compilation.
//!
//! Variable names are never encoded as native named groups: the regex
//! engine rejects duplicate names and restricts the name alphabet. Instead
//! every variable claims a positional capture slot and the compiler returns
//! the `(name, slot)` list next to the matcher source. Raw regexp fragments
//! advance the slot counter by their own group count so later variables stay
//! aligned.

use std::sync::Arc;

use regex::RegexBuilder;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ast::{NodeId, NodeKind, PatternAst};
use super::error::PatternError;
use super::matcher::CompiledPattern;
use super::parser::parse;

/// Default path separator sub-pattern.
pub const DEFAULT_PATH_SEPARATOR: &str = "/";
/// Default `*` sub-pattern: anything up to the next separator, query or fragment.
pub const DEFAULT_WILDCARD: &str = "[^/?#]*";
/// Default `**` sub-pattern: anything up to a query or fragment.
pub const DEFAULT_GREEDY_WILDCARD: &str = "[^?#]*";
/// Default sub-pattern for a variable without a constraint.
pub const DEFAULT_UNCONSTRAINED_VARIABLE: &str = "[^/?#]*";

/// Matcher compilation options
///
/// The four sub-patterns are spliced verbatim into the matcher and must not
/// open capturing groups; [`MatcherOptions::validate`] enforces this and
/// [`compile`] calls it before building anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherOptions {
    /// Match letter case exactly. Off by default (ASCII-insensitive matching).
    pub case_sensitive: bool,
    pub path_separator: String,
    pub wildcard: String,
    pub greedy_wildcard: String,
    pub unconstrained_variable: String,
}

impl Default for MatcherOptions {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            path_separator: DEFAULT_PATH_SEPARATOR.to_owned(),
            wildcard: DEFAULT_WILDCARD.to_owned(),
            greedy_wildcard: DEFAULT_GREEDY_WILDCARD.to_owned(),
            unconstrained_variable: DEFAULT_UNCONSTRAINED_VARIABLE.to_owned(),
        }
    }
}

impl MatcherOptions {
    /// Start a builder from the default options.
    #[must_use]
    pub fn builder() -> MatcherOptionsBuilder {
        MatcherOptionsBuilder::new()
    }

    /// Checks that every sub-pattern is a valid regex with no capturing group.
    pub fn validate(&self) -> Result<(), PatternError> {
        let sub_patterns = [
            ("path_separator", &self.path_separator),
            ("wildcard", &self.wildcard),
            ("greedy_wildcard", &self.greedy_wildcard),
            ("unconstrained_variable", &self.unconstrained_variable),
        ];
        for (option, pattern) in sub_patterns {
            let regex = regex::Regex::new(pattern).map_err(|e| PatternError::InvalidRegex {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;
            // Group 0 is the implicit whole-match group.
            if regex.captures_len() != 1 {
                return Err(PatternError::CapturingSubPattern {
                    option,
                    pattern: pattern.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Fluent builder for [`MatcherOptions`]
///
/// # Example
///
/// ```
/// use tinyrouter::pattern::MatcherOptions;
///
/// let options = MatcherOptions::builder()
///     .case_sensitive(true)
///     .unconstrained_variable("[^/.]+")
///     .build()
///     .unwrap();
/// assert!(options.case_sensitive);
///
/// assert!(MatcherOptions::builder().wildcard("(.*)").build().is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MatcherOptionsBuilder {
    options: MatcherOptions,
}

impl MatcherOptionsBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.options.case_sensitive = case_sensitive;
        self
    }

    #[must_use]
    pub fn path_separator(mut self, pattern: &str) -> Self {
        self.options.path_separator = pattern.to_owned();
        self
    }

    #[must_use]
    pub fn wildcard(mut self, pattern: &str) -> Self {
        self.options.wildcard = pattern.to_owned();
        self
    }

    #[must_use]
    pub fn greedy_wildcard(mut self, pattern: &str) -> Self {
        self.options.greedy_wildcard = pattern.to_owned();
        self
    }

    #[must_use]
    pub fn unconstrained_variable(mut self, pattern: &str) -> Self {
        self.options.unconstrained_variable = pattern.to_owned();
        self
    }

    /// Validates and returns the options.
    ///
    /// # Errors
    ///
    /// [`PatternError::CapturingSubPattern`] if a sub-pattern opens a
    /// capturing group, [`PatternError::InvalidRegex`] if one does not compile.
    pub fn build(self) -> Result<MatcherOptions, PatternError> {
        self.options.validate()?;
        Ok(self.options)
    }
}

/// A variable bound to a positional capture slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VarSlot {
    pub name: Arc<str>,
    /// Index into the regex captures; slot 0 is the whole match.
    pub slot: usize,
}

/// Un-anchored matcher regex source and its variable slots in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatcherSource {
    pub pattern: String,
    pub slots: Vec<VarSlot>,
    /// Total capture groups opened by `pattern`, raw fragments included.
    pub group_count: usize,
}

struct SourceWriter<'a> {
    ast: &'a PatternAst,
    options: &'a MatcherOptions,
    out: String,
    slots: Vec<VarSlot>,
    group_count: usize,
}

impl SourceWriter<'_> {
    /// Splices a configured sub-pattern, grouped if it alternates so its `|`
    /// cannot leak into the surrounding sequence.
    fn push_sub_pattern(&mut self, sub_pattern: &str) {
        if sub_pattern.contains('|') {
            self.out.push_str("(?:");
            self.out.push_str(sub_pattern);
            self.out.push(')');
        } else {
            self.out.push_str(sub_pattern);
        }
    }

    fn emit(&mut self, id: NodeId) {
        let ast = self.ast;
        match ast.kind(id) {
            NodeKind::Path { children, absolute } => {
                let options = self.options;
                if *absolute {
                    self.push_sub_pattern(&options.path_separator);
                }
                for (i, &segment) in children.iter().enumerate() {
                    if i > 0 {
                        self.push_sub_pattern(&options.path_separator);
                    }
                    self.emit(segment);
                }
            }
            NodeKind::Segment { children } => {
                for &child in children {
                    self.emit(child);
                }
            }
            NodeKind::Alt { children } => {
                self.out.push_str("(?:");
                for (i, &branch) in children.iter().enumerate() {
                    if i > 0 {
                        self.out.push('|');
                    }
                    self.emit(branch);
                }
                self.out.push(')');
            }
            NodeKind::Variable { name, constraint } => {
                self.group_count += 1;
                self.slots.push(VarSlot {
                    name: Arc::from(name.as_str()),
                    slot: self.group_count,
                });
                self.out.push('(');
                match constraint {
                    Some(constraint) => self.emit(*constraint),
                    None => self.out.push_str(&self.options.unconstrained_variable),
                }
                self.out.push(')');
            }
            NodeKind::Wildcard { greedy: true } => {
                let options = self.options;
                self.push_sub_pattern(&options.greedy_wildcard);
            }
            NodeKind::Wildcard { greedy: false } => {
                let options = self.options;
                self.push_sub_pattern(&options.wildcard);
            }
            NodeKind::RegExp {
                pattern,
                group_count,
            } => {
                self.group_count += group_count;
                self.out.push_str("(?:");
                self.out.push_str(pattern);
                self.out.push(')');
            }
            NodeKind::Text { value } => self.out.push_str(&regex::escape(value)),
        }
    }
}

/// Walks `ast` and emits the matcher source with its variable slots.
///
/// Deterministic: the same AST and options always yield the same source and
/// slot list.
#[must_use]
pub fn to_matcher_source(ast: &PatternAst, options: &MatcherOptions) -> MatcherSource {
    let mut writer = SourceWriter {
        ast,
        options,
        out: String::new(),
        slots: Vec::new(),
        group_count: 0,
    };
    writer.emit(ast.root());
    MatcherSource {
        pattern: writer.out,
        slots: writer.slots,
        group_count: writer.group_count,
    }
}

/// Compiles `ast` into an anchored matcher.
///
/// The whole source sits in one group behind `^`, so every match starts at
/// offset 0.
///
/// # Errors
///
/// Fails when the options are invalid, when the assembled regex is rejected
/// by the engine (for instance a malformed raw fragment), or when its capture
/// count disagrees with the slot bookkeeping.
pub fn compile(ast: &PatternAst, options: &MatcherOptions) -> Result<CompiledPattern, PatternError> {
    options.validate()?;
    let source = to_matcher_source(ast, options);
    let anchored = format!("^(?:{})", source.pattern);

    let regex = RegexBuilder::new(&anchored)
        .case_insensitive(!options.case_sensitive)
        .build()
        .map_err(|e| PatternError::InvalidRegex {
            pattern: anchored.clone(),
            message: e.to_string(),
        })?;

    let actual = regex.captures_len() - 1;
    if actual != source.group_count {
        return Err(PatternError::GroupCountMismatch {
            expected: source.group_count,
            actual,
        });
    }

    debug!(
        regex = %anchored,
        variables = source.slots.len(),
        groups = source.group_count,
        case_sensitive = options.case_sensitive,
        "Pattern compiled"
    );

    Ok(CompiledPattern::new(regex, source.slots))
}

/// Parses and compiles `pattern` in one step.
///
/// ```
/// use tinyrouter::pattern::{compile_pattern, MatcherOptions};
///
/// let matcher = compile_pattern("/foo/:bar", &MatcherOptions::default()).unwrap();
/// let found = matcher.matches("/foo/baz").unwrap();
/// assert_eq!(found.consumed, 8);
/// assert_eq!(found.vars.get("bar"), Some("baz"));
/// ```
pub fn compile_pattern(pattern: &str, options: &MatcherOptions) -> Result<CompiledPattern, PatternError> {
    let ast = parse(pattern)?;
    compile(&ast, options)
}
