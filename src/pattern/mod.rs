//! # Pattern Module
//!
//! Compiles the path-pattern language into anchored regex matchers.
//!
//! ## Syntax
//!
//! | Syntax | Meaning |
//! |---|---|
//! | `/` | Path separator |
//! | `:name` | Variable, matching up to the next separator by default |
//! | `:name(\d+)`, `:name{a,b}` | Variable constrained by the token that follows it |
//! | `{a,b,c}` | Alternation of path fragments |
//! | `*`, `**` | Wildcard within a segment, greedy wildcard across segments |
//! | `(...)` | Raw regular expression fragment |
//! | `"..."`, `'...'`, bare text | Literal text |
//!
//! ## Pipeline
//!
//! 1. [`tokenizer`] scans the pattern into events.
//! 2. [`parse`] builds a [`PatternAst`] from them.
//! 3. [`compile`] turns the AST into a [`CompiledPattern`] together with the
//!    `(name, slot)` list used to read variables back out of positional
//!    captures.
//!
//! ## Example
//!
//! ```
//! use tinyrouter::pattern::{compile_pattern, MatcherOptions};
//!
//! let matcher = compile_pattern(r"/files/:id(\d+)/{raw,view}", &MatcherOptions::default()).unwrap();
//! let found = matcher.matches("/files/42/view").unwrap();
//! assert_eq!(found.vars.get("id"), Some("42"));
//! ```

pub mod ast;
mod builder;
mod compiler;
mod error;
mod matcher;
mod parser;
pub mod tokenizer;

pub use ast::{Node, NodeId, NodeKind, PatternAst, Span};
pub use builder::{ParamSpec, PathBuilder, ValueSet};
pub use compiler::{
    compile, compile_pattern, to_matcher_source, MatcherOptions, MatcherOptionsBuilder,
    MatcherSource, VarSlot, DEFAULT_GREEDY_WILDCARD, DEFAULT_PATH_SEPARATOR,
    DEFAULT_UNCONSTRAINED_VARIABLE, DEFAULT_WILDCARD,
};
pub use error::PatternError;
pub use matcher::{CompiledPattern, PatternMatch};
pub use parser::parse;
pub use tokenizer::{tokenize, Token, TokenSink};
