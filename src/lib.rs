//! # tinyrouter
//!
//! **tinyrouter** compiles a compact path-pattern language into anchored regex
//! matchers and composes them into a first-match-wins route tree.
//!
//! ## Overview
//!
//! A pattern such as `/users/:id(\d+){/,}` goes through three stages:
//!
//! 1. the tokenizer turns it into lexical events,
//! 2. the parser builds an arena-allocated AST with source spans,
//! 3. the compiler emits a regex and a list of `(variable, capture slot)`
//!    pairs, since native named groups cannot hold duplicate or arbitrary
//!    variable names.
//!
//! Compiled patterns are attached to route tree nodes. Resolving a path walks
//! the tree, consumes prefixes in containers, threads a variable map and a
//! caller context, and returns the result of the first route that consumes
//! the whole path.
//!
//! ## Architecture
//!
//! - **[`pattern`]** - Tokenizer, parser, AST, matcher compiler and path builder
//! - **[`router`]** - Route tree, resolver, variable map and tree visitors
//! - **[`runtime_config`]** - Matcher and logging settings from TOML and the environment
//! - **[`logging`]** - `tracing` subscriber setup
//! - **[`cli`]** - The `tinyrouter` command-line tool
//!
//! ### Resolution Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Caller
//!     participant Router as router::Router
//!     participant Node as RouteNode
//!     participant Pattern as CompiledPattern
//!
//!     Caller->>Router: resolve("/users/7/posts", &ctx)
//!     Router->>Node: resolve(root, path, ctx, vars)
//!     Node->>Pattern: matches("/users/7/posts")
//!     Pattern-->>Node: consumed = 8, vars = {id: "7"}
//!     Node->>Node: try children on "/posts"
//!     Node-->>Router: Resolution { result, vars }
//!     Router-->>Caller: Some(Resolution)
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use tinyrouter::router::{index, partial_route, route, Router};
//!
//! #[derive(Debug, PartialEq)]
//! enum Page {
//!     Home,
//!     User(String),
//!     UserPosts(String),
//! }
//!
//! let user = |vars: &tinyrouter::Vars| vars.get("id").unwrap_or_default().to_string();
//!
//! let tree = index(vec![
//!     route("/", |_, _: &()| Page::Home).unwrap(),
//!     partial_route(
//!         r"/users/:id(\d+)",
//!         vec![
//!             route("{/,}", move |vars, _: &()| Page::User(user(vars))).unwrap(),
//!             route("/posts", move |vars, _: &()| Page::UserPosts(user(vars))).unwrap(),
//!         ],
//!     )
//!     .unwrap(),
//! ]);
//! let router = Router::new(tree);
//!
//! assert_eq!(router.resolve("/", &()).unwrap().result, Page::Home);
//! assert_eq!(router.resolve("/users/7/", &()).unwrap().result, Page::User("7".into()));
//! assert_eq!(
//!     router.resolve("/users/7/posts", &()).unwrap().result,
//!     Page::UserPosts("7".into())
//! );
//! assert!(router.resolve("/users/abc", &()).is_none());
//! ```
//!
//! ## Pattern Syntax
//!
//! See [`pattern`] for the full grammar. Matching is ASCII case-insensitive
//! unless [`pattern::MatcherOptions::case_sensitive`] is set.
//!
//! ## Logging
//!
//! The library emits `tracing` events (`debug` for compilation and
//! resolution, `trace` per route node, `warn` for resolutions slower than one
//! millisecond) and never installs a subscriber itself; call
//! [`logging::init_logging`] from binaries.

pub mod cli;
pub mod logging;
pub mod pattern;
pub mod router;
pub mod runtime_config;

pub use pattern::{compile, compile_pattern, parse, CompiledPattern, MatcherOptions, PatternError};
pub use router::{Resolution, RouteNode, Router, Vars};
