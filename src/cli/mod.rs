//! # CLI Module
//!
//! Command-line tooling for writing and debugging patterns.
//!
//! ## Commands
//!
//! ### `tokens`
//!
//! ```bash
//! tinyrouter tokens '/users/:id(\d+)'
//! ```
//!
//! ### `parse`
//!
//! Prints the AST, one node per line with its character span:
//!
//! ```bash
//! tinyrouter parse '/{foo,bar}/*'
//! ```
//!
//! ### `compile`
//!
//! Prints the anchored matcher regex and the `(slot, name)` list:
//!
//! ```bash
//! tinyrouter compile '/:lang/docs/**' --case-sensitive
//! ```
//!
//! ### `match`
//!
//! Prints, per path, the consumed length and the variables as JSON:
//!
//! ```bash
//! tinyrouter match '/users/:id' /users/42 /users/42/posts /teams/1
//! ```
//!
//! ### `build`
//!
//! ```bash
//! tinyrouter build '/users/:id/:tab' -p id=42 -p tab=posts
//! ```
//!
//! ## Configuration
//!
//! `--config <FILE>` (or `TINYROUTER_CONFIG`) loads a
//! [`RuntimeConfig`](crate::runtime_config::RuntimeConfig) TOML file;
//! otherwise matcher and logging settings come from `TINYROUTER_*`
//! environment variables.

mod commands;


pub use commands::{execute, run_cli, Cli, Commands};
