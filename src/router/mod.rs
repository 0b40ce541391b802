//! # Router Module
//!
//! Composes compiled patterns into a first-match-wins route tree.
//!
//! ## Overview
//!
//! A tree is built from four node kinds:
//!
//! - [`route`]: a terminal node that must consume the whole remaining path
//! - [`partial_route`] / [`index`]: containers that consume a prefix (or
//!   nothing) before trying their children in order
//! - [`when`]: a conditional branch over the accumulated variables and the
//!   caller's context
//! - [`meta`]: an annotation that resolution ignores
//!
//! [`resolve`] walks the tree against a path, threading a [`Vars`] map and a
//! context value, and returns the first matching route's callback result.
//! Trailing separators get no special treatment: a route that should accept
//! one says so in its pattern (e.g. `/users{/,}`).
//!
//! ## Example
//!
//! ```
//! use tinyrouter::router::{index, partial_route, route, when, Router};
//!
//! struct Session {
//!     admin: bool,
//! }
//!
//! let tree = index(vec![
//!     partial_route(
//!         "/admin",
//!         vec![when(
//!             |_, session: &Session| session.admin,
//!             Some(route("{/,}", |_, _: &Session| "dashboard").unwrap()),
//!             None,
//!         )],
//!     )
//!     .unwrap(),
//!     route("/posts/:slug", |_, _: &Session| "post").unwrap(),
//! ]);
//! let router = Router::new(tree);
//!
//! let guest = Session { admin: false };
//! let admin = Session { admin: true };
//! assert!(router.resolve("/admin", &guest).is_none());
//! assert_eq!(router.resolve("/admin/", &admin).unwrap().result, "dashboard");
//!
//! let post = router.resolve("/posts/hello", &guest).unwrap();
//! assert_eq!(post.vars.get("slug"), Some("hello"));
//! ```

mod core;
mod resolve;
#[cfg(test)]
mod tests;
mod vars;
mod visit;

pub use core::{
    index, meta, partial_route, partial_route_with, route, route_with, when, Callback, Predicate,
    RouteNode, RoutePattern, Router,
};
pub use resolve::{resolve, Resolution};
pub use vars::{VarVec, Vars, MAX_INLINE_VARS};
pub use visit::{walk, walk_all, RouteVisitor};
