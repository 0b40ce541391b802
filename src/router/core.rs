//! Route tree construction and the top-level [`Router`].

use serde_json::Value;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::resolve::{resolve, Resolution};
use super::vars::Vars;
use crate::pattern::{compile, parse, CompiledPattern, MatcherOptions, PatternAst, PatternError, PatternMatch};

/// Resolutions slower than this are logged at `warn`.
const SLOW_RESOLVE_THRESHOLD: Duration = Duration::from_millis(1);

/// Content route handler, invoked with the accumulated variables and the
/// caller's context.
pub type Callback<R, C> = Box<dyn Fn(&Vars, &C) -> R + Send + Sync>;

/// Conditional node predicate.
pub type Predicate<C> = Box<dyn Fn(&Vars, &C) -> bool + Send + Sync>;

/// A compiled pattern attached to a route node
///
/// Keeps the source text and AST next to the matcher so tooling can inspect
/// the tree after construction.
#[derive(Debug, Clone)]
pub struct RoutePattern {
    raw: String,
    ast: PatternAst,
    compiled: CompiledPattern,
}

impl RoutePattern {
    /// Parses and compiles `raw`.
    ///
    /// # Errors
    ///
    /// Any [`PatternError`] from parsing or compilation.
    pub fn new(raw: &str, options: &MatcherOptions) -> Result<Self, PatternError> {
        let ast = parse(raw)?;
        let compiled = compile(&ast, options)?;
        Ok(Self {
            raw: raw.to_owned(),
            ast,
            compiled,
        })
    }

    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn ast(&self) -> &PatternAst {
        &self.ast
    }

    #[must_use]
    pub fn compiled(&self) -> &CompiledPattern {
        &self.compiled
    }

    #[inline]
    #[must_use]
    pub fn matches(&self, path: &str) -> Option<PatternMatch> {
        self.compiled.matches(path)
    }
}

/// Node of a route tree
///
/// The tree is strictly owned top-down and immutable once built, so a single
/// tree can be shared across threads and resolved concurrently.
pub enum RouteNode<R, C = ()> {
    /// Terminal route; matches only when its pattern consumes the whole
    /// remaining path.
    Route {
        pattern: RoutePattern,
        callback: Callback<R, C>,
    },
    /// Consumes a prefix with its pattern (if any) and tries its children in
    /// order against the rest.
    Container {
        pattern: Option<RoutePattern>,
        children: Vec<RouteNode<R, C>>,
    },
    /// Picks a subtree by predicate without touching the path.
    When {
        condition: Predicate<C>,
        then: Option<Box<RouteNode<R, C>>>,
        otherwise: Option<Box<RouteNode<R, C>>>,
    },
    /// Annotation for tooling; transparent to resolution.
    Meta {
        meta: Value,
        child: Box<RouteNode<R, C>>,
    },
}

impl<R, C> fmt::Debug for RouteNode<R, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteNode::Route { pattern, .. } => {
                f.debug_struct("Route").field("pattern", &pattern.raw).finish()
            }
            RouteNode::Container { pattern, children } => f
                .debug_struct("Container")
                .field("pattern", &pattern.as_ref().map(RoutePattern::raw))
                .field("children", children)
                .finish(),
            RouteNode::When {
                then, otherwise, ..
            } => f
                .debug_struct("When")
                .field("then", then)
                .field("otherwise", otherwise)
                .finish(),
            RouteNode::Meta { meta, child } => f
                .debug_struct("Meta")
                .field("meta", meta)
                .field("child", child)
                .finish(),
        }
    }
}

/// Content route for `pattern`.
///
/// # Errors
///
/// Fails if `pattern` does not parse or compile.
pub fn route<R, C>(
    pattern: &str,
    callback: impl Fn(&Vars, &C) -> R + Send + Sync + 'static,
) -> Result<RouteNode<R, C>, PatternError> {
    route_with(pattern, &MatcherOptions::default(), callback)
}

/// [`route`] with explicit matcher options.
pub fn route_with<R, C>(
    pattern: &str,
    options: &MatcherOptions,
    callback: impl Fn(&Vars, &C) -> R + Send + Sync + 'static,
) -> Result<RouteNode<R, C>, PatternError> {
    Ok(RouteNode::Route {
        pattern: RoutePattern::new(pattern, options)?,
        callback: Box::new(callback),
    })
}

/// Container consuming the prefix matched by `pattern`.
///
/// # Errors
///
/// Fails if `pattern` does not parse or compile.
pub fn partial_route<R, C>(
    pattern: &str,
    children: Vec<RouteNode<R, C>>,
) -> Result<RouteNode<R, C>, PatternError> {
    partial_route_with(pattern, &MatcherOptions::default(), children)
}

/// [`partial_route`] with explicit matcher options.
pub fn partial_route_with<R, C>(
    pattern: &str,
    options: &MatcherOptions,
    children: Vec<RouteNode<R, C>>,
) -> Result<RouteNode<R, C>, PatternError> {
    Ok(RouteNode::Container {
        pattern: Some(RoutePattern::new(pattern, options)?),
        children,
    })
}

/// Container without a pattern: children see the path unchanged.
#[must_use]
pub fn index<R, C>(children: Vec<RouteNode<R, C>>) -> RouteNode<R, C> {
    RouteNode::Container {
        pattern: None,
        children,
    }
}

/// Conditional branch. A missing branch is a no-match, never a fall-through
/// to the other one.
#[must_use]
pub fn when<R, C>(
    condition: impl Fn(&Vars, &C) -> bool + Send + Sync + 'static,
    then: Option<RouteNode<R, C>>,
    otherwise: Option<RouteNode<R, C>>,
) -> RouteNode<R, C> {
    RouteNode::When {
        condition: Box::new(condition),
        then: then.map(Box::new),
        otherwise: otherwise.map(Box::new),
    }
}

/// Wraps `child` with a metadata payload.
#[must_use]
pub fn meta<R, C>(meta: Value, child: RouteNode<R, C>) -> RouteNode<R, C> {
    RouteNode::Meta {
        meta,
        child: Box::new(child),
    }
}

/// Route tree entry point
///
/// Owns the root node and adds structured logging and timing around
/// [`resolve`].
///
/// # Example
///
/// ```
/// use tinyrouter::router::{index, partial_route, route, Router};
///
/// let tree = index(vec![
///     route("/", |_, _: &()| "home".to_string()).unwrap(),
///     partial_route(
///         "/users",
///         vec![route("/:id", |vars, _: &()| format!("user {}", vars.get("id").unwrap_or_default())).unwrap()],
///     )
///     .unwrap(),
/// ]);
/// let router = Router::new(tree);
///
/// assert_eq!(router.resolve("/users/7", &()).unwrap().result, "user 7");
/// assert!(router.resolve("/nope", &()).is_none());
/// ```
pub struct Router<R, C = ()> {
    root: RouteNode<R, C>,
}

impl<R, C> Router<R, C> {
    #[must_use]
    pub fn new(root: RouteNode<R, C>) -> Self {
        let patterns = root.patterns();
        let summary: Vec<&str> = patterns.iter().take(10).copied().collect();
        info!(
            patterns_count = patterns.len(),
            patterns_summary = ?summary,
            "Route tree loaded"
        );
        Self { root }
    }

    #[must_use]
    pub fn root(&self) -> &RouteNode<R, C> {
        &self.root
    }

    /// Resolves `path` starting from an empty variable map.
    #[must_use]
    pub fn resolve(&self, path: &str, context: &C) -> Option<Resolution<R>> {
        self.resolve_with(path, context, &Vars::new())
    }

    /// Resolves `path` on top of the caller's initial variables.
    #[must_use]
    pub fn resolve_with(&self, path: &str, context: &C, vars: &Vars) -> Option<Resolution<R>> {
        debug!(path = %path, initial_vars = vars.len(), "Route resolve attempt");

        let start = Instant::now();
        let resolution = resolve(&self.root, path, context, vars);
        let duration = start.elapsed();

        match &resolution {
            Some(found) if duration > SLOW_RESOLVE_THRESHOLD => warn!(
                path = %path,
                vars = ?found.vars,
                duration_us = duration.as_micros(),
                "Slow route resolution detected"
            ),
            Some(found) => debug!(
                path = %path,
                vars = ?found.vars,
                duration_us = duration.as_micros(),
                "Route resolved"
            ),
            None => debug!(
                path = %path,
                duration_us = duration.as_micros(),
                "No route matched"
            ),
        }

        resolution
    }

    /// Every raw pattern in the tree in depth-first order.
    #[must_use]
    pub fn patterns(&self) -> Vec<&str> {
        self.root.patterns()
    }
}

impl<R, C> fmt::Debug for Router<R, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router").field("root", &self.root).finish()
    }
}
