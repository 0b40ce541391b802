use std::borrow::Cow;
use tracing::trace;

use super::core::RouteNode;
use super::vars::Vars;

/// Result of a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution<R> {
    /// Value returned by the matched route's callback.
    pub result: R,
    /// Variables accumulated on the way to the route.
    pub vars: Vars,
}

/// Walks `node` against `path` and returns the first route that matches.
///
/// - A route must consume the whole remaining path.
/// - A container with a pattern consumes a prefix first, then tries its
///   children in order against the rest; without a pattern the children see
///   the path unchanged.
/// - A conditional resolves the branch its predicate selects; an absent
///   branch is a no-match.
/// - Metadata is transparent.
///
/// `vars` is never modified: every consuming node resolves its subtree with
/// an extended copy, so a failed child leaves nothing behind for its
/// siblings.
pub fn resolve<R, C>(
    node: &RouteNode<R, C>,
    path: &str,
    context: &C,
    vars: &Vars,
) -> Option<Resolution<R>> {
    match node {
        RouteNode::Route { pattern, callback } => {
            let found = pattern.matches(path)?;
            if found.consumed != path.len() {
                trace!(
                    pattern = %pattern.raw(),
                    path = %path,
                    consumed = found.consumed,
                    "Route matched a prefix only"
                );
                return None;
            }
            let vars = vars.extended(&found.vars);
            trace!(pattern = %pattern.raw(), vars = ?vars, "Route matched");
            let result = callback(&vars, context);
            Some(Resolution { result, vars })
        }
        RouteNode::Container { pattern, children } => {
            let (rest, vars) = match pattern {
                Some(pattern) => {
                    let found = pattern.matches(path)?;
                    trace!(
                        pattern = %pattern.raw(),
                        consumed = found.consumed,
                        "Container matched prefix"
                    );
                    (&path[found.consumed..], Cow::Owned(vars.extended(&found.vars)))
                }
                None => (path, Cow::Borrowed(vars)),
            };
            children
                .iter()
                .find_map(|child| resolve(child, rest, context, &vars))
        }
        RouteNode::When {
            condition,
            then,
            otherwise,
        } => {
            let branch = if condition(vars, context) {
                then
            } else {
                otherwise
            };
            resolve(branch.as_deref()?, path, context, vars)
        }
        RouteNode::Meta { child, .. } => resolve(child, path, context, vars),
    }
}
