use serde_json::Value;

use super::core::{RouteNode, RoutePattern};

/// Route tree visitor
///
/// One hook per node shape. The defaults descend into every subtree; an
/// override decides itself whether to call [`walk`] on the children it is
/// handed.
pub trait RouteVisitor<'a, R, C> {
    fn route(&mut self, _pattern: &'a RoutePattern) {}

    fn partial_route(&mut self, _pattern: &'a RoutePattern, children: &'a [RouteNode<R, C>]) {
        walk_all(self, children);
    }

    fn index(&mut self, children: &'a [RouteNode<R, C>]) {
        walk_all(self, children);
    }

    fn when(&mut self, then: Option<&'a RouteNode<R, C>>, otherwise: Option<&'a RouteNode<R, C>>) {
        if let Some(then) = then {
            walk(self, then);
        }
        if let Some(otherwise) = otherwise {
            walk(self, otherwise);
        }
    }

    fn meta(&mut self, _meta: &'a Value, child: &'a RouteNode<R, C>) {
        walk(self, child);
    }
}

/// Dispatches `node` to the matching [`RouteVisitor`] hook.
pub fn walk<'a, R, C, V: RouteVisitor<'a, R, C> + ?Sized>(visitor: &mut V, node: &'a RouteNode<R, C>) {
    match node {
        RouteNode::Route { pattern, .. } => visitor.route(pattern),
        RouteNode::Container {
            pattern: Some(pattern),
            children,
        } => visitor.partial_route(pattern, children),
        RouteNode::Container {
            pattern: None,
            children,
        } => visitor.index(children),
        RouteNode::When {
            then, otherwise, ..
        } => visitor.when(then.as_deref(), otherwise.as_deref()),
        RouteNode::Meta { meta, child } => visitor.meta(meta, child),
    }
}

pub fn walk_all<'a, R, C, V: RouteVisitor<'a, R, C> + ?Sized>(
    visitor: &mut V,
    nodes: &'a [RouteNode<R, C>],
) {
    for node in nodes {
        walk(visitor, node);
    }
}

struct PatternCollector<'a> {
    patterns: Vec<&'a str>,
}

impl<'a, R, C> RouteVisitor<'a, R, C> for PatternCollector<'a> {
    fn route(&mut self, pattern: &'a RoutePattern) {
        self.patterns.push(pattern.raw());
    }

    fn partial_route(&mut self, pattern: &'a RoutePattern, children: &'a [RouteNode<R, C>]) {
        self.patterns.push(pattern.raw());
        walk_all(self, children);
    }
}

struct MetaCollector<'a> {
    values: Vec<&'a Value>,
}

impl<'a, R, C> RouteVisitor<'a, R, C> for MetaCollector<'a> {
    fn meta(&mut self, meta: &'a Value, child: &'a RouteNode<R, C>) {
        self.values.push(meta);
        walk(self, child);
    }
}

impl<R, C> RouteNode<R, C> {
    /// Raw patterns of every route and partial route, depth first.
    #[must_use]
    pub fn patterns(&self) -> Vec<&str> {
        let mut collector = PatternCollector {
            patterns: Vec::new(),
        };
        walk(&mut collector, self);
        collector.patterns
    }

    /// Metadata payloads in the tree, depth first.
    #[must_use]
    pub fn meta_values(&self) -> Vec<&Value> {
        let mut collector = MetaCollector { values: Vec::new() };
        walk(&mut collector, self);
        collector.values
    }
}
