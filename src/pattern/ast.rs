//! Pattern AST stored in an index arena.
//!
//! Every node lives in one `Vec` owned by [`PatternAst`] and is addressed by a [`NodeId`].
//! Ownership flows strictly from parent to child through the id lists held by
//! container nodes; the `parent` field is a non-owning back reference used for
//! span propagation while parsing and for upward lookups by tooling.

use std::fmt;

/// Handle to a node inside a [`PatternAst`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Raw arena index.
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Half-open `[start, end)` range of character offsets in the pattern source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    #[inline]
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Node payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// Sequence of segments separated by path separators.
    ///
    /// `absolute` is set when the path starts with a separator.
    Path {
        children: Vec<NodeId>,
        absolute: bool,
    },
    /// Content between two path separators.
    Segment { children: Vec<NodeId> },
    /// Alternation; every child is a [`NodeKind::Path`] branch and there is
    /// always at least one.
    Alt { children: Vec<NodeId> },
    /// Named variable with an optional constraint node.
    Variable {
        name: String,
        constraint: Option<NodeId>,
    },
    /// `*` or `**`; greedy wildcards also match path separators.
    Wildcard { greedy: bool },
    /// Raw regular expression fragment and the number of capturing groups
    /// it declares.
    RegExp { pattern: String, group_count: usize },
    /// Unescaped literal text.
    Text { value: String },
}

/// A node in the arena.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub span: Span,
}

/// Parsed pattern. The root is always a [`NodeKind::Path`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatternAst {
    nodes: Vec<Node>,
}

impl PatternAst {
    /// Creates an AST holding only an empty, relative root path.
    pub(crate) fn new() -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Path {
                    children: Vec::new(),
                    absolute: false,
                },
                parent: None,
                span: Span::default(),
            }],
        }
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    #[inline]
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    #[must_use]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    #[inline]
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    #[inline]
    #[must_use]
    pub fn span(&self, id: NodeId) -> Span {
        self.nodes[id.index()].span
    }

    /// Ordered children of a path, segment or alternation. Empty for every
    /// other node kind, including variables (see [`NodeKind::Variable`]).
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match self.kind(id) {
            NodeKind::Path { children, .. }
            | NodeKind::Segment { children }
            | NodeKind::Alt { children } => children,
            _ => &[],
        }
    }

    /// Number of nodes in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn alloc(&mut self, kind: NodeKind, parent: Option<NodeId>, span: Span) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node { kind, parent, span });
        id
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// Variable names in declaration order, duplicates included.
    #[must_use]
    pub fn variable_names(&self) -> Vec<&str> {
        #[derive(Default)]
        struct Names<'a>(Vec<&'a str>);

        impl<'a> Visitor<'a> for Names<'a> {
            fn variable(&mut self, ast: &'a PatternAst, id: NodeId) {
                if let NodeKind::Variable { name, .. } = ast.kind(id) {
                    self.0.push(name);
                }
                walk_children(self, ast, id);
            }
        }

        let mut names = Names::default();
        walk(&mut names, self, self.root());
        names.0
    }

    /// Renders the tree one node per line, children indented by two spaces.
    #[must_use]
    pub fn dump(&self) -> String {
        self.to_string()
    }

    fn fmt_node(&self, id: NodeId, depth: usize, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.node(id);
        for _ in 0..depth {
            f.write_str("  ")?;
        }
        let span = node.span;
        match &node.kind {
            NodeKind::Path { absolute: true, .. } => writeln!(f, "Path {span} absolute")?,
            NodeKind::Path { .. } => writeln!(f, "Path {span}")?,
            NodeKind::Segment { .. } => writeln!(f, "Segment {span}")?,
            NodeKind::Alt { .. } => writeln!(f, "Alt {span}")?,
            NodeKind::Variable { name, constraint } => {
                writeln!(f, "Variable {span} {name}")?;
                if let Some(constraint) = constraint {
                    self.fmt_node(*constraint, depth + 1, f)?;
                }
            }
            NodeKind::Wildcard { greedy: true } => writeln!(f, "Wildcard {span} greedy")?,
            NodeKind::Wildcard { greedy: false } => writeln!(f, "Wildcard {span}")?,
            NodeKind::RegExp {
                pattern,
                group_count,
            } => writeln!(f, "RegExp {span} {pattern:?} groups={group_count}")?,
            NodeKind::Text { value } => writeln!(f, "Text {span} {value:?}")?,
        }
        for &child in self.children(id) {
            self.fmt_node(child, depth + 1, f)?;
        }
        Ok(())
    }
}

impl fmt::Display for PatternAst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_node(self.root(), 0, f)
    }
}

/// Pattern AST visitor.
///
/// Each hook receives the AST and the id of the visited node. The defaults
/// descend into children (the constraint, for variables); an override
/// decides itself whether to call [`walk_children`].
pub trait Visitor<'a> {
    fn path(&mut self, ast: &'a PatternAst, id: NodeId) {
        walk_children(self, ast, id);
    }
    fn segment(&mut self, ast: &'a PatternAst, id: NodeId) {
        walk_children(self, ast, id);
    }
    fn alt(&mut self, ast: &'a PatternAst, id: NodeId) {
        walk_children(self, ast, id);
    }
    fn variable(&mut self, ast: &'a PatternAst, id: NodeId) {
        walk_children(self, ast, id);
    }
    fn wildcard(&mut self, _ast: &'a PatternAst, _id: NodeId) {}
    fn reg_exp(&mut self, _ast: &'a PatternAst, _id: NodeId) {}
    fn text(&mut self, _ast: &'a PatternAst, _id: NodeId) {}
}

/// Dispatches `id` to the matching [`Visitor`] hook.
pub fn walk<'a, V: Visitor<'a> + ?Sized>(visitor: &mut V, ast: &'a PatternAst, id: NodeId) {
    match ast.kind(id) {
        NodeKind::Path { .. } => visitor.path(ast, id),
        NodeKind::Segment { .. } => visitor.segment(ast, id),
        NodeKind::Alt { .. } => visitor.alt(ast, id),
        NodeKind::Variable { .. } => visitor.variable(ast, id),
        NodeKind::Wildcard { .. } => visitor.wildcard(ast, id),
        NodeKind::RegExp { .. } => visitor.reg_exp(ast, id),
        NodeKind::Text { .. } => visitor.text(ast, id),
    }
}

/// Walks the children of `id`, or its constraint if `id` is a variable.
pub fn walk_children<'a, V: Visitor<'a> + ?Sized>(visitor: &mut V, ast: &'a PatternAst, id: NodeId) {
    if let NodeKind::Variable {
        constraint: Some(constraint),
        ..
    } = ast.kind(id)
    {
        walk(visitor, ast, *constraint);
    }
    for &child in ast.children(id) {
        walk(visitor, ast, child);
    }
}
