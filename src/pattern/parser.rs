//! Pattern parser.
//!
//! Builds a [`PatternAst`] from tokenizer events with a single write cursor
//! that always points at the node receiving the next child. The cursor moves
//! down when a scope opens (segment, variable, alternation branch) and walks
//! the parent links back up when one closes.

use super::ast::{NodeId, NodeKind, PatternAst, Span};
use super::error::PatternError;
use super::tokenizer::{tokenize, TokenSink};

struct PatternParser {
    ast: PatternAst,
    cursor: NodeId,
    alt_depth: usize,
}

impl PatternParser {
    fn new() -> Self {
        let ast = PatternAst::new();
        let cursor = ast.root();
        Self {
            ast,
            cursor,
            alt_depth: 0,
        }
    }

    /// Moves the end offset of `id` and all of its ancestors to `end`.
    fn set_end(&mut self, id: NodeId, end: usize) {
        let mut current = Some(id);
        while let Some(id) = current {
            let node = self.ast.node_mut(id);
            node.span.end = end;
            current = node.parent;
        }
    }

    /// Nearest node at or above the cursor accepted by `is_target`.
    fn enclosing(&self, is_target: impl Fn(&NodeKind) -> bool) -> Option<NodeId> {
        let mut current = Some(self.cursor);
        while let Some(id) = current {
            if is_target(self.ast.kind(id)) {
                return Some(id);
            }
            current = self.ast.parent(id);
        }
        None
    }

    /// Attaches a freshly allocated node at the cursor.
    ///
    /// An unconstrained variable takes the node as its constraint and the
    /// cursor returns to the variable's scope. A constrained variable is
    /// closed first. A path opens a segment to hold the node.
    fn attach(&mut self, node: NodeId) -> Result<(), PatternError> {
        let span = self.ast.span(node);
        loop {
            let cursor = self.cursor;
            let parent = self.ast.parent(cursor);
            match &mut self.ast.node_mut(cursor).kind {
                NodeKind::Variable {
                    constraint: Some(_),
                    ..
                } => {
                    self.cursor = parent.ok_or(PatternError::UnexpectedSyntax {
                        offset: span.start,
                    })?;
                }
                NodeKind::Variable { constraint, .. } => {
                    *constraint = Some(node);
                    self.ast.node_mut(node).parent = Some(cursor);
                    self.set_end(cursor, span.end);
                    self.cursor = parent.ok_or(PatternError::UnexpectedSyntax {
                        offset: span.start,
                    })?;
                    return Ok(());
                }
                NodeKind::Path { children, .. } => {
                    let first = children.is_empty();
                    let segment = self.ast.alloc(
                        NodeKind::Segment {
                            children: vec![node],
                        },
                        Some(cursor),
                        Span::new(span.start, span.start),
                    );
                    let path = self.ast.node_mut(cursor);
                    if let NodeKind::Path { children, .. } = &mut path.kind {
                        children.push(segment);
                    }
                    if first {
                        path.span.start = span.start;
                    }
                    self.ast.node_mut(node).parent = Some(segment);
                    self.cursor = segment;
                    self.set_end(segment, span.end);
                    return Ok(());
                }
                NodeKind::Segment { children } => {
                    children.push(node);
                    self.ast.node_mut(node).parent = Some(cursor);
                    self.set_end(cursor, span.end);
                    return Ok(());
                }
                _ => return Err(PatternError::UnexpectedSyntax { offset: span.start }),
            }
        }
    }

    fn push(&mut self, kind: NodeKind, start: usize, end: usize) -> Result<NodeId, PatternError> {
        let node = self.ast.alloc(kind, None, Span::new(start, end));
        self.attach(node)?;
        Ok(node)
    }

    /// Appends an empty branch to `alt` and moves the cursor into it.
    fn open_branch(&mut self, alt: NodeId, at: usize) {
        let branch = self.ast.alloc(
            NodeKind::Path {
                children: Vec::new(),
                absolute: false,
            },
            Some(alt),
            Span::new(at, at),
        );
        if let NodeKind::Alt { children } = &mut self.ast.node_mut(alt).kind {
            children.push(branch);
        }
        self.cursor = branch;
    }

    fn finish(self, pattern: &str, consumed: usize) -> Result<PatternAst, PatternError> {
        if consumed != pattern.chars().count() {
            return Err(PatternError::UnexpectedSyntax { offset: consumed });
        }
        if self.alt_depth != 0 {
            return Err(PatternError::UnterminatedAlternation { offset: consumed });
        }
        Ok(self.ast)
    }
}

impl TokenSink for PatternParser {
    type Error = PatternError;

    fn text(&mut self, value: &str, start: usize, end: usize) -> Result<(), PatternError> {
        self.push(
            NodeKind::Text {
                value: value.to_owned(),
            },
            start,
            end,
        )
        .map(drop)
    }

    fn variable(&mut self, name: &str, start: usize, end: usize) -> Result<(), PatternError> {
        if matches!(self.ast.kind(self.cursor), NodeKind::Variable { .. }) {
            if let Some(parent) = self.ast.parent(self.cursor) {
                self.cursor = parent;
            }
        }
        let variable = self.push(
            NodeKind::Variable {
                name: name.to_owned(),
                constraint: None,
            },
            start,
            end,
        )?;
        self.cursor = variable;
        Ok(())
    }

    fn wildcard(&mut self, greedy: bool, start: usize, end: usize) -> Result<(), PatternError> {
        self.push(NodeKind::Wildcard { greedy }, start, end).map(drop)
    }

    fn reg_exp(
        &mut self,
        pattern: &str,
        group_count: usize,
        start: usize,
        end: usize,
    ) -> Result<(), PatternError> {
        self.push(
            NodeKind::RegExp {
                pattern: pattern.to_owned(),
                group_count,
            },
            start,
            end,
        )
        .map(drop)
    }

    fn alt_start(&mut self, start: usize, end: usize) -> Result<(), PatternError> {
        let alt = self.push(
            NodeKind::Alt {
                children: Vec::new(),
            },
            start,
            end,
        )?;
        self.open_branch(alt, end);
        self.alt_depth += 1;
        Ok(())
    }

    fn alt_separator(&mut self, start: usize, end: usize) -> Result<(), PatternError> {
        let alt = self
            .enclosing(|kind| matches!(kind, NodeKind::Alt { .. }))
            .ok_or(PatternError::UnexpectedAltSeparator { offset: start })?;
        self.open_branch(alt, end);
        self.set_end(self.cursor, end);
        Ok(())
    }

    fn alt_end(&mut self, start: usize, end: usize) -> Result<(), PatternError> {
        let alt = self
            .enclosing(|kind| matches!(kind, NodeKind::Alt { .. }))
            .ok_or(PatternError::UnexpectedAltEnd { offset: start })?;
        self.set_end(alt, end);
        self.cursor = self
            .ast
            .parent(alt)
            .ok_or(PatternError::UnexpectedAltEnd { offset: start })?;
        self.alt_depth -= 1;
        Ok(())
    }

    fn path_separator(&mut self, start: usize, end: usize) -> Result<(), PatternError> {
        let path = self
            .enclosing(|kind| matches!(kind, NodeKind::Path { .. }))
            .ok_or(PatternError::UnexpectedSyntax { offset: start })?;
        let segment = self.ast.alloc(
            NodeKind::Segment {
                children: Vec::new(),
            },
            Some(path),
            Span::new(start, end),
        );
        let node = self.ast.node_mut(path);
        if let NodeKind::Path { children, absolute } = &mut node.kind {
            if children.is_empty() {
                *absolute = true;
                node.span.start = start;
            }
            children.push(segment);
        }
        self.cursor = segment;
        self.set_end(segment, end);
        Ok(())
    }
}

/// Parses `pattern` into an AST.
///
/// Offsets in the returned spans and in syntax errors count characters.
///
/// ```
/// use tinyrouter::pattern::{parse, NodeKind};
///
/// let ast = parse("/users/:id").unwrap();
/// assert!(matches!(ast.kind(ast.root()), NodeKind::Path { absolute: true, .. }));
/// assert_eq!(ast.variable_names(), ["id"]);
/// ```
pub fn parse(pattern: &str) -> Result<PatternAst, PatternError> {
    let mut parser = PatternParser::new();
    let consumed = tokenize(pattern, &mut parser)?;
    let ast = parser.finish(pattern, consumed)?;
    tracing::trace!(pattern = %pattern, nodes = ast.len(), "Pattern parsed");
    Ok(ast)
}
