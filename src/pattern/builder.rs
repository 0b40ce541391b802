//! Path builder: the inverse of matching.
//!
//! A pattern AST is lowered into a small build tree that turns a set of
//! parameters back into a concrete path. Alternations become ordered choices
//! that stop at the first literal branch, and a variable constrained by
//! something other than a single literal falls back to building its
//! constraint when the parameter is missing.
//!
//! ```
//! use tinyrouter::pattern::{parse, PathBuilder};
//! use tinyrouter::Vars;
//!
//! let builder = PathBuilder::new(&parse("/users/:id{,/:tab{profile}}").unwrap()).unwrap();
//! let params: Vars = [("id", "42")].into_iter().collect();
//! assert_eq!(builder.build(&params).as_deref(), Some("/users/42"));
//! ```

use std::sync::Arc;

use serde::Serialize;

use super::ast::{NodeId, NodeKind, PatternAst};
use super::error::PatternError;
use crate::router::Vars;

const SEPARATOR: &str = "/";

#[derive(Debug, Clone, PartialEq, Eq)]
enum BuildNode {
    Literal(String),
    Concat(Vec<BuildNode>),
    /// First branch that builds wins.
    Select(Vec<BuildNode>),
    Param {
        name: Arc<str>,
        /// Built when the parameter is absent; `None` makes it required.
        fallback: Option<Box<BuildNode>>,
    },
}

impl BuildNode {
    fn build_into(&self, params: &Vars, out: &mut String) -> bool {
        match self {
            BuildNode::Literal(value) => {
                out.push_str(value);
                true
            }
            BuildNode::Concat(parts) => parts.iter().all(|part| part.build_into(params, out)),
            BuildNode::Select(branches) => branches.iter().any(|branch| {
                let mark = out.len();
                let built = branch.build_into(params, out);
                if !built {
                    out.truncate(mark);
                }
                built
            }),
            BuildNode::Param { name, fallback } => match (params.get(name), fallback) {
                (Some(value), _) => {
                    out.push_str(value);
                    true
                }
                (None, Some(fallback)) => fallback.build_into(params, out),
                (None, None) => false,
            },
        }
    }
}

/// Acceptable values of a parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueSet {
    /// The constraint is a literal or an alternation of literals.
    Literals(Vec<String>),
    Any,
}

impl ValueSet {
    fn merge(&mut self, other: ValueSet) {
        match (&mut *self, other) {
            (ValueSet::Literals(values), ValueSet::Literals(more)) => {
                for value in more {
                    if !values.contains(&value) {
                        values.push(value);
                    }
                }
            }
            _ => *self = ValueSet::Any,
        }
    }
}

/// Description of one parameter accepted by a [`PathBuilder`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamSpec {
    pub name: String,
    /// `true` when some build succeeds without this parameter reaching it.
    pub optional: bool,
    pub values: ValueSet,
}

/// Rebuilds concrete paths from a parsed pattern.
#[derive(Debug, Clone)]
pub struct PathBuilder {
    root: Option<BuildNode>,
    params: Vec<ParamSpec>,
}

impl PathBuilder {
    /// Lowers `ast` into a build tree.
    ///
    /// # Errors
    ///
    /// [`PatternError::RegExpOutsideVariable`] if a raw regexp appears outside
    /// of a variable constraint; such a fragment has no buildable value.
    pub fn new(ast: &PatternAst) -> Result<Self, PatternError> {
        let mut lowering = Lowering {
            ast,
            variable_depth: 0,
            params: Vec::new(),
        };
        let root = lowering.lower(ast.root(), false)?;
        Ok(Self {
            root,
            params: lowering.params,
        })
    }

    /// Builds a path from `params`, or `None` when a required parameter is
    /// missing on every alternative.
    #[must_use]
    pub fn build(&self, params: &Vars) -> Option<String> {
        let root = self.root.as_ref()?;
        let mut out = String::new();
        root.build_into(params, &mut out).then_some(out)
    }

    /// Parameters in declaration order, one entry per name.
    #[must_use]
    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }
}

struct Lowering<'a> {
    ast: &'a PatternAst,
    variable_depth: usize,
    params: Vec<ParamSpec>,
}

impl Lowering<'_> {
    /// `None` means the node has no buildable value (a raw regexp).
    ///
    /// `optional` is set when the node sits under a fallback or a choice.
    fn lower(&mut self, id: NodeId, optional: bool) -> Result<Option<BuildNode>, PatternError> {
        let ast = self.ast;
        let node = match ast.kind(id) {
            NodeKind::Path { children, absolute } => {
                let mut parts = Vec::with_capacity(children.len() * 2 + 1);
                if *absolute {
                    parts.push(BuildNode::Literal(SEPARATOR.to_owned()));
                }
                for (i, &segment) in children.iter().enumerate() {
                    if i > 0 {
                        parts.push(BuildNode::Literal(SEPARATOR.to_owned()));
                    }
                    match self.lower(segment, optional)? {
                        Some(part) => parts.push(part),
                        None => return Ok(None),
                    }
                }
                concat(parts)
            }
            NodeKind::Segment { children } => {
                let mut parts = Vec::with_capacity(children.len());
                for &child in children {
                    match self.lower(child, optional)? {
                        Some(part) => parts.push(part),
                        None => return Ok(None),
                    }
                }
                concat(parts)
            }
            NodeKind::Alt { children } => {
                let mut branches = Vec::with_capacity(children.len());
                let optional = optional || children.len() > 1;
                for &branch in children {
                    match self.lower(branch, optional)? {
                        Some(BuildNode::Select(nested)) => branches.extend(nested),
                        Some(branch) => branches.push(branch),
                        None => {}
                    }
                }
                match select(branches) {
                    Some(node) => node,
                    None => return Ok(None),
                }
            }
            NodeKind::Variable { name, constraint } => {
                let name: Arc<str> = Arc::from(name.as_str());
                let values = constraint
                    .and_then(|c| literal_values(ast, c))
                    .map_or(ValueSet::Any, ValueSet::Literals);

                let index = self.declare(&name, values);
                let fallback = match constraint {
                    Some(constraint) => {
                        self.variable_depth += 1;
                        let lowered = self.lower(*constraint, true);
                        self.variable_depth -= 1;
                        match lowered? {
                            Some(BuildNode::Literal(_)) | None => None,
                            Some(node) => Some(Box::new(node)),
                        }
                    }
                    None => None,
                };

                if !optional && fallback.is_none() {
                    self.params[index].optional = false;
                }
                BuildNode::Param { name, fallback }
            }
            NodeKind::Wildcard { .. } => BuildNode::Literal(String::new()),
            NodeKind::RegExp { .. } => {
                if self.variable_depth == 0 {
                    return Err(PatternError::RegExpOutsideVariable {
                        offset: ast.span(id).start,
                    });
                }
                return Ok(None);
            }
            NodeKind::Text { value } => BuildNode::Literal(value.clone()),
        };
        Ok(Some(node))
    }

    /// Index of the entry for `name`, created optional on first sight.
    /// Any required occurrence later clears the flag.
    fn declare(&mut self, name: &str, values: ValueSet) -> usize {
        match self.params.iter().position(|p| p.name == name) {
            Some(index) => {
                self.params[index].values.merge(values);
                index
            }
            None => {
                self.params.push(ParamSpec {
                    name: name.to_owned(),
                    optional: true,
                    values,
                });
                self.params.len() - 1
            }
        }
    }
}

/// Flattens nested concatenations and joins adjacent literals.
fn concat(parts: Vec<BuildNode>) -> BuildNode {
    let mut flat: Vec<BuildNode> = Vec::with_capacity(parts.len());
    let mut stack: Vec<BuildNode> = parts.into_iter().rev().collect();
    while let Some(part) = stack.pop() {
        match part {
            BuildNode::Concat(nested) => stack.extend(nested.into_iter().rev()),
            BuildNode::Literal(value) => match flat.last_mut() {
                Some(BuildNode::Literal(prev)) => prev.push_str(&value),
                _ => flat.push(BuildNode::Literal(value)),
            },
            other => flat.push(other),
        }
    }
    match flat.len() {
        0 => BuildNode::Literal(String::new()),
        1 => flat.pop().unwrap_or(BuildNode::Literal(String::new())),
        _ => BuildNode::Concat(flat),
    }
}

/// Keeps branches up to and including the first literal one.
fn select(mut branches: Vec<BuildNode>) -> Option<BuildNode> {
    if let Some(first_literal) = branches
        .iter()
        .position(|b| matches!(b, BuildNode::Literal(_)))
    {
        branches.truncate(first_literal + 1);
    }
    match branches.len() {
        0 => None,
        1 => branches.pop(),
        _ => Some(BuildNode::Select(branches)),
    }
}

/// Every literal value `id` can take, if it is made of text only.
fn literal_values(ast: &PatternAst, id: NodeId) -> Option<Vec<String>> {
    match ast.kind(id) {
        NodeKind::Alt { children } => {
            let mut values = Vec::new();
            for &branch in children {
                for value in literal_values(ast, branch)? {
                    if !values.contains(&value) {
                        values.push(value);
                    }
                }
            }
            Some(values)
        }
        _ => literal_text(ast, id).map(|value| vec![value]),
    }
}

fn literal_text(ast: &PatternAst, id: NodeId) -> Option<String> {
    match ast.kind(id) {
        NodeKind::Text { value } => Some(value.clone()),
        NodeKind::Segment { children } => children
            .iter()
            .map(|&child| literal_text(ast, child))
            .collect(),
        NodeKind::Path { children, absolute } => {
            let mut out = String::new();
            if *absolute {
                out.push_str(SEPARATOR);
            }
            for (i, &segment) in children.iter().enumerate() {
                if i > 0 {
                    out.push_str(SEPARATOR);
                }
                out.push_str(&literal_text(ast, segment)?);
            }
            Some(out)
        }
        NodeKind::Alt { children } if children.len() == 1 => literal_text(ast, children[0]),
        _ => None,
    }
}
