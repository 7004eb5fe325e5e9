//! Source model for statement reduction.
//!
//! A [`SyntaxTree`] is an immutable arena of statement nodes over one program
//! text. Nodes are addressed by [`NodeId`] and expose exactly what the
//! removal pass needs: a kind, a byte span, ordered children, and whether the
//! node came from an included file.
//!
//! Trees are produced either by the C front end (see `crate::cst`) or by
//! hand through [`SyntaxTreeBuilder`].

mod builder;
mod regions;

pub use builder::{BuildError, SyntaxTreeBuilder};
pub use regions::IncludedRegions;

use serde::Serialize;
use smallvec::SmallVec;
use std::fmt;
use std::ops::Range;

/// Index of a node inside a [`SyntaxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(u32::try_from(index).unwrap_or(u32::MAX))
    }

    /// Position of the node in the arena.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Statement kinds the removal pass distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StmtKind {
    /// A `{ ... }` block.
    Compound,
    /// A labelled statement (`label: stmt`).
    Label,
    /// A statement introducing one or more bindings.
    Declaration,
    /// An expression, including expressions in statement position.
    Expression,
    /// Any other statement (`if`, `return`, loops, ...).
    Other,
}

impl StmtKind {
    /// Short lowercase name used in listings.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Compound => "compound",
            Self::Label => "label",
            Self::Declaration => "declaration",
            Self::Expression => "expression",
            Self::Other => "statement",
        }
    }
}

impl fmt::Display for StmtKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Half-open byte range into the program text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
}

impl Span {
    /// Create a span covering `start..end`.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of bytes covered.
    #[must_use]
    pub const fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the span covers no bytes.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.end <= self.start
    }

    /// Whether `other` lies entirely inside this span.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// The span as a `Range` for slicing.
    #[must_use]
    pub const fn range(self) -> Range<usize> {
        self.start..self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct SyntaxNode {
    pub(crate) kind: StmtKind,
    pub(crate) span: Span,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: SmallVec<[NodeId; 4]>,
    pub(crate) in_included_file: bool,
}

/// A function definition whose body is a candidate source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionBody {
    /// Function name as written (may be empty for unnamed definitions).
    pub name: String,
    /// Span of the whole definition.
    pub span: Span,
    /// Root statement of the body.
    pub body: NodeId,
}

/// Immutable statement tree over one program text.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    text: String,
    nodes: Vec<SyntaxNode>,
    functions: Vec<FunctionBody>,
    line_starts: Vec<usize>,
}

impl SyntaxTree {
    pub(crate) fn from_parts(
        text: String,
        nodes: Vec<SyntaxNode>,
        functions: Vec<FunctionBody>,
    ) -> Self {
        let line_starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            text,
            nodes,
            functions,
            line_starts,
        }
    }

    /// The full program text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Text covered by `span`, or an empty string when the span is invalid.
    #[must_use]
    pub fn slice(&self, span: Span) -> &str {
        self.text.get(span.range()).unwrap_or_default()
    }

    /// Function bodies in declaration order.
    #[must_use]
    pub fn functions(&self) -> &[FunctionBody] {
        &self.functions
    }

    /// Number of nodes in the arena.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn node(&self, id: NodeId) -> &SyntaxNode {
        &self.nodes[id.index()]
    }

    /// Kind of the node.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> StmtKind {
        self.node(id).kind
    }

    /// Source span of the node.
    #[must_use]
    pub fn span(&self, id: NodeId) -> Span {
        self.node(id).span
    }

    /// Children of the node in source order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// Parent of the node, `None` for function body roots.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Whether the node was written in an included (header) file.
    #[must_use]
    pub fn is_in_included_file(&self, id: NodeId) -> bool {
        self.node(id).in_included_file
    }

    /// Whether the pass may edit the node's text.
    #[must_use]
    pub fn is_in_editable_file(&self, id: NodeId) -> bool {
        !self.is_in_included_file(id)
    }

    /// Whether the node is a direct child of a compound statement.
    #[must_use]
    pub fn parent_is_compound(&self, id: NodeId) -> bool {
        self.parent(id)
            .is_some_and(|parent| self.kind(parent) == StmtKind::Compound)
    }

    /// Whether `ancestor` is a proper ancestor of `id`.
    #[must_use]
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = self.parent(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// One-based line and column of a byte offset.
    #[must_use]
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let line = self.line_starts.partition_point(|&start| start <= offset);
        let line_start = self.line_starts[line.saturating_sub(1)];
        (line, offset.saturating_sub(line_start) + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SyntaxTree {
        let text = "void f() {\n  a;\n  { b; }\n}\n";
        let mut builder = SyntaxTreeBuilder::new(text);
        builder.begin_function("f", Span::new(0, 27));
        builder.open(StmtKind::Compound, Span::new(9, 26));
        builder.leaf(StmtKind::Expression, Span::new(13, 15));
        builder.open(StmtKind::Compound, Span::new(18, 24));
        builder.leaf(StmtKind::Expression, Span::new(20, 22));
        builder.close();
        builder.close();
        builder.end_function();
        builder.finish().unwrap()
    }

    #[test]
    fn test_parent_is_compound() {
        let tree = sample();
        let body = tree.functions()[0].body;
        assert!(!tree.parent_is_compound(body));
        for &child in tree.children(body) {
            assert!(tree.parent_is_compound(child));
        }
    }

    #[test]
    fn test_is_ancestor() {
        let tree = sample();
        let body = tree.functions()[0].body;
        let inner = tree.children(body)[1];
        let leaf = tree.children(inner)[0];
        assert!(tree.is_ancestor(body, leaf));
        assert!(tree.is_ancestor(inner, leaf));
        assert!(!tree.is_ancestor(leaf, inner));
        assert!(!tree.is_ancestor(leaf, leaf));
    }

    #[test]
    fn test_line_col() {
        let tree = sample();
        assert_eq!(tree.line_col(0), (1, 1));
        assert_eq!(tree.line_col(13), (2, 3));
        assert_eq!(tree.line_col(18), (3, 3));
    }

    #[test]
    fn test_slice() {
        let tree = sample();
        assert_eq!(tree.slice(Span::new(18, 24)), "{ b; }");
        assert_eq!(tree.slice(Span::new(100, 200)), "");
    }
}
