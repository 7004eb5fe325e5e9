//! Incremental construction of a [`SyntaxTree`].

use super::{FunctionBody, IncludedRegions, NodeId, Span, StmtKind, SyntaxNode, SyntaxTree};
use smallvec::SmallVec;
use thiserror::Error;

/// Error raised when the recorded nodes do not form a well-nested tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// A span runs past the end of the text or is inverted.
    #[error("span {span} is outside the text (length {text_len})")]
    SpanOutOfBounds {
        /// Offending span
        span: Span,
        /// Length of the program text
        text_len: usize,
    },
    /// A child span is not contained in its parent's span.
    #[error("span {child} escapes its parent span {parent}")]
    SpanEscapesParent {
        /// Child span
        child: Span,
        /// Parent span
        parent: Span,
    },
    /// A node was recorded outside of any function body.
    #[error("statement recorded outside of a function body")]
    OutsideFunction,
    /// `begin_function` was called before the previous function ended.
    #[error("function `{0}` started before the previous one ended")]
    NestedFunction(String),
    /// A function ended without exactly one body statement.
    #[error("function `{0}` must have exactly one body statement")]
    MissingBody(String),
    /// `open` and `close` calls do not balance.
    #[error("unbalanced open/close calls")]
    Unbalanced,
}

#[derive(Debug)]
struct PendingFunction {
    name: String,
    span: Span,
    body: Option<NodeId>,
}

/// Builds a [`SyntaxTree`] from pre-order `open`/`leaf`/`close` calls.
///
/// Errors are latched: the first problem is reported by [`finish`](Self::finish)
/// and later calls are ignored.
#[derive(Debug)]
pub struct SyntaxTreeBuilder {
    text: String,
    nodes: Vec<SyntaxNode>,
    functions: Vec<FunctionBody>,
    regions: IncludedRegions,
    stack: Vec<NodeId>,
    function: Option<PendingFunction>,
    error: Option<BuildError>,
}

impl SyntaxTreeBuilder {
    /// Start a tree over `text` with no included regions.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            nodes: Vec::new(),
            functions: Vec::new(),
            regions: IncludedRegions::default(),
            stack: Vec::new(),
            function: None,
            error: None,
        }
    }

    /// Mark nodes starting inside `regions` as coming from included files.
    #[must_use]
    pub fn with_included_regions(mut self, regions: IncludedRegions) -> Self {
        self.regions = regions;
        self
    }

    fn fail(&mut self, error: BuildError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    fn check_bounds(&mut self, span: Span) -> bool {
        if span.start > span.end || span.end > self.text.len() {
            self.fail(BuildError::SpanOutOfBounds {
                span,
                text_len: self.text.len(),
            });
            return false;
        }
        true
    }

    /// Begin a function definition spanning `span`.
    pub fn begin_function(&mut self, name: impl Into<String>, span: Span) {
        let name = name.into();
        if self.function.is_some() {
            self.fail(BuildError::NestedFunction(name));
            return;
        }
        self.check_bounds(span);
        self.function = Some(PendingFunction {
            name,
            span,
            body: None,
        });
    }

    /// Finish the current function definition.
    pub fn end_function(&mut self) {
        if !self.stack.is_empty() {
            self.fail(BuildError::Unbalanced);
            return;
        }
        match self.function.take() {
            Some(PendingFunction {
                name,
                span,
                body: Some(body),
            }) => self.functions.push(FunctionBody { name, span, body }),
            Some(PendingFunction { name, .. }) => self.fail(BuildError::MissingBody(name)),
            None => self.fail(BuildError::Unbalanced),
        }
    }

    fn push_node(&mut self, kind: StmtKind, span: Span) -> Option<NodeId> {
        if self.error.is_some() || !self.check_bounds(span) {
            return None;
        }
        let Some(function) = self.function.as_mut() else {
            self.fail(BuildError::OutsideFunction);
            return None;
        };

        let parent = self.stack.last().copied();
        let id = NodeId::from_index(self.nodes.len());
        match parent {
            Some(parent) => {
                let parent_span = self.nodes[parent.index()].span;
                if !parent_span.contains(span) {
                    self.fail(BuildError::SpanEscapesParent {
                        child: span,
                        parent: parent_span,
                    });
                    return None;
                }
                self.nodes[parent.index()].children.push(id);
            }
            None => {
                if function.body.is_some() {
                    let name = function.name.clone();
                    self.fail(BuildError::MissingBody(name));
                    return None;
                }
                function.body = Some(id);
            }
        }

        self.nodes.push(SyntaxNode {
            kind,
            span,
            parent,
            children: SmallVec::new(),
            in_included_file: self.regions.contains(span.start),
        });
        Some(id)
    }

    /// Record a node and make it the parent of subsequent nodes.
    pub fn open(&mut self, kind: StmtKind, span: Span) -> Option<NodeId> {
        let id = self.push_node(kind, span)?;
        self.stack.push(id);
        Some(id)
    }

    /// Record a node with no children.
    pub fn leaf(&mut self, kind: StmtKind, span: Span) -> Option<NodeId> {
        self.push_node(kind, span)
    }

    /// Close the most recently opened node.
    pub fn close(&mut self) {
        if self.error.is_none() && self.stack.pop().is_none() {
            self.fail(BuildError::Unbalanced);
        }
    }

    /// Finish building.
    pub fn finish(self) -> Result<SyntaxTree, BuildError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        if !self.stack.is_empty() || self.function.is_some() {
            return Err(BuildError::Unbalanced);
        }
        Ok(SyntaxTree::from_parts(self.text, self.nodes, self.functions))
    }
}
