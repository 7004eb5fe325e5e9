//! Turning a validated window into text deletions.

use super::enumerator::CandidateList;
use super::selector::IndexRange;
use crate::fix::{ByteRangeRewriter, Edit, RewriteError};
use crate::source::{Span, StmtKind, SyntaxTree};
use serde::Serialize;

/// A statement deleted by a removal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemovedStatement {
    /// Counter that addressed the statement.
    pub counter: usize,
    /// Statement kind.
    pub kind: StmtKind,
    /// Deleted byte range in the original text.
    pub span: Span,
    /// Candidates erased along with it.
    pub subsumed: usize,
}

/// Result of a successful removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removal {
    /// The program text after the deletions.
    pub text: String,
    /// Deleted statements in increasing position order.
    pub removed: Vec<RemovedStatement>,
}

/// Positions whose spans are deleted, skipping entries already covered by an
/// earlier deleted ancestor.
#[must_use]
pub fn plan(list: &CandidateList, range: IndexRange) -> Vec<usize> {
    let mut positions = Vec::new();
    let mut i = range.first;
    while i <= range.last {
        positions.push(i);
        i += 1 + list.descendant_count(i);
    }
    positions
}

/// Delete the candidates selected by `range` from the text of `tree`.
///
/// One deletion is issued per planned position, in increasing order. The
/// tree's text is left untouched; on error no text is produced.
pub fn remove(
    tree: &SyntaxTree,
    list: &CandidateList,
    range: IndexRange,
) -> Result<Removal, RewriteError> {
    debug_assert!(!list.is_empty(), "removal requires enumerated candidates");
    debug_assert!(range.first <= range.last && range.last < list.len());

    let mut rewriter = ByteRangeRewriter::new(tree.text());
    let mut removed = Vec::new();

    for position in plan(list, range) {
        let Some(candidate) = list.get(position) else {
            break;
        };
        let span = tree.span(candidate.node);
        let counter = list.counter_of(position);
        tracing::trace!(counter, %span, "deleting statement");
        rewriter.add_edit(Edit::delete(span.start, span.end));
        removed.push(RemovedStatement {
            counter,
            kind: tree.kind(candidate.node),
            span,
            subsumed: list.descendant_count(position),
        });
    }

    let text = rewriter.apply()?;
    Ok(Removal { text, removed })
}
