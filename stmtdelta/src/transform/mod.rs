//! The statement-removal pass.
//!
//! A run enumerates every eligible statement once, validates the requested
//! counter window against that enumeration, and deletes the selected
//! statements' text in one atomic splice:
//!
//! ```
//! use stmtdelta::test_utils::toy_tree;
//! use stmtdelta::transform::{RemovalPolicy, RemoveStatement, SelectionWindow};
//!
//! let tree = toy_tree("f() { a; { b; } c; }");
//! let pass = RemoveStatement::new(RemovalPolicy::NestedExpr);
//! assert_eq!(pass.query_instance_count(&tree), 5);
//!
//! let removal = pass
//!     .apply_removal(&tree, SelectionWindow::single(1).unwrap())
//!     .unwrap();
//! assert_eq!(removal.text, "f() { a; { b; }  }");
//! ```

pub mod enumerator;
pub mod policy;
pub mod remover;
pub mod selector;

pub use enumerator::{enumerate, Candidate, CandidateList};
pub use policy::RemovalPolicy;
pub use remover::{Removal, RemovedStatement};
pub use selector::{validate, IndexRange, SelectionError, SelectionWindow};

use crate::fix::RewriteError;
use crate::source::SyntaxTree;
use thiserror::Error;

/// Failure of one removal invocation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// The requested counter exceeds the number of candidates.
    #[error("counter {counter} exceeds the {available} available instances")]
    OutOfRange {
        /// Requested lower counter
        counter: usize,
        /// Number of candidates found
        available: usize,
    },
    /// The text splice rejected the planned deletions.
    #[error("internal edit failure: {0}")]
    InternalEditFailure(#[from] RewriteError),
}

/// The remove-statement transformation configured with one policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemoveStatement {
    policy: RemovalPolicy,
}

impl RemoveStatement {
    /// Create the pass for `policy`.
    #[must_use]
    pub fn new(policy: RemovalPolicy) -> Self {
        Self { policy }
    }

    /// The configured policy.
    #[must_use]
    pub fn policy(&self) -> RemovalPolicy {
        self.policy
    }

    /// Enumerate the candidates of `tree`.
    #[must_use]
    pub fn candidates(&self, tree: &SyntaxTree) -> CandidateList {
        enumerate(tree, self.policy)
    }

    /// Number of valid counters for `tree`, without editing anything.
    #[must_use]
    pub fn query_instance_count(&self, tree: &SyntaxTree) -> usize {
        self.candidates(tree).len()
    }

    /// Remove the statements selected by `window` from `tree`'s text.
    ///
    /// The single-target policy only ever removes the window's lower counter.
    pub fn apply_removal(
        &self,
        tree: &SyntaxTree,
        window: SelectionWindow,
    ) -> Result<Removal, TransformError> {
        let list = self.candidates(tree);
        self.remove_from(tree, &list, window)
    }

    /// Like [`apply_removal`](Self::apply_removal) but reusing an enumeration.
    pub fn remove_from(
        &self,
        tree: &SyntaxTree,
        list: &CandidateList,
        window: SelectionWindow,
    ) -> Result<Removal, TransformError> {
        debug_assert_eq!(list.policy(), self.policy);
        let window = if self.policy.tracks_descendants() {
            window
        } else {
            window.collapsed()
        };

        let range = validate(window, list.len())?;
        let removal = remover::remove(tree, list, range)?;
        tracing::debug!(
            %window,
            width = window.width(),
            removed = removal.removed.len(),
            bytes = tree.text().len() - removal.text.len(),
            "applied removal"
        );
        Ok(removal)
    }
}
