//! Removal policies and the eligibility filter.

use crate::source::{NodeId, StmtKind, SyntaxTree};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which statements count as candidates and how a window is removed.
///
/// All policies share the enumerator and remover; they differ only in the
/// eligibility filter and in whether descendant counts are recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum RemovalPolicy {
    /// Remove exactly one non-expression statement per invocation.
    #[serde(alias = "single-target")]
    #[value(alias = "single-target")]
    Single,
    /// Batch removal of non-expression statements.
    Statement,
    /// Batch removal of statements and of expressions sitting directly in a block.
    #[default]
    #[serde(alias = "nested-expression")]
    #[value(alias = "nested-expression")]
    NestedExpr,
}

impl RemovalPolicy {
    /// Whether `node` is a deletion candidate under this policy.
    ///
    /// Nodes from included files and labels are never candidates. A
    /// declaration is always a single unit.
    #[must_use]
    pub fn is_eligible(self, tree: &SyntaxTree, node: NodeId) -> bool {
        if tree.is_in_included_file(node) {
            return false;
        }
        match tree.kind(node) {
            StmtKind::Label => false,
            StmtKind::Expression => match self {
                Self::Single | Self::Statement => false,
                Self::NestedExpr => tree.parent_is_compound(node),
            },
            StmtKind::Compound | StmtKind::Declaration | StmtKind::Other => true,
        }
    }

    /// Whether the enumerator looks for candidates beneath an accepted candidate.
    ///
    /// Declarations and expressions are removed whole and never split.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub const fn descends_into(self, kind: StmtKind) -> bool {
        !matches!(kind, StmtKind::Declaration | StmtKind::Expression)
    }

    /// Whether descendant counts are recorded for batch removal.
    #[must_use]
    pub const fn tracks_descendants(self) -> bool {
        !matches!(self, Self::Single)
    }

    /// Name used in configuration files and on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Statement => "statement",
            Self::NestedExpr => "nested-expr",
        }
    }
}

impl fmt::Display for RemovalPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
