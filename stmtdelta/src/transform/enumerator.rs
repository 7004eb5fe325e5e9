//! Statement enumeration.
//!
//! Walks every function body once, pre-order and in declaration order, and
//! collects the statements the active [`RemovalPolicy`] accepts. For batch
//! policies each entry also records how many of the entries that follow it
//! were discovered beneath it, so a removal of that entry can skip them.

use super::policy::RemovalPolicy;
use crate::source::{NodeId, SyntaxTree};
use serde::Serialize;

/// One deletion candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Candidate {
    /// Node in the source tree.
    pub node: NodeId,
    /// Index of the enclosing function in [`SyntaxTree::functions`].
    pub function: usize,
}

/// Ordered candidates of one enumeration run.
///
/// Positions are 0-based in discovery order. Counters are 1-based and run
/// from the end: the last discovered candidate has counter 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateList {
    policy: RemovalPolicy,
    entries: Vec<Candidate>,
    descendant_counts: Vec<usize>,
}

impl CandidateList {
    /// Policy the list was built with.
    #[must_use]
    pub fn policy(&self) -> RemovalPolicy {
        self.policy
    }

    /// Number of candidates, i.e. the number of valid instances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no candidate was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Candidate at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Candidate> {
        self.entries.get(index)
    }

    /// Candidates in discovery order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Candidate> + '_ {
        self.entries.iter()
    }

    /// Number of entries right after `index` that lie beneath it.
    ///
    /// Always 0 for the single-target policy.
    #[must_use]
    pub fn descendant_count(&self, index: usize) -> usize {
        self.descendant_counts.get(index).copied().unwrap_or(0)
    }

    /// Counter addressing the candidate at `index`.
    #[must_use]
    pub fn counter_of(&self, index: usize) -> usize {
        self.len() - index
    }

    /// Index of the candidate addressed by `counter`.
    #[must_use]
    pub fn index_of(&self, counter: usize) -> Option<usize> {
        (1..=self.len())
            .contains(&counter)
            .then(|| self.len() - counter)
    }

    /// Whether the entry at `index` is subsumed by the entry at `ancestor`.
    #[must_use]
    pub fn is_descendant(&self, ancestor: usize, index: usize) -> bool {
        ancestor < index && index <= ancestor + self.descendant_count(ancestor)
    }
}

enum Step {
    Visit(NodeId),
    Close(usize),
}

/// Running state threaded through one traversal.
struct TraversalContext<'t> {
    tree: &'t SyntaxTree,
    policy: RemovalPolicy,
    entries: Vec<Candidate>,
    descendant_counts: Vec<usize>,
    stack: Vec<Step>,
}

impl<'t> TraversalContext<'t> {
    fn new(tree: &'t SyntaxTree, policy: RemovalPolicy) -> Self {
        Self {
            tree,
            policy,
            entries: Vec::new(),
            descendant_counts: Vec::new(),
            stack: Vec::new(),
        }
    }

    fn push_children(&mut self, node: NodeId) {
        self.stack
            .extend(self.tree.children(node).iter().rev().map(|&c| Step::Visit(c)));
    }

    fn visit_function(&mut self, function: usize, body: NodeId) {
        self.stack.push(Step::Visit(body));
        while let Some(step) = self.stack.pop() {
            match step {
                Step::Visit(node) => {
                    if !self.policy.is_eligible(self.tree, node) {
                        self.push_children(node);
                        continue;
                    }
                    let position = self.entries.len();
                    self.entries.push(Candidate { node, function });
                    self.descendant_counts.push(0);
                    if self.policy.descends_into(self.tree.kind(node)) {
                        self.stack.push(Step::Close(position));
                        self.push_children(node);
                    }
                }
                Step::Close(position) => {
                    if self.policy.tracks_descendants() {
                        self.descendant_counts[position] = self.entries.len() - position - 1;
                    }
                }
            }
        }
    }

    fn finish(self) -> CandidateList {
        CandidateList {
            policy: self.policy,
            entries: self.entries,
            descendant_counts: self.descendant_counts,
        }
    }
}

/// Enumerate the removal candidates of `tree` under `policy`.
#[must_use]
pub fn enumerate(tree: &SyntaxTree, policy: RemovalPolicy) -> CandidateList {
    let mut ctx = TraversalContext::new(tree, policy);
    for (function, body) in tree.functions().iter().enumerate() {
        ctx.visit_function(function, body.body);
    }
    let list = ctx.finish();
    tracing::debug!(
        %policy,
        functions = tree.functions().len(),
        candidates = list.len(),
        "enumerated removal candidates"
    );
    list
}
