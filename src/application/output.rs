//! Reassembly of per-step results into an output tree

use tracing::{instrument, trace};

use crate::domain::{DataTree, IterationStep, TreePath};

/// What one call of the wrapped function produced.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutput<U> {
    /// A single item, appended to the step's path
    Item(U),
    /// A tree, grafted beneath the step's path
    Tree(DataTree<U>),
}

impl<U> From<DataTree<U>> for StepOutput<U> {
    fn from(tree: DataTree<U>) -> Self {
        StepOutput::Tree(tree)
    }
}

/// Collects step results in plan order.
///
/// Items land on the step's path in index order, so the output has the shape
/// of the visited path universe. Tree results are grafted: inner path `q` of a
/// result at step path `p` is stored under `p ++ q`. Grafting concatenates
/// paths and is therefore associative for nested handled calls.
///
/// Steps sharing a path also share the grafted branches: two steps at `{0}`
/// that both return `{0}: [..]` end up in the single branch `{0;0}`, in step
/// order, and which step produced which item is not kept.
#[derive(Debug)]
pub struct OutputTreeBuilder<U> {
    tree: DataTree<U>,
    grafted: usize,
}

impl<U> Default for OutputTreeBuilder<U> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U> OutputTreeBuilder<U> {
    pub fn new() -> Self {
        Self {
            tree: DataTree::new(),
            grafted: 0,
        }
    }

    pub fn push(&mut self, step: &IterationStep, output: StepOutput<U>) {
        match output {
            StepOutput::Item(value) => self.tree.push(step.path.clone(), value),
            StepOutput::Tree(inner) => self.graft(&step.path, inner),
        }
    }

    fn graft(&mut self, outer: &TreePath, inner: DataTree<U>) {
        for (path, items) in inner.into_branches() {
            let target = outer.join(&path);
            trace!("graft {} -> {}", path, target);
            self.tree.extend_branch(target, items);
        }
        self.grafted += 1;
    }

    #[instrument(level = "debug", skip_all, fields(grafted = self.grafted))]
    pub fn finish(self) -> DataTree<U> {
        self.tree
    }
}
