//! Path matching: reconciles the shapes of all argument trees of one call into
//! a single iteration plan.
//!
//! Two independent host behaviors are reproduced:
//! - path level: every path of an item-accessed argument is visited; other
//!   arguments answer with the exact branch, the nearest ancestor branch, or,
//!   for single-branch trees, their only branch (broadcast);
//! - item level: within a path the longest item branch sets the step count and
//!   shorter branches repeat their last item.

use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::{AccessSpec, DataTree, TreePath};

/// Fallback switches for path resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchOptions {
    /// Use the nearest ancestor branch when the exact path is missing
    pub ancestor_fallback: bool,
    /// Let a single-branch tree answer for every path
    pub broadcast_single_branch: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            ancestor_fallback: true,
            broadcast_single_branch: true,
        }
    }
}

/// How an effective branch was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    Exact,
    Ancestor,
    Broadcast,
}

/// The branch an argument supplies at a visited path.
#[derive(Debug, Clone, Copy)]
pub struct EffectiveBranch<'t, T> {
    /// Path the branch is actually stored under
    pub source: &'t TreePath,
    pub items: &'t [T],
    pub fallback: Fallback,
}

/// One invocation of the wrapped function.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IterationStep {
    pub path: TreePath,
    pub index: usize,
}

impl fmt::Display for IterationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.path, self.index)
    }
}

/// Ordered schedule of iteration steps for one call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchPlan {
    universe: Vec<TreePath>,
    counts: Vec<usize>,
    steps: Vec<IterationStep>,
}

impl MatchPlan {
    pub fn steps(&self) -> &[IterationStep] {
        &self.steps
    }

    /// Visited paths in lexicographic order.
    pub fn universe(&self) -> &[TreePath] {
        &self.universe
    }

    /// Visited paths with their step counts.
    pub fn per_path(&self) -> impl Iterator<Item = (&TreePath, usize)> + '_ {
        self.universe.iter().zip(self.counts.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct PathMatcher {
    options: MatchOptions,
}

impl PathMatcher {
    pub fn new(options: MatchOptions) -> Self {
        Self { options }
    }

    /// Resolve the branch `tree` supplies at `path`.
    ///
    /// Tries the exact path, then ancestors (nearest first, down to `{}`), then
    /// the only branch of a single-path tree. `None` when nothing applies.
    pub fn effective_branch<'t, T>(
        &self,
        tree: &'t DataTree<T>,
        path: &TreePath,
    ) -> Option<EffectiveBranch<'t, T>> {
        if let Some(branch) = self.lineage_branch(tree, path) {
            return Some(branch);
        }
        if self.options.broadcast_single_branch {
            if let Some((source, items)) = tree.single_branch() {
                return Some(EffectiveBranch {
                    source,
                    items,
                    fallback: Fallback::Broadcast,
                });
            }
        }
        None
    }

    /// Exact or ancestor branch only, without broadcast.
    fn lineage_branch<'t, T>(
        &self,
        tree: &'t DataTree<T>,
        path: &TreePath,
    ) -> Option<EffectiveBranch<'t, T>> {
        if let Some((source, items)) = tree.branch_entry(path) {
            return Some(EffectiveBranch {
                source,
                items,
                fallback: Fallback::Exact,
            });
        }
        if !self.options.ancestor_fallback {
            return None;
        }
        path.ancestors()
            .find_map(|ancestor| tree.branch_entry(&ancestor))
            .map(|(source, items)| EffectiveBranch {
                source,
                items,
                fallback: Fallback::Ancestor,
            })
    }

    /// Arguments whose paths make up the universe.
    ///
    /// Item arguments drive, list arguments only when there are no item
    /// arguments. A single-branch driver whose path some multi-branch driver
    /// cannot reach by lineage is left out: it is broadcast instead, so a
    /// scalar matches a nested tree of any depth.
    fn drivers<'a, T>(
        &self,
        args: &'a [(&'a DataTree<T>, AccessSpec)],
    ) -> Vec<&'a DataTree<T>> {
        let has_item_args = args.iter().any(|(_, access)| *access == AccessSpec::Item);
        let candidates: Vec<&DataTree<T>> = args
            .iter()
            .filter(|(_, access)| !has_item_args || *access == AccessSpec::Item)
            .map(|(tree, _)| *tree)
            .collect();
        if !self.options.broadcast_single_branch {
            return candidates;
        }

        let multi: Vec<&DataTree<T>> = candidates
            .iter()
            .copied()
            .filter(|tree| tree.branch_count() > 1)
            .collect();
        candidates
            .into_iter()
            .filter(|tree| match tree.single_branch() {
                Some((path, _)) if !multi.is_empty() => {
                    let reachable = multi
                        .iter()
                        .all(|other| self.lineage_branch(other, path).is_some());
                    if !reachable {
                        trace!("plan: broadcasting single branch {}", path);
                    }
                    reachable
                }
                _ => true,
            })
            .collect()
    }

    /// Build the iteration plan for one call.
    ///
    /// Every argument is resolved at every visited path here, so shape errors
    /// surface before the wrapped function runs even once.
    #[instrument(level = "debug", skip_all, fields(arguments = args.len()))]
    pub fn plan<T>(&self, args: &[(&DataTree<T>, AccessSpec)]) -> DomainResult<MatchPlan> {
        let has_item_args = args.iter().any(|(_, access)| *access == AccessSpec::Item);
        let universe: Vec<TreePath> = self
            .drivers(args)
            .into_iter()
            .map(DataTree::paths)
            .kmerge()
            .dedup()
            .cloned()
            .collect();
        debug!(
            "plan: {} paths in universe (driven by {} arguments)",
            universe.len(),
            if has_item_args { "item" } else { "list" }
        );

        let mut counts = Vec::with_capacity(universe.len());
        let mut steps = Vec::new();
        for path in &universe {
            let mut count = if has_item_args { 0 } else { 1 };
            for (argument, (tree, access)) in args.iter().enumerate() {
                let branch = self.effective_branch(tree, path).ok_or_else(|| {
                    DomainError::PathMismatch {
                        argument,
                        path: path.clone(),
                    }
                })?;
                if branch.fallback != Fallback::Exact {
                    trace!(
                        "argument {} at {}: {:?} from {}",
                        argument,
                        path,
                        branch.fallback,
                        branch.source
                    );
                }
                if *access == AccessSpec::Item {
                    if branch.items.is_empty() {
                        return Err(DomainError::EmptyBranch {
                            argument,
                            path: path.clone(),
                        });
                    }
                    count = count.max(branch.items.len());
                }
            }
            steps.extend((0..count).map(|index| IterationStep {
                path: path.clone(),
                index,
            }));
            counts.push(count);
        }
        debug!("plan: {} steps", steps.len());

        Ok(MatchPlan {
            universe,
            counts,
            steps,
        })
    }
}
