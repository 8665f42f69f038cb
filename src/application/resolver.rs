//! Per-step argument resolution

use tracing::trace;

use crate::domain::{AccessSpec, DataTree, DomainError, DomainResult, IterationStep, PathMatcher};

/// The value one argument contributes to one call of the wrapped function.
#[derive(Debug, PartialEq)]
pub enum Arg<'a, T> {
    Item(&'a T),
    List(&'a [T]),
}

// Manual impls: derive would require `T: Clone`/`T: Copy`.
impl<T> Clone for Arg<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Arg<'_, T> {}

impl<'a, T> Arg<'a, T> {
    pub fn as_item(&self) -> Option<&'a T> {
        match *self {
            Arg::Item(item) => Some(item),
            Arg::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&'a [T]> {
        match *self {
            Arg::List(items) => Some(items),
            Arg::Item(_) => None,
        }
    }

    /// Items as a slice regardless of access mode (one element for `Item`).
    pub fn items(&self) -> &'a [T] {
        match *self {
            Arg::Item(item) => std::slice::from_ref(item),
            Arg::List(items) => items,
        }
    }
}

/// Hands each argument its value for a given step.
#[derive(Debug, Clone, Copy)]
pub struct AccessResolver<'m> {
    matcher: &'m PathMatcher,
}

impl<'m> AccessResolver<'m> {
    pub fn new(matcher: &'m PathMatcher) -> Self {
        Self { matcher }
    }

    /// Value of argument `argument` at `step`.
    ///
    /// `Item` picks position `min(index, len - 1)` of the effective branch, so a
    /// short branch repeats its last item. `List` hands over the whole effective
    /// branch regardless of the index.
    pub fn resolve<'t, T>(
        &self,
        step: &IterationStep,
        argument: usize,
        tree: &'t DataTree<T>,
        access: AccessSpec,
    ) -> DomainResult<Arg<'t, T>> {
        let branch = self
            .matcher
            .effective_branch(tree, &step.path)
            .ok_or_else(|| DomainError::PathMismatch {
                argument,
                path: step.path.clone(),
            })?;
        match access {
            AccessSpec::List => Ok(Arg::List(branch.items)),
            AccessSpec::Item => {
                let last = branch
                    .items
                    .len()
                    .checked_sub(1)
                    .ok_or_else(|| DomainError::EmptyBranch {
                        argument,
                        path: step.path.clone(),
                    })?;
                let position = step.index.min(last);
                trace!("{}: argument {} -> {}[{}]", step, argument, branch.source, position);
                Ok(Arg::Item(&branch.items[position]))
            }
        }
    }
}
