//! TreeHandler: calls a plain function over tree-shaped arguments.

use std::borrow::Cow;

use tracing::{debug, instrument, trace};

use crate::application::error::HandlerError;
use crate::application::output::{OutputTreeBuilder, StepOutput};
use crate::application::resolver::{AccessResolver, Arg};
use crate::domain::{AccessSpec, DataTree, DomainError, MatchOptions, MatchPlan, PathMatcher, TreeInput};

/// Wraps a function written against plain items or lists so it can be called
/// with trees of any shape.
///
/// The access list declared at construction says, per positional argument,
/// whether the function sees single items or whole branches. It can be
/// overridden per call with [`TreeHandler::call_with_access`].
///
/// Steps run sequentially in plan order and the function is invoked exactly
/// once per step.
///
/// ```
/// use std::convert::Infallible;
/// use treehandler::application::{StepOutput, TreeHandler};
/// use treehandler::domain::{AccessSpec, DataTree, TreeInput, TreePath};
///
/// let a = DataTree::from_branches(vec![(vec![0], vec![1, 2]), (vec![1], vec![3])]).unwrap();
/// let mut add = TreeHandler::new(
///     |args| {
///         let x: i64 = *args[0].as_item().unwrap();
///         let y: i64 = *args[1].as_item().unwrap();
///         Ok::<_, Infallible>(StepOutput::Item(x + y))
///     },
///     [AccessSpec::Item, AccessSpec::Item],
/// );
///
/// let out = add.call(vec![TreeInput::Tree(&a), TreeInput::Value(10)]).unwrap();
/// assert_eq!(out.branch_at(&TreePath::from([0])), Some(&[11, 12][..]));
/// assert_eq!(out.branch_at(&TreePath::from([1])), Some(&[13][..]));
/// ```
pub struct TreeHandler<F> {
    func: F,
    access: Vec<AccessSpec>,
    matcher: PathMatcher,
}

impl<F> TreeHandler<F> {
    pub fn new<T, U, E>(func: F, access: impl Into<Vec<AccessSpec>>) -> Self
    where
        F: FnMut(&[Arg<'_, T>]) -> Result<StepOutput<U>, E>,
    {
        Self {
            func,
            access: access.into(),
            matcher: PathMatcher::default(),
        }
    }

    pub fn with_options(mut self, options: MatchOptions) -> Self {
        self.matcher = PathMatcher::new(options);
        self
    }

    /// Declared access list.
    pub fn access(&self) -> &[AccessSpec] {
        &self.access
    }

    pub fn matcher(&self) -> &PathMatcher {
        &self.matcher
    }

    /// Call with the declared access list.
    pub fn call<T, U, E>(
        &mut self,
        args: Vec<TreeInput<'_, T>>,
    ) -> Result<DataTree<U>, HandlerError<E>>
    where
        T: Clone,
        F: FnMut(&[Arg<'_, T>]) -> Result<StepOutput<U>, E>,
    {
        let access = self.access.clone();
        self.dispatch(args, &access)
    }

    /// Call with `access` replacing the declared list for this call only.
    pub fn call_with_access<T, U, E>(
        &mut self,
        args: Vec<TreeInput<'_, T>>,
        access: &[AccessSpec],
    ) -> Result<DataTree<U>, HandlerError<E>>
    where
        T: Clone,
        F: FnMut(&[Arg<'_, T>]) -> Result<StepOutput<U>, E>,
    {
        self.dispatch(args, access)
    }

    /// Compute the plan a call would run, without invoking the function.
    pub fn plan<T: Clone>(
        &self,
        args: Vec<TreeInput<'_, T>>,
        access: Option<&[AccessSpec]>,
    ) -> Result<MatchPlan, DomainError> {
        let access = access.unwrap_or(self.access.as_slice());
        let trees = normalize(args);
        let bound = bind(&trees, access)?;
        self.matcher.plan(&bound)
    }

    #[instrument(level = "debug", skip_all, fields(arguments = args.len()))]
    fn dispatch<T, U, E>(
        &mut self,
        args: Vec<TreeInput<'_, T>>,
        access: &[AccessSpec],
    ) -> Result<DataTree<U>, HandlerError<E>>
    where
        T: Clone,
        F: FnMut(&[Arg<'_, T>]) -> Result<StepOutput<U>, E>,
    {
        let trees = normalize(args);
        let bound = bind(&trees, access)?;
        let plan = self.matcher.plan(&bound)?;
        debug!(
            "dispatch: {} steps over {} paths",
            plan.len(),
            plan.universe().len()
        );

        let resolver = AccessResolver::new(&self.matcher);
        let mut builder = OutputTreeBuilder::new();
        let mut values = Vec::with_capacity(bound.len());
        for step in plan.steps() {
            values.clear();
            for (argument, (tree, spec)) in bound.iter().enumerate() {
                values.push(resolver.resolve(step, argument, tree, *spec)?);
            }
            trace!("dispatch: step {}", step);
            let output = (self.func)(values.as_slice()).map_err(HandlerError::Function)?;
            builder.push(step, output);
        }
        Ok(builder.finish())
    }
}

fn normalize<'a, T: Clone>(args: Vec<TreeInput<'a, T>>) -> Vec<Cow<'a, DataTree<T>>> {
    args.into_iter().map(TreeInput::into_tree).collect()
}

/// Pair each normalized argument with its access mode.
fn bind<'t, T: Clone>(
    trees: &'t [Cow<'_, DataTree<T>>],
    access: &[AccessSpec],
) -> Result<Vec<(&'t DataTree<T>, AccessSpec)>, DomainError> {
    if trees.len() != access.len() {
        return Err(DomainError::AccessSpecArity {
            expected: trees.len(),
            found: access.len(),
        });
    }
    Ok(trees
        .iter()
        .map(|tree| &**tree)
        .zip(access.iter().copied())
        .collect())
}
