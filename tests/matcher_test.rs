//! Integration tests for path resolution and iteration planning.

use rstest::{fixture, rstest};

use treehandler::domain::{
    AccessSpec, DataTree, DomainError, Fallback, IterationStep, MatchOptions, PathMatcher,
    TreePath,
};
use treehandler::util::testing;

fn p<const N: usize>(indices: [usize; N]) -> TreePath {
    TreePath::from(indices)
}

fn tree(branches: Vec<(Vec<usize>, Vec<i32>)>) -> DataTree<i32> {
    DataTree::from_branches(branches).expect("valid tree")
}

#[fixture]
fn matcher() -> PathMatcher {
    testing::init_test_setup();
    PathMatcher::default()
}

// ============================================================
// effective_branch
// ============================================================

#[rstest]
fn given_exact_path_when_resolving_then_uses_it(matcher: PathMatcher) {
    let t = tree(vec![(vec![0], vec![1]), (vec![0, 1], vec![2])]);

    let branch = matcher.effective_branch(&t, &p([0, 1])).expect("branch");

    assert_eq!(branch.fallback, Fallback::Exact);
    assert_eq!(branch.items, &[2]);
}

#[rstest]
fn given_missing_path_when_resolving_then_nearest_ancestor_wins(matcher: PathMatcher) {
    let t = tree(vec![(vec![], vec![0]), (vec![0], vec![1]), (vec![5], vec![9])]);

    let branch = matcher.effective_branch(&t, &p([0, 1, 2])).expect("branch");

    assert_eq!(branch.fallback, Fallback::Ancestor);
    assert_eq!(branch.source, &p([0]));
    assert_eq!(branch.items, &[1]);
}

#[rstest]
fn given_root_branch_when_resolving_unrelated_path_then_root_is_ancestor(matcher: PathMatcher) {
    let t = tree(vec![(vec![], vec![0]), (vec![5], vec![9])]);

    let branch = matcher.effective_branch(&t, &p([3, 3])).expect("branch");

    assert_eq!(branch.source, &TreePath::root());
}

#[rstest]
fn given_single_branch_tree_when_resolving_foreign_path_then_broadcasts(matcher: PathMatcher) {
    let t = tree(vec![(vec![7], vec![10])]);

    let branch = matcher.effective_branch(&t, &p([0, 1])).expect("branch");

    assert_eq!(branch.fallback, Fallback::Broadcast);
    assert_eq!(branch.items, &[10]);
}

#[rstest]
fn given_multi_branch_tree_without_match_when_resolving_then_none(matcher: PathMatcher) {
    let t = tree(vec![(vec![0], vec![1]), (vec![1], vec![2])]);

    assert!(matcher.effective_branch(&t, &p([2])).is_none());
}

#[test]
fn given_fallbacks_disabled_when_resolving_then_only_exact_matches() {
    let strict = PathMatcher::new(MatchOptions {
        ancestor_fallback: false,
        broadcast_single_branch: false,
    });
    let nested = tree(vec![(vec![0], vec![1])]);

    assert!(strict.effective_branch(&nested, &p([0, 1])).is_none());
    assert!(strict.effective_branch(&nested, &p([0])).is_some());
}

// ============================================================
// plan
// ============================================================

#[rstest]
fn given_path_only_in_second_arg_when_planning_then_first_reports_mismatch(
    matcher: PathMatcher,
) {
    let a = tree(vec![(vec![0], vec![1]), (vec![2], vec![1])]);
    let b = tree(vec![(vec![0], vec![1]), (vec![1], vec![1]), (vec![2], vec![1])]);

    let err = matcher
        .plan(&[(&a, AccessSpec::Item), (&b, AccessSpec::Item)])
        .expect_err("a has no branch for {1}");

    assert_eq!(
        err,
        DomainError::PathMismatch {
            argument: 0,
            path: p([1])
        }
    );
}

#[rstest]
fn given_item_args_when_planning_then_universe_is_union_of_paths(matcher: PathMatcher) {
    let a = tree(vec![(vec![0], vec![1]), (vec![2], vec![1])]);
    let b = tree(vec![(vec![0, 1], vec![1])]);

    let plan = matcher
        .plan(&[(&a, AccessSpec::Item), (&b, AccessSpec::Item)])
        .expect("plan");

    assert_eq!(plan.universe(), &[p([0]), p([0, 1]), p([2])]);
}

#[rstest]
fn given_scalar_and_nested_tree_when_planning_then_universe_is_nested_paths(
    matcher: PathMatcher,
) {
    let nested = tree(vec![(vec![0, 0], vec![1, 2]), (vec![0, 1], vec![3])]);
    let scalar = DataTree::from_value(10);

    let plan = matcher
        .plan(&[(&nested, AccessSpec::Item), (&scalar, AccessSpec::Item)])
        .expect("scalar is broadcast");

    assert_eq!(plan.universe(), &[p([0, 0]), p([0, 1])]);
    let counts: Vec<usize> = plan.per_path().map(|(_, count)| count).collect();
    assert_eq!(counts, vec![2, 1]);
}

#[rstest]
fn given_scalar_first_when_planning_then_order_of_arguments_does_not_matter(
    matcher: PathMatcher,
) {
    let nested = tree(vec![(vec![1, 0], vec![4]), (vec![1, 1], vec![5, 6])]);
    let scalar = DataTree::from_value(10);

    let plan = matcher
        .plan(&[(&scalar, AccessSpec::Item), (&nested, AccessSpec::Item)])
        .expect("scalar is broadcast");

    assert_eq!(plan.universe(), &[p([1, 0]), p([1, 1])]);
    assert_eq!(plan.len(), 3);
}

#[test]
fn given_broadcast_disabled_when_planning_scalar_and_nested_tree_then_mismatch() {
    let strict = PathMatcher::new(MatchOptions {
        ancestor_fallback: true,
        broadcast_single_branch: false,
    });
    let nested = tree(vec![(vec![0, 0], vec![1]), (vec![0, 1], vec![3])]);
    let scalar = DataTree::from_value(10);

    let result = strict.plan(&[(&nested, AccessSpec::Item), (&scalar, AccessSpec::Item)]);

    assert!(matches!(
        result,
        Err(DomainError::PathMismatch { argument: 0, .. })
    ));
}

#[rstest]
fn given_branches_of_different_length_when_planning_then_longest_sets_step_count(
    matcher: PathMatcher,
) {
    let a = tree(vec![(vec![0], vec![1, 2, 3])]);
    let b = tree(vec![(vec![0], vec![10])]);

    let plan = matcher
        .plan(&[(&a, AccessSpec::Item), (&b, AccessSpec::Item)])
        .expect("plan");

    assert_eq!(plan.len(), 3);
    assert_eq!(
        plan.steps().last(),
        Some(&IterationStep {
            path: p([0]),
            index: 2
        })
    );
}

#[rstest]
fn given_item_and_list_args_when_planning_then_list_paths_do_not_drive(matcher: PathMatcher) {
    let items = tree(vec![(vec![0], vec![1, 2]), (vec![1], vec![3])]);
    let whole = tree(vec![(vec![0], vec![5, 6, 7]), (vec![1], vec![8]), (vec![9], vec![0])]);

    let plan = matcher
        .plan(&[(&items, AccessSpec::Item), (&whole, AccessSpec::List)])
        .expect("plan");

    assert_eq!(plan.universe(), &[p([0]), p([1])]);
    let counts: Vec<usize> = plan.per_path().map(|(_, count)| count).collect();
    assert_eq!(counts, vec![2, 1]);
}

#[rstest]
fn given_only_list_args_when_planning_then_one_step_per_path(matcher: PathMatcher) {
    let a = tree(vec![(vec![0], vec![1, 2, 3]), (vec![1], vec![4])]);

    let plan = matcher.plan(&[(&a, AccessSpec::List)]).expect("plan");

    assert_eq!(plan.len(), 2);
    assert!(plan.steps().iter().all(|step| step.index == 0));
}

#[rstest]
fn given_empty_item_branch_when_planning_then_empty_branch_error(matcher: PathMatcher) {
    let a = tree(vec![(vec![0], vec![1])]);
    let b = tree(vec![(vec![0], vec![])]);

    let result = matcher.plan(&[(&a, AccessSpec::Item), (&b, AccessSpec::Item)]);

    assert_eq!(
        result,
        Err(DomainError::EmptyBranch {
            argument: 1,
            path: p([0])
        })
    );
}

#[rstest]
fn given_empty_list_branch_when_planning_then_allowed(matcher: PathMatcher) {
    let a = tree(vec![(vec![0], vec![1])]);
    let b = tree(vec![(vec![0], vec![])]);

    let plan = matcher
        .plan(&[(&a, AccessSpec::Item), (&b, AccessSpec::List)])
        .expect("plan");

    assert_eq!(plan.len(), 1);
}

#[rstest]
fn given_no_arguments_when_planning_then_plan_is_empty(matcher: PathMatcher) {
    let plan = matcher.plan::<i32>(&[]).expect("plan");

    assert!(plan.is_empty());
    assert!(plan.universe().is_empty());
}

#[rstest]
fn given_steps_when_planning_then_ordered_by_path_then_index(matcher: PathMatcher) {
    let a = tree(vec![(vec![1], vec![1]), (vec![0], vec![1, 2])]);

    let plan = matcher.plan(&[(&a, AccessSpec::Item)]).expect("plan");

    let rendered: Vec<String> = plan.steps().iter().map(ToString::to_string).collect();
    assert_eq!(rendered, vec!["{0}[0]", "{0}[1]", "{1}[0]"]);
}
