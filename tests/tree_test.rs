//! Integration tests for DataTree construction and queries.

use rstest::rstest;

use treehandler::domain::{DataTree, DomainError, Nested, TreeInput, TreePath};

fn p<const N: usize>(indices: [usize; N]) -> TreePath {
    TreePath::from(indices)
}

#[test]
fn given_bare_value_when_wrapping_then_single_branch_at_zero() {
    let tree = DataTree::from_value(42);

    assert_eq!(tree.branch_count(), 1);
    assert_eq!(tree.branch_at(&p([0])), Some(&[42][..]));
}

#[test]
fn given_flat_sequence_when_wrapping_then_order_is_preserved() {
    let tree = DataTree::from_flat(vec![3, 1, 2]);

    assert_eq!(tree.single_branch(), Some((&p([0]), &[3, 1, 2][..])));
}

#[test]
fn given_branches_out_of_order_when_building_then_paths_iterate_sorted() {
    let tree = DataTree::from_branches(vec![
        (vec![1], vec!['c']),
        (vec![0, 1], vec!['b']),
        (vec![0], vec!['a']),
    ])
    .expect("valid tree");

    let paths: Vec<String> = tree.paths().map(ToString::to_string).collect();

    assert_eq!(paths, vec!["{0}", "{0;1}", "{1}"]);
    // restartable
    assert_eq!(tree.paths().count(), 3);
}

#[test]
fn given_duplicate_path_when_building_then_malformed_tree() {
    let result = DataTree::from_branches(vec![(vec![0], vec![1]), (vec![0], vec![2])]);

    assert_eq!(result, Err(DomainError::MalformedTree(p([0]))));
}

#[test]
fn given_empty_branch_when_building_then_path_is_kept() {
    let tree: DataTree<i32> = DataTree::from_branches(vec![(vec![0], vec![])]).expect("valid tree");

    assert!(tree.contains_path(&p([0])));
    assert_eq!(tree.item_count(), 0);
    assert!(!tree.is_empty());
}

#[test]
fn given_tree_when_querying_then_reports_counts_and_depth() {
    let tree = DataTree::from_branches(vec![
        (vec![0], vec![1, 2]),
        (vec![0, 3, 1], vec![3]),
    ])
    .expect("valid tree");

    assert_eq!(tree.branch_count(), 2);
    assert_eq!(tree.item_count(), 3);
    assert_eq!(tree.depth(), 3);
    assert_eq!(tree.branch_at(&p([1])), None);
    assert_eq!(DataTree::<i32>::new().depth(), 0);
}

#[rstest]
#[case::flat(
    Nested::List(vec![Nested::Leaf(1), Nested::Leaf(2)]),
    vec![(vec![0], vec![1, 2])]
)]
#[case::scalar(Nested::Leaf(7), vec![(vec![0], vec![7])])]
#[case::two_levels(
    Nested::List(vec![
        Nested::List(vec![Nested::Leaf(1), Nested::Leaf(2)]),
        Nested::List(vec![Nested::Leaf(3)]),
    ]),
    vec![(vec![0, 0], vec![1, 2]), (vec![0, 1], vec![3])]
)]
#[case::mixed(
    Nested::List(vec![Nested::Leaf(1), Nested::List(vec![Nested::Leaf(2)])]),
    vec![(vec![0], vec![1]), (vec![0, 1], vec![2])]
)]
#[case::empty(Nested::List(vec![]), vec![(vec![0], vec![])])]
fn given_nested_list_when_converting_then_sub_lists_become_sub_paths(
    #[case] nested: Nested<i32>,
    #[case] expected: Vec<(Vec<usize>, Vec<i32>)>,
) {
    let tree = DataTree::from_nested(nested);

    let expected = DataTree::from_branches(expected).expect("valid tree");
    assert_eq!(tree, expected);
}

#[test]
fn given_nested_json_when_deserializing_then_distinguishes_lists_and_leaves() {
    let nested: Nested<i64> = serde_json::from_str("[[1, 2], [3]]").expect("parse");

    let tree = DataTree::from_nested(nested);

    assert_eq!(tree.branch_at(&p([0, 0])), Some(&[1, 2][..]));
    assert_eq!(tree.branch_at(&p([0, 1])), Some(&[3][..]));
}

#[test]
fn given_raw_inputs_when_normalizing_then_trees_are_borrowed_and_others_wrapped() {
    let tree = DataTree::from_flat(vec![1, 2]);

    let borrowed = TreeInput::from(&tree).into_tree();
    let flat = TreeInput::from(vec![5, 6]).into_tree();
    let value = TreeInput::Value(9).into_tree();

    assert!(matches!(borrowed, std::borrow::Cow::Borrowed(_)));
    assert_eq!(flat.branch_at(&p([0])), Some(&[5, 6][..]));
    assert_eq!(value.branch_at(&p([0])), Some(&[9][..]));
}

#[test]
fn given_tree_when_extending_empty_branch_then_branch_exists() {
    let mut tree: DataTree<i32> = DataTree::new();

    tree.extend_branch(p([2]), Vec::new());
    tree.push(p([1]), 4);

    assert_eq!(tree.branch_at(&p([2])), Some(&[][..]));
    assert_eq!(tree.paths().next(), Some(&p([1])));
}
