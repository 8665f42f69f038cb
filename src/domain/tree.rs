//! DataTree: a mapping from path to an ordered branch of items.

use std::borrow::Cow;
use std::collections::btree_map::{self, BTreeMap};

use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::TreePath;

/// Hierarchical collection keyed by [`TreePath`].
///
/// Paths are unique and kept in lexicographic order. Branch order is preserved
/// exactly as given. A tree holding only the path `{0}` is the canonical form of
/// a flat list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataTree<T> {
    branches: BTreeMap<TreePath, Vec<T>>,
}

impl<T> Default for DataTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> DataTree<T> {
    /// Empty tree, zero paths.
    pub fn new() -> Self {
        Self {
            branches: BTreeMap::new(),
        }
    }

    /// Wrap a bare value as `{0}: [value]`.
    pub fn from_value(value: T) -> Self {
        Self::from_flat(vec![value])
    }

    /// Wrap a flat sequence as the single branch `{0}`, order preserved.
    pub fn from_flat(items: impl IntoIterator<Item = T>) -> Self {
        let mut branches = BTreeMap::new();
        branches.insert(TreePath::from([0]), items.into_iter().collect());
        Self { branches }
    }

    /// Build from already-hierarchical data, rejecting duplicate paths.
    pub fn from_branches<I, P>(raw: I) -> DomainResult<Self>
    where
        I: IntoIterator<Item = (P, Vec<T>)>,
        P: Into<TreePath>,
    {
        let mut branches = BTreeMap::new();
        for (path, items) in raw {
            match branches.entry(path.into()) {
                btree_map::Entry::Occupied(entry) => {
                    return Err(DomainError::MalformedTree(entry.key().clone()));
                }
                btree_map::Entry::Vacant(entry) => {
                    entry.insert(items);
                }
            }
        }
        Ok(Self { branches })
    }

    /// Convert a nested list the way the host's list-to-tree helper does.
    ///
    /// Leaves at one nesting level form the branch at the current path, each
    /// sub-list `i` continues at `path ++ [i]`. Nesting starts at `{0}`.
    pub fn from_nested(nested: Nested<T>) -> Self {
        let mut tree = Self::new();
        match nested {
            Nested::Leaf(value) => tree.push(TreePath::from([0]), value),
            Nested::List(children) => tree.insert_nested(TreePath::from([0]), children),
        }
        tree
    }

    fn insert_nested(&mut self, path: TreePath, children: Vec<Nested<T>>) {
        if children.is_empty() || children.iter().any(Nested::is_leaf) {
            self.branches.entry(path.clone()).or_default();
        }
        for (idx, child) in children.into_iter().enumerate() {
            match child {
                Nested::Leaf(value) => self.push(path.clone(), value),
                Nested::List(inner) => self.insert_nested(path.push(idx), inner),
            }
        }
    }

    /// Paths in lexicographic order. Each call starts a fresh iteration.
    pub fn paths(&self) -> impl Iterator<Item = &TreePath> + Clone + '_ {
        self.branches.keys()
    }

    /// Branch stored at exactly `path`, `None` when the path is absent.
    pub fn branch_at(&self, path: &TreePath) -> Option<&[T]> {
        self.branches.get(path).map(Vec::as_slice)
    }

    /// Stored path and branch for an exact `path`.
    pub fn branch_entry(&self, path: &TreePath) -> Option<(&TreePath, &[T])> {
        self.branches
            .get_key_value(path)
            .map(|(path, items)| (path, items.as_slice()))
    }

    pub fn contains_path(&self, path: &TreePath) -> bool {
        self.branches.contains_key(path)
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    pub fn branch_count(&self) -> usize {
        self.branches.len()
    }

    /// Total number of items over all branches.
    pub fn item_count(&self) -> usize {
        self.branches.values().map(Vec::len).sum()
    }

    /// Length of the longest path, 0 for an empty tree.
    pub fn depth(&self) -> usize {
        self.branches.keys().map(TreePath::len).max().unwrap_or(0)
    }

    /// The only branch of a single-path tree.
    pub fn single_branch(&self) -> Option<(&TreePath, &[T])> {
        if self.branches.len() != 1 {
            return None;
        }
        self.branches
            .iter()
            .next()
            .map(|(path, items)| (path, items.as_slice()))
    }

    pub fn branches(&self) -> impl Iterator<Item = (&TreePath, &[T])> + '_ {
        self.branches
            .iter()
            .map(|(path, items)| (path, items.as_slice()))
    }

    pub fn into_branches(self) -> impl Iterator<Item = (TreePath, Vec<T>)> {
        self.branches.into_iter()
    }

    /// Append one item to the branch at `path`, creating it if needed.
    pub fn push(&mut self, path: TreePath, item: T) {
        self.branches.entry(path).or_default().push(item);
    }

    /// Append items to the branch at `path`. The branch exists afterwards even
    /// when `items` is empty.
    pub fn extend_branch(&mut self, path: TreePath, items: impl IntoIterator<Item = T>) {
        self.branches.entry(path).or_default().extend(items);
    }
}

/// Nested list form of tree data, as exchanged with list-based hosts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Nested<T> {
    List(Vec<Nested<T>>),
    Leaf(T),
}

impl<T> Nested<T> {
    pub fn is_leaf(&self) -> bool {
        matches!(self, Nested::Leaf(_))
    }
}

/// One raw argument as handed to a tree handler.
///
/// Bare values and flat sequences are upgraded to single-path trees. Trees are
/// borrowed and never modified.
#[derive(Debug, Clone)]
pub enum TreeInput<'a, T> {
    Value(T),
    Flat(Vec<T>),
    Tree(&'a DataTree<T>),
}

impl<'a, T: Clone> TreeInput<'a, T> {
    /// Normalize into a tree, borrowing when the input already is one.
    pub fn into_tree(self) -> Cow<'a, DataTree<T>> {
        match self {
            TreeInput::Value(value) => Cow::Owned(DataTree::from_value(value)),
            TreeInput::Flat(items) => Cow::Owned(DataTree::from_flat(items)),
            TreeInput::Tree(tree) => Cow::Borrowed(tree),
        }
    }
}

impl<'a, T> From<&'a DataTree<T>> for TreeInput<'a, T> {
    fn from(tree: &'a DataTree<T>) -> Self {
        TreeInput::Tree(tree)
    }
}

impl<T> From<Vec<T>> for TreeInput<'_, T> {
    fn from(items: Vec<T>) -> Self {
        TreeInput::Flat(items)
    }
}
