//! Tree addresses in host notation: `{0;1;2}`

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use itertools::Itertools;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, DomainResult};

/// Ordered tuple of non-negative integers addressing one branch of a tree.
///
/// Ordering is lexicographic over the indices, so `{0}` < `{0;0}` < `{0;1}` < `{1}`.
/// The empty tuple `{}` is the root path.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TreePath(Vec<usize>);

impl TreePath {
    pub fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    /// The empty path `{}`.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Path with the trailing component dropped, `None` at the root.
    pub fn parent(&self) -> Option<TreePath> {
        self.0.split_last().map(|(_, rest)| Self(rest.to_vec()))
    }

    /// Proper ancestors, nearest first, ending with the root path.
    pub fn ancestors(&self) -> impl Iterator<Item = TreePath> + '_ {
        (0..self.0.len()).rev().map(move |n| Self(self.0[..n].to_vec()))
    }

    /// New path with `index` appended.
    pub fn push(&self, index: usize) -> TreePath {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    /// Graft `inner` beneath this path: `{0;1}.join({2})` is `{0;1;2}`.
    pub fn join(&self, inner: &TreePath) -> TreePath {
        Self(self.0.iter().chain(inner.0.iter()).copied().collect())
    }
}

impl fmt::Display for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.0.iter().join(";"))
    }
}

fn path_regex() -> &'static Regex {
    static PATH_RE: OnceLock<Regex> = OnceLock::new();
    PATH_RE.get_or_init(|| {
        Regex::new(r"^\{\s*(\d+(?:\s*;\s*\d+)*)?\s*\}$").expect("path pattern is a valid regex")
    })
}

impl FromStr for TreePath {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        let caps = path_regex()
            .captures(s.trim())
            .ok_or_else(|| DomainError::InvalidPath(s.to_string()))?;
        let Some(body) = caps.get(1) else {
            return Ok(Self::root());
        };
        body.as_str()
            .split(';')
            .map(|part| {
                part.trim()
                    .parse::<usize>()
                    .map_err(|_| DomainError::InvalidPath(s.to_string()))
            })
            .collect::<DomainResult<Vec<_>>>()
            .map(Self)
    }
}

impl TryFrom<String> for TreePath {
    type Error = DomainError;

    fn try_from(value: String) -> DomainResult<Self> {
        value.parse()
    }
}

impl From<TreePath> for String {
    fn from(path: TreePath) -> Self {
        path.to_string()
    }
}

impl From<Vec<usize>> for TreePath {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl From<&[usize]> for TreePath {
    fn from(indices: &[usize]) -> Self {
        Self(indices.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for TreePath {
    fn from(indices: [usize; N]) -> Self {
        Self(indices.to_vec())
    }
}
