//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::TreePath;

/// Domain errors represent tree-shape and matching violations.
/// These are raised before any step of a wrapped function executes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("malformed tree: duplicate path {0}")]
    MalformedTree(TreePath),

    #[error("access list has {found} entries but {expected} arguments were given")]
    AccessSpecArity { expected: usize, found: usize },

    #[error("argument {argument} has no branch matching path {path}")]
    PathMismatch { argument: usize, path: TreePath },

    #[error("argument {argument} has an empty branch at path {path}")]
    EmptyBranch { argument: usize, path: TreePath },

    #[error("invalid access tag: '{0}' (expected 'item', 'list' or 'tree')")]
    InvalidAccessTag(String),

    #[error("invalid path: '{0}' (expected e.g. {{0;1}})")]
    InvalidPath(String),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
