//! Domain layer: tree data model and path matching
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod access;
pub mod error;
pub mod matcher;
pub mod path;
pub mod tree;

pub use access::AccessSpec;
pub use error::{DomainError, DomainResult};
pub use matcher::{
    EffectiveBranch, Fallback, IterationStep, MatchOptions, MatchPlan, PathMatcher,
};
pub use path::TreePath;
pub use tree::{DataTree, Nested, TreeInput};
