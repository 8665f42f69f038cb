//! Per-argument access mode

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, DomainResult};

/// How an argument is handed to the wrapped function during matched iteration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessSpec {
    /// One item per step; the argument's paths drive the iteration.
    #[default]
    #[serde(alias = "tree")]
    Item,
    /// The whole branch at the matched path, once per path.
    List,
}

impl AccessSpec {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessSpec::Item => "item",
            AccessSpec::List => "list",
        }
    }
}

impl fmt::Display for AccessSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessSpec {
    type Err = DomainError;

    /// `tree` is accepted for host compatibility and behaves like `item`:
    /// a tree-accessed input is matched path by path.
    fn from_str(s: &str) -> DomainResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "item" | "tree" => Ok(AccessSpec::Item),
            "list" => Ok(AccessSpec::List),
            _ => Err(DomainError::InvalidAccessTag(s.trim().to_string())),
        }
    }
}
