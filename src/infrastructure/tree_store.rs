//! Tree documents on disk
//!
//! Two JSON forms are accepted:
//! - explicit: `{"branches": [{"path": "{0;1}", "items": [1, 2]}]}`
//! - nested: any JSON list (sub-lists become sub-paths) or a bare scalar
//!
//! Output is always the explicit form.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::domain::{DataTree, Nested, TreePath};
use crate::infrastructure::error::{InfraError, InfraResult};
use crate::infrastructure::traits::FileSystem;

/// One branch of an explicit tree document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchEntry {
    pub path: TreePath,
    #[serde(default)]
    pub items: Vec<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ExplicitDocument {
    branches: Vec<BranchEntry>,
}

/// Reads and writes tree documents through the filesystem abstraction.
pub struct TreeStore {
    fs: Arc<dyn FileSystem>,
}

impl TreeStore {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path) -> InfraResult<DataTree<Value>> {
        if !self.fs.is_file(path) {
            return Err(InfraError::io(
                format!("tree document not found: {}", path.display()),
                std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            ));
        }
        let content = self
            .fs
            .read_to_string(path)
            .map_err(|e| InfraError::io(format!("read {}", path.display()), e))?;
        let tree = Self::parse(&content, &path.display().to_string())?;
        debug!(
            "load: {} branches, {} items",
            tree.branch_count(),
            tree.item_count()
        );
        Ok(tree)
    }

    pub fn save(&self, path: &Path, tree: &DataTree<Value>) -> InfraResult<()> {
        let content = Self::to_json(tree)?;
        self.fs
            .write(path, &content)
            .map_err(|e| InfraError::io(format!("write {}", path.display()), e))
    }

    /// Parse document text; `origin` names the source in error messages.
    pub fn parse(content: &str, origin: &str) -> InfraResult<DataTree<Value>> {
        let value: Value =
            serde_json::from_str(content).map_err(|e| InfraError::json(origin, e))?;

        let is_explicit = value
            .as_object()
            .is_some_and(|object| object.contains_key("branches"));
        if is_explicit {
            let document: ExplicitDocument =
                serde_json::from_value(value).map_err(|e| InfraError::json(origin, e))?;
            let tree = DataTree::from_branches(
                document
                    .branches
                    .into_iter()
                    .map(|entry| (entry.path, entry.items)),
            )?;
            return Ok(tree);
        }

        let nested: Nested<Value> =
            serde_json::from_value(value).map_err(|e| InfraError::json(origin, e))?;
        Ok(DataTree::from_nested(nested))
    }

    /// Explicit document form, pretty printed.
    pub fn to_json(tree: &DataTree<Value>) -> InfraResult<String> {
        let document = ExplicitDocument {
            branches: tree
                .branches()
                .map(|(path, items)| BranchEntry {
                    path: path.clone(),
                    items: items.to_vec(),
                })
                .collect(),
        };
        serde_json::to_string_pretty(&document)
            .map_err(|e| InfraError::json("serialize tree document", e))
    }
}
