//! Infrastructure layer: I/O implementations and DI container
//!
//! This layer implements I/O boundary traits, reads and writes tree documents
//! and wires up services.

pub mod di;
pub mod error;
pub mod traits;
pub mod tree_store;

pub use error::{InfraError, InfraResult};
pub use tree_store::{BranchEntry, TreeStore};
