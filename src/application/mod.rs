//! Application layer: dispatch of plain functions over tree-shaped arguments
//!
//! This layer orchestrates domain logic: it resolves per-step arguments, calls
//! the wrapped function and reassembles the results.

pub mod error;
pub mod handler;
pub mod ops;
pub mod output;
pub mod resolver;

pub use error::{ApplicationError, ApplicationResult, HandlerError, OperationError};
pub use handler::TreeHandler;
pub use ops::Operation;
pub use output::{OutputTreeBuilder, StepOutput};
pub use resolver::{AccessResolver, Arg};
