//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::DomainError;

/// Error from one handled call.
///
/// Matching errors are raised before any step runs. Errors of the wrapped
/// function pass through unchanged.
#[derive(Error, Debug)]
pub enum HandlerError<E> {
    #[error(transparent)]
    Match(#[from] DomainError),

    #[error(transparent)]
    Function(E),
}

impl<E> HandlerError<E> {
    /// The wrapped function's own error, if that is what failed.
    pub fn into_function_error(self) -> Option<E> {
        match self {
            HandlerError::Function(e) => Some(e),
            HandlerError::Match(_) => None,
        }
    }
}

/// Failure of a built-in operation on its arguments.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OperationError {
    #[error("{operation}: expected a number, got {value}")]
    NotANumber {
        operation: &'static str,
        value: String,
    },

    #[error("{operation}: expected a non-negative integer, got {value}")]
    NotACount {
        operation: &'static str,
        value: String,
    },

    #[error("{operation}: expected {expected} arguments, got {found}")]
    Arity {
        operation: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("{operation}: argument {argument} must use {expected} access")]
    Access {
        operation: &'static str,
        argument: usize,
        expected: &'static str,
    },
}

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("operation failed: {0}")]
    Operation(#[from] OperationError),

    #[error("config error: {message}")]
    Config { message: String },
}

impl From<HandlerError<OperationError>> for ApplicationError {
    fn from(e: HandlerError<OperationError>) -> Self {
        match e {
            HandlerError::Match(e) => ApplicationError::Domain(e),
            HandlerError::Function(e) => ApplicationError::Operation(e),
        }
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
