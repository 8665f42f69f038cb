//! Built-in operations over JSON values
//!
//! Small host-independent functions that run through a [`TreeHandler`], so the
//! matching engine can be driven from tree documents on the command line.

use std::fmt;

use clap::ValueEnum;
use serde_json::Value;

use crate::application::error::OperationError;
use crate::application::handler::TreeHandler;
use crate::application::output::StepOutput;
use crate::application::resolver::Arg;
use crate::domain::{AccessSpec, DataTree};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Operation {
    /// x + y
    Add,
    /// x * y
    Multiply,
    /// Join two items as text
    Concat,
    /// Sum of a whole branch
    Sum,
    /// Number of items in a branch
    Count,
    /// Flat tree 0..n, grafted beneath the step's path
    Range,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Multiply => "multiply",
            Operation::Concat => "concat",
            Operation::Sum => "sum",
            Operation::Count => "count",
            Operation::Range => "range",
        }
    }

    /// Access list the operation declares for its arguments.
    pub fn declared_access(&self) -> Vec<AccessSpec> {
        match self {
            Operation::Add | Operation::Multiply | Operation::Concat => {
                vec![AccessSpec::Item, AccessSpec::Item]
            }
            Operation::Sum | Operation::Count => vec![AccessSpec::List],
            Operation::Range => vec![AccessSpec::Item],
        }
    }

    pub fn arity(&self) -> usize {
        self.declared_access().len()
    }

    /// Apply to one step's resolved arguments.
    pub fn apply(&self, args: &[Arg<'_, Value>]) -> Result<StepOutput<Value>, OperationError> {
        let op = self.name();
        if args.len() != self.arity() {
            return Err(OperationError::Arity {
                operation: op,
                expected: self.arity(),
                found: args.len(),
            });
        }
        match self {
            Operation::Add => {
                let (x, y) = (item(op, args, 0)?, item(op, args, 1)?);
                arithmetic(op, x, y, i64::checked_add, |a, b| a + b).map(StepOutput::Item)
            }
            Operation::Multiply => {
                let (x, y) = (item(op, args, 0)?, item(op, args, 1)?);
                arithmetic(op, x, y, i64::checked_mul, |a, b| a * b).map(StepOutput::Item)
            }
            Operation::Concat => {
                let (x, y) = (item(op, args, 0)?, item(op, args, 1)?);
                Ok(StepOutput::Item(Value::String(format!(
                    "{}{}",
                    text(x),
                    text(y)
                ))))
            }
            Operation::Sum => {
                let items = list(op, args, 0)?;
                items
                    .iter()
                    .try_fold(Value::from(0), |acc, value| {
                        arithmetic(op, &acc, value, i64::checked_add, |a, b| a + b)
                    })
                    .map(StepOutput::Item)
            }
            Operation::Count => {
                let items = list(op, args, 0)?;
                Ok(StepOutput::Item(Value::from(items.len())))
            }
            Operation::Range => {
                let value = item(op, args, 0)?;
                let n = value.as_u64().ok_or_else(|| OperationError::NotACount {
                    operation: op,
                    value: value.to_string(),
                })?;
                Ok(StepOutput::Tree(DataTree::from_flat((0..n).map(Value::from))))
            }
        }
    }

    /// A handler running this operation with its declared access list.
    pub fn handler(
        self,
    ) -> TreeHandler<impl FnMut(&[Arg<'_, Value>]) -> Result<StepOutput<Value>, OperationError>>
    {
        TreeHandler::new(move |args: &[Arg<'_, Value>]| self.apply(args), self.declared_access())
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn item<'a>(
    operation: &'static str,
    args: &[Arg<'a, Value>],
    argument: usize,
) -> Result<&'a Value, OperationError> {
    args[argument].as_item().ok_or(OperationError::Access {
        operation,
        argument,
        expected: "item",
    })
}

fn list<'a>(
    operation: &'static str,
    args: &[Arg<'a, Value>],
    argument: usize,
) -> Result<&'a [Value], OperationError> {
    args[argument].as_list().ok_or(OperationError::Access {
        operation,
        argument,
        expected: "list",
    })
}

/// Integer arithmetic while both sides are integers and it does not overflow,
/// float arithmetic otherwise.
fn arithmetic(
    operation: &'static str,
    x: &Value,
    y: &Value,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> Result<Value, OperationError> {
    if let (Some(a), Some(b)) = (x.as_i64(), y.as_i64()) {
        if let Some(result) = int_op(a, b) {
            return Ok(Value::from(result));
        }
    }
    let a = number(operation, x)?;
    let b = number(operation, y)?;
    Ok(Value::from(float_op(a, b)))
}

fn number(operation: &'static str, value: &Value) -> Result<f64, OperationError> {
    value.as_f64().ok_or_else(|| OperationError::NotANumber {
        operation,
        value: value.to_string(),
    })
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
