// src/engine/error.rs
//! Error types for the interpreter.
//!
//! Parse errors propagate to the driver. Arithmetic errors are caught by
//! the solver, logged, and converted into goal failure, so a query never
//! surfaces them as anything but an empty solution sequence.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum PrologError {
    #[error("[line {line}] parse error: {message}")]
    Parse { line: usize, message: String },
    #[error("arguments are not sufficiently instantiated")]
    Instantiation,
    #[error("type error: expected {expected}, found {found}")]
    Type { expected: &'static str, found: String },
    #[error("division by zero")]
    DivisionByZero,
}

impl PrologError {
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        PrologError::Parse {
            line,
            message: message.into(),
        }
    }

    pub fn type_error(expected: &'static str, found: impl ToString) -> Self {
        PrologError::Type {
            expected,
            found: found.to_string(),
        }
    }
}
