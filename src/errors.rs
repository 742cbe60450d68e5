// src/errors.rs
//! Structured errors for the value/type core.
//!
//! Every failure here is a local, recoverable condition: the core never
//! catches or retries, it hands the error to the driver for reporting.

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid range: {reason}")]
    #[diagnostic(
        code(E4001),
        help("a range needs a positive step and min <= max")
    )]
    InvalidRange { reason: String },

    #[error("struct field index {index} out of bounds (field count {count})")]
    #[diagnostic(code(E4002))]
    IndexOutOfBounds { index: usize, count: usize },

    #[error("duplicate registration of type '{name}'")]
    #[diagnostic(code(E4003))]
    DuplicateRegistration { name: String },

    #[error("unsupported numeric representation for {operation}")]
    #[diagnostic(code(E4004))]
    UnsupportedRepresentation { operation: &'static str },

    #[error("division by zero")]
    #[diagnostic(code(E4005))]
    DivisionByZero,

    #[error("arithmetic overflow in {operation}")]
    #[diagnostic(code(E4006))]
    Overflow { operation: &'static str },
}

impl DomainError {
    pub fn invalid_range(reason: impl Into<String>) -> Self {
        Self::InvalidRange {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_human_readable() {
        let err = DomainError::invalid_range("step must be positive, got 0");
        assert_eq!(
            err.to_string(),
            "invalid range: step must be positive, got 0"
        );

        let err = DomainError::IndexOutOfBounds { index: 3, count: 2 };
        assert_eq!(
            err.to_string(),
            "struct field index 3 out of bounds (field count 2)"
        );
    }
}
