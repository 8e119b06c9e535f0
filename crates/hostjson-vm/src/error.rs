//! VM error types

use crate::value::Value;
use thiserror::Error;

/// Errors raised by the value model and by host callbacks
#[derive(Debug, Error)]
pub enum VmError {
    /// Type error (e.g., calling non-function)
    #[error("TypeError: {0}")]
    TypeError(String),

    /// Range error (e.g., invalid array length)
    #[error("RangeError: {0}")]
    RangeError(String),

    /// Syntax error (malformed text handed to a parser)
    #[error("SyntaxError: {0}")]
    SyntaxError(String),

    /// Call depth limit reached
    #[error("RangeError: Maximum call stack size exceeded")]
    StackOverflow,

    /// Value thrown by a host callback
    #[error("Uncaught exception: {0}")]
    Exception(Box<ThrownValue>),
}

/// A value thrown by a callback, kept intact so callers can inspect it
#[derive(Debug)]
pub struct ThrownValue {
    /// The thrown value
    pub value: Value,
    /// The thrown value (as a string representation)
    pub message: String,
}

impl std::fmt::Display for ThrownValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl VmError {
    /// Create a type error
    pub fn type_error(message: impl Into<String>) -> Self {
        Self::TypeError(message.into())
    }

    /// Create a range error
    pub fn range_error(message: impl Into<String>) -> Self {
        Self::RangeError(message.into())
    }

    /// Create a syntax error
    pub fn syntax_error(message: impl Into<String>) -> Self {
        Self::SyntaxError(message.into())
    }

    /// Wrap a thrown value
    pub fn exception(value: Value) -> Self {
        let message = format!("{:?}", value);
        Self::Exception(Box::new(ThrownValue { value, message }))
    }

    /// The thrown value, if this error carries one
    pub fn thrown_value(&self) -> Option<&Value> {
        match self {
            Self::Exception(thrown) => Some(&thrown.value),
            _ => None,
        }
    }
}

/// Result type for VM operations
pub type VmResult<T> = Result<T, VmError>;
