//! Codec errors

use hostjson_vm::VmError;
use thiserror::Error;

/// Everything `stringify`, `parse` and `rawJSON` can fail with
#[derive(Debug, Error)]
pub enum JsonError {
    /// A container was reached again while it was still being serialized
    #[error("{0}")]
    CircularStructure(String),

    /// A BigInt reached serialization without `toJSON` or a replacer
    /// turning it into something else
    #[error("Do not know how to serialize a BigInt")]
    UnsupportedType,

    /// Input is not valid JSON text
    #[error("JSON.parse: {0}")]
    MalformedText(String),

    /// `rawJSON` input is empty or starts/ends with whitespace
    #[error("JSON.rawJSON: source text must not be empty or begin/end with whitespace")]
    InvalidRawJsonSource,

    /// `rawJSON` input is an object or array
    #[error("JSON.rawJSON: source text must be a primitive JSON value")]
    RawJsonMustBePrimitive,

    /// Failure raised by a getter, `toJSON`, replacer or reviver
    #[error(transparent)]
    HostCallback(#[from] VmError),
}

impl From<JsonError> for VmError {
    fn from(err: JsonError) -> Self {
        match err {
            JsonError::CircularStructure(_) | JsonError::UnsupportedType => {
                VmError::type_error(err.to_string())
            }
            JsonError::MalformedText(_)
            | JsonError::InvalidRawJsonSource
            | JsonError::RawJsonMustBePrimitive => VmError::syntax_error(err.to_string()),
            JsonError::HostCallback(inner) => inner,
        }
    }
}

/// Result type for codec operations
pub type JsonResult<T> = Result<T, JsonError>;
