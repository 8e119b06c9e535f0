//! # hostjson VM
//!
//! The dynamic value model the `hostjson` codec runs against.
//!
//! ## Design Principles
//!
//! - **Closed value enum**: every runtime value is one `Value` variant, so
//!   consumers dispatch with `match` instead of virtual calls
//! - **UTF-16 strings**: lone surrogates survive until something escapes them
//! - **Explicit context**: property access, calls and conversions go through
//!   a `NativeContext` passed down the call stack, never through globals

#![warn(clippy::all)]
#![warn(missing_docs)]

pub mod context;
pub mod error;
pub mod gc;
pub mod number;
pub mod object;
pub mod realm;
pub mod string;
pub mod value;

pub use context::NativeContext;
pub use error::{VmError, VmResult};
pub use gc::GcRef;
pub use object::{JsObject, ObjectKind, PropertyAttributes, PropertyDescriptor, PropertyKey};
pub use realm::Realm;
pub use string::JsString;
pub use value::{JsFunction, NativeFn, Value};
