//! # hostjson
//!
//! The ECMAScript `JSON` namespace over the `hostjson-vm` value model.
//!
//! - [`stringify`] serializes live values: `toJSON`, replacer functions and
//!   key allowlists, boxed primitives, raw JSON markers, pretty-printing and
//!   cycle detection
//! - [`parse`] reads JSON text into fresh objects and arrays and optionally
//!   runs a reviver over them
//! - [`raw_json`] / [`is_raw_json`] create and recognize pre-validated
//!   primitive JSON fragments that `stringify` emits verbatim
//!
//! Every call owns its state, so host callbacks may re-enter any of these
//! functions freely.
//!
//! ```
//! use hostjson::{parse, stringify};
//! use hostjson_vm::{NativeContext, Realm, Value};
//!
//! let mut ncx = NativeContext::new(Realm::new());
//! let value = parse(&mut ncx, &Value::string(r#"{"a":[1,2]}"#), &Value::undefined()).unwrap();
//! let text = stringify(&mut ncx, &value, &Value::undefined(), &Value::number(1.0)).unwrap();
//! assert_eq!(text.as_deref(), Some("{\n \"a\": [\n  1,\n  2\n ]\n}"));
//! ```

#![warn(clippy::all)]
#![warn(missing_docs)]

pub mod error;
pub mod lift;
pub mod namespace;
pub mod parse;
pub mod quote;
pub mod raw;
mod revive;
mod serialize;
mod state;
pub mod stringify;
pub mod text;

pub use error::{JsonError, JsonResult};
pub use lift::lift;
pub use namespace::install_json_namespace;
pub use parse::parse;
pub use quote::{quote_json_string, quote_str};
pub use raw::{is_raw_json, raw_json};
pub use stringify::stringify;
pub use text::{JsonTree, parse_json_text};
