//! Runtime values
//!
//! A closed tagged union. Primitives compare by value, objects and functions
//! by identity.

use num_bigint::BigInt;
use std::sync::Arc;

use crate::context::NativeContext;
use crate::error::VmResult;
use crate::gc::GcRef;
use crate::object::JsObject;
use crate::string::JsString;

/// Native function handler type
///
/// Receives `this`, the argument list and the calling context.
pub type NativeFn =
    Arc<dyn Fn(&Value, &[Value], &mut NativeContext) -> VmResult<Value> + Send + Sync>;

/// A callable with an attached object for properties.
pub struct JsFunction {
    /// The native function handler
    pub func: NativeFn,
    /// Attached object for properties (`name`, `length`, ...)
    pub object: GcRef<JsObject>,
}

impl std::fmt::Debug for JsFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsFunction")
            .field("object", &self.object)
            .finish()
    }
}

/// A runtime value
#[derive(Clone)]
pub enum Value {
    /// `undefined`
    Undefined,
    /// `null`
    Null,
    /// Boolean primitive
    Boolean(bool),
    /// IEEE 754 double
    Number(f64),
    /// String primitive
    String(JsString),
    /// Arbitrary precision integer
    BigInt(Arc<BigInt>),
    /// Any non-callable object (plain, array, boxed primitive, raw JSON)
    Object(GcRef<JsObject>),
    /// Callable object
    Function(GcRef<JsFunction>),
}

impl Value {
    /// `undefined`
    pub fn undefined() -> Self {
        Self::Undefined
    }

    /// `null`
    pub fn null() -> Self {
        Self::Null
    }

    /// Boolean value
    pub fn boolean(b: bool) -> Self {
        Self::Boolean(b)
    }

    /// Number value
    pub fn number(n: f64) -> Self {
        Self::Number(n)
    }

    /// String value from Rust text
    pub fn string(s: &str) -> Self {
        Self::String(JsString::new(s))
    }

    /// String value from a runtime string
    pub fn js_string(s: JsString) -> Self {
        Self::String(s)
    }

    /// BigInt value
    pub fn bigint(b: BigInt) -> Self {
        Self::BigInt(Arc::new(b))
    }

    /// Object value
    pub fn object(obj: GcRef<JsObject>) -> Self {
        Self::Object(obj)
    }

    /// Function value
    pub fn function(func: GcRef<JsFunction>) -> Self {
        Self::Function(func)
    }

    /// Is `undefined`?
    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Is `null`?
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Is a bigint primitive?
    pub fn is_bigint(&self) -> bool {
        matches!(self, Self::BigInt(_))
    }

    /// Is callable?
    pub fn is_callable(&self) -> bool {
        matches!(self, Self::Function(_))
    }

    /// Object or function (anything with properties of its own)
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(_) | Self::Function(_))
    }

    /// Boolean payload
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Number payload
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// String payload
    pub fn as_string(&self) -> Option<&JsString> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// BigInt payload
    pub fn as_bigint(&self) -> Option<&Arc<BigInt>> {
        match self {
            Self::BigInt(b) => Some(b),
            _ => None,
        }
    }

    /// Object payload (functions excluded)
    pub fn as_object(&self) -> Option<&GcRef<JsObject>> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Function payload
    pub fn as_function(&self) -> Option<&GcRef<JsFunction>> {
        match self {
            Self::Function(f) => Some(f),
            _ => None,
        }
    }

    /// The object holding this value's own properties, if it has any
    pub fn property_object(&self) -> Option<&GcRef<JsObject>> {
        match self {
            Self::Object(o) => Some(o),
            Self::Function(f) => Some(&f.object),
            _ => None,
        }
    }

    /// `typeof` result
    pub fn type_of(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "object",
            Self::Boolean(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::BigInt(_) => "bigint",
            Self::Object(_) => "object",
            Self::Function(_) => "function",
        }
    }
}

impl PartialEq for Value {
    /// Strict equality (`===`)
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::BigInt(a), Self::BigInt(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => GcRef::ptr_eq(a, b),
            (Self::Function(a), Self::Function(b)) => GcRef::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::string(s)
    }
}

impl From<JsString> for Value {
    fn from(s: JsString) -> Self {
        Self::String(s)
    }
}

impl std::fmt::Debug for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Undefined => write!(f, "undefined"),
            Self::Null => write!(f, "null"),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::Number(n) => write!(f, "{}", crate::number::js_number_to_string(*n)),
            Self::String(s) => write!(f, "{:?}", s),
            Self::BigInt(b) => write!(f, "{}n", b),
            Self::Object(o) => write!(f, "[object {:?}]", o.kind()),
            Self::Function(_) => write!(f, "[function]"),
        }
    }
}
