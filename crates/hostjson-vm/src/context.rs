//! Native execution context
//!
//! Everything that may run host code (getters, methods, user callbacks)
//! goes through a `NativeContext`. Callbacks receive the same context, so
//! they can re-enter whatever called them.

use crate::error::{VmError, VmResult};
use crate::gc::GcRef;
use crate::number::{js_number_to_string, string_to_number, to_integer_or_infinity};
use crate::object::{JsObject, ObjectKind, PropertyDescriptor, PropertyKey};
use crate::realm::Realm;
use crate::string::JsString;
use crate::value::Value;

/// Maximum nesting of host calls
const MAX_STACK_DEPTH: usize = 1000;

/// Preferred type for ToPrimitive
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PreferredType {
    /// `valueOf` first
    Number,
    /// `toString` first
    String,
}

/// Per-call execution context
pub struct NativeContext {
    realm: Realm,
    depth: usize,
}

impl NativeContext {
    /// Create a context over a realm
    pub fn new(realm: Realm) -> Self {
        Self { realm, depth: 0 }
    }

    /// The realm values are allocated in
    pub fn realm(&self) -> &Realm {
        &self.realm
    }

    /// Current host call depth
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Call `callee` with `this` and `args`
    pub fn call_function(&mut self, callee: &Value, this: Value, args: &[Value]) -> VmResult<Value> {
        let Value::Function(func) = callee else {
            return Err(VmError::type_error(format!("{:?} is not a function", callee)));
        };
        if self.depth >= MAX_STACK_DEPTH {
            tracing::debug!(depth = self.depth, "host call depth limit reached");
            return Err(VmError::StackOverflow);
        }
        let func = func.clone();
        self.depth += 1;
        let result = (func.func)(&this, args, self);
        self.depth -= 1;
        result
    }

    /// GetV: property lookup on any value, running accessors with `target`
    /// as the receiver. Primitives use their realm prototype.
    pub fn get(&mut self, target: &Value, key: &PropertyKey) -> VmResult<Value> {
        let holder: GcRef<JsObject> = match target {
            Value::Object(o) => o.clone(),
            Value::Function(f) => f.object.clone(),
            Value::String(s) => {
                if let Some(v) = string_own_property(s, key) {
                    return Ok(v);
                }
                self.realm.string_prototype().clone()
            }
            Value::Number(_) => self.realm.number_prototype().clone(),
            Value::Boolean(_) => self.realm.boolean_prototype().clone(),
            Value::BigInt(_) => self.realm.bigint_prototype().clone(),
            Value::Undefined | Value::Null => {
                return Err(VmError::type_error(format!(
                    "Cannot read properties of {:?} (reading '{}')",
                    target, key
                )));
            }
        };

        match holder.lookup_property(key) {
            Some(PropertyDescriptor::Data { value, .. }) => Ok(value),
            Some(PropertyDescriptor::Accessor { get: Some(getter), .. }) => {
                self.call_function(&getter, target.clone(), &[])
            }
            Some(PropertyDescriptor::Accessor { get: None, .. }) | None => Ok(Value::undefined()),
        }
    }

    /// IsArray
    pub fn is_array(&self, value: &Value) -> bool {
        value.as_object().is_some_and(|o| o.is_array())
    }

    /// LengthOfArrayLike: ToLength(Get(obj, "length"))
    pub fn length_of_array_like(&mut self, value: &Value) -> VmResult<usize> {
        let len = self.get(value, &PropertyKey::string("length"))?;
        let n = to_integer_or_infinity(self.to_number(&len)?);
        if n <= 0.0 {
            return Ok(0);
        }
        Ok(n.min(u32::MAX as f64) as usize)
    }

    /// EnumerableOwnProperties(obj, key): string keys only, in own-key order
    pub fn enumerable_own_keys(&self, value: &Value) -> Vec<PropertyKey> {
        let Some(obj) = value.property_object() else {
            return Vec::new();
        };
        obj.own_keys()
            .into_iter()
            .filter(|k| !k.is_symbol())
            .filter(|k| obj.get_own_property(k).is_some_and(|d| d.enumerable()))
            .collect()
    }

    /// ToPrimitive with OrdinaryToPrimitive method order
    pub fn to_primitive(&mut self, value: &Value, hint: PreferredType) -> VmResult<Value> {
        if !value.is_object() {
            return Ok(value.clone());
        }
        let order = match hint {
            PreferredType::String => ["toString", "valueOf"],
            PreferredType::Number => ["valueOf", "toString"],
        };
        for name in order {
            let method = self.get(value, &PropertyKey::string(name))?;
            if method.is_callable() {
                let result = self.call_function(&method, value.clone(), &[])?;
                if !result.is_object() {
                    return Ok(result);
                }
            }
        }
        Err(VmError::type_error("Cannot convert object to primitive value"))
    }

    /// ToNumber
    pub fn to_number(&mut self, value: &Value) -> VmResult<f64> {
        match value {
            Value::Undefined => Ok(f64::NAN),
            Value::Null => Ok(0.0),
            Value::Boolean(b) => Ok(if *b { 1.0 } else { 0.0 }),
            Value::Number(n) => Ok(*n),
            Value::String(s) => Ok(string_to_number(&s.to_string_lossy())),
            Value::BigInt(_) => Err(VmError::type_error("Cannot convert a BigInt value to a number")),
            Value::Object(_) | Value::Function(_) => {
                let prim = self.to_primitive(value, PreferredType::Number)?;
                self.to_number(&prim)
            }
        }
    }

    /// ToString
    pub fn to_string(&mut self, value: &Value) -> VmResult<JsString> {
        match value {
            Value::Undefined => Ok(JsString::new("undefined")),
            Value::Null => Ok(JsString::new("null")),
            Value::Boolean(b) => Ok(JsString::new(if *b { "true" } else { "false" })),
            Value::Number(n) => Ok(JsString::new(&js_number_to_string(*n))),
            Value::String(s) => Ok(s.clone()),
            Value::BigInt(b) => Ok(JsString::new(&b.to_str_radix(10))),
            Value::Object(_) | Value::Function(_) => {
                let prim = self.to_primitive(value, PreferredType::String)?;
                self.to_string(&prim)
            }
        }
    }

    /// The primitive a boxed object wraps, without running any user code
    pub fn primitive_data(&self, value: &Value) -> Option<Value> {
        match value.as_object()?.kind() {
            ObjectKind::BoxedNumber(n) => Some(Value::number(*n)),
            ObjectKind::BoxedString(s) => Some(Value::js_string(s.clone())),
            ObjectKind::BoxedBoolean(b) => Some(Value::boolean(*b)),
            ObjectKind::BoxedBigInt(b) => Some(Value::BigInt(b.clone())),
            _ => None,
        }
    }
}

/// String exotic own properties: `length` and code unit indices
fn string_own_property(s: &JsString, key: &PropertyKey) -> Option<Value> {
    match key {
        PropertyKey::Index(i) => s
            .as_utf16()
            .get(*i as usize)
            .map(|unit| Value::js_string(JsString::from_utf16(vec![*unit]))),
        PropertyKey::String(name) if name.as_utf16() == JsString::new("length").as_utf16() => {
            Some(Value::number(s.len() as f64))
        }
        _ => None,
    }
}
