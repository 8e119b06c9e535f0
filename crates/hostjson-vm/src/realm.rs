//! Realm and intrinsics
//!
//! A realm owns the prototype objects every allocation links to, plus the
//! global object. Prototype methods are limited to the conversions the
//! runtime needs (`valueOf` / `toString`).

use num_bigint::BigInt;
use std::sync::Arc;

use crate::context::NativeContext;
use crate::error::{VmError, VmResult};
use crate::gc::GcRef;
use crate::number::js_number_to_string;
use crate::object::{
    JsObject, ObjectKind, PropertyAttributes, PropertyDescriptor, PropertyKey, SYMBOL_TO_STRING_TAG,
};
use crate::string::JsString;
use crate::value::{JsFunction, Value};

/// Intrinsic objects shared by all values of one realm
#[derive(Clone)]
pub struct Realm {
    intrinsics: Arc<Intrinsics>,
}

struct Intrinsics {
    object_prototype: GcRef<JsObject>,
    function_prototype: GcRef<JsObject>,
    array_prototype: GcRef<JsObject>,
    number_prototype: GcRef<JsObject>,
    string_prototype: GcRef<JsObject>,
    boolean_prototype: GcRef<JsObject>,
    bigint_prototype: GcRef<JsObject>,
    global: GcRef<JsObject>,
}

impl Realm {
    /// Create a realm with fresh intrinsics
    pub fn new() -> Self {
        let object_prototype = GcRef::new(JsObject::new(None));
        let proto = || GcRef::new(JsObject::new(Some(object_prototype.clone())));
        let intrinsics = Intrinsics {
            function_prototype: proto(),
            array_prototype: GcRef::new(JsObject::array(0, Some(object_prototype.clone()))),
            number_prototype: proto(),
            string_prototype: proto(),
            boolean_prototype: proto(),
            bigint_prototype: proto(),
            global: proto(),
            object_prototype,
        };
        let realm = Self {
            intrinsics: Arc::new(intrinsics),
        };
        realm.install_prototype_methods();
        realm
    }

    fn install_prototype_methods(&self) {
        let i = &self.intrinsics;

        self.define_method(&i.object_prototype, "toString", 0, |this, _, _| {
            let tag = match this {
                Value::Undefined => "Undefined".to_string(),
                Value::Null => "Null".to_string(),
                Value::Function(_) => "Function".to_string(),
                Value::Object(o) if o.is_array() => "Array".to_string(),
                other => other
                    .property_object()
                    .and_then(|o| o.get(&PropertyKey::Symbol(SYMBOL_TO_STRING_TAG)))
                    .and_then(|t| t.as_string().map(JsString::to_string_lossy))
                    .unwrap_or_else(|| "Object".to_string()),
            };
            Ok(Value::string(&format!("[object {}]", tag)))
        });
        self.define_method(&i.object_prototype, "valueOf", 0, |this, _, _| Ok(this.clone()));

        self.define_method(&i.number_prototype, "valueOf", 0, |this, _, _| {
            this_number_value(this).map(Value::number)
        });
        self.define_method(&i.number_prototype, "toString", 0, |this, _, _| {
            this_number_value(this).map(|n| Value::string(&js_number_to_string(n)))
        });

        self.define_method(&i.string_prototype, "valueOf", 0, |this, _, _| {
            this_string_value(this).map(Value::js_string)
        });
        self.define_method(&i.string_prototype, "toString", 0, |this, _, _| {
            this_string_value(this).map(Value::js_string)
        });

        self.define_method(&i.boolean_prototype, "valueOf", 0, |this, _, _| {
            this_boolean_value(this).map(Value::boolean)
        });
        self.define_method(&i.boolean_prototype, "toString", 0, |this, _, _| {
            this_boolean_value(this).map(|b| Value::string(if b { "true" } else { "false" }))
        });

        self.define_method(&i.bigint_prototype, "valueOf", 0, |this, _, _| {
            this_bigint_value(this).map(Value::BigInt)
        });
        self.define_method(&i.bigint_prototype, "toString", 0, |this, _, _| {
            this_bigint_value(this).map(|b| Value::string(&b.to_str_radix(10)))
        });
    }

    fn define_method<F>(&self, target: &GcRef<JsObject>, name: &str, length: u32, f: F)
    where
        F: Fn(&Value, &[Value], &mut NativeContext) -> VmResult<Value> + Send + Sync + 'static,
    {
        let method = self.new_function(name, length, f);
        target.define_own_property(
            PropertyKey::string(name),
            PropertyDescriptor::builtin_method(method),
        );
    }

    /// `Object.prototype`
    pub fn object_prototype(&self) -> &GcRef<JsObject> {
        &self.intrinsics.object_prototype
    }

    /// `Function.prototype`
    pub fn function_prototype(&self) -> &GcRef<JsObject> {
        &self.intrinsics.function_prototype
    }

    /// `Array.prototype`
    pub fn array_prototype(&self) -> &GcRef<JsObject> {
        &self.intrinsics.array_prototype
    }

    /// `Number.prototype`
    pub fn number_prototype(&self) -> &GcRef<JsObject> {
        &self.intrinsics.number_prototype
    }

    /// `String.prototype`
    pub fn string_prototype(&self) -> &GcRef<JsObject> {
        &self.intrinsics.string_prototype
    }

    /// `Boolean.prototype`
    pub fn boolean_prototype(&self) -> &GcRef<JsObject> {
        &self.intrinsics.boolean_prototype
    }

    /// `BigInt.prototype`
    pub fn bigint_prototype(&self) -> &GcRef<JsObject> {
        &self.intrinsics.bigint_prototype
    }

    /// The global object
    pub fn global(&self) -> &GcRef<JsObject> {
        &self.intrinsics.global
    }

    /// OrdinaryObjectCreate(%Object.prototype%)
    pub fn new_object(&self) -> GcRef<JsObject> {
        GcRef::new(JsObject::new(Some(self.object_prototype().clone())))
    }

    /// Empty array linked to `Array.prototype`
    pub fn new_array(&self) -> GcRef<JsObject> {
        GcRef::new(JsObject::array(0, Some(self.array_prototype().clone())))
    }

    /// Native function with `name` and `length` properties
    pub fn new_function<F>(&self, name: &str, length: u32, f: F) -> Value
    where
        F: Fn(&Value, &[Value], &mut NativeContext) -> VmResult<Value> + Send + Sync + 'static,
    {
        let object = GcRef::new(JsObject::new(Some(self.function_prototype().clone())));
        let hidden = PropertyAttributes {
            writable: false,
            enumerable: false,
            configurable: true,
        };
        object.define_own_property(
            PropertyKey::string("length"),
            PropertyDescriptor::data_with_attrs(Value::number(length as f64), hidden),
        );
        object.define_own_property(
            PropertyKey::string("name"),
            PropertyDescriptor::data_with_attrs(Value::string(name), hidden),
        );
        Value::function(GcRef::new(JsFunction {
            func: Arc::new(f),
            object,
        }))
    }

    /// `new Number(n)`
    pub fn new_number_object(&self, n: f64) -> Value {
        self.boxed(ObjectKind::BoxedNumber(n), self.number_prototype())
    }

    /// `new String(s)`
    pub fn new_string_object(&self, s: &str) -> Value {
        self.boxed(ObjectKind::BoxedString(JsString::new(s)), self.string_prototype())
    }

    /// `new Boolean(b)`
    pub fn new_boolean_object(&self, b: bool) -> Value {
        self.boxed(ObjectKind::BoxedBoolean(b), self.boolean_prototype())
    }

    /// `Object(bigint)`
    pub fn new_bigint_object(&self, b: BigInt) -> Value {
        self.boxed(ObjectKind::BoxedBigInt(Arc::new(b)), self.bigint_prototype())
    }

    fn boxed(&self, kind: ObjectKind, prototype: &GcRef<JsObject>) -> Value {
        Value::object(GcRef::new(JsObject::with_kind(kind, Some(prototype.clone()))))
    }
}

impl Default for Realm {
    fn default() -> Self {
        Self::new()
    }
}

fn this_number_value(this: &Value) -> VmResult<f64> {
    match this {
        Value::Number(n) => Ok(*n),
        Value::Object(o) => match o.kind() {
            ObjectKind::BoxedNumber(n) => Ok(*n),
            _ => Err(VmError::type_error("Number.prototype method called on incompatible receiver")),
        },
        _ => Err(VmError::type_error("Number.prototype method called on incompatible receiver")),
    }
}

fn this_string_value(this: &Value) -> VmResult<JsString> {
    match this {
        Value::String(s) => Ok(s.clone()),
        Value::Object(o) => match o.kind() {
            ObjectKind::BoxedString(s) => Ok(s.clone()),
            _ => Err(VmError::type_error("String.prototype method called on incompatible receiver")),
        },
        _ => Err(VmError::type_error("String.prototype method called on incompatible receiver")),
    }
}

fn this_boolean_value(this: &Value) -> VmResult<bool> {
    match this {
        Value::Boolean(b) => Ok(*b),
        Value::Object(o) => match o.kind() {
            ObjectKind::BoxedBoolean(b) => Ok(*b),
            _ => Err(VmError::type_error("Boolean.prototype method called on incompatible receiver")),
        },
        _ => Err(VmError::type_error("Boolean.prototype method called on incompatible receiver")),
    }
}

fn this_bigint_value(this: &Value) -> VmResult<Arc<BigInt>> {
    match this {
        Value::BigInt(b) => Ok(b.clone()),
        Value::Object(o) => match o.kind() {
            ObjectKind::BoxedBigInt(b) => Ok(b.clone()),
            _ => Err(VmError::type_error("BigInt.prototype method called on incompatible receiver")),
        },
        _ => Err(VmError::type_error("BigInt.prototype method called on incompatible receiver")),
    }
}
