//! The `JSON` namespace object
//!
//! Exposes [`stringify`], [`parse`], [`raw_json`] and [`is_raw_json`] as
//! native functions so host code can call them the way scripts would.

use hostjson_vm::object::SYMBOL_TO_STRING_TAG;
use hostjson_vm::{
    GcRef, JsObject, NativeContext, PropertyAttributes, PropertyDescriptor, PropertyKey, Realm,
    Value, VmResult,
};

use crate::parse::parse;
use crate::raw::{is_raw_json, raw_json};
use crate::stringify::stringify;

/// Create the `JSON` object and define it on the realm's global object.
pub fn install_json_namespace(realm: &Realm) -> GcRef<JsObject> {
    let json_obj = realm.new_object();

    let methods: [(&str, u32, fn(&Value, &[Value], &mut NativeContext) -> VmResult<Value>); 4] = [
        ("parse", 2, json_parse),
        ("stringify", 3, json_stringify),
        ("rawJSON", 1, json_raw_json),
        ("isRawJSON", 1, json_is_raw_json),
    ];
    for (name, length, native) in methods {
        let func = realm.new_function(name, length, native);
        json_obj.define_own_property(
            PropertyKey::string(name),
            PropertyDescriptor::builtin_method(func),
        );
    }

    json_obj.define_own_property(
        PropertyKey::Symbol(SYMBOL_TO_STRING_TAG),
        PropertyDescriptor::data_with_attrs(
            Value::string("JSON"),
            PropertyAttributes {
                writable: false,
                enumerable: false,
                configurable: true,
            },
        ),
    );

    realm.global().define_own_property(
        PropertyKey::string("JSON"),
        PropertyDescriptor::builtin_method(Value::object(json_obj.clone())),
    );
    tracing::debug!("JSON namespace installed");
    json_obj
}

fn arg(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or_else(Value::undefined)
}

/// JSON.parse(text, reviver)
fn json_parse(_this: &Value, args: &[Value], ncx: &mut NativeContext) -> VmResult<Value> {
    Ok(parse(ncx, &arg(args, 0), &arg(args, 1))?)
}

/// JSON.stringify(value, replacer, space)
fn json_stringify(_this: &Value, args: &[Value], ncx: &mut NativeContext) -> VmResult<Value> {
    if args.is_empty() {
        return Ok(Value::undefined());
    }
    let text = stringify(ncx, &args[0], &arg(args, 1), &arg(args, 2))?;
    Ok(text.map_or_else(Value::undefined, |s| Value::string(&s)))
}

/// JSON.rawJSON(text)
fn json_raw_json(_this: &Value, args: &[Value], ncx: &mut NativeContext) -> VmResult<Value> {
    Ok(raw_json(ncx, &arg(args, 0))?)
}

/// JSON.isRawJSON(O)
fn json_is_raw_json(_this: &Value, args: &[Value], _ncx: &mut NativeContext) -> VmResult<Value> {
    Ok(Value::boolean(is_raw_json(&arg(args, 0))))
}
