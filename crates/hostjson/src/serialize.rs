//! SerializeJSONProperty and the object/array container forms

use hostjson_vm::number::js_number_to_string;
use hostjson_vm::{GcRef, JsObject, NativeContext, ObjectKind, PropertyKey, Value, VmError};

use crate::error::{JsonError, JsonResult};
use crate::quote::{json_text_to_string, quote_json_string};
use crate::raw::raw_json_text;
use crate::state::{ContainerScope, StringifyState};

/// Resolve `holder[key]` to JSON text, or `None` when the value has no
/// representation (undefined or a function).
pub(crate) fn serialize_property(
    state: &mut StringifyState,
    ncx: &mut NativeContext,
    holder: &Value,
    key: &PropertyKey,
) -> JsonResult<Option<String>> {
    let mut value = ncx.get(holder, key)?;

    if value.is_object() || value.is_bigint() {
        let to_json = ncx.get(&value, &PropertyKey::string("toJSON"))?;
        if to_json.is_callable() {
            let key_value = Value::js_string(key.to_js_string());
            value = ncx.call_function(&to_json, value.clone(), &[key_value])?;
        }
    }

    if let Some(replacer) = state.replacer_function.clone() {
        let key_value = Value::js_string(key.to_js_string());
        value = ncx.call_function(&replacer, holder.clone(), &[key_value, value])?;
    }

    let value = match &value {
        Value::Object(obj) => match obj.kind() {
            ObjectKind::RawJson => {
                let text = raw_json_text(obj)
                    .ok_or_else(|| VmError::type_error("raw JSON marker without text"))?;
                return Ok(Some(json_text_to_string(&text)));
            }
            ObjectKind::BoxedNumber(_) => Value::number(ncx.to_number(&value)?),
            ObjectKind::BoxedString(_) => Value::js_string(ncx.to_string(&value)?),
            ObjectKind::BoxedBoolean(b) => Value::boolean(*b),
            ObjectKind::BoxedBigInt(b) => Value::BigInt(b.clone()),
            ObjectKind::Ordinary | ObjectKind::Array => value.clone(),
        },
        _ => value.clone(),
    };

    match &value {
        Value::Null => Ok(Some("null".to_string())),
        Value::Boolean(b) => Ok(Some(if *b { "true" } else { "false" }.to_string())),
        Value::String(s) => Ok(Some(quote_json_string(s))),
        Value::Number(n) => Ok(Some(format_number(*n))),
        Value::BigInt(_) => Err(JsonError::UnsupportedType),
        Value::Object(obj) => {
            if ncx.is_array(&value) {
                serialize_array(state, ncx, key, &value, obj).map(Some)
            } else {
                serialize_object(state, ncx, key, &value, obj).map(Some)
            }
        }
        Value::Function(_) | Value::Undefined => Ok(None),
    }
}

fn format_number(n: f64) -> String {
    if n.is_finite() {
        js_number_to_string(n)
    } else {
        "null".to_string()
    }
}

/// SerializeJSONObject
fn serialize_object(
    state: &mut StringifyState,
    ncx: &mut NativeContext,
    key: &PropertyKey,
    value: &Value,
    obj: &GcRef<JsObject>,
) -> JsonResult<String> {
    let mut scope = state.enter(key, obj, false)?;

    let keys = match &scope.property_list {
        Some(list) => list.clone(),
        None => ncx.enumerable_own_keys(value),
    };

    let mut members = Vec::with_capacity(keys.len());
    for member_key in &keys {
        if let Some(text) = serialize_property(&mut scope, ncx, value, member_key)? {
            let separator = if scope.gap.is_empty() { "" } else { " " };
            members.push(format!(
                "{}:{}{}",
                quote_json_string(&member_key.to_js_string()),
                separator,
                text
            ));
        }
    }

    Ok(assemble('{', '}', &members, &scope))
}

/// SerializeJSONArray
fn serialize_array(
    state: &mut StringifyState,
    ncx: &mut NativeContext,
    key: &PropertyKey,
    value: &Value,
    obj: &GcRef<JsObject>,
) -> JsonResult<String> {
    let mut scope = state.enter(key, obj, true)?;

    let len = ncx.length_of_array_like(value)?;
    let mut items = Vec::with_capacity(len.min(1024));
    for i in 0..len {
        let index = PropertyKey::index(i as u32);
        let text = serialize_property(&mut scope, ncx, value, &index)?;
        items.push(text.unwrap_or_else(|| "null".to_string()));
    }

    Ok(assemble('[', ']', &items, &scope))
}

/// Join fragments with delimiters, pretty-printing when a gap is set
fn assemble(open: char, close: char, fragments: &[String], scope: &ContainerScope<'_>) -> String {
    if fragments.is_empty() {
        return format!("{open}{close}");
    }

    if scope.gap.is_empty() {
        format!("{open}{}{close}", fragments.join(","))
    } else {
        let separator = format!(",\n{}", scope.indent);
        format!(
            "{open}\n{}{}\n{}{close}",
            scope.indent,
            fragments.join(&separator),
            scope.previous_indent()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hostjson_vm::Realm;

    fn serialize_root(ncx: &mut NativeContext, state: &mut StringifyState, value: Value) -> Option<String> {
        let root = ncx.realm().new_object();
        root.create_data_property(PropertyKey::string(""), value);
        serialize_property(state, ncx, &Value::object(root), &PropertyKey::string("")).unwrap()
    }

    #[test]
    fn test_primitive_dispatch() {
        let mut ncx = NativeContext::new(Realm::new());
        let mut state = StringifyState::new(None, None, String::new());
        assert_eq!(serialize_root(&mut ncx, &mut state, Value::null()).as_deref(), Some("null"));
        assert_eq!(serialize_root(&mut ncx, &mut state, Value::boolean(false)).as_deref(), Some("false"));
        assert_eq!(serialize_root(&mut ncx, &mut state, Value::number(f64::NAN)).as_deref(), Some("null"));
        assert_eq!(serialize_root(&mut ncx, &mut state, Value::number(-0.0)).as_deref(), Some("0"));
        assert_eq!(serialize_root(&mut ncx, &mut state, Value::number(1e21)).as_deref(), Some("1e+21"));
        assert_eq!(serialize_root(&mut ncx, &mut state, Value::undefined()), None);
    }

    #[test]
    fn test_array_slots_without_value_become_null() {
        let mut ncx = NativeContext::new(Realm::new());
        let mut state = StringifyState::new(None, None, String::new());
        let arr = ncx.realm().new_array();
        arr.array_push(Value::undefined());
        let f = ncx.realm().new_function("f", 0, |_, _, _| Ok(Value::undefined()));
        arr.array_push(f);
        arr.array_push(Value::number(1.0));
        let text = serialize_root(&mut ncx, &mut state, Value::object(arr));
        assert_eq!(text.as_deref(), Some("[null,null,1]"));
    }

    #[test]
    fn test_pretty_assembly_restores_indent() {
        let mut ncx = NativeContext::new(Realm::new());
        let mut state = StringifyState::new(None, None, "  ".to_string());
        let inner = ncx.realm().new_array();
        inner.array_push(Value::number(1.0));
        let outer = ncx.realm().new_object();
        outer.create_data_property(PropertyKey::string("a"), Value::object(inner));
        outer.create_data_property(PropertyKey::string("b"), Value::object(ncx.realm().new_object()));
        let text = serialize_root(&mut ncx, &mut state, Value::object(outer));
        assert_eq!(text.as_deref(), Some("{\n  \"a\": [\n    1\n  ],\n  \"b\": {}\n}"));
        assert_eq!(state.indent, "");
    }
}
