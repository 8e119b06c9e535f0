//! JSON.stringify driver
//!
//! Turns the `replacer` and `space` arguments into a fresh
//! [`StringifyState`], wraps the input in a root holder and serializes the
//! `""` property of that holder.

use hostjson_vm::number::to_integer_or_infinity;
use hostjson_vm::{NativeContext, ObjectKind, PropertyKey, Value};
use rustc_hash::FxHashSet;

use crate::error::JsonResult;
use crate::serialize::serialize_property;
use crate::state::StringifyState;

/// Longest gap, in spaces or code units
const MAX_GAP: usize = 10;

/// Serialize `value` as JSON text.
///
/// `replacer` may be a function or an array of keys; `space` a number or
/// string. Pass `Value::undefined()` for either to leave it out. Returns
/// `Ok(None)` when the value has no JSON representation (undefined, a
/// function, or something a replacer/`toJSON` mapped to one of those).
pub fn stringify(
    ncx: &mut NativeContext,
    value: &Value,
    replacer: &Value,
    space: &Value,
) -> JsonResult<Option<String>> {
    let (replacer_function, property_list) = parse_replacer(ncx, replacer)?;
    let gap = parse_space(ncx, space)?;

    tracing::trace!(
        has_replacer = replacer_function.is_some(),
        allowlist = property_list.as_ref().map(|l| l.len()),
        gap = gap.len(),
        "stringify"
    );

    let mut state = StringifyState::new(replacer_function, property_list, gap);
    let wrapper = ncx.realm().new_object();
    wrapper.create_data_property(PropertyKey::string(""), value.clone());
    serialize_property(&mut state, ncx, &Value::object(wrapper), &PropertyKey::string(""))
}

/// Split `replacer` into a callback or a de-duplicated key allowlist
fn parse_replacer(
    ncx: &mut NativeContext,
    replacer: &Value,
) -> JsonResult<(Option<Value>, Option<Vec<PropertyKey>>)> {
    if replacer.is_callable() {
        return Ok((Some(replacer.clone()), None));
    }
    if !ncx.is_array(replacer) {
        return Ok((None, None));
    }

    let len = ncx.length_of_array_like(replacer)?;
    let mut list = Vec::new();
    let mut seen = FxHashSet::default();

    for i in 0..len {
        let item = ncx.get(replacer, &PropertyKey::index(i as u32))?;
        // Boxed booleans and bigints are ignored along with everything else
        let key = match &item {
            Value::String(s) => Some(s.clone()),
            Value::Number(_) => Some(ncx.to_string(&item)?),
            Value::Object(obj) => match obj.kind() {
                ObjectKind::BoxedString(_) | ObjectKind::BoxedNumber(_) => {
                    Some(ncx.to_string(&item)?)
                }
                _ => None,
            },
            _ => None,
        };

        if let Some(k) = key {
            let k = PropertyKey::from_js_string(k);
            if seen.insert(k.clone()) {
                list.push(k);
            }
        }
    }

    Ok((None, Some(list)))
}

/// Materialize the gap string from `space`
fn parse_space(ncx: &mut NativeContext, space: &Value) -> JsonResult<String> {
    let space = match space.as_object().map(|o| o.kind()) {
        Some(ObjectKind::BoxedNumber(_)) => Value::number(ncx.to_number(space)?),
        Some(ObjectKind::BoxedString(_)) => Value::js_string(ncx.to_string(space)?),
        _ => space.clone(),
    };

    let gap = match &space {
        Value::Number(n) => {
            let width = to_integer_or_infinity(*n).min(MAX_GAP as f64);
            if width < 1.0 {
                String::new()
            } else {
                " ".repeat(width as usize)
            }
        }
        Value::String(s) => s.prefix(MAX_GAP).to_string_lossy(),
        _ => String::new(),
    };
    Ok(gap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hostjson_vm::Realm;

    fn ctx() -> NativeContext {
        NativeContext::new(Realm::new())
    }

    #[test]
    fn test_space_number_is_clamped() {
        let mut ncx = ctx();
        assert_eq!(parse_space(&mut ncx, &Value::number(2.0)).unwrap(), "  ");
        assert_eq!(parse_space(&mut ncx, &Value::number(2.9)).unwrap(), "  ");
        assert_eq!(parse_space(&mut ncx, &Value::number(11.0)).unwrap().len(), 10);
        assert_eq!(parse_space(&mut ncx, &Value::number(f64::INFINITY)).unwrap().len(), 10);
        assert_eq!(parse_space(&mut ncx, &Value::number(0.5)).unwrap(), "");
        assert_eq!(parse_space(&mut ncx, &Value::number(-3.0)).unwrap(), "");
    }

    #[test]
    fn test_space_string_is_truncated() {
        let mut ncx = ctx();
        assert_eq!(parse_space(&mut ncx, &Value::string("\t")).unwrap(), "\t");
        assert_eq!(
            parse_space(&mut ncx, &Value::string("0123456789abc")).unwrap(),
            "0123456789"
        );
        assert_eq!(parse_space(&mut ncx, &Value::boolean(true)).unwrap(), "");
    }

    #[test]
    fn test_space_boxed_values_are_unwrapped() {
        let mut ncx = ctx();
        let n = ncx.realm().new_number_object(3.0);
        let s = ncx.realm().new_string_object("--");
        assert_eq!(parse_space(&mut ncx, &n).unwrap(), "   ");
        assert_eq!(parse_space(&mut ncx, &s).unwrap(), "--");
    }

    #[test]
    fn test_replacer_array_filters_and_dedups() {
        let mut ncx = ctx();
        let arr = ncx.realm().new_array();
        arr.array_push(Value::string("b"));
        arr.array_push(Value::number(1.0));
        arr.array_push(Value::string("b"));
        arr.array_push(ncx.realm().new_string_object("c"));
        arr.array_push(ncx.realm().new_number_object(2.0));
        arr.array_push(ncx.realm().new_boolean_object(true));
        arr.array_push(Value::null());
        arr.array_push(Value::boolean(true));

        let (func, list) = parse_replacer(&mut ncx, &Value::object(arr)).unwrap();
        assert!(func.is_none());
        assert_eq!(
            list.unwrap(),
            vec![
                PropertyKey::string("b"),
                PropertyKey::index(1),
                PropertyKey::string("c"),
                PropertyKey::index(2),
            ]
        );
    }

    #[test]
    fn test_replacer_other_values_are_ignored() {
        let mut ncx = ctx();
        let (func, list) = parse_replacer(&mut ncx, &Value::string("a")).unwrap();
        assert!(func.is_none() && list.is_none());
        let obj = Value::object(ncx.realm().new_object());
        let (func, list) = parse_replacer(&mut ncx, &obj).unwrap();
        assert!(func.is_none() && list.is_none());
    }

    #[test]
    fn test_no_representation() {
        let mut ncx = ctx();
        let undefined = Value::undefined();
        assert_eq!(stringify(&mut ncx, &undefined, &undefined, &undefined).unwrap(), None);
        let f = ncx.realm().new_function("f", 0, |_, _, _| Ok(Value::null()));
        assert_eq!(stringify(&mut ncx, &f, &undefined, &undefined).unwrap(), None);
    }
}
