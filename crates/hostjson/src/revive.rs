//! InternalizeJSONProperty

use hostjson_vm::{NativeContext, PropertyKey, Value};

use crate::error::JsonResult;

/// Walk `holder[key]` bottom-up, letting `reviver` replace each value.
///
/// Children are revived before their container. A child revived to
/// `undefined` is deleted; anything else is redefined in place. Failed
/// deletes and defines (non-configurable targets) are ignored.
pub(crate) fn internalize(
    ncx: &mut NativeContext,
    holder: &Value,
    key: &PropertyKey,
    reviver: &Value,
) -> JsonResult<Value> {
    let value = ncx.get(holder, key)?;

    if ncx.is_array(&value) {
        let len = ncx.length_of_array_like(&value)?;
        for i in 0..len {
            revive_member(ncx, &value, PropertyKey::index(i as u32), reviver)?;
        }
    } else if let Some(obj) = value.as_object() {
        // Snapshot before the reviver gets a chance to reshape the object
        let keys = ncx.enumerable_own_keys(&value);
        tracing::trace!(keys = keys.len(), identity = obj.identity(), "revive object");
        for member_key in keys {
            revive_member(ncx, &value, member_key, reviver)?;
        }
    }

    let key_value = Value::js_string(key.to_js_string());
    Ok(ncx.call_function(reviver, holder.clone(), &[key_value, value])?)
}

fn revive_member(
    ncx: &mut NativeContext,
    container: &Value,
    key: PropertyKey,
    reviver: &Value,
) -> JsonResult<()> {
    let new_element = internalize(ncx, container, &key, reviver)?;
    let Some(obj) = container.as_object() else {
        return Ok(());
    };
    if new_element.is_undefined() {
        obj.delete(&key);
    } else {
        obj.create_data_property(key, new_element);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse;
    use hostjson_vm::Realm;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_delete_on_undefined() {
        let mut ncx = NativeContext::new(Realm::new());
        let reviver = ncx.realm().new_function("reviver", 2, |_, args, _| {
            let key = args[0].as_string().map(|s| s.to_string_lossy());
            if key.as_deref() == Some("b") {
                Ok(Value::undefined())
            } else {
                Ok(args[1].clone())
            }
        });
        let v = parse(&mut ncx, &Value::string(r#"{"a":1,"b":2}"#), &reviver).unwrap();
        let obj = v.as_object().unwrap();
        assert_eq!(obj.own_keys(), vec![PropertyKey::string("a")]);
    }

    #[test]
    fn test_visit_order_is_bottom_up() {
        let mut ncx = NativeContext::new(Realm::new());
        let visited = Arc::new(Mutex::new(Vec::new()));
        let log = visited.clone();
        let reviver = ncx.realm().new_function("reviver", 2, move |_, args, _| {
            let key = args[0].as_string().map(|s| s.to_string_lossy()).unwrap_or_default();
            log.lock().unwrap().push(key);
            Ok(args[1].clone())
        });
        parse(&mut ncx, &Value::string(r#"{"x":[1,2],"y":{"z":3}}"#), &reviver).unwrap();
        assert_eq!(*visited.lock().unwrap(), vec!["0", "1", "x", "z", "y", ""]);
    }

    #[test]
    fn test_array_holes_from_undefined() {
        let mut ncx = NativeContext::new(Realm::new());
        let reviver = ncx.realm().new_function("reviver", 2, |_, args, _| {
            if args[1].as_number() == Some(2.0) {
                Ok(Value::undefined())
            } else {
                Ok(args[1].clone())
            }
        });
        let v = parse(&mut ncx, &Value::string("[1,2,3]"), &reviver).unwrap();
        let arr = v.as_object().unwrap();
        assert_eq!(arr.array_length(), 3);
        assert!(!arr.has_own(&PropertyKey::index(1)));
        assert_eq!(arr.get(&PropertyKey::index(2)), Some(Value::number(3.0)));
    }

    #[test]
    fn test_holder_sees_revived_children() {
        let mut ncx = NativeContext::new(Realm::new());
        let reviver = ncx.realm().new_function("reviver", 2, |this, args, ncx| {
            if let Some(n) = args[1].as_number() {
                return Ok(Value::number(n * 2.0));
            }
            let key = args[0].as_string().map(|s| s.to_string_lossy()).unwrap_or_default();
            if key.is_empty() {
                let root = ncx.get(this, &PropertyKey::string(""))?;
                return ncx.get(&root, &PropertyKey::string("a"));
            }
            Ok(args[1].clone())
        });
        let v = parse(&mut ncx, &Value::string(r#"{"a":1}"#), &reviver).unwrap();
        assert_eq!(v, Value::number(2.0));
    }

    #[test]
    fn test_reviver_error_propagates() {
        let mut ncx = NativeContext::new(Realm::new());
        let reviver = ncx.realm().new_function("reviver", 2, |_, _, _| {
            Err(hostjson_vm::VmError::exception(Value::string("boom")))
        });
        let err = parse(&mut ncx, &Value::string("[1]"), &reviver).unwrap_err();
        let crate::JsonError::HostCallback(inner) = err else {
            panic!("expected host callback error");
        };
        assert_eq!(inner.thrown_value(), Some(&Value::string("boom")));
    }

    #[test]
    fn test_keys_added_by_reviver_are_not_visited() {
        let mut ncx = NativeContext::new(Realm::new());
        let count = Arc::new(Mutex::new(0usize));
        let seen = count.clone();
        let reviver = ncx.realm().new_function("reviver", 2, move |this, args, _| {
            *seen.lock().unwrap() += 1;
            if let Some(obj) = this.as_object() {
                obj.create_data_property(PropertyKey::string("late"), Value::null());
            }
            Ok(args[1].clone())
        });
        parse(&mut ncx, &Value::string(r#"{"a":1,"b":2}"#), &reviver).unwrap();
        assert_eq!(*count.lock().unwrap(), 3);
    }
}
