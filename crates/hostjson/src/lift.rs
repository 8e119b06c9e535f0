//! Generic JSON tree -> runtime values

use hostjson_vm::{PropertyKey, Realm, Value};

use crate::text::JsonTree;

/// Build a fresh runtime value graph from a parsed tree.
///
/// Members are defined in tree order, so objects keep source key order and
/// duplicate keys keep the last value at the first position.
pub fn lift(realm: &Realm, tree: &JsonTree) -> Value {
    match tree {
        JsonTree::Null => Value::null(),
        JsonTree::Bool(b) => Value::boolean(*b),
        JsonTree::Number(n) => Value::number(*n),
        JsonTree::String(s) => Value::js_string(s.clone()),
        JsonTree::Array(items) => {
            let array = realm.new_array();
            for item in items {
                array.array_push(lift(realm, item));
            }
            Value::object(array)
        }
        JsonTree::Object(members) => {
            let object = realm.new_object();
            for (key, member) in members {
                object.create_data_property(
                    PropertyKey::from_js_string(key.clone()),
                    lift(realm, member),
                );
            }
            Value::object(object)
        }
    }
}
