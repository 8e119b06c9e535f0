//! JSON.rawJSON / JSON.isRawJSON
//!
//! A raw JSON marker is a frozen, prototype-less object whose single
//! `rawJSON` property holds already-validated primitive JSON text.
//! `stringify` emits that text as is.

use hostjson_vm::{GcRef, JsObject, JsString, NativeContext, ObjectKind, PropertyKey, Value};

use crate::error::{JsonError, JsonResult};
use crate::text::{JSON_WHITESPACE, parse_json_text};

const RAW_JSON_KEY: &str = "rawJSON";

/// Validate `text` as a primitive JSON value and wrap it in a marker.
pub fn raw_json(ncx: &mut NativeContext, text: &Value) -> JsonResult<Value> {
    let json_string = ncx.to_string(text)?;

    let units = json_string.as_utf16();
    let (Some(first), Some(last)) = (units.first(), units.last()) else {
        return Err(JsonError::InvalidRawJsonSource);
    };
    if JSON_WHITESPACE.contains(first) || JSON_WHITESPACE.contains(last) {
        tracing::debug!("rawJSON source has surrounding whitespace");
        return Err(JsonError::InvalidRawJsonSource);
    }

    if parse_json_text(&json_string)?.is_container() {
        return Err(JsonError::RawJsonMustBePrimitive);
    }

    let marker = GcRef::new(JsObject::with_kind(ObjectKind::RawJson, None));
    marker.create_data_property(PropertyKey::string(RAW_JSON_KEY), Value::js_string(json_string));
    marker.freeze();
    Ok(Value::object(marker))
}

/// Whether `value` was produced by [`raw_json`]
pub fn is_raw_json(value: &Value) -> bool {
    value.as_object().is_some_and(|obj| obj.is_raw_json())
}

/// The text a marker carries
pub(crate) fn raw_json_text(marker: &JsObject) -> Option<JsString> {
    marker
        .get(&PropertyKey::string(RAW_JSON_KEY))
        .and_then(|v| v.as_string().cloned())
}
