//! JSON.parse driver
//!
//! Text is tokenized into a generic tree, the tree is lifted into runtime
//! values, and the result is optionally walked by a reviver.

use hostjson_vm::{NativeContext, PropertyKey, Value};

use crate::error::JsonResult;
use crate::lift::lift;
use crate::revive::internalize;
use crate::text::parse_json_text;

/// Parse JSON text into a runtime value.
///
/// `text` is converted with ToString first. When `reviver` is callable it
/// sees every value bottom-up and its results replace the parsed ones.
pub fn parse(ncx: &mut NativeContext, text: &Value, reviver: &Value) -> JsonResult<Value> {
    let json_string = ncx.to_string(text)?;
    tracing::trace!(len = json_string.len(), revive = reviver.is_callable(), "parse");

    let tree = parse_json_text(&json_string)?;
    let unfiltered = lift(ncx.realm(), &tree);

    if !reviver.is_callable() {
        return Ok(unfiltered);
    }

    let root = ncx.realm().new_object();
    root.create_data_property(PropertyKey::string(""), unfiltered);
    internalize(ncx, &Value::object(root), &PropertyKey::string(""), reviver)
}
