//! Per-call stringify state
//!
//! One `StringifyState` exists per top-level `stringify` call. Containers
//! borrow it through a `ContainerScope`, which marks the container as being
//! serialized and deepens the indent; dropping the scope undoes both, so an
//! error anywhere below leaves the state as it was before entry.

use std::fmt;

use hostjson_vm::{GcRef, JsObject, PropertyKey, Value};
use rustc_hash::FxHashMap;

use crate::error::{JsonError, JsonResult};

/// Replacer, gap and traversal bookkeeping for one `stringify` call
pub(crate) struct StringifyState {
    /// Called for every (holder, key, value)
    pub(crate) replacer_function: Option<Value>,
    /// Keys to serialize for objects (ignored for arrays)
    pub(crate) property_list: Option<Vec<PropertyKey>>,
    /// One indentation unit; empty means compact output
    pub(crate) gap: String,
    /// Current cumulative indentation
    pub(crate) indent: String,
    /// Open containers: identity -> depth in `path`
    seen: FxHashMap<usize, usize>,
    /// Open containers, root first
    path: Vec<OpenContainer>,
}

/// How a container was reached, kept for cycle reports
struct OpenContainer {
    key: PropertyKey,
    is_array: bool,
}

impl OpenContainer {
    fn constructor(&self) -> &'static str {
        if self.is_array { "Array" } else { "Object" }
    }
}

/// A cycle in Node's wording: the re-entered container, the containers
/// opened below it, and the key that leads back.
struct CycleReport<'a> {
    cycle: &'a [OpenContainer],
    starts_at_root: bool,
    closing_key: &'a PropertyKey,
}

impl fmt::Display for CycleReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Converting circular structure to JSON")?;
        let Some((start, links)) = self.cycle.split_first() else {
            return Ok(());
        };
        write!(f, "\n    --> starting at object with constructor '{}'", start.constructor())?;
        if !self.starts_at_root {
            write!(f, " (property '{}')", start.key)?;
        }
        for link in links {
            write!(
                f,
                "\n    |     property '{}' -> object with constructor '{}'",
                link.key,
                link.constructor()
            )?;
        }
        write!(f, "\n    --- property '{}' closes the circle", self.closing_key)
    }
}

impl StringifyState {
    pub(crate) fn new(
        replacer_function: Option<Value>,
        property_list: Option<Vec<PropertyKey>>,
        gap: String,
    ) -> Self {
        Self {
            replacer_function,
            property_list,
            gap,
            indent: String::new(),
            seen: FxHashMap::default(),
            path: Vec::new(),
        }
    }

    /// Start serializing `object`, reached through `key`.
    pub(crate) fn enter(
        &mut self,
        key: &PropertyKey,
        object: &GcRef<JsObject>,
        is_array: bool,
    ) -> JsonResult<ContainerScope<'_>> {
        let identity = object.identity();
        if let Some(&depth) = self.seen.get(&identity) {
            tracing::debug!(depth, open = self.path.len(), "circular structure in stringify");
            let report = CycleReport {
                cycle: self.path.get(depth..).unwrap_or_default(),
                starts_at_root: depth == 0,
                closing_key: key,
            };
            return Err(JsonError::CircularStructure(report.to_string()));
        }

        self.seen.insert(identity, self.path.len());
        self.path.push(OpenContainer {
            key: key.clone(),
            is_array,
        });
        let previous_indent = self.indent.len();
        self.indent.push_str(&self.gap);

        Ok(ContainerScope {
            state: self,
            identity,
            previous_indent,
        })
    }

    /// Number of containers currently open
    pub(crate) fn open_containers(&self) -> usize {
        self.seen.len()
    }
}

/// An open container; restores `seen` and `indent` when dropped
pub(crate) struct ContainerScope<'a> {
    state: &'a mut StringifyState,
    identity: usize,
    previous_indent: usize,
}

impl ContainerScope<'_> {
    /// Indent in effect before this container was entered
    pub(crate) fn previous_indent(&self) -> &str {
        &self.state.indent[..self.previous_indent]
    }
}

impl std::ops::Deref for ContainerScope<'_> {
    type Target = StringifyState;

    fn deref(&self) -> &StringifyState {
        self.state
    }
}

impl std::ops::DerefMut for ContainerScope<'_> {
    fn deref_mut(&mut self) -> &mut StringifyState {
        self.state
    }
}

impl Drop for ContainerScope<'_> {
    fn drop(&mut self) {
        self.state.seen.remove(&self.identity);
        self.state.path.pop();
        self.state.indent.truncate(self.previous_indent);
    }
}
