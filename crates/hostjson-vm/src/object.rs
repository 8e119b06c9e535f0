//! Runtime objects
//!
//! Objects keep their own properties in insertion order. Arrays additionally
//! keep a dense element vector where deleted slots become holes.

use indexmap::IndexMap;
use num_bigint::BigInt;
use parking_lot::RwLock;
use rustc_hash::FxBuildHasher;
use std::sync::Arc;

use crate::gc::GcRef;
use crate::string::JsString;
use crate::value::Value;

/// Well-known symbol `@@toStringTag`
pub const SYMBOL_TO_STRING_TAG: u64 = 1;

/// Property key (index, string or symbol)
///
/// Strings that are canonical array indices are always stored as `Index`, so
/// `"0"` and `0` name the same property.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    /// Integer index (for arrays and index-like string keys)
    Index(u32),
    /// String property key
    String(JsString),
    /// Symbol property key
    Symbol(u64),
}

impl PropertyKey {
    /// Create a string property key
    pub fn string(s: &str) -> Self {
        match parse_array_index(s.as_bytes().iter().map(|b| *b as u16)) {
            Some(i) => Self::Index(i),
            None => Self::String(JsString::new(s)),
        }
    }

    /// Create from a runtime string
    pub fn from_js_string(s: JsString) -> Self {
        match parse_array_index(s.as_utf16().iter().copied()) {
            Some(i) => Self::Index(i),
            None => Self::String(s),
        }
    }

    /// Create an index property key
    pub fn index(i: u32) -> Self {
        Self::Index(i)
    }

    /// Is this a symbol key?
    pub fn is_symbol(&self) -> bool {
        matches!(self, Self::Symbol(_))
    }

    /// The key as a runtime string (symbols render as `Symbol(id)`)
    pub fn to_js_string(&self) -> JsString {
        match self {
            Self::Index(i) => JsString::new(&i.to_string()),
            Self::String(s) => s.clone(),
            Self::Symbol(id) => JsString::new(&format!("Symbol({})", id)),
        }
    }
}

impl From<&str> for PropertyKey {
    fn from(s: &str) -> Self {
        Self::string(s)
    }
}

impl From<u32> for PropertyKey {
    fn from(i: u32) -> Self {
        Self::Index(i)
    }
}

impl std::fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_js_string())
    }
}

/// Canonical array index: no leading zeros, below 2^32 - 1
fn parse_array_index(units: impl Iterator<Item = u16>) -> Option<u32> {
    let mut value: u64 = 0;
    let mut len = 0usize;
    let mut leading_zero = false;
    for unit in units {
        if !(0x30..=0x39).contains(&unit) {
            return None;
        }
        if len == 0 && unit == 0x30 {
            leading_zero = true;
        } else if leading_zero {
            return None;
        }
        value = value * 10 + (unit - 0x30) as u64;
        len += 1;
        if value >= u32::MAX as u64 {
            return None;
        }
    }
    if len == 0 {
        return None;
    }
    Some(value as u32)
}

/// Property attributes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PropertyAttributes {
    /// Property is writable
    pub writable: bool,
    /// Property is enumerable
    pub enumerable: bool,
    /// Property is configurable
    pub configurable: bool,
}

impl PropertyAttributes {
    /// Default data property attributes
    pub const fn data() -> Self {
        Self {
            writable: true,
            enumerable: true,
            configurable: true,
        }
    }

    /// Attributes of built-in methods: writable, configurable, hidden
    pub const fn builtin() -> Self {
        Self {
            writable: true,
            enumerable: false,
            configurable: true,
        }
    }

    /// Non-writable, non-enumerable, non-configurable
    pub const fn frozen() -> Self {
        Self {
            writable: false,
            enumerable: false,
            configurable: false,
        }
    }
}

/// Property descriptor
#[derive(Clone, Debug)]
pub enum PropertyDescriptor {
    /// Data property
    Data {
        /// The value
        value: Value,
        /// Attributes
        attributes: PropertyAttributes,
    },
    /// Accessor property
    Accessor {
        /// Getter function
        get: Option<Value>,
        /// Setter function
        set: Option<Value>,
        /// Attributes (`writable` is ignored)
        attributes: PropertyAttributes,
    },
}

impl PropertyDescriptor {
    /// Create a data property
    pub fn data(value: Value) -> Self {
        Self::Data {
            value,
            attributes: PropertyAttributes::data(),
        }
    }

    /// Create a data property with specific attributes
    pub fn data_with_attrs(value: Value, attributes: PropertyAttributes) -> Self {
        Self::Data { value, attributes }
    }

    /// Built-in method slot
    pub fn builtin_method(value: Value) -> Self {
        Self::data_with_attrs(value, PropertyAttributes::builtin())
    }

    /// Enumerable, configurable accessor with a getter only
    pub fn getter(get: Value) -> Self {
        Self::Accessor {
            get: Some(get),
            set: None,
            attributes: PropertyAttributes::data(),
        }
    }

    /// Get the value (for data properties)
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Data { value, .. } => Some(value),
            Self::Accessor { .. } => None,
        }
    }

    fn attributes(&self) -> PropertyAttributes {
        match self {
            Self::Data { attributes, .. } | Self::Accessor { attributes, .. } => *attributes,
        }
    }

    fn attributes_mut(&mut self) -> &mut PropertyAttributes {
        match self {
            Self::Data { attributes, .. } | Self::Accessor { attributes, .. } => attributes,
        }
    }

    /// Check if enumerable
    pub fn enumerable(&self) -> bool {
        self.attributes().enumerable
    }

    /// Check if configurable
    pub fn is_configurable(&self) -> bool {
        self.attributes().configurable
    }

    /// Check if writable
    pub fn is_writable(&self) -> bool {
        match self {
            Self::Data { attributes, .. } => attributes.writable,
            Self::Accessor { .. } => false,
        }
    }
}

/// What sort of object this is; fixed at allocation
#[derive(Clone, Debug)]
pub enum ObjectKind {
    /// Plain object
    Ordinary,
    /// Array exotic object
    Array,
    /// `Number` wrapper
    BoxedNumber(f64),
    /// `String` wrapper
    BoxedString(JsString),
    /// `Boolean` wrapper
    BoxedBoolean(bool),
    /// `BigInt` wrapper
    BoxedBigInt(Arc<BigInt>),
    /// Frozen marker produced by `JSON.rawJSON`
    RawJson,
}

/// Indices further than this past the dense elements are stored sparsely
const MAX_DENSE_GAP: usize = 1024;

struct ObjectInner {
    prototype: Option<GcRef<JsObject>>,
    /// Named properties, plus array indices beyond the dense elements
    properties: IndexMap<PropertyKey, PropertyDescriptor, FxBuildHasher>,
    /// Dense array elements; `None` is a hole
    elements: Vec<Option<Value>>,
    /// Array `length`; may exceed `elements.len()`
    length: usize,
    extensible: bool,
    frozen: bool,
}

/// A runtime object
///
/// Thread-safe with interior mutability. No lock is held across calls back
/// into host code.
pub struct JsObject {
    kind: ObjectKind,
    inner: RwLock<ObjectInner>,
}

impl JsObject {
    /// Create a new empty ordinary object
    pub fn new(prototype: Option<GcRef<JsObject>>) -> Self {
        Self::with_kind(ObjectKind::Ordinary, prototype)
    }

    /// Create an object of the given kind
    pub fn with_kind(kind: ObjectKind, prototype: Option<GcRef<JsObject>>) -> Self {
        Self {
            kind,
            inner: RwLock::new(ObjectInner {
                prototype,
                properties: IndexMap::default(),
                elements: Vec::new(),
                length: 0,
                extensible: true,
                frozen: false,
            }),
        }
    }

    /// Create a new array with `length` holes
    pub fn array(length: usize, prototype: Option<GcRef<JsObject>>) -> Self {
        let obj = Self::with_kind(ObjectKind::Array, prototype);
        obj.inner.write().length = length;
        obj
    }

    /// Object kind
    pub fn kind(&self) -> &ObjectKind {
        &self.kind
    }

    /// Check if object is an array
    pub fn is_array(&self) -> bool {
        matches!(self.kind, ObjectKind::Array)
    }

    /// Check if object is a raw JSON marker
    pub fn is_raw_json(&self) -> bool {
        matches!(self.kind, ObjectKind::RawJson)
    }

    /// Get prototype
    pub fn prototype(&self) -> Option<GcRef<JsObject>> {
        self.inner.read().prototype.clone()
    }

    /// Replace prototype
    pub fn set_prototype(&self, prototype: Option<GcRef<JsObject>>) {
        self.inner.write().prototype = prototype;
    }

    /// Own property descriptor, including array elements and `length`
    pub fn get_own_property(&self, key: &PropertyKey) -> Option<PropertyDescriptor> {
        let inner = self.inner.read();
        if self.is_array() {
            match key {
                PropertyKey::Index(i) if (*i as usize) < inner.elements.len() => {
                    let value = inner.elements[*i as usize].clone()?;
                    let attributes = if inner.frozen {
                        PropertyAttributes {
                            enumerable: true,
                            ..PropertyAttributes::frozen()
                        }
                    } else {
                        PropertyAttributes::data()
                    };
                    return Some(PropertyDescriptor::Data { value, attributes });
                }
                PropertyKey::String(s) if is_length(s) => {
                    return Some(PropertyDescriptor::Data {
                        value: Value::number(inner.length as f64),
                        attributes: PropertyAttributes {
                            writable: !inner.frozen,
                            enumerable: false,
                            configurable: false,
                        },
                    });
                }
                _ => {}
            }
        }
        inner.properties.get(key).cloned()
    }

    /// Property descriptor found on this object or its prototype chain
    pub fn lookup_property(&self, key: &PropertyKey) -> Option<PropertyDescriptor> {
        if let Some(desc) = self.get_own_property(key) {
            return Some(desc);
        }
        let mut proto = self.prototype();
        while let Some(p) = proto {
            if let Some(desc) = p.get_own_property(key) {
                return Some(desc);
            }
            proto = p.prototype();
        }
        None
    }

    /// Get a data property value by key (accessors are not run)
    pub fn get(&self, key: &PropertyKey) -> Option<Value> {
        self.lookup_property(key)
            .and_then(|desc| desc.value().cloned())
    }

    /// Check if object has own property
    pub fn has_own(&self, key: &PropertyKey) -> bool {
        self.get_own_property(key).is_some()
    }

    /// Define or update an own property.
    ///
    /// Returns `false` when the object is not extensible, or when the
    /// existing property is non-configurable and the change is not a plain
    /// value update of a writable data property.
    pub fn define_own_property(&self, key: PropertyKey, desc: PropertyDescriptor) -> bool {
        let mut guard = self.inner.write();
        let inner = &mut *guard;

        let mut sparse_index = None;
        if self.is_array() {
            match &key {
                PropertyKey::Index(i) if (*i as usize) < inner.elements.len() + MAX_DENSE_GAP => {
                    let idx = *i as usize;
                    let exists = inner.elements.get(idx).is_some_and(Option::is_some)
                        || inner.properties.contains_key(&key);
                    if inner.frozen || (!exists && !inner.extensible) {
                        return false;
                    }
                    let PropertyDescriptor::Data { value, .. } = desc else {
                        return false;
                    };
                    if idx >= inner.elements.len() {
                        inner.grow_elements(idx + 1);
                    }
                    inner.elements[idx] = Some(value);
                    inner.length = inner.length.max(idx + 1);
                    return true;
                }
                PropertyKey::Index(i) => {
                    if !matches!(desc, PropertyDescriptor::Data { .. }) {
                        return false;
                    }
                    sparse_index = Some(*i as usize);
                }
                PropertyKey::String(s) if is_length(s) => {
                    if inner.frozen {
                        return false;
                    }
                    let Some(len) = desc.value().and_then(Value::as_number) else {
                        return false;
                    };
                    if len < 0.0 || len.fract() != 0.0 || len > u32::MAX as f64 {
                        return false;
                    }
                    inner.set_length(len as usize);
                    return true;
                }
                _ => {}
            }
        }

        let defined = match inner.properties.get_mut(&key) {
            Some(existing) if !existing.is_configurable() => {
                if !existing.is_writable() {
                    return false;
                }
                match (existing, desc) {
                    (
                        PropertyDescriptor::Data { value, attributes },
                        PropertyDescriptor::Data {
                            value: new_value,
                            attributes: new_attributes,
                        },
                    ) if new_attributes.enumerable == attributes.enumerable
                        && !new_attributes.configurable =>
                    {
                        *value = new_value;
                        attributes.writable = new_attributes.writable;
                        true
                    }
                    _ => false,
                }
            }
            Some(existing) => {
                *existing = desc;
                true
            }
            None if inner.extensible => {
                inner.properties.insert(key, desc);
                true
            }
            None => false,
        };

        if let (true, Some(idx)) = (defined, sparse_index) {
            inner.length = inner.length.max(idx + 1);
        }
        defined
    }

    /// CreateDataProperty: enumerable, writable, configurable data property
    pub fn create_data_property(&self, key: PropertyKey, value: Value) -> bool {
        self.define_own_property(key, PropertyDescriptor::data(value))
    }

    /// Simple assignment: updates a writable own data property or creates a
    /// new one. Setters are not run.
    pub fn set(&self, key: PropertyKey, value: Value) -> bool {
        match self.get_own_property(&key) {
            Some(PropertyDescriptor::Data { attributes, .. }) => {
                if !attributes.writable {
                    return false;
                }
                self.define_own_property(key, PropertyDescriptor::Data { value, attributes })
            }
            Some(PropertyDescriptor::Accessor { .. }) => false,
            None => self.create_data_property(key, value),
        }
    }

    /// Delete an own property; `false` if it is non-configurable
    pub fn delete(&self, key: &PropertyKey) -> bool {
        let mut inner = self.inner.write();

        if self.is_array() {
            match key {
                PropertyKey::Index(i) if (*i as usize) < inner.elements.len() => {
                    let idx = *i as usize;
                    if inner.elements[idx].is_none() {
                        return true;
                    }
                    if inner.frozen {
                        return false;
                    }
                    inner.elements[idx] = None;
                    return true;
                }
                PropertyKey::String(s) if is_length(s) => return false,
                _ => {}
            }
        }

        match inner.properties.get(key) {
            Some(desc) if !desc.is_configurable() => false,
            Some(_) => {
                inner.properties.shift_remove(key);
                true
            }
            None => true,
        }
    }

    /// Own property keys: indices ascending, then strings in insertion
    /// order, then symbols
    pub fn own_keys(&self) -> Vec<PropertyKey> {
        let inner = self.inner.read();

        let mut indices: Vec<u32> = inner
            .properties
            .keys()
            .filter_map(|k| match k {
                PropertyKey::Index(i) => Some(*i),
                _ => None,
            })
            .collect();
        indices.extend(
            inner
                .elements
                .iter()
                .enumerate()
                .filter(|(_, slot)| slot.is_some())
                .map(|(i, _)| i as u32),
        );
        indices.sort_unstable();

        let mut keys: Vec<PropertyKey> = indices.into_iter().map(PropertyKey::Index).collect();
        if self.is_array() {
            keys.push(PropertyKey::String(JsString::new("length")));
        }
        keys.extend(
            inner
                .properties
                .keys()
                .filter(|k| matches!(k, PropertyKey::String(_)))
                .cloned(),
        );
        keys.extend(inner.properties.keys().filter(|k| k.is_symbol()).cloned());
        keys
    }

    /// Is the object extensible?
    pub fn is_extensible(&self) -> bool {
        self.inner.read().extensible
    }

    /// Stop new properties from being added
    pub fn prevent_extensions(&self) {
        self.inner.write().extensible = false;
    }

    /// SetIntegrityLevel(frozen)
    pub fn freeze(&self) {
        let mut inner = self.inner.write();
        inner.extensible = false;
        inner.frozen = true;
        for desc in inner.properties.values_mut() {
            let attributes = desc.attributes_mut();
            attributes.configurable = false;
            attributes.writable = false;
        }
    }

    /// Has the object been frozen?
    pub fn is_frozen(&self) -> bool {
        self.inner.read().frozen
    }

    /// Get array length (for arrays)
    pub fn array_length(&self) -> usize {
        self.inner.read().length
    }

    /// Append at index `length`; `false` once the index space is exhausted
    pub fn array_push(&self, value: Value) -> bool {
        let Ok(index) = u32::try_from(self.array_length()) else {
            return false;
        };
        index != u32::MAX && self.create_data_property(PropertyKey::Index(index), value)
    }
}

impl ObjectInner {
    /// Extend the dense elements to `new_len`, pulling in any sparse
    /// entries the new range covers
    fn grow_elements(&mut self, new_len: usize) {
        let old_len = self.elements.len();
        self.elements.resize(new_len, None);
        let covered: Vec<PropertyKey> = self
            .properties
            .keys()
            .filter(|k| {
                matches!(k, PropertyKey::Index(i) if (old_len..new_len).contains(&(*i as usize)))
            })
            .cloned()
            .collect();
        for key in covered {
            if let (PropertyKey::Index(i), Some(desc)) = (&key, self.properties.shift_remove(&key)) {
                self.elements[*i as usize] = desc.value().cloned();
            }
        }
    }

    /// ArraySetLength without allocating for the new holes
    fn set_length(&mut self, len: usize) {
        if len < self.length {
            self.elements.truncate(len);
            self.properties
                .retain(|k, _| !matches!(k, PropertyKey::Index(i) if *i as usize >= len));
        }
        self.length = len;
    }
}

fn is_length(s: &JsString) -> bool {
    s.as_utf16() == [0x6C, 0x65, 0x6E, 0x67, 0x74, 0x68]
}

impl std::fmt::Debug for JsObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("JsObject")
            .field("kind", &self.kind)
            .field("properties", &inner.properties.len())
            .field("length", &inner.length)
            .finish()
    }
}
