//! Runtime strings
//!
//! Strings are immutable sequences of UTF-16 code units. Keeping code units
//! (rather than `str`) lets unpaired surrogates travel through the runtime
//! unchanged; only conversions to Rust text are lossy.

use std::sync::Arc;

/// An immutable runtime string
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JsString {
    units: Arc<[u16]>,
}

impl JsString {
    /// Create from Rust text
    pub fn new(s: &str) -> Self {
        Self {
            units: s.encode_utf16().collect::<Vec<_>>().into(),
        }
    }

    /// Create from raw code units (may contain unpaired surrogates)
    pub fn from_utf16(units: impl Into<Arc<[u16]>>) -> Self {
        Self {
            units: units.into(),
        }
    }

    /// The empty string
    pub fn empty() -> Self {
        Self {
            units: Arc::from(Vec::new()),
        }
    }

    /// Code units of this string
    pub fn as_utf16(&self) -> &[u16] {
        &self.units
    }

    /// Length in code units
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Is the string empty?
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// First `n` code units (or the whole string if shorter)
    pub fn prefix(&self, n: usize) -> Self {
        if n >= self.units.len() {
            return self.clone();
        }
        Self::from_utf16(self.units[..n].to_vec())
    }

    /// Code points, with surrogate pairs combined and unpaired surrogates
    /// yielded as their own value
    pub fn code_points(&self) -> impl Iterator<Item = u32> + '_ {
        char::decode_utf16(self.units.iter().copied()).map(|r| match r {
            Ok(c) => c as u32,
            Err(e) => e.unpaired_surrogate() as u32,
        })
    }

    /// Convert to Rust text, replacing unpaired surrogates with U+FFFD
    pub fn to_string_lossy(&self) -> String {
        String::from_utf16_lossy(&self.units)
    }

    /// Does the string hold only well-formed UTF-16?
    pub fn is_well_formed(&self) -> bool {
        char::decode_utf16(self.units.iter().copied()).all(|r| r.is_ok())
    }
}

impl From<&str> for JsString {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for JsString {
    fn from(s: String) -> Self {
        Self::new(&s)
    }
}

impl std::fmt::Display for JsString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

impl std::fmt::Debug for JsString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.to_string_lossy())
    }
}
