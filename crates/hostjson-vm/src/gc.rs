//! Shared heap handles
//!
//! Collection is the embedding host's concern; inside this crate a heap cell
//! is a reference-counted handle whose address doubles as its identity.

use std::sync::Arc;

/// Handle to a heap-allocated runtime object
pub struct GcRef<T>(Arc<T>);

impl<T> GcRef<T> {
    /// Allocate a new cell
    pub fn new(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// Address of the cell, stable for its lifetime
    pub fn as_ptr(&self) -> *const T {
        Arc::as_ptr(&self.0)
    }

    /// Identity used by visited-sets
    pub fn identity(&self) -> usize {
        self.as_ptr() as usize
    }

    /// Do both handles point at the same cell?
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }
}

impl<T> Clone for GcRef<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> std::ops::Deref for GcRef<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for GcRef<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
