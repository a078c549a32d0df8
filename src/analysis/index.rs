//! Reverse reference indices and the per-target index cache.
//!
//! A `ReferenceIndex` counts references from one source file into a set of
//! target declarations. The cache keyed by the *current* target file assumes
//! the user edits one file at a time: retargeting to another file throws the
//! whole cache away in one step rather than tracking cross-file staleness.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;

use crate::facility::ptr::Ptr;

/// Reference counts from a single source file into target declarations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceIndex {
    counts: HashMap<Ptr, usize>,
    has_errors: bool,
}

impl ReferenceIndex {
    pub fn new(counts: HashMap<Ptr, usize>, has_errors: bool) -> Self {
        Self { counts, has_errors }
    }

    pub fn count(&self, ptr: &Ptr) -> usize {
        self.counts.get(ptr).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    /// True when a declaration this index holds references to is no longer in
    /// `signature`, i.e. it was deleted or changed identity.
    pub fn needs_update(&self, signature: &HashSet<Ptr>) -> bool {
        self.counts.keys().any(|ptr| !signature.contains(ptr))
    }
}

/// Source files known to reference a target declaration, or the marker that
/// finding out was judged too expensive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefSources {
    TooExpensive,
    Files(Vec<String>),
}

/// Outcome of a reference count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefCount {
    /// No element at the queried position.
    Unknown,
    /// Too many candidate files to compile.
    TooExpensive,
    Exact(usize),
}

#[derive(Debug)]
pub(crate) struct IndexEntry {
    pub index: ReferenceIndex,
    /// Store version of the source file when the index was built.
    pub version: i32,
}

/// Cache of reference indices against the current target file.
#[derive(Debug, Default)]
pub(crate) struct ReferenceCache {
    target_uri: Option<String>,
    pub by_target: HashMap<Ptr, RefSources>,
    pub by_source: IndexMap<String, IndexEntry>,
}

impl ReferenceCache {
    /// Point the cache at `uri`, clearing both maps in one step whenever the
    /// target file changes.
    pub fn retarget(&mut self, uri: &str) {
        if self.target_uri.as_deref() != Some(uri) {
            self.by_target.clear();
            self.by_source.clear();
            self.target_uri = Some(uri.to_string());
        }
    }

    pub fn clear(&mut self) {
        self.target_uri = None;
        self.by_target.clear();
        self.by_source.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.by_target.is_empty() && self.by_source.is_empty()
    }
}
