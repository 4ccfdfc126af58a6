//! The set of canonical paths `require` has already executed.
//!
//! Keys are compared as exact strings. Nothing is normalized here, so a file
//! reached through a symlinked directory is a different entry than the same
//! file reached directly.

use rustc_hash::FxHashSet;

#[derive(Debug, Default)]
pub struct LoadCache {
    /// Paths whose execution completed without error.
    loaded: FxHashSet<String>,
    /// Paths currently executing under `require`.
    in_flight: FxHashSet<String>,
}

impl LoadCache {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn contains(&self, path: &str) -> bool {
        self.loaded.contains(path)
    }

    /// Record a successfully executed path. Returns `false` if it was
    /// already recorded.
    pub fn record(&mut self, path: impl Into<String>) -> bool {
        self.loaded.insert(path.into())
    }

    pub fn len(&self) -> usize {
        self.loaded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.loaded.iter().map(String::as_str)
    }

    #[inline]
    pub fn is_in_flight(&self, path: &str) -> bool {
        self.in_flight.contains(path)
    }

    pub(crate) fn begin(&mut self, path: &str) {
        self.in_flight.insert(path.to_owned());
    }

    pub(crate) fn finish(&mut self, path: &str) {
        self.in_flight.remove(path);
    }
}
