//! Mapping of backed-up paths to their last seen modification time.

use std::collections::{BTreeMap, BTreeSet};

use compress::Compressor;
use walk::Timestamp;

/// Registry of relative paths and modification times for one tree.
///
/// Keys are always the *source* relative path, whatever codec the files are
/// stored with; the codec is a property of the registry and decides the
/// stored file name via [`Registry::stored_name`]. Entries iterate in key
/// order.
///
/// A registry built from a destination tree may also carry *foreign* stored
/// names: files that do not carry the active codec's extension and therefore
/// cannot belong to any key.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Registry {
    codec: Compressor,
    entries: BTreeMap<String, Timestamp>,
    foreign: BTreeSet<String>,
}

impl Registry {
    /// Creates an empty registry whose files are stored with `codec`.
    #[must_use]
    pub fn new(codec: Compressor) -> Self {
        Self {
            codec,
            entries: BTreeMap::new(),
            foreign: BTreeSet::new(),
        }
    }

    /// Builds a registry from `(key, timestamp)` pairs.
    ///
    /// ```
    /// use compress::Compressor;
    /// use engine::Registry;
    /// use walk::Timestamp;
    ///
    /// let registry = Registry::from_entries(
    ///     Compressor::Gzip,
    ///     [("a.txt", Timestamp::from_parts(1, 0))],
    /// );
    /// assert_eq!(registry.stored_name("a.txt"), "a.txt.gz");
    /// ```
    #[must_use]
    pub fn from_entries<I, K>(codec: Compressor, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Timestamp)>,
        K: Into<String>,
    {
        let mut registry = Self::new(codec);
        for (key, modified) in entries {
            registry.insert(key, modified);
        }
        registry
    }

    /// Returns the codec stored files are written with.
    #[must_use]
    pub const fn codec(&self) -> Compressor {
        self.codec
    }

    /// Records `key` with its modification time, returning the previous time.
    pub fn insert(&mut self, key: impl Into<String>, modified: Timestamp) -> Option<Timestamp> {
        self.entries.insert(key.into(), modified)
    }

    /// Records a stored name that does not map to any key.
    pub fn insert_foreign(&mut self, stored_name: impl Into<String>) {
        self.foreign.insert(stored_name.into());
    }

    /// Removes `key`, returning its modification time.
    pub fn remove(&mut self, key: &str) -> Option<Timestamp> {
        self.entries.remove(key)
    }

    /// Returns the modification time recorded for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Timestamp> {
        self.entries.get(key).copied()
    }

    /// Reports whether `key` is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether the registry holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(key, timestamp)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Timestamp)> {
        self.entries.iter().map(|(key, modified)| (key.as_str(), *modified))
    }

    /// Iterates over keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterates over foreign stored names in order.
    pub fn foreign(&self) -> impl Iterator<Item = &str> {
        self.foreign.iter().map(String::as_str)
    }

    /// Returns the relative name `key` is stored under.
    #[must_use]
    pub fn stored_name(&self, key: &str) -> String {
        self.codec.stored_name(key)
    }
}
