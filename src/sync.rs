//! Thread-safe skip list.
//!
//! A single reader-writer lock guards the whole structure: inserts, removals
//! and loads are exclusive, while lookups and dumps share the lock and may run
//! alongside each other, but never alongside a writer. No operation calls
//! another public operation while holding the lock, so the lock never needs to
//! be re-entrant.

use std::borrow::Borrow;
use std::fmt;
use std::io::{BufRead, Write};
use std::path::Path;
use std::str::FromStr;

use parking_lot::{RwLock, RwLockReadGuard};

use crate::error::Result;
use crate::map::{Controller, Insertion, SkipListMap};
use crate::persist::LoadReport;

pub struct SkipList<K, V> {
    inner: RwLock<SkipListMap<K, V>>,
}

impl<K, V> SkipList<K, V> {
    /// Creates an empty list whose nodes use at most levels `0..=max_level`.
    pub fn new(max_level: usize) -> SkipList<K, V> {
        SkipListMap::<K, V>::new(max_level).into()
    }

    pub fn with_controller(controller: Controller<K>) -> SkipList<K, V> {
        SkipListMap::<K, V>::with_controller(controller).into()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn max_level(&self) -> usize {
        self.inner.read().max_level()
    }

    pub fn current_level(&self) -> usize {
        self.inner.read().current_level()
    }

    pub fn clear(&self) {
        self.inner.write().clear();
    }

    /// Locks the list for reading. Writers block until the guard is dropped,
    /// which makes it possible to iterate over a consistent view.
    pub fn read(&self) -> RwLockReadGuard<'_, SkipListMap<K, V>> {
        self.inner.read()
    }

    pub fn into_inner(self) -> SkipListMap<K, V> {
        self.inner.into_inner()
    }

    /// Logs every level of the list.
    pub fn display_all(&self)
    where
        K: fmt::Display,
        V: fmt::Display,
    {
        self.inner.read().display_all();
    }
}

impl<K: Ord, V> SkipList<K, V> {
    /// See [`SkipListMap::insert`].
    pub fn insert(&self, key: K, value: V) -> Insertion {
        self.inner.write().insert(key, value)
    }

    /// See [`SkipListMap::upsert`].
    pub fn upsert(&self, key: K, value: V) -> Option<V> {
        self.inner.write().upsert(key, value)
    }

    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.inner.write().remove(key)
    }

    /// Returns a copy of the value stored for `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
        V: Clone,
    {
        self.inner.read().get(key).cloned()
    }

    /// Runs `f` on the value stored for `key` while holding the read lock.
    pub fn get_with<Q, F, R>(&self, key: &Q, f: F) -> Option<R>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
        F: FnOnce(&V) -> R,
    {
        self.inner.read().get(key).map(f)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.inner.read().contains_key(key)
    }
}

impl<K: fmt::Display, V: fmt::Display> SkipList<K, V> {
    /// Dumps all entries while holding the read lock, so the output is a
    /// consistent snapshot.
    pub fn dump<W: Write>(&self, sink: W) -> Result<usize> {
        self.inner.read().dump(sink)
    }

    pub fn dump_to_path<P: AsRef<Path>>(&self, path: P) -> Result<usize> {
        self.inner.read().dump_to_path(path)
    }

    /// Renders every level of the list, one per line.
    pub fn levels_to_string(&self) -> String {
        self.inner.read().levels().to_string()
    }
}

impl<K: Ord + FromStr, V: FromStr> SkipList<K, V> {
    /// Loads records while holding the write lock for the whole read.
    pub fn load<R: BufRead>(&self, source: R) -> Result<LoadReport> {
        self.inner.write().load(source)
    }

    pub fn load_from_path<P: AsRef<Path>>(&self, path: P) -> Result<LoadReport> {
        self.inner.write().load_from_path(path)
    }
}

impl<K, V> From<SkipListMap<K, V>> for SkipList<K, V> {
    fn from(map: SkipListMap<K, V>) -> Self {
        SkipList {
            inner: RwLock::new(map),
        }
    }
}

impl<K, V> Default for SkipList<K, V> {
    fn default() -> Self {
        SkipListMap::<K, V>::default().into()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for SkipList<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.inner.read(), f)
    }
}
