use std::borrow::Borrow;
use std::fmt;

use log::{info, trace};

use crate::arena::{Arena, NodeId};
use crate::height_control::{GeometricalGenerator, HeightControl, DEFAULT_UPGRADE_PROBABILITY};
use crate::iter::Iter;
use crate::node::Node;

/// Boxed level generator owned by a list.
pub type Controller<K> = Box<dyn HeightControl<K> + Send + Sync>;

/// Result of [`SkipListMap::insert`].
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    Inserted,
    /// The key was already present. The stored value was left untouched.
    AlreadyExists,
}

impl Insertion {
    pub fn is_inserted(self) -> bool {
        self == Insertion::Inserted
    }
}

/// A position in the list: either the ghost head or an actual node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    Head,
    Node(NodeId),
}

pub struct SkipListMap<K, V> {
    /// Forward links of the "ghost" head node. The head has the maximum
    /// possible level, is never removed and holds no key, so every descent
    /// starts from here and `head_[0]` is the smallest entry, if any.
    head_: Vec<Option<NodeId>>,

    /// Storage for every node in the list. Nodes refer to each other only
    /// through handles into this arena.
    nodes_: Arena<K, V>,

    /// Number of elements in the list
    length_: usize,

    /// Highest level index with at least one node linked at it, or 0
    level_: usize,

    /// Maximum level the `controller_` can generate. This is stored here
    /// instead of calling `controller_` because all calls to `controller_` are
    /// virtually dispatched.
    max_level_: usize,

    /// Used to generate the level for any given node when inserting data.
    controller_: Controller<K>,
}

impl<K, V> SkipListMap<K, V> {
    /// Creates an empty list whose nodes use at most levels `0..=max_level`,
    /// with levels drawn by fair coin flips.
    pub fn new(max_level: usize) -> SkipListMap<K, V> {
        Self::with_controller(Box::new(GeometricalGenerator::new(
            max_level,
            DEFAULT_UPGRADE_PROBABILITY,
        )))
    }

    pub fn with_controller(controller: Controller<K>) -> SkipListMap<K, V> {
        let max_level = controller.max_height();

        SkipListMap {
            head_: vec![None; max_level + 1],
            nodes_: Arena::new(),
            length_: 0,
            level_: 0,
            max_level_: max_level,
            // The only direct call to controller_ should be done while
            // inserting a new node.
            controller_: controller,
        }
    }

    /// Removes all elements.
    pub fn clear(&mut self) {
        self.nodes_.clear();
        self.head_.iter_mut().for_each(|link| *link = None);
        self.length_ = 0;
        self.level_ = 0;
    }

    /// Returns the number of elements stored in the structure.
    pub fn len(&self) -> usize {
        self.length_
    }

    /// Returns `true` if there are no elements stored within the structure.
    pub fn is_empty(&self) -> bool {
        self.length_ == 0
    }

    /// Returns the highest level a node can reach.
    pub fn max_level(&self) -> usize {
        self.max_level_
    }

    /// Returns the highest level currently in use.
    pub fn current_level(&self) -> usize {
        self.level_
    }

    /// Iterates over all entries in ascending key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.iter_level(0)
    }

    /// Iterates over the entries linked at `level`, in ascending key order.
    /// Levels above the current one are empty.
    pub fn iter_level(&self, level: usize) -> Iter<'_, K, V> {
        let first = self.head_.get(level).copied().flatten();
        Iter::new(&self.nodes_, first, level, self.length_)
    }

    pub fn first(&self) -> Option<(&K, &V)> {
        self.head_[0].map(|id| self.nodes_.get(id).key_value())
    }

    /// Returns a formatter printing every level of the list on its own line.
    pub fn levels(&self) -> Levels<'_, K, V> {
        Levels { list: self }
    }

    /// Logs the whole structure, one line per level.
    pub fn display_all(&self)
    where
        K: fmt::Display,
        V: fmt::Display,
    {
        info!("skip list with {} entries\n{}", self.length_, self.levels());
    }

    fn next(&self, cursor: Cursor, level: usize) -> Option<NodeId> {
        match cursor {
            Cursor::Head => self.head_[level],
            Cursor::Node(id) => self.nodes_.get(id).next(level),
        }
    }

    fn link_to(&mut self, cursor: Cursor, level: usize, destination: Option<NodeId>) {
        match cursor {
            Cursor::Head => self.head_[level] = destination,
            Cursor::Node(id) => self.nodes_.get_mut(id).link_to(level, destination),
        }
    }
}

impl<K: Ord, V> SkipListMap<K, V> {
    /// Finds the last position whose key is smaller than `key`.
    fn find_lower_bound<Q>(&self, key: &Q) -> Cursor
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = Cursor::Head;

        for level in (0..=self.level_).rev() {
            while let Some(next) = self.next(current, level) {
                if self.nodes_.get(next).key::<Q>() < key {
                    current = Cursor::Node(next);
                } else {
                    break;
                }
            }
        }

        current
    }

    /// Same descent as `find_lower_bound`, but it also generates an `updates`
    /// vector: for index i, the last position before `key` that is linked at
    /// level i. Levels above the current one point at the head. The second
    /// element is the node holding `key`, if present.
    fn find_with_updates<Q>(&self, key: &Q) -> (Vec<Cursor>, Option<NodeId>)
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut updates = vec![Cursor::Head; self.max_level_ + 1];
        let mut current = Cursor::Head;

        for level in (0..=self.level_).rev() {
            while let Some(next) = self.next(current, level) {
                if self.nodes_.get(next).key::<Q>() < key {
                    current = Cursor::Node(next);
                } else {
                    break;
                }
            }

            updates[level] = current;
        }

        let found = self
            .next(current, 0)
            .filter(|&next| self.nodes_.get(next).key::<Q>() == key);
        (updates, found)
    }

    fn find<Q>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let lower_bound = self.find_lower_bound(key);
        self.next(lower_bound, 0)
            .filter(|&next| self.nodes_.get(next).key::<Q>() == key)
    }

    /// Inserts `key` with `value`. If `key` is already present nothing
    /// changes and `Insertion::AlreadyExists` is returned.
    pub fn insert(&mut self, key: K, value: V) -> Insertion {
        let (updates, found) = self.find_with_updates(&key);
        if found.is_some() {
            return Insertion::AlreadyExists;
        }

        self.link_new(updates, key, value);
        Insertion::Inserted
    }

    /// Inserts `key` with `value`, overwriting the value of an existing entry.
    /// Returns the value that was replaced, if any.
    pub fn upsert(&mut self, key: K, value: V) -> Option<V> {
        let (updates, found) = self.find_with_updates(&key);
        if let Some(id) = found {
            return Some(self.nodes_.get_mut(id).replace_value(value));
        }

        self.link_new(updates, key, value);
        None
    }

    fn link_new(&mut self, updates: Vec<Cursor>, key: K, value: V) {
        let level = self.controller_.get_height(&key);
        debug_assert!(level <= self.max_level_);
        let level = std::cmp::min(level, self.max_level_);

        // `updates` already points at the head above the current level.
        if level > self.level_ {
            trace!("list level grows from {} to {}", self.level_, level);
            self.level_ = level;
        }

        let node = self.nodes_.alloc(Node::new(key, value, level));
        for (level, update) in updates.into_iter().enumerate().take(level + 1) {
            let successor = self.next(update, level);
            self.nodes_.get_mut(node).link_to(level, successor);
            self.link_to(update, level, Some(node));
        }

        self.length_ += 1;
    }

    /// Returns a const reference to the value stored for `key`, if it exists.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).map(|id| self.nodes_.get(id).value())
    }

    /// Returns a mutable reference to the value stored for `key`, if it
    /// exists.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let id = self.find(key)?;
        Some(self.nodes_.get_mut(id).value_mut())
    }

    /// Returns true if `key` is in the list.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).is_some()
    }

    /// Returns the level of the node holding `key`, i.e. the highest chain it
    /// is linked in.
    pub fn tower_height<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).map(|id| self.nodes_.get(id).level())
    }

    /// Removes `key` from the list. Returns the removed value, or `None` if
    /// the key was not found.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let (updates, found) = self.find_with_updates(key);
        let removal = found?;

        // A node of level L is linked at every level up to L, and `updates`
        // holds its predecessor at each of them.
        for level in 0..=self.nodes_.get(removal).level() {
            let successor = self.nodes_.get(removal).next(level);
            self.link_to(updates[level], level, successor);
        }

        while self.level_ > 0 && self.head_[self.level_].is_none() {
            self.level_ -= 1;
            trace!("list level shrinks to {}", self.level_);
        }

        self.length_ -= 1;
        let (_, value) = self.nodes_.free(removal).into_parts();
        debug_assert_eq!(self.nodes_.len(), self.length_);
        Some(value)
    }

    /// Panics if the structure is inconsistent.
    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        assert!(self.level_ <= self.max_level_);
        assert_eq!(self.nodes_.len(), self.length_);
        assert_eq!(self.iter().count(), self.length_);

        for level in 0..=self.max_level_ {
            let mut previous: Option<&K> = None;
            let mut current = self.head_[level];
            while let Some(id) = current {
                let node = self.nodes_.get(id);
                assert!(node.level() >= level, "node linked above its level");
                if let Some(previous) = previous {
                    assert!(previous < node.key::<K>(), "level {} out of order", level);
                }
                previous = Some(node.key());
                current = node.next(level);
            }

            if level > self.level_ {
                assert!(self.head_[level].is_none(), "level {} above current", level);
            }
        }

        if self.level_ > 0 {
            assert!(self.head_[self.level_].is_some(), "current level is empty");
        }

        // Every node must be reachable at each level of its tower.
        for (key, _) in self.iter() {
            let height = self.tower_height(key).unwrap();
            for level in 0..=height {
                assert!(self.iter_level(level).any(|(k, _)| k == key));
            }
        }
    }
}

impl<K, V> Default for SkipListMap<K, V> {
    fn default() -> Self {
        Self::with_controller(Box::new(GeometricalGenerator::default()))
    }
}

impl<K: Ord, V> Extend<(K, V)> for SkipListMap<K, V> {
    /// Inserts every pair. Pairs whose key is already present are dropped.
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            let _ = self.insert(key, value);
        }
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for SkipListMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut list = SkipListMap::default();
        list.extend(iter);
        list
    }
}

impl<'a, K, Q, V> std::ops::Index<&'a Q> for SkipListMap<K, V>
where
    K: Ord + Borrow<Q>,
    Q: Ord + ?Sized,
{
    type Output = V;

    /// Panics if `index` is not present.
    fn index(&self, index: &Q) -> &Self::Output {
        match self.get(index) {
            Some(value) => value,
            None => panic!("key not found in skip list"),
        }
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for SkipListMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;

        for (position, (key, value)) in self.iter().enumerate() {
            if position > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", key, value)?;
        }

        write!(f, "]")
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for SkipListMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Displays every level of a list, lowest first, as `Level i: k:v;k:v;`.
pub struct Levels<'a, K, V> {
    list: &'a SkipListMap<K, V>,
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for Levels<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for level in 0..=self.list.current_level() {
            write!(f, "Level {}: ", level)?;
            for (key, value) in self.list.iter_level(level) {
                write!(f, "{}:{};", key, value)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
