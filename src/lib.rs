//! An in-memory ordered key-value index backed by a probabilistic skip list.
//!
//! [`SkipListMap`] is the single-owner engine; [`SkipList`] wraps it in a
//! reader-writer lock so it can be shared between threads. Both can be dumped
//! to, and loaded from, a plain `key:value` text format.
//!
//! ```
//! use skiplist_kv::{Insertion, SkipList};
//!
//! let list: SkipList<i32, String> = SkipList::new(6);
//! assert_eq!(list.insert(19, "zzzz".to_string()), Insertion::Inserted);
//! assert_eq!(list.insert(19, "dddd".to_string()), Insertion::AlreadyExists);
//! assert_eq!(list.get(&19).as_deref(), Some("zzzz"));
//! ```

mod arena;
mod error;
mod height_control;
mod iter;
mod map;
mod node;
mod persist;
mod sync;

pub use error::{Error, Result};
pub use height_control::{
    FixedHeights, GeometricalGenerator, HeightControl, DEFAULT_MAX_LEVEL,
    DEFAULT_UPGRADE_PROBABILITY,
};
pub use iter::Iter;
pub use map::{Controller, Insertion, Levels, SkipListMap};
pub use persist::{LoadReport, DELIMITER, STORE_FILE};
pub use sync::SkipList;
