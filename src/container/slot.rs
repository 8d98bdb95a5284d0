//! Slot states for open-addressing tables.
//!
//! | State       | Meaning                                         |
//! |-------------|-------------------------------------------------|
//! | `Empty`     | Never occupied; terminates a search probe run   |
//! | `Occupied`  | Holds a key                                     |
//! | `Tombstone` | Deleted entry; probes continue past it          |
//!
//! A tombstone keeps later searches probing past a deleted key whose neighbours were placed
//! by collisions. Turning it back into `Empty` would hide those neighbours.

use std::fmt;

use crate::common::config::Key;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Slot {
    #[default]
    Empty,
    Occupied(Key),
    Tombstone,
}

impl Slot {
    pub fn is_empty(&self) -> bool {
        matches!(self, Slot::Empty)
    }

    pub fn is_tombstone(&self) -> bool {
        matches!(self, Slot::Tombstone)
    }

    /// Returns the stored key, if any. Tombstones hold none.
    pub fn key(&self) -> Option<Key> {
        match self {
            Slot::Occupied(k) => Some(*k),
            _ => None,
        }
    }

    /// True if the slot holds exactly `key`.
    pub fn holds(&self, key: Key) -> bool {
        self.key() == Some(key)
    }
}

impl From<Option<Key>> for Slot {
    fn from(value: Option<Key>) -> Self {
        value.map_or(Slot::Empty, Slot::Occupied)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Empty => write!(f, "_"),
            Slot::Occupied(k) => write!(f, "{}", k),
            Slot::Tombstone => write!(f, "DEL"),
        }
    }
}
