use std::fmt;

use crate::common::config::{Key, MAX_CAPACITY, Position, is_prime};
use crate::common::exception::{PlanError, StepError};
use crate::container::probe_sequence::{ProbeSequence, ProbeStrategy};
use crate::container::slot::Slot;

/// Fixed-capacity open-addressing table. The capacity is prime and never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenTable {
    slots: Vec<Slot>,
    strategy: ProbeStrategy,
}

impl OpenTable {
    /// Creates an empty table.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Number of slots. Must be prime so every probe run covers its reachable slots.
    /// * `strategy` - Linear, quadratic or double hashing.
    pub fn new(capacity: usize, strategy: ProbeStrategy) -> Result<Self, PlanError> {
        if capacity > MAX_CAPACITY {
            return Err(PlanError::InvalidCapacity(capacity));
        }
        Self::from_slots(vec![Slot::Empty; capacity], strategy)
    }

    /// Creates a table from existing slot contents, e.g. a preset exercise.
    pub fn from_slots(slots: Vec<Slot>, strategy: ProbeStrategy) -> Result<Self, PlanError> {
        if slots.len() > MAX_CAPACITY || !is_prime(slots.len()) {
            return Err(PlanError::InvalidCapacity(slots.len()));
        }
        if !strategy.is_open_addressing() {
            return Err(PlanError::InvalidStrategy(strategy));
        }
        Ok(Self { slots, strategy })
    }

    /// Shorthand for presets: `None` is an empty slot.
    pub fn from_keys(keys: &[Option<Key>], strategy: ProbeStrategy) -> Result<Self, PlanError> {
        Self::from_slots(keys.iter().map(|&k| Slot::from(k)).collect(), strategy)
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn strategy(&self) -> ProbeStrategy {
        self.strategy
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn slot(&self, position: Position) -> Option<Slot> {
        self.slots.get(position).copied()
    }

    /// Number of occupied slots. Tombstones are not counted.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.key().is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn set_slot(&mut self, position: Position, slot: Slot) -> Result<(), StepError> {
        let len = self.slots.len();
        let target = self
            .slots
            .get_mut(position)
            .ok_or(StepError::OutOfBounds { index: position, len })?;
        *target = slot;
        Ok(())
    }

    /// A fresh probe run for `key` under this table's strategy.
    pub fn probe_sequence(&self, key: Key) -> ProbeSequence {
        ProbeSequence::new(key, self.capacity(), self.strategy)
    }
}

impl fmt::Display for OpenTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, slot) in self.slots.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", slot)?;
        }
        write!(f, "]")
    }
}
