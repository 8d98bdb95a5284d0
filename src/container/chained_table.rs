use std::fmt;

use crate::common::config::{Key, MAX_CAPACITY, Position};
use crate::common::exception::{PlanError, StepError};
use crate::container::probe_sequence::bucket_index;

/// Separate-chaining table: a fixed number of buckets, each an ordered chain, head first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainedTable {
    buckets: Vec<Vec<Key>>,
}

impl ChainedTable {
    pub fn new(buckets: usize) -> Result<Self, PlanError> {
        if buckets > MAX_CAPACITY {
            return Err(PlanError::InvalidCapacity(buckets));
        }
        Self::from_buckets(vec![Vec::new(); buckets])
    }

    pub fn from_buckets(buckets: Vec<Vec<Key>>) -> Result<Self, PlanError> {
        if buckets.is_empty() || buckets.len() > MAX_CAPACITY {
            return Err(PlanError::InvalidCapacity(buckets.len()));
        }
        Ok(Self { buckets })
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn buckets(&self) -> &[Vec<Key>] {
        &self.buckets
    }

    pub fn bucket(&self, index: Position) -> Option<&[Key]> {
        self.buckets.get(index).map(Vec::as_slice)
    }

    pub fn bucket_index(&self, key: Key) -> Position {
        bucket_index(key, self.buckets.len())
    }

    /// Total number of nodes across all chains.
    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn bucket_mut(&mut self, index: Position) -> Result<&mut Vec<Key>, StepError> {
        let len = self.buckets.len();
        self.buckets
            .get_mut(index)
            .ok_or(StepError::OutOfBounds { index, len })
    }

    /// `new_node->next = table[b]; table[b] = new_node;`
    pub fn link_head(&mut self, bucket: Position, key: Key) -> Result<(), StepError> {
        self.bucket_mut(bucket)?.insert(0, key);
        Ok(())
    }

    /// `table[b] = head->next;` Returns the removed key.
    pub fn unlink_head(&mut self, bucket: Position) -> Result<Key, StepError> {
        let chain = self.bucket_mut(bucket)?;
        if chain.is_empty() {
            return Err(StepError::EmptyBucket(bucket));
        }
        Ok(chain.remove(0))
    }

    /// `prev->next = temp->next;` where `prev` is the node at `prev`. Returns the removed key.
    pub fn unlink_after(&mut self, bucket: Position, prev: usize) -> Result<Key, StepError> {
        let chain = self.bucket_mut(bucket)?;
        let target = prev + 1;
        if target >= chain.len() {
            return Err(StepError::OutOfBounds {
                index: target,
                len: chain.len(),
            });
        }
        Ok(chain.remove(target))
    }
}

impl fmt::Display for ChainedTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, chain) in self.buckets.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "[{}]", i)?;
            for key in chain {
                write!(f, " -> {}", key)?;
            }
            write!(f, " -> NULL")?;
        }
        Ok(())
    }
}
