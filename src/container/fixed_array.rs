use std::fmt;

use crate::common::config::{Key, MAX_CAPACITY, Position};
use crate::common::exception::{PlanError, StepError};

/// A contiguous array with fixed capacity and a logical length.
///
/// Cells `0..len` hold values. Cells past `len` are `None` between operations, but a shift in
/// progress may briefly duplicate a value across the boundary, exactly as the C code it mirrors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedArray {
    cells: Vec<Option<Key>>,
    len: usize,
}

impl FixedArray {
    pub fn new(capacity: usize) -> Result<Self, PlanError> {
        Self::from_values(capacity, &[])
    }

    pub fn from_values(capacity: usize, values: &[Key]) -> Result<Self, PlanError> {
        if capacity == 0 || capacity > MAX_CAPACITY {
            return Err(PlanError::InvalidCapacity(capacity));
        }
        if values.len() > capacity {
            return Err(PlanError::Overflow { capacity });
        }
        let mut cells = vec![None; capacity];
        for (cell, value) in cells.iter_mut().zip(values) {
            *cell = Some(*value);
        }
        Ok(Self {
            cells,
            len: values.len(),
        })
    }

    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.cells.len()
    }

    pub fn cells(&self) -> &[Option<Key>] {
        &self.cells
    }

    pub fn get(&self, index: Position) -> Option<Key> {
        self.cells.get(index).copied().flatten()
    }

    /// The logical contents, `arr[0..len]`.
    pub fn values(&self) -> Vec<Key> {
        self.cells[..self.len].iter().flatten().copied().collect()
    }

    fn check(&self, index: Position) -> Result<(), StepError> {
        if index >= self.cells.len() {
            return Err(StepError::OutOfBounds {
                index,
                len: self.cells.len(),
            });
        }
        Ok(())
    }

    /// `arr[to] = arr[from];`
    pub fn copy_cell(&mut self, from: Position, to: Position) -> Result<(), StepError> {
        self.check(from)?;
        self.check(to)?;
        self.cells[to] = self.cells[from];
        Ok(())
    }

    pub fn write(&mut self, index: Position, value: Key) -> Result<(), StepError> {
        self.check(index)?;
        self.cells[index] = Some(value);
        Ok(())
    }

    pub fn clear(&mut self, index: Position) -> Result<(), StepError> {
        self.check(index)?;
        self.cells[index] = None;
        Ok(())
    }

    pub fn grow(&mut self) -> Result<(), StepError> {
        if self.is_full() {
            return Err(StepError::CapacityExceeded(self.capacity()));
        }
        self.len += 1;
        Ok(())
    }

    pub fn shrink(&mut self) -> Result<(), StepError> {
        if self.len == 0 {
            return Err(StepError::OutOfBounds { index: 0, len: 0 });
        }
        self.len -= 1;
        Ok(())
    }
}

impl fmt::Display for FixedArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, cell) in self.cells.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match cell {
                Some(v) => write!(f, "{}", v)?,
                None => write!(f, "_")?,
            }
        }
        write!(f, "] size {}/{}", self.len, self.capacity())
    }
}
