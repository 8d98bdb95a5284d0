use std::fmt;
use std::str::FromStr;

use crate::common::exception::PlanError;
use crate::container::chained_table::ChainedTable;
use crate::container::fixed_array::FixedArray;
use crate::container::open_table::OpenTable;
use crate::container::probe_sequence::ProbeStrategy;

/// Which structure an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructureKind {
    Table(ProbeStrategy),
    Array,
}

impl fmt::Display for StructureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructureKind::Table(strategy) => write!(f, "hash table ({})", strategy),
            StructureKind::Array => write!(f, "array"),
        }
    }
}

impl FromStr for StructureKind {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "array" => Ok(StructureKind::Array),
            other => other.parse().map(StructureKind::Table),
        }
    }
}

/// The snapshot owned by the step engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Structure {
    Open(OpenTable),
    Chained(ChainedTable),
    Array(FixedArray),
}

impl Structure {
    pub fn kind(&self) -> StructureKind {
        match self {
            Structure::Open(table) => StructureKind::Table(table.strategy()),
            Structure::Chained(_) => StructureKind::Table(ProbeStrategy::Chaining),
            Structure::Array(_) => StructureKind::Array,
        }
    }

    /// Builds an empty structure of the given kind and size.
    pub fn empty(kind: StructureKind, size: usize) -> Result<Self, PlanError> {
        match kind {
            StructureKind::Table(ProbeStrategy::Chaining) => {
                ChainedTable::new(size).map(Structure::Chained)
            }
            StructureKind::Table(strategy) => OpenTable::new(size, strategy).map(Structure::Open),
            StructureKind::Array => FixedArray::new(size).map(Structure::Array),
        }
    }

    pub fn as_open(&self) -> Option<&OpenTable> {
        match self {
            Structure::Open(table) => Some(table),
            _ => None,
        }
    }

    pub fn as_chained(&self) -> Option<&ChainedTable> {
        match self {
            Structure::Chained(table) => Some(table),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&FixedArray> {
        match self {
            Structure::Array(arr) => Some(arr),
            _ => None,
        }
    }
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Structure::Open(table) => write!(f, "{}", table),
            Structure::Chained(table) => write!(f, "{}", table),
            Structure::Array(arr) => write!(f, "{}", arr),
        }
    }
}

impl From<OpenTable> for Structure {
    fn from(table: OpenTable) -> Self {
        Structure::Open(table)
    }
}

impl From<ChainedTable> for Structure {
    fn from(table: ChainedTable) -> Self {
        Structure::Chained(table)
    }
}

impl From<FixedArray> for Structure {
    fn from(arr: FixedArray) -> Self {
        Structure::Array(arr)
    }
}
