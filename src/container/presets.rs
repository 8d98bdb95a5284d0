//! Starting structures for the classic exercises.

use std::fmt;
use std::str::FromStr;

use crate::common::config::{DEFAULT_ARRAY_CAPACITY, DEFAULT_TABLE_SIZE};
use crate::common::exception::PlanError;
use crate::container::chained_table::ChainedTable;
use crate::container::fixed_array::FixedArray;
use crate::container::open_table::OpenTable;
use crate::container::probe_sequence::ProbeStrategy;
use crate::container::structure::Structure;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    LinearDelete,
    LinearSearch,
    QuadraticSearch,
    DoubleInsert,
    ChainingDelete,
    ArrayInsert,
    ArrayDelete,
    ArraySearch,
    ArrayTraverse,
}

impl Preset {
    pub const ALL: [Preset; 9] = [
        Preset::LinearDelete,
        Preset::LinearSearch,
        Preset::QuadraticSearch,
        Preset::DoubleInsert,
        Preset::ChainingDelete,
        Preset::ArrayInsert,
        Preset::ArrayDelete,
        Preset::ArraySearch,
        Preset::ArrayTraverse,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Preset::LinearDelete => "linear-delete",
            Preset::LinearSearch => "linear-search",
            Preset::QuadraticSearch => "quadratic-search",
            Preset::DoubleInsert => "double-insert",
            Preset::ChainingDelete => "chaining-delete",
            Preset::ArrayInsert => "array-insert",
            Preset::ArrayDelete => "array-delete",
            Preset::ArraySearch => "array-search",
            Preset::ArrayTraverse => "array-traverse",
        }
    }

    pub fn build(&self) -> Result<Structure, PlanError> {
        let structure = match self {
            // 5 hashes to 5, which holds 12, so it sits at 6.
            Preset::LinearDelete => OpenTable::from_keys(
                &[Some(7), Some(14), Some(21), None, None, Some(12), Some(5)],
                ProbeStrategy::Linear,
            )?
            .into(),
            Preset::LinearSearch => OpenTable::from_keys(
                &[Some(7), Some(14), Some(21), None, None, Some(5), None],
                ProbeStrategy::Linear,
            )?
            .into(),
            Preset::QuadraticSearch => OpenTable::from_keys(
                &[Some(7), Some(14), None, None, Some(21), Some(5), None],
                ProbeStrategy::Quadratic,
            )?
            .into(),
            Preset::DoubleInsert => OpenTable::new(DEFAULT_TABLE_SIZE, ProbeStrategy::Double)?.into(),
            Preset::ChainingDelete => ChainedTable::from_buckets(vec![
                vec![10, 5],
                vec![1, 6, 11],
                vec![],
                vec![13],
                vec![9],
            ])?
            .into(),
            Preset::ArrayInsert => {
                FixedArray::from_values(DEFAULT_ARRAY_CAPACITY, &[10, 20, 30, 40, 50])?.into()
            }
            Preset::ArrayDelete => FixedArray::from_values(
                DEFAULT_ARRAY_CAPACITY,
                &[10, 20, 30, 40, 50, 60, 70],
            )?
            .into(),
            Preset::ArraySearch => FixedArray::from_values(
                DEFAULT_ARRAY_CAPACITY,
                &[45, 12, 89, 7, 23, 56, 31, 90],
            )?
            .into(),
            Preset::ArrayTraverse => {
                FixedArray::from_values(DEFAULT_ARRAY_CAPACITY, &[15, 22, 8, 31, 42, 10])?.into()
            }
        };
        Ok(structure)
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Preset {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Preset::ALL
            .into_iter()
            .find(|p| p.name() == wanted)
            .ok_or(PlanError::UnknownName(wanted))
    }
}
