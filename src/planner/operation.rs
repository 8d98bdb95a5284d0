use std::fmt;
use std::str::FromStr;

use crate::common::config::{Key, MAX_KEY, Position};
use crate::common::exception::PlanError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Insert,
    Search,
    Delete,
    Traverse,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperationKind::Insert => "insert",
            OperationKind::Search => "search",
            OperationKind::Delete => "delete",
            OperationKind::Traverse => "traverse",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for OperationKind {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "insert" => Ok(OperationKind::Insert),
            "search" | "find" => Ok(OperationKind::Search),
            "delete" | "remove" => Ok(OperationKind::Delete),
            "traverse" => Ok(OperationKind::Traverse),
            other => Err(PlanError::UnknownName(other.to_string())),
        }
    }
}

/// Operands of a requested operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationParams {
    /// Hash-table insert/search/delete, or array search by value.
    Key(Key),
    /// Array insert of `value` at `index`.
    InsertAt { index: Position, value: Key },
    /// Array delete at `index`.
    DeleteAt { index: Position },
    /// Operations without operands (array traversal).
    None,
}

impl OperationParams {
    /// Every key or value carried by these params.
    pub fn key(&self) -> Option<Key> {
        match self {
            OperationParams::Key(k) => Some(*k),
            OperationParams::InsertAt { value, .. } => Some(*value),
            OperationParams::DeleteAt { .. } | OperationParams::None => None,
        }
    }
}

impl fmt::Display for OperationParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationParams::Key(k) => write!(f, "key {}", k),
            OperationParams::InsertAt { index, value } => write!(f, "{} at index {}", value, index),
            OperationParams::DeleteAt { index } => write!(f, "index {}", index),
            OperationParams::None => write!(f, "-"),
        }
    }
}

/// Parses user input into a key in `0..=MAX_KEY`.
pub fn parse_key(input: &str) -> Result<Key, PlanError> {
    let trimmed = input.trim();
    let value: i64 = trimmed
        .parse()
        .map_err(|_| PlanError::InvalidKey(format!("'{}' is not a number", trimmed)))?;
    check_key(value)
}

/// Range check shared by text input and already-numeric callers.
pub fn check_key(value: i64) -> Result<Key, PlanError> {
    if value < 0 || value > i64::from(MAX_KEY) {
        return Err(PlanError::InvalidKey(format!(
            "{} is outside 0..={}",
            value, MAX_KEY
        )));
    }
    Ok(value as Key)
}

/// Parses an array index. Range is checked later, against the live logical size.
pub fn parse_index(input: &str) -> Result<Position, PlanError> {
    let trimmed = input.trim();
    trimmed
        .parse()
        .map_err(|_| PlanError::MalformedIndex(trimmed.to_string()))
}
