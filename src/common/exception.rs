use thiserror::Error;

use crate::container::probe_sequence::ProbeStrategy;
use crate::container::structure::StructureKind;
use crate::planner::operation::OperationKind;

/// Rejections raised before a plan is built. No step exists for a request that fails here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("Index {index} is out of bounds for logical size {len}")]
    InvalidIndex { index: usize, len: usize },
    #[error("'{0}' is not an array index")]
    MalformedIndex(String),
    #[error("Invalid key: {0}")]
    InvalidKey(String),
    #[error("Array is full (capacity {capacity})")]
    Overflow { capacity: usize },
    #[error("Capacity {0} is not valid for this structure")]
    InvalidCapacity(usize),
    #[error("Operation targets {actual} but the session holds {expected}")]
    StructureMismatch {
        expected: StructureKind,
        actual: StructureKind,
    },
    #[error("{0} cannot back an open-addressing table")]
    InvalidStrategy(ProbeStrategy),
    #[error("Unknown name '{0}'")]
    UnknownName(String),
    #[error("{kind} is not supported on {structure}")]
    UnsupportedOperation {
        kind: OperationKind,
        structure: StructureKind,
    },
}

/// A step action could not be applied to the snapshot it was given.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StepError {
    #[error("Step does not apply to a {0} snapshot")]
    StructureMismatch(StructureKind),
    #[error("Position {index} is out of bounds (len {len})")]
    OutOfBounds { index: usize, len: usize },
    #[error("Bucket {0} has no node to unlink")]
    EmptyBucket(usize),
    #[error("Logical size would exceed capacity {0}")]
    CapacityExceeded(usize),
}

/// Lifecycle violations by the engine's caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("No operation is loaded")]
    EngineIdle,
    #[error("The loaded operation has already finished")]
    EngineCompleted,
    #[error("Another operation is still running")]
    OperationInProgress,
    #[error("Plan was built from a different snapshot")]
    StalePlan,
    #[error("Step failed: {0}")]
    Step(#[from] StepError),
}

/// Returned by a probe sequence once every reachable position has been tried.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Probe sequence exhausted after {attempts} attempts")]
pub struct ProbeExhausted {
    pub attempts: usize,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("Auto-play needs a running tokio runtime")]
    NoRuntime,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error(transparent)]
    Plan(#[from] PlanError),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}
