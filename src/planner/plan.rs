//! Compiled operation plans.
//!
//! An [`OperationPlan`] is an ordered list of [`Step`]s computed once from a request and the
//! pre-operation snapshot. A plan never mutates anything; each step carries a
//! [`StepAction`], a pure transition from one snapshot to the next, which only the step engine
//! invokes. Replaying the actions in order from the plan's base always produces the same
//! sequence of snapshots.
//!
//! ```text
//! base ──step 0──▶ s1 ──step 1──▶ s2 ── … ──step n-1──▶ final (outcome on step n-1)
//! ```

use std::fmt;
use std::fmt::{Display, Formatter};

use crate::common::config::{Key, Position};
use crate::common::exception::StepError;
use crate::container::slot::Slot;
use crate::container::structure::{Structure, StructureKind};
use crate::planner::operation::{OperationKind, OperationParams};

/// Which part of the structure a step draws attention to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Highlight {
    #[default]
    None,
    Slot(Position),
    Slots(Vec<Position>),
    Bucket(Position),
    ChainNode { bucket: Position, node: usize },
}

impl Highlight {
    /// Flat list of highlighted slot or bucket positions, for renderers that only colour cells.
    pub fn positions(&self) -> Vec<Position> {
        match self {
            Highlight::None => Vec::new(),
            Highlight::Slot(p) | Highlight::Bucket(p) => vec![*p],
            Highlight::Slots(ps) => ps.clone(),
            Highlight::ChainNode { bucket, .. } => vec![*bucket],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundReason {
    /// An empty slot ended the probe run.
    EmptySlot,
    /// Every reachable slot was probed.
    ProbeExhausted,
    /// The bucket's chain ended.
    EndOfChain,
    /// The scan passed the logical end of the array.
    EndOfArray,
}

/// Result reported by the terminal step of a plan.
///
/// `probes` counts slots or nodes examined; for array insert/delete it counts shifted cells.
/// For chaining, `position` is the bucket index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Inserted { position: Position, probes: usize },
    Found { position: Position, probes: usize },
    Deleted { position: Position, probes: usize },
    Traversed { sum: u64, count: usize },
    NotFound { reason: NotFoundReason, probes: usize },
    TableFull { probes: usize },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, Outcome::NotFound { .. } | Outcome::TableFull { .. })
    }

    pub fn position(&self) -> Option<Position> {
        match self {
            Outcome::Inserted { position, .. }
            | Outcome::Found { position, .. }
            | Outcome::Deleted { position, .. } => Some(*position),
            _ => None,
        }
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Inserted { position, .. } => write!(f, "inserted at {}", position),
            Outcome::Found { position, .. } => write!(f, "found at {}", position),
            Outcome::Deleted { position, .. } => write!(f, "deleted from {}", position),
            Outcome::Traversed { sum, count } => write!(f, "visited {} values, sum {}", count, sum),
            Outcome::NotFound {
                reason: NotFoundReason::ProbeExhausted,
                ..
            } => write!(f, "operation failed: key not found"),
            Outcome::NotFound { .. } => write!(f, "not found"),
            Outcome::TableFull { .. } => write!(f, "operation failed: table full"),
        }
    }
}

/// The state transition carried by one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepAction {
    /// Inspect only; the snapshot is unchanged.
    Observe,
    WriteSlot { position: Position, slot: Slot },
    LinkHead { bucket: Position, key: Key },
    UnlinkHead { bucket: Position },
    UnlinkAfter { bucket: Position, prev: usize },
    ShiftCell { from: Position, to: Position },
    WriteCell { index: Position, value: Key },
    ClearCell { index: Position },
    GrowLength,
    ShrinkLength,
}

impl StepAction {
    pub fn is_mutating(&self) -> bool {
        !matches!(self, StepAction::Observe)
    }

    /// Computes the snapshot after this action. The input is never modified, so a failed
    /// action leaves the caller's snapshot untouched.
    pub fn apply(&self, snapshot: &Structure) -> Result<Structure, StepError> {
        let mismatch = || StepError::StructureMismatch(snapshot.kind());
        let mut next = snapshot.clone();

        match (self, &mut next) {
            (StepAction::Observe, _) => {}
            (StepAction::WriteSlot { position, slot }, Structure::Open(table)) => {
                table.set_slot(*position, *slot)?;
            }
            (StepAction::LinkHead { bucket, key }, Structure::Chained(table)) => {
                table.link_head(*bucket, *key)?;
            }
            (StepAction::UnlinkHead { bucket }, Structure::Chained(table)) => {
                table.unlink_head(*bucket)?;
            }
            (StepAction::UnlinkAfter { bucket, prev }, Structure::Chained(table)) => {
                table.unlink_after(*bucket, *prev)?;
            }
            (StepAction::ShiftCell { from, to }, Structure::Array(arr)) => {
                arr.copy_cell(*from, *to)?;
            }
            (StepAction::WriteCell { index, value }, Structure::Array(arr)) => {
                arr.write(*index, *value)?;
            }
            (StepAction::ClearCell { index }, Structure::Array(arr)) => {
                arr.clear(*index)?;
            }
            (StepAction::GrowLength, Structure::Array(arr)) => arr.grow()?,
            (StepAction::ShrinkLength, Structure::Array(arr)) => arr.shrink()?,
            _ => return Err(mismatch()),
        }

        Ok(next)
    }
}

/// One atomic, described, replayable transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    description: String,
    action: StepAction,
    highlight: Highlight,
    code_line: usize,
    outcome: Option<Outcome>,
}

impl Step {
    /// A non-mutating step.
    pub fn observe(description: impl Into<String>, highlight: Highlight, code_line: usize) -> Self {
        Self {
            description: description.into(),
            action: StepAction::Observe,
            highlight,
            code_line,
            outcome: None,
        }
    }

    pub fn with_action(mut self, action: StepAction) -> Self {
        self.action = action;
        self
    }

    pub fn with_outcome(mut self, outcome: Outcome) -> Self {
        self.outcome = Some(outcome);
        self
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn action(&self) -> &StepAction {
        &self.action
    }

    pub fn highlight(&self) -> &Highlight {
        &self.highlight
    }

    /// Zero-based line of the operation's pseudocode listing this step executes.
    pub fn code_line(&self) -> usize {
        self.code_line
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn apply(&self, snapshot: &Structure) -> Result<Structure, StepError> {
        self.action.apply(snapshot)
    }
}

impl Display for Step {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description)?;
        if let Some(outcome) = &self.outcome {
            write!(f, " [{}]", outcome)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationPlan {
    kind: OperationKind,
    params: OperationParams,
    base: Structure,
    steps: Vec<Step>,
}

impl OperationPlan {
    pub fn new(
        kind: OperationKind,
        params: OperationParams,
        base: Structure,
        steps: Vec<Step>,
    ) -> Self {
        Self {
            kind,
            params,
            base,
            steps,
        }
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    pub fn params(&self) -> OperationParams {
        self.params
    }

    pub fn structure_kind(&self) -> StructureKind {
        self.base.kind()
    }

    /// The snapshot this plan was compiled against.
    pub fn base(&self) -> &Structure {
        &self.base
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The outcome reported by the terminal step.
    pub fn outcome(&self) -> Option<Outcome> {
        self.steps.last().and_then(Step::outcome)
    }

    /// Applies every step from the base, returning the snapshot after each one.
    pub fn replay(&self) -> Result<Vec<Structure>, StepError> {
        let mut current = self.base.clone();
        let mut snapshots = Vec::with_capacity(self.steps.len());
        for step in &self.steps {
            current = step.apply(&current)?;
            snapshots.push(current.clone());
        }
        Ok(snapshots)
    }

    /// The snapshot after the whole plan has run.
    pub fn final_snapshot(&self) -> Result<Structure, StepError> {
        self.steps
            .iter()
            .try_fold(self.base.clone(), |current, step| step.apply(&current))
    }
}

impl Display for OperationPlan {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "→ {} {} on {} ({} steps)",
            self.kind,
            self.params,
            self.base.kind(),
            self.steps.len()
        )?;

        if f.alternate() {
            for (i, step) in self.steps.iter().enumerate() {
                write!(f, "\n   {:>3}. {}", i, step)?;
            }
        }

        Ok(())
    }
}
