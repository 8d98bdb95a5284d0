//! The step-sequencing engine.
//!
//! ```text
//!            load                advance (cursor < len)
//!   Idle ───────────▶ Running ◀──────────┐
//!    ▲                  │  └─────────────┘
//!    │ reset            │ advance (cursor == len)
//!    │                  ▼
//!    └──────── Completed | Failed ── load ──▶ Running (current snapshot becomes the baseline)
//! ```
//!
//! The displayed snapshot is always the state after step `cursor - 1` and before step `cursor`.
//! A step is applied by computing the next snapshot first and swapping it in, so a failed
//! action leaves the engine exactly as it was.

use std::fmt;

use log::{debug, error, info, warn};

use crate::common::exception::EngineError;
use crate::container::structure::Structure;
use crate::execution::listener::{StepEvent, StepListener};
use crate::planner::plan::{Highlight, OperationPlan, Outcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineStatus {
    Idle,
    Running,
    Completed,
    Failed,
}

impl fmt::Display for EngineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EngineStatus::Idle => "idle",
            EngineStatus::Running => "running",
            EngineStatus::Completed => "completed",
            EngineStatus::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

/// Returned by every successful `advance`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepResult {
    pub index: usize,
    pub description: String,
    pub snapshot: Structure,
    pub highlight: Highlight,
    pub code_line: usize,
    pub outcome: Option<Outcome>,
    pub done: bool,
}

/// Read-only view of the engine for renderers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotView {
    pub structure: Structure,
    pub highlight: Highlight,
    pub status: EngineStatus,
    pub cursor: Option<usize>,
    pub plan_len: usize,
    /// Listing line of the last applied step.
    pub code_line: Option<usize>,
}

pub struct StepEngine {
    snapshot: Structure,
    original: Structure,
    plan: Option<OperationPlan>,
    cursor: Option<usize>,
    status: EngineStatus,
    highlight: Highlight,
    code_line: Option<usize>,
    generation: u64,
    listeners: Vec<Box<dyn StepListener>>,
}

impl StepEngine {
    pub fn new(structure: Structure) -> Self {
        Self {
            original: structure.clone(),
            snapshot: structure,
            plan: None,
            cursor: None,
            status: EngineStatus::Idle,
            highlight: Highlight::None,
            code_line: None,
            generation: 0,
            listeners: Vec::new(),
        }
    }

    pub fn status(&self) -> EngineStatus {
        self.status
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn plan(&self) -> Option<&OperationPlan> {
        self.plan.as_ref()
    }

    /// The live snapshot. Callers that keep it must clone.
    pub fn structure(&self) -> &Structure {
        &self.snapshot
    }

    /// Bumped whenever the run is replaced, reset or rewound. Timers compare it to detect that
    /// the run they were started for is gone.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_running(&self) -> bool {
        self.status == EngineStatus::Running
    }

    pub fn add_listener(&mut self, listener: Box<dyn StepListener>) {
        self.listeners.push(listener);
    }

    fn notify(&mut self, event: StepEvent) {
        for listener in self.listeners.iter_mut() {
            listener.on_event(&event);
        }
    }

    /// Replaces the structure outright. Only allowed while no operation is running.
    pub fn replace_structure(&mut self, structure: Structure) -> Result<(), EngineError> {
        if self.is_running() {
            warn!("Refusing to replace the structure while an operation is running");
            return Err(EngineError::OperationInProgress);
        }
        info!("Replacing structure with {}", structure.kind());
        self.original = structure.clone();
        self.snapshot = structure;
        self.plan = None;
        self.cursor = None;
        self.status = EngineStatus::Idle;
        self.highlight = Highlight::None;
        self.code_line = None;
        self.generation += 1;
        Ok(())
    }

    /// Loads a plan built from the current snapshot and moves to `Running` with cursor 0.
    pub fn load(&mut self, plan: OperationPlan) -> Result<(), EngineError> {
        if self.is_running() {
            warn!("Cannot load a plan while another operation is running");
            return Err(EngineError::OperationInProgress);
        }
        if plan.base() != &self.snapshot {
            warn!("Rejecting plan compiled against a different snapshot");
            return Err(EngineError::StalePlan);
        }

        // A rejected load must leave the baseline alone.
        if matches!(self.status, EngineStatus::Completed | EngineStatus::Failed) {
            debug!("Committing finished operation as the new baseline");
            self.original = self.snapshot.clone();
        }

        info!("Loaded plan: {}", plan);
        let plan_len = plan.len();
        let description = plan.to_string();
        self.plan = Some(plan);
        self.cursor = Some(0);
        self.status = EngineStatus::Running;
        self.highlight = Highlight::None;
        self.code_line = None;
        self.generation += 1;
        self.notify(StepEvent::Loaded {
            plan_len,
            description,
        });
        if plan_len == 0 {
            self.status = EngineStatus::Completed;
        }
        Ok(())
    }

    /// Applies exactly one step.
    pub fn advance(&mut self) -> Result<StepResult, EngineError> {
        let (plan, cursor) = match (self.status, &self.plan, self.cursor) {
            (EngineStatus::Running, Some(plan), Some(cursor)) => (plan, cursor),
            (EngineStatus::Completed | EngineStatus::Failed, _, _) => {
                error!("advance called after the operation finished");
                return Err(EngineError::EngineCompleted);
            }
            _ => {
                error!("advance called with no operation loaded");
                return Err(EngineError::EngineIdle);
            }
        };

        let Some(step) = plan.step(cursor) else {
            error!("cursor {} is past the end of the plan", cursor);
            return Err(EngineError::EngineCompleted);
        };

        let next = step.apply(&self.snapshot).map_err(|e| {
            error!("Step {} could not be applied: {}", cursor, e);
            EngineError::Step(e)
        })?;

        let done = cursor + 1 == plan.len();
        let result = StepResult {
            index: cursor,
            description: step.description().to_string(),
            snapshot: next.clone(),
            highlight: step.highlight().clone(),
            code_line: step.code_line(),
            outcome: step.outcome(),
            done,
        };

        debug!("Step {}/{}: {}", cursor + 1, plan.len(), step);
        self.snapshot = next;
        self.cursor = Some(cursor + 1);
        self.highlight = result.highlight.clone();
        self.code_line = Some(result.code_line);

        if done {
            let success = plan.outcome().is_none_or(|o| o.is_success());
            self.status = if success {
                EngineStatus::Completed
            } else {
                EngineStatus::Failed
            };
            info!("Operation {}: {}", self.status, step);
        }

        self.notify(StepEvent::Applied(result.clone()));
        Ok(result)
    }

    /// Returns to idle and restores the snapshot from before the current operation.
    /// Calling it again changes nothing.
    pub fn reset(&mut self) {
        if self.status != EngineStatus::Idle {
            info!("Resetting engine");
        }
        self.snapshot = self.original.clone();
        self.plan = None;
        self.cursor = None;
        self.status = EngineStatus::Idle;
        self.highlight = Highlight::None;
        self.code_line = None;
        self.generation += 1;
        let snapshot = self.snapshot.clone();
        self.notify(StepEvent::Reset { snapshot });
    }

    /// Moves the cursor back one step by replaying the plan from its base.
    /// At cursor 0 this is a no-op.
    pub fn step_back(&mut self) -> Result<SnapshotView, EngineError> {
        let (Some(plan), Some(cursor)) = (&self.plan, self.cursor) else {
            error!("step_back called with no operation loaded");
            return Err(EngineError::EngineIdle);
        };
        if cursor == 0 {
            return Ok(self.snapshot());
        }

        let target = cursor - 1;
        let mut current = plan.base().clone();
        for step in &plan.steps()[..target] {
            current = step.apply(&current)?;
        }
        let last = target.checked_sub(1).and_then(|i| plan.step(i));
        self.highlight = last.map(|s| s.highlight().clone()).unwrap_or_default();
        self.code_line = last.map(|s| s.code_line());

        debug!("Stepped back to cursor {}", target);
        self.snapshot = current;
        self.cursor = Some(target);
        self.status = EngineStatus::Running;
        self.generation += 1;

        let view = self.snapshot();
        self.notify(StepEvent::SteppedBack(view.clone()));
        Ok(view)
    }

    pub fn snapshot(&self) -> SnapshotView {
        SnapshotView {
            structure: self.snapshot.clone(),
            highlight: self.highlight.clone(),
            status: self.status,
            cursor: self.cursor,
            plan_len: self.plan.as_ref().map_or(0, OperationPlan::len),
            code_line: self.code_line,
        }
    }
}
