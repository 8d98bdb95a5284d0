use crate::container::structure::Structure;
use crate::execution::step_engine::{SnapshotView, StepResult};

/// What the engine just did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepEvent {
    /// A plan was loaded; nothing has been applied yet.
    Loaded { plan_len: usize, description: String },
    /// One step was applied.
    Applied(StepResult),
    /// The cursor moved back one step by replaying from the base.
    SteppedBack(SnapshotView),
    /// The engine returned to idle with this snapshot restored.
    Reset { snapshot: Structure },
}

/// Observer notified by the engine after every state change.
///
/// Listeners run while the engine is borrowed, so they must not call back into it.
pub trait StepListener: Send {
    fn on_event(&mut self, event: &StepEvent);
}

impl<F> StepListener for F
where
    F: FnMut(&StepEvent) + Send,
{
    fn on_event(&mut self, event: &StepEvent) {
        self(event)
    }
}
