pub mod array;
pub mod chaining;
pub mod open_addressing;
pub mod operation;
pub mod plan;
pub mod planner;
pub mod pseudocode;

pub use operation::{OperationKind, OperationParams, parse_index, parse_key};
pub use plan::{Highlight, NotFoundReason, OperationPlan, Outcome, Step, StepAction};
pub use planner::OperationPlanner;
