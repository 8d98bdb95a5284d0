pub mod listener;
pub mod playback;
pub mod session;
pub mod step_engine;

pub use listener::{StepEvent, StepListener};
pub use playback::PlaybackController;
pub use session::Session;
pub use step_engine::{EngineStatus, SnapshotView, StepEngine, StepResult};
