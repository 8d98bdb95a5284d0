use log::{debug, info, warn};

use crate::common::config::StepperConfig;
use crate::common::exception::{EngineError, PlaybackError, SessionError};
use crate::container::structure::{Structure, StructureKind};
use crate::execution::listener::StepListener;
use crate::execution::playback::PlaybackController;
use crate::execution::step_engine::{SnapshotView, StepEngine, StepResult};
use crate::planner::operation::{OperationKind, OperationParams};
use crate::planner::plan::OperationPlan;
use crate::planner::planner::OperationPlanner;
use crate::planner::pseudocode::{CodeLine, listing};

/// One user's stepping session over a single structure.
pub struct Session {
    planner: OperationPlanner,
    playback: PlaybackController,
    auto_play: bool,
}

impl Session {
    pub fn new(structure: Structure) -> Self {
        Self {
            planner: OperationPlanner::new(),
            playback: PlaybackController::new(StepEngine::new(structure)),
            auto_play: false,
        }
    }

    /// Builds an empty structure of `kind` sized from the config.
    pub fn from_config(config: &StepperConfig, kind: StructureKind) -> Result<Self, SessionError> {
        let size = config.size_for(kind);
        let structure = Structure::empty(kind, size)?;
        let mut session = Self::new(structure);
        session.planner.set_detailed_logging(config.log_level == "trace");
        // Only fails when playing, which a fresh session is not.
        let _ = session.playback.set_speed(config.speed_ms);
        Ok(session)
    }

    pub fn structure_kind(&self) -> StructureKind {
        self.playback.engine().structure().kind()
    }

    /// Plans `kind` against the current snapshot and loads it. Starts the timer when auto-play
    /// is on.
    pub fn start_operation(
        &mut self,
        kind: OperationKind,
        structure: StructureKind,
        params: OperationParams,
    ) -> Result<OperationPlan, SessionError> {
        let plan = {
            let mut engine = self.playback.engine();
            if engine.is_running() {
                return Err(EngineError::OperationInProgress.into());
            }
            let plan = self
                .planner
                .create_plan(engine.structure(), kind, structure, params)?;
            engine.load(plan.clone())?;
            plan
        };

        info!("Started {} ({} steps)", plan, plan.len());
        if self.auto_play {
            if let Err(e) = self.playback.start() {
                debug!("Auto-play not started: {}", e);
            }
        }
        Ok(plan)
    }

    pub fn advance(&mut self) -> Result<StepResult, EngineError> {
        self.playback.engine().advance()
    }

    /// Steps back one step. Stops auto-play first.
    pub fn step_back(&mut self) -> Result<SnapshotView, EngineError> {
        self.playback.pause();
        self.playback.engine().step_back()
    }

    /// Back to idle with the pre-operation snapshot restored. Stops auto-play.
    pub fn reset(&mut self) {
        self.playback.cancel();
        self.playback.engine().reset();
    }

    /// Turns timed playback on or off. When on and an operation is running, the timer starts
    /// immediately; otherwise it starts with the next operation.
    pub fn set_auto_play(&mut self, enabled: bool, speed_ms: u64) -> Result<(), PlaybackError> {
        self.playback.set_speed(speed_ms)?;
        self.auto_play = enabled;

        if !enabled {
            self.playback.pause();
            return Ok(());
        }
        let running = self.playback.engine().is_running();
        if running && !self.playback.is_playing() {
            self.playback.start()?;
        }
        Ok(())
    }

    pub fn is_playing(&self) -> bool {
        self.playback.is_playing()
    }

    pub fn auto_play(&self) -> bool {
        self.auto_play
    }

    pub fn speed_ms(&self) -> u64 {
        self.playback.speed().as_millis() as u64
    }

    pub fn snapshot(&self) -> SnapshotView {
        self.playback.engine().snapshot()
    }

    pub fn add_listener(&mut self, listener: Box<dyn StepListener>) {
        self.playback.engine().add_listener(listener);
    }

    /// Swaps in a new structure, e.g. a preset. Refused while an operation is running.
    pub fn replace_structure(&mut self, structure: Structure) -> Result<(), EngineError> {
        let running = self.playback.engine().is_running();
        if running {
            warn!("Structure not replaced, an operation is still running");
            return Err(EngineError::OperationInProgress);
        }
        self.playback.cancel();
        self.playback.engine().replace_structure(structure)
    }

    /// Listing of the loaded operation.
    pub fn listing(&self) -> Option<Vec<CodeLine>> {
        let engine = self.playback.engine();
        engine
            .plan()
            .map(|plan| listing(plan.structure_kind(), plan.kind()))
    }

    /// Waits until auto-play stops by itself.
    pub async fn wait_for_playback(&mut self) {
        self.playback.finished().await;
    }
}
