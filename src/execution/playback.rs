//! Timed auto-play.
//!
//! The engine and the auto-play flag share one `parking_lot::Mutex`. The timer task takes it
//! with `try_lock` on every tick, so a tick that lands while a step is being applied elsewhere
//! is dropped rather than queued. A tick only advances when the flag is set, the run it was
//! started for is still current and the engine generation has not moved.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, trace, warn};
use parking_lot::{MappedMutexGuard, Mutex, MutexGuard};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::common::config::{DEFAULT_SPEED_MS, MAX_SPEED_MS, MIN_SPEED_MS, clamp_speed};
use crate::common::exception::{EngineError, PlaybackError};
use crate::execution::step_engine::{EngineStatus, StepEngine};

struct PlaybackState {
    engine: StepEngine,
    playing: bool,
    run: u64,
}

pub struct PlaybackController {
    shared: Arc<Mutex<PlaybackState>>,
    speed: Duration,
    task: Option<JoinHandle<()>>,
}

impl PlaybackController {
    pub fn new(engine: StepEngine) -> Self {
        Self {
            shared: Arc::new(Mutex::new(PlaybackState {
                engine,
                playing: false,
                run: 0,
            })),
            speed: Duration::from_millis(DEFAULT_SPEED_MS),
            task: None,
        }
    }

    /// Locks the engine. Hold the guard briefly; the timer skips ticks while it is held.
    pub fn engine(&self) -> MappedMutexGuard<'_, StepEngine> {
        MutexGuard::map(self.shared.lock(), |state| &mut state.engine)
    }

    pub fn speed(&self) -> Duration {
        self.speed
    }

    pub fn is_playing(&self) -> bool {
        self.shared.lock().playing
    }

    /// Sets the delay between steps, clamped to the supported range. A running timer is
    /// restarted with the new period.
    pub fn set_speed(&mut self, speed_ms: u64) -> Result<Duration, PlaybackError> {
        let speed = clamp_speed(speed_ms);
        if speed.as_millis() != u128::from(speed_ms) {
            warn!(
                "Speed {} ms is outside {}..={} ms, using {} ms",
                speed_ms,
                MIN_SPEED_MS,
                MAX_SPEED_MS,
                speed.as_millis()
            );
        }
        self.speed = speed;

        if self.is_playing() {
            self.start()?;
        }
        Ok(speed)
    }

    /// Starts advancing the loaded operation once per period, first tick one period from now.
    pub fn start(&mut self) -> Result<(), PlaybackError> {
        let handle = Handle::try_current().map_err(|_| PlaybackError::NoRuntime)?;
        self.stop_task();

        let (run, generation) = {
            let mut state = self.shared.lock();
            match state.engine.status() {
                EngineStatus::Running => {}
                EngineStatus::Idle => return Err(EngineError::EngineIdle.into()),
                EngineStatus::Completed | EngineStatus::Failed => {
                    return Err(EngineError::EngineCompleted.into());
                }
            }
            state.playing = true;
            state.run += 1;
            (state.run, state.engine.generation())
        };

        info!(
            "Auto-play started, one step every {} ms",
            self.speed.as_millis()
        );
        let shared = Arc::clone(&self.shared);
        let period = self.speed;

        self.task = Some(handle.spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;

                let Some(mut state) = shared.try_lock() else {
                    trace!("Tick skipped, engine busy");
                    continue;
                };
                if !state.playing || state.run != run || state.engine.generation() != generation
                {
                    debug!("Auto-play run {} is no longer current", run);
                    if state.run == run {
                        state.playing = false;
                    }
                    break;
                }
                if !state.engine.is_running() {
                    debug!("Operation already finished, auto-play stops");
                    state.playing = false;
                    break;
                }

                match state.engine.advance() {
                    Ok(result) if result.done => {
                        state.playing = false;
                        info!("Auto-play finished");
                        break;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!("Auto-play stopped: {}", e);
                        state.playing = false;
                        break;
                    }
                }
            }
        }));
        Ok(())
    }

    pub fn pause(&mut self) {
        if self.is_playing() {
            info!("Auto-play paused");
        }
        self.cancel();
    }

    /// Stops the timer. Once this returns the timer can no longer apply a step.
    pub fn cancel(&mut self) {
        let mut state = self.shared.lock();
        state.playing = false;
        state.run += 1;
        if let Some(task) = self.task.take() {
            task.abort();
        }
        drop(state);
    }

    fn stop_task(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    /// Waits for the current timer task to end on its own (completion, reset or failure).
    pub async fn finished(&mut self) {
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        self.stop_task();
    }
}
