use std::time::Duration;

use dsa_stepper::container::presets::Preset;
use dsa_stepper::container::structure::StructureKind;
use dsa_stepper::execution::session::Session;
use dsa_stepper::execution::step_engine::EngineStatus;
use dsa_stepper::planner::operation::{OperationKind, OperationParams};
use tokio::time;

use crate::assert_ok;
use crate::common::logger::init_test_logger;

fn auto_traverse(speed_ms: u64) -> (Session, usize) {
    let mut session = Session::new(assert_ok!(Preset::ArrayTraverse.build()));
    assert_ok!(session.set_auto_play(true, speed_ms));
    let plan = assert_ok!(session.start_operation(
        OperationKind::Traverse,
        StructureKind::Array,
        OperationParams::None,
    ));
    (session, plan.len())
}

#[tokio::test(start_paused = true)]
async fn one_step_per_period() {
    init_test_logger();
    let (session, _) = auto_traverse(200);

    time::sleep(Duration::from_millis(100)).await;
    assert_eq!(session.snapshot().cursor, Some(0));

    time::sleep(Duration::from_millis(200)).await;
    assert_eq!(session.snapshot().cursor, Some(1));

    time::sleep(Duration::from_millis(400)).await;
    assert_eq!(session.snapshot().cursor, Some(3));
}

#[tokio::test(start_paused = true)]
async fn auto_play_stops_at_completion() {
    init_test_logger();
    let (mut session, len) = auto_traverse(100);
    session.wait_for_playback().await;

    let view = session.snapshot();
    assert_eq!(view.cursor, Some(len));
    assert_eq!(view.status, EngineStatus::Completed);
    assert!(!session.is_playing());

    // Nothing else happens once finished.
    time::sleep(Duration::from_millis(1000)).await;
    assert_eq!(session.snapshot(), view);
}

#[tokio::test(start_paused = true)]
async fn no_steps_after_auto_play_is_turned_off() {
    init_test_logger();
    let (mut session, _) = auto_traverse(100);
    time::sleep(Duration::from_millis(250)).await;

    assert_ok!(session.set_auto_play(false, 100));
    let cursor = session.snapshot().cursor;
    assert_eq!(cursor, Some(2));

    time::sleep(Duration::from_millis(1000)).await;
    assert_eq!(session.snapshot().cursor, cursor);
    assert!(!session.is_playing());
}

#[tokio::test(start_paused = true)]
async fn reset_cancels_auto_play() {
    init_test_logger();
    let (mut session, _) = auto_traverse(100);
    time::sleep(Duration::from_millis(150)).await;

    session.reset();
    assert!(!session.is_playing());
    time::sleep(Duration::from_millis(1000)).await;

    let view = session.snapshot();
    assert_eq!(view.status, EngineStatus::Idle);
    assert_eq!(view.cursor, None);
    assert_eq!(view.structure, assert_ok!(Preset::ArrayTraverse.build()));
}

#[tokio::test(start_paused = true)]
async fn manual_step_during_auto_play() {
    init_test_logger();
    let (mut session, _) = auto_traverse(100);

    assert_ok!(session.advance());
    time::sleep(Duration::from_millis(150)).await;
    assert_eq!(session.snapshot().cursor, Some(2));
}

#[tokio::test(start_paused = true)]
async fn step_back_pauses_auto_play() {
    init_test_logger();
    let (mut session, _) = auto_traverse(100);
    time::sleep(Duration::from_millis(250)).await;

    let view = assert_ok!(session.step_back());
    assert_eq!(view.cursor, Some(1));
    assert!(!session.is_playing());

    time::sleep(Duration::from_millis(500)).await;
    assert_eq!(session.snapshot().cursor, Some(1));
}
