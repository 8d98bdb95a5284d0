use std::sync::Arc;

use dsa_stepper::common::exception::{EngineError, SessionError};
use dsa_stepper::container::open_table::OpenTable;
use dsa_stepper::container::presets::Preset;
use dsa_stepper::container::probe_sequence::ProbeStrategy;
use dsa_stepper::container::structure::{Structure, StructureKind};
use dsa_stepper::execution::listener::StepEvent;
use dsa_stepper::execution::session::Session;
use dsa_stepper::execution::step_engine::{EngineStatus, StepEngine};
use dsa_stepper::planner::operation::{OperationKind, OperationParams};
use dsa_stepper::planner::planner::OperationPlanner;
use parking_lot::Mutex;

use crate::common::logger::init_test_logger;
use crate::common::temp_config::load_temp_config;
use crate::{assert_err, assert_ok};

fn linear_delete_session() -> (Session, usize) {
    let mut session = Session::new(assert_ok!(Preset::LinearDelete.build()));
    let plan = assert_ok!(session.start_operation(
        OperationKind::Delete,
        StructureKind::Table(ProbeStrategy::Linear),
        OperationParams::Key(5),
    ));
    (session, plan.len())
}

#[test]
fn reset_restores_pre_operation_snapshot() {
    init_test_logger();
    let before = assert_ok!(Preset::LinearDelete.build());
    let (mut session, len) = linear_delete_session();
    for _ in 0..len - 1 {
        assert_ok!(session.advance());
    }

    session.reset();
    let first = session.snapshot();
    session.reset();
    let second = session.snapshot();

    assert_eq!(first, second);
    assert_eq!(first.structure, before);
    assert_eq!(first.status, EngineStatus::Idle);
    assert_eq!(first.cursor, None);
}

#[test]
fn replay_after_reset_is_deterministic() {
    init_test_logger();
    let (mut session, len) = linear_delete_session();
    let first: Vec<_> = (0..len).map(|_| assert_ok!(session.advance())).collect();

    session.reset();
    assert_ok!(session.start_operation(
        OperationKind::Delete,
        StructureKind::Table(ProbeStrategy::Linear),
        OperationParams::Key(5),
    ));
    let second: Vec<_> = (0..len).map(|_| assert_ok!(session.advance())).collect();

    assert_eq!(first, second);
}

#[test]
fn step_back_matches_previous_step() {
    init_test_logger();
    let (mut session, len) = linear_delete_session();
    let mut views = vec![session.snapshot()];
    for _ in 0..len {
        assert_ok!(session.advance());
        views.push(session.snapshot());
    }

    for n in (1..=len).rev() {
        let view = assert_ok!(session.step_back());
        assert_eq!(view.cursor, Some(n - 1));
        assert_eq!(view.structure, views[n - 1].structure);
        assert_eq!(view.highlight, views[n - 1].highlight);
        assert_eq!(view.status, EngineStatus::Running);
    }

    // Already at the start.
    let view = assert_ok!(session.step_back());
    assert_eq!(view.cursor, Some(0));
}

#[test]
fn finished_operation_becomes_new_baseline() {
    init_test_logger();
    let (mut session, len) = linear_delete_session();
    for _ in 0..len {
        assert_ok!(session.advance());
    }
    let after_delete = session.snapshot().structure;

    assert_ok!(session.start_operation(
        OperationKind::Search,
        StructureKind::Table(ProbeStrategy::Linear),
        OperationParams::Key(7),
    ));
    session.reset();
    assert_eq!(session.snapshot().structure, after_delete);
}

#[test]
fn session_from_config_file() {
    init_test_logger();
    let config = load_temp_config("table_size = 11\nspeed_ms = 300\n");
    let session = assert_ok!(Session::from_config(
        &config,
        StructureKind::Table(ProbeStrategy::Quadratic)
    ));

    let view = session.snapshot();
    assert_eq!(view.structure.as_open().map(OpenTable::capacity), Some(11));
    assert_eq!(session.speed_ms(), 300);
    assert_eq!(view.status, EngineStatus::Idle);
}

#[test]
fn mismatched_structure_is_rejected() {
    init_test_logger();
    let mut session = Session::new(assert_ok!(Preset::ArraySearch.build()));
    let result = session.start_operation(
        OperationKind::Search,
        StructureKind::Table(ProbeStrategy::Linear),
        OperationParams::Key(7),
    );
    assert!(matches!(result, Err(SessionError::Plan(_))));
    assert_eq!(session.snapshot().status, EngineStatus::Idle);
}

#[test]
fn stale_plan_and_busy_engine_are_rejected() {
    init_test_logger();
    let planner = OperationPlanner::new();
    let base = assert_ok!(Preset::ArrayInsert.build());
    let mut engine = StepEngine::new(base.clone());

    let other = assert_ok!(Structure::empty(StructureKind::Array, 10));
    let stale = assert_ok!(planner.create_plan(
        &other,
        OperationKind::Traverse,
        StructureKind::Array,
        OperationParams::None,
    ));
    assert_eq!(engine.load(stale), Err(EngineError::StalePlan));

    let plan = assert_ok!(planner.create_plan(
        &base,
        OperationKind::Traverse,
        StructureKind::Array,
        OperationParams::None,
    ));
    assert_ok!(engine.load(plan.clone()));
    assert_eq!(engine.load(plan), Err(EngineError::OperationInProgress));
    assert_eq!(
        assert_err!(engine.replace_structure(other)),
        EngineError::OperationInProgress
    );
}

#[test]
fn listeners_see_every_state_change() {
    init_test_logger();
    let events: Arc<Mutex<Vec<StepEvent>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);

    let mut session = Session::new(assert_ok!(Preset::ArrayTraverse.build()));
    session.add_listener(Box::new(move |event: &StepEvent| {
        sink.lock().push(event.clone())
    }));

    let plan = assert_ok!(session.start_operation(
        OperationKind::Traverse,
        StructureKind::Array,
        OperationParams::None,
    ));
    assert_ok!(session.advance());
    assert_ok!(session.advance());
    assert_ok!(session.step_back());
    session.reset();

    let events = events.lock();
    assert_eq!(events.len(), 5);
    assert!(matches!(
        &events[0],
        StepEvent::Loaded { plan_len, .. } if *plan_len == plan.len()
    ));
    assert!(matches!(&events[1], StepEvent::Applied(r) if r.index == 0));
    assert!(matches!(&events[2], StepEvent::Applied(r) if r.index == 1));
    assert!(matches!(&events[3], StepEvent::SteppedBack(v) if v.cursor == Some(1)));
    assert!(matches!(&events[4], StepEvent::Reset { .. }));
}

#[test]
fn rejected_load_after_completion_keeps_reset_target() {
    init_test_logger();
    let planner = OperationPlanner::new();
    let before = assert_ok!(Preset::LinearDelete.build());
    let mut engine = StepEngine::new(before.clone());

    let plan = assert_ok!(planner.create_plan(
        &before,
        OperationKind::Delete,
        StructureKind::Table(ProbeStrategy::Linear),
        OperationParams::Key(5),
    ));
    assert_ok!(engine.load(plan.clone()));
    while engine.is_running() {
        assert_ok!(engine.advance());
    }

    assert_eq!(assert_err!(engine.load(plan)), EngineError::StalePlan);
    engine.reset();
    assert_eq!(engine.structure(), &before);
}
