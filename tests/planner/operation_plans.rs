use dsa_stepper::common::exception::{PlanError, SessionError};
use dsa_stepper::container::fixed_array::FixedArray;
use dsa_stepper::container::open_table::OpenTable;
use dsa_stepper::container::presets::Preset;
use dsa_stepper::container::probe_sequence::ProbeStrategy;
use dsa_stepper::container::slot::Slot;
use dsa_stepper::container::structure::{Structure, StructureKind};
use dsa_stepper::execution::session::Session;
use dsa_stepper::execution::step_engine::StepResult;
use dsa_stepper::planner::operation::{OperationKind, OperationParams};
use dsa_stepper::planner::plan::{NotFoundReason, OperationPlan, Outcome};
use dsa_stepper::planner::planner::OperationPlanner;
use dsa_stepper::planner::pseudocode::listing;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::common::logger::init_test_logger;
use crate::{assert_err, assert_ok};

fn run(session: &mut Session, kind: OperationKind, params: OperationParams) -> Vec<StepResult> {
    let structure = session.structure_kind();
    let plan = assert_ok!(session.start_operation(kind, structure, params));
    (0..plan.len())
        .map(|_| assert_ok!(session.advance()))
        .collect()
}

fn outcome(results: &[StepResult]) -> Option<Outcome> {
    results.last().and_then(|r| r.outcome)
}

fn open_session(keys: &[Option<u32>], strategy: ProbeStrategy) -> Session {
    Session::new(OpenTable::from_keys(keys, strategy).unwrap().into())
}

#[test]
fn linear_insert_lands_in_home_slot() {
    init_test_logger();
    let mut session = open_session(
        &[Some(7), Some(14), Some(21), None, None, None, None],
        ProbeStrategy::Linear,
    );
    let results = run(&mut session, OperationKind::Insert, OperationParams::Key(5));

    assert_eq!(
        session.snapshot().structure.to_string(),
        "[7, 14, 21, _, _, 5, _]"
    );
    assert!(results.last().unwrap().done);
    assert!(results[0].description.contains("hash(5)"));
}

#[test]
fn quadratic_insert_into_mostly_empty_table() {
    init_test_logger();
    let mut session = open_session(
        &[Some(7), None, None, None, None, None, None],
        ProbeStrategy::Quadratic,
    );
    let results = run(&mut session, OperationKind::Insert, OperationParams::Key(12));
    assert_eq!(
        outcome(&results),
        Some(Outcome::Inserted {
            position: 5,
            probes: 1
        })
    );
}

#[test]
fn chaining_inserts_at_head() {
    init_test_logger();
    let mut session = Session::new(
        Structure::empty(StructureKind::Table(ProbeStrategy::Chaining), 5).unwrap(),
    );
    run(&mut session, OperationKind::Insert, OperationParams::Key(10));
    run(&mut session, OperationKind::Insert, OperationParams::Key(5));

    let view = session.snapshot();
    assert_eq!(view.structure.as_chained().unwrap().bucket(0), Some(&[5, 10][..]));
}

#[test]
fn insert_then_search_round_trip() {
    init_test_logger();
    let mut rng = StdRng::seed_from_u64(42);
    let mut pool: Vec<u32> = (0..500).collect();

    for strategy in [
        ProbeStrategy::Linear,
        ProbeStrategy::Quadratic,
        ProbeStrategy::Double,
    ] {
        pool.shuffle(&mut rng);
        let mut session = Session::new(OpenTable::new(11, strategy).unwrap().into());
        let mut placed = Vec::new();

        for &key in pool.iter().take(8) {
            let results = run(&mut session, OperationKind::Insert, OperationParams::Key(key));
            if let Some(Outcome::Inserted { position, .. }) = outcome(&results) {
                placed.push((key, position));
            }
        }
        assert!(!placed.is_empty());

        for (key, position) in placed {
            let results = run(&mut session, OperationKind::Search, OperationParams::Key(key));
            match outcome(&results) {
                Some(Outcome::Found { position: found, .. }) => {
                    assert_eq!(found, position, "{} key {}", strategy, key)
                }
                other => panic!("{} key {}: {:?}", strategy, key, other),
            }
        }
    }
}

#[test]
fn deleted_key_is_not_found_but_leaves_tombstone() {
    init_test_logger();
    let mut session = Session::new(OpenTable::new(7, ProbeStrategy::Double).unwrap().into());
    let inserted = run(&mut session, OperationKind::Insert, OperationParams::Key(10));
    let Some(Outcome::Inserted { position, .. }) = outcome(&inserted) else {
        panic!("insert failed");
    };

    run(&mut session, OperationKind::Delete, OperationParams::Key(10));
    let searched = run(&mut session, OperationKind::Search, OperationParams::Key(10));

    assert!(matches!(outcome(&searched), Some(Outcome::NotFound { .. })));
    let view = session.snapshot();
    assert_eq!(
        view.structure.as_open().unwrap().slot(position),
        Some(Slot::Tombstone)
    );
}

#[test]
fn tombstone_is_reused_by_later_insert() {
    init_test_logger();
    let mut session = Session::new(Preset::LinearDelete.build().unwrap());
    run(&mut session, OperationKind::Delete, OperationParams::Key(12));
    // 19 hashes to 5, where 12 used to be.
    let results = run(&mut session, OperationKind::Insert, OperationParams::Key(19));

    assert_eq!(
        outcome(&results),
        Some(Outcome::Inserted {
            position: 5,
            probes: 6
        })
    );
    // 5 is still reachable past the reused slot.
    let found = run(&mut session, OperationKind::Search, OperationParams::Key(5));
    assert_eq!(
        outcome(&found),
        Some(Outcome::Found {
            position: 6,
            probes: 2
        })
    );
}

#[test]
fn search_stops_at_empty_slot() {
    init_test_logger();
    let mut session = Session::new(Preset::LinearSearch.build().unwrap());
    let results = run(&mut session, OperationKind::Search, OperationParams::Key(12));
    assert_eq!(
        outcome(&results),
        Some(Outcome::NotFound {
            reason: NotFoundReason::EmptySlot,
            probes: 2
        })
    );
}

#[test]
fn array_shifts_preserve_order() {
    init_test_logger();
    let mut session = Session::new(Preset::ArrayDelete.build().unwrap());

    run(
        &mut session,
        OperationKind::Delete,
        OperationParams::DeleteAt { index: 2 },
    );
    let arr = session.snapshot().structure.as_array().unwrap().clone();
    assert_eq!(arr.values(), vec![10, 20, 40, 50, 60, 70]);
    assert_eq!(arr.get(6), None);

    run(
        &mut session,
        OperationKind::Insert,
        OperationParams::InsertAt { index: 0, value: 5 },
    );
    let arr = session.snapshot().structure.as_array().unwrap().clone();
    assert_eq!(arr.values(), vec![5, 10, 20, 40, 50, 60, 70]);
    assert_eq!(arr.len(), 7);
}

#[test]
fn invalid_array_requests_leave_structure_untouched() {
    init_test_logger();
    let before = FixedArray::from_values(3, &[1, 2, 3]).unwrap();
    let mut session = Session::new(before.clone().into());

    let err = session.start_operation(
        OperationKind::Insert,
        StructureKind::Array,
        OperationParams::InsertAt { index: 0, value: 9 },
    );
    assert_eq!(err, Err(SessionError::Plan(PlanError::Overflow { capacity: 3 })));

    assert_err!(session.start_operation(
        OperationKind::Delete,
        StructureKind::Array,
        OperationParams::DeleteAt { index: 3 },
    ));
    assert_eq!(session.snapshot().structure, Structure::Array(before));
}

#[test]
fn every_plan_has_one_terminal_outcome_and_valid_code_lines() {
    init_test_logger();
    let planner = OperationPlanner::new();
    let requests = [
        (Preset::LinearDelete, OperationKind::Delete, OperationParams::Key(5)),
        (Preset::LinearSearch, OperationKind::Search, OperationParams::Key(28)),
        (Preset::QuadraticSearch, OperationKind::Search, OperationParams::Key(21)),
        (Preset::DoubleInsert, OperationKind::Insert, OperationParams::Key(10)),
        (Preset::ChainingDelete, OperationKind::Delete, OperationParams::Key(11)),
        (Preset::ChainingDelete, OperationKind::Search, OperationParams::Key(2)),
        (
            Preset::ArrayInsert,
            OperationKind::Insert,
            OperationParams::InsertAt { index: 3, value: 35 },
        ),
        (
            Preset::ArrayDelete,
            OperationKind::Delete,
            OperationParams::DeleteAt { index: 0 },
        ),
        (Preset::ArraySearch, OperationKind::Search, OperationParams::Key(31)),
        (Preset::ArrayTraverse, OperationKind::Traverse, OperationParams::None),
    ];

    for (preset, kind, params) in requests {
        let base = preset.build().unwrap();
        let plan: OperationPlan =
            assert_ok!(planner.create_plan(&base, kind, base.kind(), params));
        let code = listing(base.kind(), kind);

        let (last, rest) = plan.steps().split_last().unwrap();
        assert!(last.outcome().is_some(), "{} {}", preset, kind);
        assert!(rest.iter().all(|s| s.outcome().is_none()), "{} {}", preset, kind);
        assert!(
            plan.steps().iter().all(|s| s.code_line() < code.len()),
            "{} {}",
            preset,
            kind
        );
        assert_ok!(plan.final_snapshot());
    }
}
