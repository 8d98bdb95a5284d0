//! Step plans for open-addressing tables.
//!
//! All three operations share one probe loop:
//!
//! | Slot at `p`   | insert                      | search / delete          |
//! |---------------|-----------------------------|--------------------------|
//! | `Empty`       | write here (or tombstone)   | stop, `NotFound`         |
//! | `Occupied(k)` | collision, advance          | match                    |
//! | `Occupied(x)` | collision, advance          | advance                  |
//! | `Tombstone`   | remember first, advance     | advance                  |
//!
//! An advance step is only emitted while the sequence still has positions left; the terminal
//! step after exhaustion reports `TableFull` or `NotFound{ProbeExhausted}`.

use crate::common::config::{Key, Position};
use crate::container::hash_function::HashFunction;
use crate::container::open_table::OpenTable;
use crate::container::probe_sequence::{ProbeSequence, ProbeStrategy};
use crate::container::slot::Slot;
use crate::planner::plan::{Highlight, NotFoundReason, Outcome, Step, StepAction};
use crate::planner::pseudocode::{open_delete, open_insert, open_search};

/// Line numbers of the listing that a probe loop walks through.
struct LoopLines {
    hash: usize,
    init: usize,
    advance: usize,
}

const INSERT_LINES: LoopLines = LoopLines {
    hash: open_insert::HASH,
    init: open_insert::INIT,
    advance: open_insert::ADVANCE,
};

const SEARCH_LINES: LoopLines = LoopLines {
    hash: open_search::HASH,
    init: open_search::INIT,
    advance: open_search::ADVANCE,
};

const DELETE_LINES: LoopLines = LoopLines {
    hash: open_delete::HASH,
    init: open_delete::INIT,
    advance: open_delete::ADVANCE,
};

/// Opening steps: the home hash, plus the jump size under double hashing.
fn opening_steps(table: &OpenTable, key: Key, seq: &ProbeSequence, lines: &LoopLines) -> Vec<Step> {
    let capacity = table.capacity();
    let mut steps = vec![Step::observe(
        format!(
            "hash({}) = {} % {} = {}",
            key,
            key,
            capacity,
            seq.home()
        ),
        Highlight::Slot(seq.home()),
        lines.hash,
    )];

    if let Some(jump) = seq.step() {
        let modulus = HashFunction::new(capacity).step_modulus();
        steps.push(Step::observe(
            format!(
                "step({}) = {} - ({} % {}) = jump size {}",
                key, modulus, key, modulus, jump
            ),
            Highlight::Slot(seq.home()),
            lines.init,
        ));
    }

    steps
}

/// The "collision, advance" step, or nothing when the run has no positions left.
fn advance_step(seq: &ProbeSequence, lines: &LoopLines) -> Option<Step> {
    if seq.attempts() >= seq.limit() {
        return None;
    }
    let attempt = seq.attempts();
    let next = seq.position_at(attempt);
    let formula = match seq.strategy() {
        ProbeStrategy::Linear => format!("({} + {})", seq.home(), attempt),
        ProbeStrategy::Quadratic => format!("({} + {}²)", seq.home(), attempt),
        _ => format!(
            "({} + {}·{})",
            seq.home(),
            attempt,
            seq.step().unwrap_or(1)
        ),
    };
    Some(Step::observe(
        format!(
            "collision, advance attempt to {}: pos = {} % size = {}",
            attempt, formula, next
        ),
        Highlight::Slot(next),
        lines.advance,
    ))
}

fn describe_slot(slot: Slot) -> String {
    match slot {
        Slot::Empty => "empty".to_string(),
        Slot::Occupied(k) => format!("occupied by {}", k),
        Slot::Tombstone => "a tombstone".to_string(),
    }
}

/// Insert `key`. Tombstones are probed past, and the first one passed is reused as the target.
pub fn plan_insert(table: &OpenTable, key: Key) -> Vec<Step> {
    let mut seq = table.probe_sequence(key);
    let mut steps = opening_steps(table, key, &seq, &INSERT_LINES);
    let mut first_tombstone: Option<Position> = None;

    let write = |target: Position, probes: usize| {
        Step::observe(
            format!("table[{}] = {}", target, key),
            Highlight::Slot(target),
            open_insert::WRITE,
        )
        .with_action(StepAction::WriteSlot {
            position: target,
            slot: Slot::Occupied(key),
        })
        .with_outcome(Outcome::Inserted {
            position: target,
            probes,
        })
    };

    loop {
        let probe = match seq.next_probe() {
            Ok(probe) => probe,
            Err(exhausted) => {
                match first_tombstone {
                    Some(target) => steps.push(write(target, exhausted.attempts)),
                    None => steps.push(
                        Step::observe(
                            "operation failed: table full",
                            Highlight::None,
                            open_insert::FULL,
                        )
                        .with_outcome(Outcome::TableFull {
                            probes: exhausted.attempts,
                        }),
                    ),
                }
                return steps;
            }
        };

        let position = probe.position;
        let slot = table.slot(position).unwrap_or_default();
        let probes = probe.attempt + 1;

        match slot {
            Slot::Empty => {
                steps.push(Step::observe(
                    format!("check position {}: empty", position),
                    Highlight::Slot(position),
                    open_insert::LOOP,
                ));
                steps.push(write(first_tombstone.unwrap_or(position), probes));
                return steps;
            }
            Slot::Tombstone if first_tombstone.is_none() => {
                first_tombstone = Some(position);
                steps.push(Step::observe(
                    format!(
                        "check position {}: a tombstone, remember it as the insert target",
                        position
                    ),
                    Highlight::Slot(position),
                    open_insert::TOMBSTONE,
                ));
            }
            other => {
                steps.push(Step::observe(
                    format!("check position {}: {}", position, describe_slot(other)),
                    Highlight::Slot(position),
                    open_insert::LOOP,
                ));
            }
        }

        if let Some(step) = advance_step(&seq, &INSERT_LINES) {
            steps.push(step);
        }
    }
}

/// Search for `key`, stopping at the first empty slot.
pub fn plan_search(table: &OpenTable, key: Key) -> Vec<Step> {
    let mut seq = table.probe_sequence(key);
    let mut steps = opening_steps(table, key, &seq, &SEARCH_LINES);

    loop {
        let probe = match seq.next_probe() {
            Ok(probe) => probe,
            Err(exhausted) => {
                steps.push(
                    Step::observe(
                        "operation failed: key not found",
                        Highlight::None,
                        open_search::NOT_FOUND,
                    )
                    .with_outcome(Outcome::NotFound {
                        reason: NotFoundReason::ProbeExhausted,
                        probes: exhausted.attempts,
                    }),
                );
                return steps;
            }
        };

        let position = probe.position;
        let probes = probe.attempt + 1;
        match table.slot(position).unwrap_or_default() {
            Slot::Empty => {
                steps.push(
                    Step::observe(
                        format!("check position {}: empty, {} is not in the table", position, key),
                        Highlight::Slot(position),
                        open_search::NOT_FOUND,
                    )
                    .with_outcome(Outcome::NotFound {
                        reason: NotFoundReason::EmptySlot,
                        probes,
                    }),
                );
                return steps;
            }
            slot if slot.holds(key) => {
                steps.push(
                    Step::observe(
                        format!("check position {}: found {}", position, key),
                        Highlight::Slot(position),
                        open_search::MATCH,
                    )
                    .with_outcome(Outcome::Found { position, probes }),
                );
                return steps;
            }
            other => steps.push(Step::observe(
                format!("check position {}: {}", position, describe_slot(other)),
                Highlight::Slot(position),
                open_search::LOOP,
            )),
        }

        if let Some(step) = advance_step(&seq, &SEARCH_LINES) {
            steps.push(step);
        }
    }
}

/// Delete `key` by leaving a tombstone in its slot.
pub fn plan_delete(table: &OpenTable, key: Key) -> Vec<Step> {
    let mut seq = table.probe_sequence(key);
    let mut steps = opening_steps(table, key, &seq, &DELETE_LINES);

    loop {
        let probe = match seq.next_probe() {
            Ok(probe) => probe,
            Err(exhausted) => {
                steps.push(
                    Step::observe(
                        "operation failed: key not found",
                        Highlight::None,
                        open_delete::NOT_FOUND,
                    )
                    .with_outcome(Outcome::NotFound {
                        reason: NotFoundReason::ProbeExhausted,
                        probes: exhausted.attempts,
                    }),
                );
                return steps;
            }
        };

        let position = probe.position;
        let probes = probe.attempt + 1;
        match table.slot(position).unwrap_or_default() {
            Slot::Empty => {
                steps.push(
                    Step::observe(
                        format!("check position {}: empty, {} is not in the table", position, key),
                        Highlight::Slot(position),
                        open_delete::NOT_FOUND,
                    )
                    .with_outcome(Outcome::NotFound {
                        reason: NotFoundReason::EmptySlot,
                        probes,
                    }),
                );
                return steps;
            }
            slot if slot.holds(key) => {
                steps.push(Step::observe(
                    format!("check position {}: found {}", position, key),
                    Highlight::Slot(position),
                    open_delete::MATCH,
                ));
                steps.push(
                    Step::observe(
                        format!("table[{}] = DELETED", position),
                        Highlight::Slot(position),
                        open_delete::MARK,
                    )
                    .with_action(StepAction::WriteSlot {
                        position,
                        slot: Slot::Tombstone,
                    })
                    .with_outcome(Outcome::Deleted { position, probes }),
                );
                return steps;
            }
            other => steps.push(Step::observe(
                format!("check position {}: {}", position, describe_slot(other)),
                Highlight::Slot(position),
                open_delete::LOOP,
            )),
        }

        if let Some(step) = advance_step(&seq, &DELETE_LINES) {
            steps.push(step);
        }
    }
}
