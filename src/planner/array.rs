//! Step plans for the fixed-capacity array.
//!
//! Insert and delete validate before producing any step, so an invalid request never yields a
//! partial shift.

use crate::common::config::{Key, Position};
use crate::common::exception::PlanError;
use crate::container::fixed_array::FixedArray;
use crate::planner::plan::{Highlight, NotFoundReason, Outcome, Step, StepAction};
use crate::planner::pseudocode::{array_delete, array_insert, array_search, array_traverse};

/// Shift-insert `value` at `index`, moving `arr[index..len]` one cell right.
pub fn plan_insert(arr: &FixedArray, index: Position, value: Key) -> Result<Vec<Step>, PlanError> {
    let len = arr.len();
    if arr.is_full() {
        return Err(PlanError::Overflow {
            capacity: arr.capacity(),
        });
    }
    if index > len {
        return Err(PlanError::InvalidIndex { index, len });
    }

    let mut steps = vec![Step::observe(
        format!(
            "capacity check passed: size {} < capacity {}",
            len,
            arr.capacity()
        ),
        Highlight::None,
        array_insert::CHECK,
    )];

    for i in (index..len).rev() {
        steps.push(
            Step::observe(
                format!("arr[{}] = arr[{}]", i + 1, i),
                Highlight::Slots(vec![i, i + 1]),
                array_insert::SHIFT,
            )
            .with_action(StepAction::ShiftCell { from: i, to: i + 1 }),
        );
    }

    steps.push(
        Step::observe(
            format!("arr[{}] = {}", index, value),
            Highlight::Slot(index),
            array_insert::WRITE,
        )
        .with_action(StepAction::WriteCell { index, value }),
    );
    steps.push(
        Step::observe(
            format!("size++ (size is now {})", len + 1),
            Highlight::Slot(index),
            array_insert::GROW,
        )
        .with_action(StepAction::GrowLength)
        .with_outcome(Outcome::Inserted {
            position: index,
            probes: len - index,
        }),
    );

    Ok(steps)
}

/// Shift-delete the value at `index`, moving `arr[index+1..len]` one cell left.
pub fn plan_delete(arr: &FixedArray, index: Position) -> Result<Vec<Step>, PlanError> {
    let len = arr.len();
    let target = match arr.get(index) {
        Some(value) if index < len => value,
        _ => return Err(PlanError::InvalidIndex { index, len }),
    };

    let mut steps = vec![Step::observe(
        format!("target arr[{}] = {}", index, target),
        Highlight::Slot(index),
        array_delete::TARGET,
    )];

    for i in index..len - 1 {
        steps.push(
            Step::observe(
                format!("arr[{}] = arr[{}]", i, i + 1),
                Highlight::Slots(vec![i, i + 1]),
                array_delete::SHIFT,
            )
            .with_action(StepAction::ShiftCell { from: i + 1, to: i }),
        );
    }

    steps.push(
        Step::observe(
            format!("arr[{}] = EMPTY", len - 1),
            Highlight::Slot(len - 1),
            array_delete::CLEAR,
        )
        .with_action(StepAction::ClearCell { index: len - 1 }),
    );
    steps.push(
        Step::observe(
            format!("size-- (size is now {})", len - 1),
            Highlight::None,
            array_delete::SHRINK,
        )
        .with_action(StepAction::ShrinkLength)
        .with_outcome(Outcome::Deleted {
            position: index,
            probes: len - 1 - index,
        }),
    );

    Ok(steps)
}

/// Linear scan for `key`.
pub fn plan_search(arr: &FixedArray, key: Key) -> Vec<Step> {
    let mut steps = Vec::with_capacity(arr.len() + 1);

    for (i, value) in arr.values().into_iter().enumerate() {
        if value == key {
            steps.push(
                Step::observe(
                    format!("compare arr[{}] = {} with {}: found at index {}", i, value, key, i),
                    Highlight::Slot(i),
                    array_search::FOUND,
                )
                .with_outcome(Outcome::Found {
                    position: i,
                    probes: i + 1,
                }),
            );
            return steps;
        }
        steps.push(Step::observe(
            format!("compare arr[{}] = {} with {}", i, value, key),
            Highlight::Slot(i),
            array_search::COMPARE,
        ));
    }

    steps.push(
        Step::observe(
            format!("reached the end of the array: {} not found", key),
            Highlight::None,
            array_search::NOT_FOUND,
        )
        .with_outcome(Outcome::NotFound {
            reason: NotFoundReason::EndOfArray,
            probes: arr.len(),
        }),
    );
    steps
}

/// Visit every element, accumulating a running sum, then compute the average.
pub fn plan_traverse(arr: &FixedArray) -> Vec<Step> {
    let values = arr.values();
    let mut steps = vec![Step::observe(
        "initialise sum = 0",
        Highlight::None,
        array_traverse::INIT,
    )];

    let mut sum: u64 = 0;
    for (i, &value) in values.iter().enumerate() {
        steps.push(Step::observe(
            format!("access arr[{}] = {}", i, value),
            Highlight::Slot(i),
            array_traverse::VISIT,
        ));
        sum += u64::from(value);
        steps.push(Step::observe(
            format!("add to sum: sum = {}", sum),
            Highlight::Slot(i),
            array_traverse::ADD,
        ));
    }

    let count = values.len();
    let description = if count == 0 {
        "array is empty: sum 0, no average".to_string()
    } else {
        format!(
            "compute average: {} / {} = {:.2}",
            sum,
            count,
            sum as f64 / count as f64
        )
    };
    steps.push(
        Step::observe(description, Highlight::None, array_traverse::AVERAGE)
            .with_outcome(Outcome::Traversed { sum, count }),
    );
    steps
}
