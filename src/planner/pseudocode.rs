//! C-style listings shown beside each animation.
//!
//! Every step records the zero-based line it executes; the constants in the per-operation
//! submodules name those lines so planners never hard-code bare indices.

use crate::container::probe_sequence::ProbeStrategy;
use crate::container::structure::StructureKind;
use crate::planner::operation::OperationKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeLine {
    pub line: &'static str,
    pub desc: &'static str,
}

const fn cl(line: &'static str, desc: &'static str) -> CodeLine {
    CodeLine { line, desc }
}

pub mod open_insert {
    pub const HASH: usize = 0;
    pub const INIT: usize = 1;
    pub const LOOP: usize = 2;
    pub const TOMBSTONE: usize = 3;
    pub const ADVANCE: usize = 4;
    pub const FULL: usize = 6;
    pub const WRITE: usize = 7;
}

pub mod open_search {
    pub const HASH: usize = 0;
    pub const INIT: usize = 1;
    pub const LOOP: usize = 2;
    pub const MATCH: usize = 3;
    pub const ADVANCE: usize = 4;
    pub const NOT_FOUND: usize = 6;
}

pub mod open_delete {
    pub const HASH: usize = 0;
    pub const INIT: usize = 1;
    pub const LOOP: usize = 2;
    pub const MATCH: usize = 3;
    pub const MARK: usize = 4;
    pub const ADVANCE: usize = 7;
    pub const NOT_FOUND: usize = 9;
}

pub mod chain_insert {
    pub const HASH: usize = 0;
    pub const ALLOC: usize = 1;
    pub const LINK: usize = 2;
}

pub mod chain_search {
    pub const HASH: usize = 0;
    pub const HEAD: usize = 1;
    pub const MATCH: usize = 3;
    pub const NEXT: usize = 4;
    pub const NOT_FOUND: usize = 6;
}

pub mod chain_delete {
    pub const HASH: usize = 0;
    pub const HEAD: usize = 1;
    pub const MATCH: usize = 4;
    pub const UNLINK_HEAD: usize = 5;
    pub const UNLINK_AFTER: usize = 6;
    pub const FREE: usize = 7;
    pub const NEXT: usize = 9;
    pub const NOT_FOUND: usize = 11;
}

pub mod array_insert {
    pub const CHECK: usize = 0;
    pub const SHIFT: usize = 2;
    pub const WRITE: usize = 4;
    pub const GROW: usize = 5;
}

pub mod array_delete {
    pub const TARGET: usize = 0;
    pub const SHIFT: usize = 2;
    pub const CLEAR: usize = 4;
    pub const SHRINK: usize = 5;
}

pub mod array_search {
    pub const COMPARE: usize = 1;
    pub const FOUND: usize = 2;
    pub const NOT_FOUND: usize = 4;
}

pub mod array_traverse {
    pub const INIT: usize = 0;
    pub const VISIT: usize = 2;
    pub const ADD: usize = 3;
    pub const AVERAGE: usize = 5;
}

const HASH_LINE: CodeLine = cl("int pos = key % size;", "Calculate the home index.");

fn init_line(strategy: ProbeStrategy) -> CodeLine {
    match strategy {
        ProbeStrategy::Double => cl(
            "int i = 0, step = h2(key);",
            "Second hash gives the jump size.",
        ),
        _ => cl("int i = 0;", "Probe counter."),
    }
}

fn advance_line(strategy: ProbeStrategy) -> CodeLine {
    match strategy {
        ProbeStrategy::Linear => cl(
            "  i++; pos = (key + i) % size;",
            "Collision! Move to the next slot.",
        ),
        ProbeStrategy::Quadratic => cl(
            "  i++; pos = (key + i*i) % size;",
            "New position: (hash + i²) % size.",
        ),
        _ => cl(
            "  i++; pos = (key + i*step) % size;",
            "Jump by the step size.",
        ),
    }
}

fn open_listing(strategy: ProbeStrategy, kind: OperationKind) -> Vec<CodeLine> {
    match kind {
        OperationKind::Insert => vec![
            HASH_LINE,
            init_line(strategy),
            cl(
                "while (table[pos] != EMPTY && i < size) {",
                "Probe until an empty slot or every slot is tried.",
            ),
            cl(
                "  if (table[pos] == DELETED && target < 0) target = pos;",
                "Remember the first tombstone.",
            ),
            advance_line(strategy),
            cl("}", ""),
            cl(
                "if (table[pos] != EMPTY && target < 0) return TABLE_FULL;",
                "No free slot was reached.",
            ),
            cl(
                "table[target < 0 ? pos : target] = key;",
                "Insert the key into the chosen slot.",
            ),
        ],
        OperationKind::Search => vec![
            HASH_LINE,
            init_line(strategy),
            cl(
                "while (table[pos] != EMPTY && i < size) {",
                "Search until an empty slot is hit.",
            ),
            cl("  if (table[pos] == key) return pos;", "Match found! Return index."),
            advance_line(strategy),
            cl("}", ""),
            cl("return NOT_FOUND;", "Key is not in the table."),
        ],
        OperationKind::Delete | OperationKind::Traverse => vec![
            HASH_LINE,
            init_line(strategy),
            cl(
                "while (table[pos] != EMPTY && i < size) {",
                "Search until an empty slot is hit.",
            ),
            cl("  if (table[pos] == key) {", "Key found."),
            cl("    table[pos] = DELETED;", "Leave a tombstone so probing continues."),
            cl("    return SUCCESS;", ""),
            cl("  }", ""),
            advance_line(strategy),
            cl("}", ""),
            cl("return NOT_FOUND;", "Key is not in the table."),
        ],
    }
}

fn chain_listing(kind: OperationKind) -> Vec<CodeLine> {
    match kind {
        OperationKind::Insert => vec![
            cl("int idx = key % size;", "Find the bucket using the hash function."),
            cl("Node* newNode = new Node(key);", "Allocate a node for the key."),
            cl(
                "newNode->next = table[idx]; table[idx] = newNode;",
                "Link the node as the new head.",
            ),
        ],
        OperationKind::Search => vec![
            cl("int idx = key % size;", "Find the bucket using the hash function."),
            cl("Node* temp = table[idx];", "Start at the head of the chain."),
            cl("while (temp != NULL) {", "Walk the chain until the end."),
            cl("  if (temp->data == key) return FOUND;", "Key found in current node!"),
            cl("  temp = temp->next;", "Move to the next node."),
            cl("}", ""),
            cl("return NOT_FOUND;", "Reached the end of the chain."),
        ],
        OperationKind::Delete | OperationKind::Traverse => vec![
            cl("int idx = key % size;", "Find the bucket using the hash function."),
            cl("Node* temp = table[idx];", "Start at the head of the chain."),
            cl("Node* prev = NULL;", "Keep track of the previous node."),
            cl("while (temp != NULL) {", "Walk the chain until the end."),
            cl("  if (temp->data == key) {", "Key found in current node!"),
            cl(
                "    if (prev == NULL) table[idx] = temp->next;",
                "Case 1: delete the head node.",
            ),
            cl("    else prev->next = temp->next;", "Case 2: delete a later node."),
            cl("    delete temp; return SUCCESS;", "Free memory and return success."),
            cl("  }", ""),
            cl("  prev = temp; temp = temp->next;", "Move both pointers forward."),
            cl("}", ""),
            cl("return NOT_FOUND;", "Reached the end of the chain."),
        ],
    }
}

fn array_listing(kind: OperationKind) -> Vec<CodeLine> {
    match kind {
        OperationKind::Insert => vec![
            cl("if (size >= MAX) return OVERFLOW;", "Check for overflow."),
            cl("for (int i = size - 1; i >= idx; i--) {", "Start shifting from the end."),
            cl("  arr[i + 1] = arr[i];", "Move element to the right."),
            cl("}", "Shift complete."),
            cl("arr[idx] = value;", "Insert the new value."),
            cl("size++;", "Update logical size."),
        ],
        OperationKind::Delete => vec![
            cl("int target = arr[idx];", "Select the element to remove."),
            cl("for (int i = idx; i < size - 1; i++) {", "Start shifting from the gap."),
            cl("  arr[i] = arr[i + 1];", "Move element to the left."),
            cl("}", "Shift complete."),
            cl("arr[size - 1] = EMPTY;", "Clear the vacated last cell."),
            cl("size--;", "Update logical size."),
        ],
        OperationKind::Search => vec![
            cl("for (int i = 0; i < size; i++) {", "Scan left to right."),
            cl("  if (arr[i] == key)", "Compare the current element."),
            cl("    return i;", "Match found! Return index."),
            cl("}", ""),
            cl("return -1;", "Reached the end without a match."),
        ],
        OperationKind::Traverse => vec![
            cl("int sum = 0;", "Initialize accumulator."),
            cl("for (int i = 0; i < size; i++) {", "Loop through each element."),
            cl("  visit(arr[i]);", "Process current element."),
            cl("  sum += arr[i];", "Add current element to sum."),
            cl("}", "End of loop."),
            cl("double avg = (double)sum / size;", "Calculate average."),
        ],
    }
}

/// Listing for an operation on a structure. Traversal on a hash table has no listing of its own
/// and is rejected before planning, so it falls back to the delete listing here.
pub fn listing(structure: StructureKind, kind: OperationKind) -> Vec<CodeLine> {
    match structure {
        StructureKind::Table(ProbeStrategy::Chaining) => chain_listing(kind),
        StructureKind::Table(strategy) => open_listing(strategy, kind),
        StructureKind::Array => array_listing(kind),
    }
}
