use std::env;

use log::{debug, info};

use crate::common::exception::PlanError;
use crate::container::chained_table::ChainedTable;
use crate::container::fixed_array::FixedArray;
use crate::container::open_table::OpenTable;
use crate::container::probe_sequence::ProbeStrategy;
use crate::container::structure::{Structure, StructureKind};
use crate::planner::operation::{OperationKind, OperationParams, check_key};
use crate::planner::plan::{OperationPlan, Step};
use crate::planner::{array, chaining, open_addressing};

/// Compiles requests into step plans against a snapshot.
///
/// Every validation error is raised here, before a single step exists.
pub struct OperationPlanner {
    log_detailed: bool,
}

impl OperationPlanner {
    pub fn new() -> Self {
        Self {
            log_detailed: env::var("RUST_TEST").is_ok(),
        }
    }

    pub fn with_detailed_logging(detailed: bool) -> Self {
        Self {
            log_detailed: detailed || env::var("RUST_TEST").is_ok(),
        }
    }

    pub fn set_detailed_logging(&mut self, detailed: bool) {
        self.log_detailed = detailed || env::var("RUST_TEST").is_ok();
    }

    pub fn create_plan(
        &self,
        snapshot: &Structure,
        kind: OperationKind,
        structure: StructureKind,
        params: OperationParams,
    ) -> Result<OperationPlan, PlanError> {
        info!("Planning {} {} on {}", kind, params, structure);

        if snapshot.kind() != structure {
            info!("Error: session holds {}", snapshot.kind());
            return Err(PlanError::StructureMismatch {
                expected: snapshot.kind(),
                actual: structure,
            });
        }

        if let Some(key) = params.key() {
            check_key(i64::from(key))?;
        }

        let steps = match snapshot {
            Structure::Open(table) => self.plan_open(table, kind, params),
            Structure::Chained(table) => self.plan_chained(table, kind, params),
            Structure::Array(arr) => self.plan_array(arr, kind, params),
        }?;

        let plan = OperationPlan::new(kind, params, snapshot.clone(), steps);
        debug!("Built plan with {} steps", plan.len());
        if self.log_detailed {
            debug!("{:#}", plan);
        }
        Ok(plan)
    }

    fn unsupported(kind: OperationKind, structure: StructureKind) -> PlanError {
        info!("Error: {} is not supported on {}", kind, structure);
        PlanError::UnsupportedOperation { kind, structure }
    }

    fn plan_open(
        &self,
        table: &OpenTable,
        kind: OperationKind,
        params: OperationParams,
    ) -> Result<Vec<Step>, PlanError> {
        debug!("Planning open-addressing {} ({})", kind, table.strategy());
        match (kind, params) {
            (OperationKind::Insert, OperationParams::Key(key)) => {
                Ok(open_addressing::plan_insert(table, key))
            }
            (OperationKind::Search, OperationParams::Key(key)) => {
                Ok(open_addressing::plan_search(table, key))
            }
            (OperationKind::Delete, OperationParams::Key(key)) => {
                Ok(open_addressing::plan_delete(table, key))
            }
            _ => Err(Self::unsupported(
                kind,
                StructureKind::Table(table.strategy()),
            )),
        }
    }

    fn plan_chained(
        &self,
        table: &ChainedTable,
        kind: OperationKind,
        params: OperationParams,
    ) -> Result<Vec<Step>, PlanError> {
        debug!("Planning chaining {} over {} buckets", kind, table.bucket_count());
        match (kind, params) {
            (OperationKind::Insert, OperationParams::Key(key)) => {
                Ok(chaining::plan_insert(table, key))
            }
            (OperationKind::Search, OperationParams::Key(key)) => {
                Ok(chaining::plan_search(table, key))
            }
            (OperationKind::Delete, OperationParams::Key(key)) => {
                Ok(chaining::plan_delete(table, key))
            }
            _ => Err(Self::unsupported(
                kind,
                StructureKind::Table(ProbeStrategy::Chaining),
            )),
        }
    }

    fn plan_array(
        &self,
        arr: &FixedArray,
        kind: OperationKind,
        params: OperationParams,
    ) -> Result<Vec<Step>, PlanError> {
        debug!("Planning array {} (size {}/{})", kind, arr.len(), arr.capacity());
        match (kind, params) {
            (OperationKind::Insert, OperationParams::InsertAt { index, value }) => {
                array::plan_insert(arr, index, value)
            }
            (OperationKind::Delete, OperationParams::DeleteAt { index }) => {
                array::plan_delete(arr, index)
            }
            (OperationKind::Search, OperationParams::Key(key)) => {
                Ok(array::plan_search(arr, key))
            }
            (OperationKind::Traverse, _) => Ok(array::plan_traverse(arr)),
            _ => Err(Self::unsupported(kind, StructureKind::Array)),
        }
    }
}

impl Default for OperationPlanner {
    fn default() -> Self {
        Self::new()
    }
}
