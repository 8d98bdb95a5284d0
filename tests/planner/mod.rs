mod operation_plans;
