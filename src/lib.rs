pub mod cli;
pub mod common;
pub mod container;
pub mod execution;
pub mod planner;
