use dsa_stepper::common::logger::initialize_logger_with_level;
use log::LevelFilter;

/// Quiet by default so step traces don't flood test output. `RUST_LOG` still wins.
pub fn init_test_logger() {
    initialize_logger_with_level(LevelFilter::Warn);
}
