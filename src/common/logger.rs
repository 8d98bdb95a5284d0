use std::sync::Once;

use env_logger::Builder;
use log::LevelFilter;

static INIT: Once = Once::new();

pub fn initialize_logger() {
    initialize_logger_with_level(LevelFilter::Info);
}

/// Initializes the global logger once. `RUST_LOG` still overrides the given level.
pub fn initialize_logger_with_level(level: LevelFilter) {
    // Use call_once_force to recover if an earlier initialization attempt panicked.
    INIT.call_once_force(|_| {
        let mut builder = Builder::new();

        builder
            .filter_level(level)
            .filter_module("dsa_stepper", level)
            .filter_module("dsa_stepper::planner", level)
            .filter_module("dsa_stepper::execution", level)
            .filter_module("rustyline", LevelFilter::Warn)
            .format_timestamp_millis()
            .parse_default_env();

        // Avoid panicking if the logger was already initialized elsewhere.
        let _ = builder.try_init();
    });
}

/// Maps a config string such as `"debug"` to a level, defaulting to `Info`.
pub fn parse_level(level: &str) -> LevelFilter {
    level.parse().unwrap_or(LevelFilter::Info)
}
