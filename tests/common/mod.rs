pub mod logger;
pub mod macros;
pub mod temp_config;
