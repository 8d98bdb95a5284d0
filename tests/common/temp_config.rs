use dsa_stepper::common::config::StepperConfig;
use std::io::Write;
use tempfile::NamedTempFile;

/// Writes `contents` to a temporary TOML file. Keep the handle alive while the path is used.
pub fn temp_config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp config");
    file.write_all(contents.as_bytes()).expect("write temp config");
    file
}

pub fn load_temp_config(contents: &str) -> StepperConfig {
    let file = temp_config_file(contents);
    StepperConfig::load(file.path()).expect("load temp config")
}
