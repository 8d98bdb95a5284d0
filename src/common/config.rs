use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::common::exception::ConfigError;
use crate::container::probe_sequence::ProbeStrategy;
use crate::container::structure::StructureKind;

pub type Key = u32; // stored datum for tables and arrays
pub type Position = usize; // slot, bucket or array index

/** Largest key accepted from user input. */
pub const MAX_KEY: Key = 999_999;

pub const DEFAULT_TABLE_SIZE: usize = 7; // open-addressing capacity, must be prime
pub const DEFAULT_CHAIN_BUCKETS: usize = 5; // separate-chaining bucket count
pub const DEFAULT_ARRAY_CAPACITY: usize = 10; // fixed array capacity
pub const MAX_CAPACITY: usize = 997; // upper bound for every structure size, prime

/** Auto-play delay bounds, in milliseconds. */
pub const MIN_SPEED_MS: u64 = 100;
pub const MAX_SPEED_MS: u64 = 2000;
pub const DEFAULT_SPEED_MS: u64 = 1000;

/// Clamps a requested auto-play delay into `[MIN_SPEED_MS, MAX_SPEED_MS]`.
pub fn clamp_speed(speed_ms: u64) -> Duration {
    Duration::from_millis(speed_ms.clamp(MIN_SPEED_MS, MAX_SPEED_MS))
}

/// Returns true if `n` is prime. Trial division is enough for teaching-sized tables.
pub fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }
    let mut d = 3;
    while d * d <= n {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

/// Settings for one stepping session, loadable from a TOML file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StepperConfig {
    pub table_size: usize,
    pub chain_buckets: usize,
    pub array_capacity: usize,
    pub speed_ms: u64,
    pub log_level: String,
}

impl Default for StepperConfig {
    fn default() -> Self {
        Self {
            table_size: DEFAULT_TABLE_SIZE,
            chain_buckets: DEFAULT_CHAIN_BUCKETS,
            array_capacity: DEFAULT_ARRAY_CAPACITY,
            speed_ms: DEFAULT_SPEED_MS,
            log_level: "info".to_string(),
        }
    }
}

impl StepperConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: StepperConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_prime(self.table_size) {
            return Err(ConfigError::Invalid(format!(
                "table_size {} is not prime",
                self.table_size
            )));
        }
        for (name, size) in [
            ("table_size", self.table_size),
            ("chain_buckets", self.chain_buckets),
            ("array_capacity", self.array_capacity),
        ] {
            if !(1..=MAX_CAPACITY).contains(&size) {
                return Err(ConfigError::Invalid(format!(
                    "{} {} outside 1..={}",
                    name, size, MAX_CAPACITY
                )));
            }
        }
        if !(MIN_SPEED_MS..=MAX_SPEED_MS).contains(&self.speed_ms) {
            return Err(ConfigError::Invalid(format!(
                "speed_ms {} outside {}..={}",
                self.speed_ms, MIN_SPEED_MS, MAX_SPEED_MS
            )));
        }
        Ok(())
    }

    pub fn speed(&self) -> Duration {
        clamp_speed(self.speed_ms)
    }

    /// Capacity or bucket count configured for a structure kind.
    pub fn size_for(&self, kind: StructureKind) -> usize {
        match kind {
            StructureKind::Table(ProbeStrategy::Chaining) => self.chain_buckets,
            StructureKind::Table(_) => self.table_size,
            StructureKind::Array => self.array_capacity,
        }
    }
}
