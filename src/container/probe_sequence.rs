//! Candidate positions for a key under each collision-resolution strategy.
//!
//! | Strategy    | Position for attempt `i`               | Positions yielded (prime `C`) |
//! |-------------|----------------------------------------|-------------------------------|
//! | `Linear`    | `(hash(k) + i) mod C`                  | `C`                           |
//! | `Quadratic` | `(hash(k) + i²) mod C`                 | `C / 2 + 1`                   |
//! | `Double`    | `(hash(k) + i * step(k)) mod C`        | `C`                           |
//! | `Chaining`  | `hash(k)` (the bucket)                 | `1`                           |
//!
//! For a prime `C`, `i²` takes exactly `C / 2 + 1` distinct values mod `C` over
//! `i = 0..=C/2`, and every later attempt repeats one of them. The quadratic run therefore ends
//! there instead of revisiting slots. Positions are produced lazily; once the run is over,
//! [`ProbeSequence::next_probe`] reports [`ProbeExhausted`].

use std::fmt;
use std::str::FromStr;

use crate::common::config::{Key, Position};
use crate::common::exception::{PlanError, ProbeExhausted};
use crate::container::hash_function::HashFunction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeStrategy {
    Linear,
    Quadratic,
    Double,
    Chaining,
}

impl ProbeStrategy {
    pub fn is_open_addressing(&self) -> bool {
        !matches!(self, ProbeStrategy::Chaining)
    }
}

impl fmt::Display for ProbeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProbeStrategy::Linear => "linear probing",
            ProbeStrategy::Quadratic => "quadratic probing",
            ProbeStrategy::Double => "double hashing",
            ProbeStrategy::Chaining => "separate chaining",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for ProbeStrategy {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "linear" => Ok(ProbeStrategy::Linear),
            "quadratic" => Ok(ProbeStrategy::Quadratic),
            "double" => Ok(ProbeStrategy::Double),
            "chaining" | "chain" => Ok(ProbeStrategy::Chaining),
            other => Err(PlanError::UnknownName(other.to_string())),
        }
    }
}

/// One candidate produced by a probe sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Probe {
    pub attempt: usize,
    pub position: Position,
}

/// Lazy probe run for a single operation on a single key.
#[derive(Debug, Clone)]
pub struct ProbeSequence {
    strategy: ProbeStrategy,
    capacity: usize,
    home: Position,
    step: usize,
    attempt: usize,
    limit: usize,
}

impl ProbeSequence {
    pub fn new(key: Key, capacity: usize, strategy: ProbeStrategy) -> Self {
        let hash_fn = HashFunction::new(capacity);
        let capacity = hash_fn.size();
        // Computed once per run and reused by every attempt.
        let step = match strategy {
            ProbeStrategy::Double => hash_fn.get_step(key),
            _ => 1,
        };
        let limit = match strategy {
            ProbeStrategy::Linear | ProbeStrategy::Double => capacity,
            ProbeStrategy::Quadratic => capacity / 2 + 1,
            ProbeStrategy::Chaining => 1,
        };

        Self {
            strategy,
            capacity,
            home: hash_fn.get_hash(key),
            step,
            attempt: 0,
            limit,
        }
    }

    pub fn strategy(&self) -> ProbeStrategy {
        self.strategy
    }

    /// The home position (`hash(k)`), also the chaining bucket index.
    pub fn home(&self) -> Position {
        self.home
    }

    /// The double-hashing jump, `None` for other strategies.
    pub fn step(&self) -> Option<usize> {
        (self.strategy == ProbeStrategy::Double).then_some(self.step)
    }

    /// Number of attempts already handed out.
    pub fn attempts(&self) -> usize {
        self.attempt
    }

    /// Total number of positions this run will yield.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Position for an arbitrary attempt number, without advancing the run.
    pub fn position_at(&self, attempt: usize) -> Position {
        let offset = match self.strategy {
            ProbeStrategy::Linear => attempt % self.capacity,
            ProbeStrategy::Quadratic => (attempt % self.capacity).pow(2) % self.capacity,
            ProbeStrategy::Double => (attempt % self.capacity) * self.step % self.capacity,
            ProbeStrategy::Chaining => 0,
        };
        (self.home + offset) % self.capacity
    }

    /// Yields the next untried position, or `ProbeExhausted` once the run is over.
    pub fn next_probe(&mut self) -> Result<Probe, ProbeExhausted> {
        if self.attempt >= self.limit {
            return Err(ProbeExhausted {
                attempts: self.attempt,
            });
        }
        let probe = Probe {
            attempt: self.attempt,
            position: self.position_at(self.attempt),
        };
        self.attempt += 1;
        Ok(probe)
    }
}

impl Iterator for ProbeSequence {
    type Item = Probe;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_probe().ok()
    }
}

/// The bucket a key lands in under separate chaining.
pub fn bucket_index(key: Key, buckets: usize) -> Position {
    HashFunction::new(buckets).get_hash(key)
}
