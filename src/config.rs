//! Validated run configuration.
//!
//! The command line hands over raw values; this module applies the
//! coercion rules (non-positive CPU counts become 1, non-positive quanta
//! fall back to the default) so the engine only ever sees usable settings.

use std::path::PathBuf;

use tracing::warn;

use crate::engine::Simulator;
use crate::policy::Algorithm;
use crate::types::Tick;

/// Round Robin quantum when none (or a non-positive one) is given.
pub const DEFAULT_TIME_QUANTUM: Tick = 2;

/// CPU count when none (or a non-positive one) is given.
pub const DEFAULT_CPUS: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    pub algorithm: Algorithm,
    pub nr_cpus: u32,
    /// Only consulted by Round Robin.
    pub quantum: Tick,
    /// Workload description file.
    pub input: PathBuf,
    /// Override for the non-termination bound.
    pub tick_limit: Option<Tick>,
}

impl SimConfig {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        SimConfig {
            algorithm: Algorithm::default(),
            nr_cpus: DEFAULT_CPUS,
            quantum: DEFAULT_TIME_QUANTUM,
            input: input.into(),
            tick_limit: None,
        }
    }

    pub fn algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn cpus(mut self, raw: i64) -> Self {
        self.nr_cpus = coerce_cpus(raw);
        self
    }

    pub fn quantum(mut self, raw: i64) -> Self {
        self.quantum = coerce_quantum(raw);
        self
    }

    pub fn tick_limit(mut self, ticks: Option<Tick>) -> Self {
        self.tick_limit = ticks;
        self
    }

    pub fn simulator(&self) -> Simulator {
        Simulator::new(self.algorithm).with_quantum(self.quantum)
    }
}

/// CPU count from a raw value: anything below 1 becomes 1.
pub fn coerce_cpus(raw: i64) -> u32 {
    if raw <= 0 {
        warn!(cpus = raw, "CPU count must be positive, using 1");
        return DEFAULT_CPUS;
    }
    u32::try_from(raw).unwrap_or_else(|_| {
        warn!(cpus = raw, "CPU count too large, clamping");
        u32::MAX
    })
}

/// Quantum from a raw value: anything below 1 becomes the default.
pub fn coerce_quantum(raw: i64) -> Tick {
    if raw <= 0 {
        warn!(
            quantum = raw,
            "time quantum must be positive, using {DEFAULT_TIME_QUANTUM}"
        );
        return DEFAULT_TIME_QUANTUM;
    }
    raw as Tick
}
