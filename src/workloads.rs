//! Workload generators for common arrival patterns.
//!
//! Each function returns process definitions with pids starting at 1, in
//! arrival order. They are composed into scenarios for tests and benches.

use crate::process::ProcessDef;
use crate::types::{Pid, Tick};

fn pid(i: usize) -> Pid {
    Pid(i as i32 + 1)
}

/// `n` processes of equal burst, all arriving at 0.
pub fn identical(n: usize, burst: Tick) -> Vec<ProcessDef> {
    (0..n).map(|i| ProcessDef::new(pid(i), 0, burst)).collect()
}

/// `n` processes of equal burst, one arriving every `gap` ticks.
pub fn staggered(n: usize, burst: Tick, gap: Tick) -> Vec<ProcessDef> {
    (0..n)
        .map(|i| ProcessDef::new(pid(i), i as Tick * gap, burst))
        .collect()
}

/// One long job at 0 followed by `n` short jobs arriving one per tick.
///
/// The classic convoy: FCFS makes every short job wait for the long one.
pub fn convoy(long: Tick, n: usize, short: Tick) -> Vec<ProcessDef> {
    let mut defs = vec![ProcessDef::new(Pid(1), 0, long)];
    defs.extend((0..n).map(|i| ProcessDef::new(pid(i + 1), i as Tick + 1, short)));
    defs
}

/// Deterministic pseudo-random mix of arrivals, bursts and priorities.
///
/// Uses a fixed linear congruential sequence so the same `seed` always
/// yields the same workload.
///
/// # Panics
/// Panics if `max_burst` is 0.
pub fn mixed(n: usize, max_arrival: Tick, max_burst: Tick, seed: u64) -> Vec<ProcessDef> {
    assert!(max_burst > 0, "max_burst must be positive");
    let mut state = seed;
    let mut next = move || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        state >> 33
    };
    (0..n)
        .map(|i| {
            let arrival = next() % (max_arrival + 1);
            let burst = next() % max_burst + 1;
            let priority = (next() % 5) as i32;
            ProcessDef::new(pid(i), arrival, burst).with_priority(priority)
        })
        .collect()
}
