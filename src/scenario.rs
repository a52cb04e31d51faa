//! Scenario definition and builder API.

use crate::process::ProcessDef;
use crate::timeline::INITIAL_TIMELINE_CAPACITY;
use crate::types::{Pid, Tick};

/// Multiple of the expected run length after which a run is aborted.
///
/// The bound is scaled by the larger of the initial timeline capacity and
/// the scenario horizon, not by the capacity alone, so long workloads
/// (e.g. a single 6000-tick burst) are not cut off at 5000 ticks.
pub const TICK_LIMIT_FACTOR: Tick = 5;

/// A complete simulation scenario: CPUs, processes, and the safety bound.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub nr_cpus: u32,
    pub processes: Vec<ProcessDef>,
    /// Explicit abort bound; see [`Scenario::tick_limit`] for the default.
    pub tick_limit: Option<Tick>,
}

/// Builder for constructing scenarios.
pub struct ScenarioBuilder {
    nr_cpus: u32,
    processes: Vec<ProcessDef>,
    tick_limit: Option<Tick>,
    next_pid: Pid,
}

impl Scenario {
    pub fn builder() -> ScenarioBuilder {
        ScenarioBuilder {
            nr_cpus: 1,
            processes: Vec::new(),
            tick_limit: None,
            next_pid: Pid(1),
        }
    }

    /// Latest tick by which any work-conserving schedule must finish: the
    /// last arrival plus all burst time.
    pub fn horizon(&self) -> Tick {
        let last_arrival = self.processes.iter().map(|p| p.arrival).max().unwrap_or(0);
        let total_burst = self
            .processes
            .iter()
            .fold(0, |acc: Tick, p| acc.saturating_add(p.burst));
        last_arrival.saturating_add(total_burst)
    }

    /// Ticks after which an unfinished run is aborted.
    ///
    /// Defaults to [`TICK_LIMIT_FACTOR`] times the larger of the initial
    /// timeline capacity and [`Scenario::horizon`].
    pub fn tick_limit(&self) -> Tick {
        self.tick_limit.unwrap_or_else(|| {
            self.horizon()
                .max(INITIAL_TIMELINE_CAPACITY as Tick)
                .saturating_mul(TICK_LIMIT_FACTOR)
        })
    }
}

impl ScenarioBuilder {
    /// Set the number of simulated CPUs.
    pub fn cpus(mut self, n: u32) -> Self {
        self.nr_cpus = n;
        self
    }

    /// Add a process with a full ProcessDef.
    pub fn process(mut self, def: ProcessDef) -> Self {
        self.next_pid = Pid(self.next_pid.0.max(def.pid.0.saturating_add(1)));
        self.processes.push(def);
        self
    }

    /// Add every process from `defs`, in order.
    pub fn processes(self, defs: impl IntoIterator<Item = ProcessDef>) -> Self {
        defs.into_iter().fold(self, ScenarioBuilder::process)
    }

    /// Convenience: add a priority-0 process with auto-assigned PID.
    ///
    /// Auto PIDs saturate at `i32::MAX`.
    pub fn add_process(self, arrival: Tick, burst: Tick) -> Self {
        let pid = self.next_pid;
        self.process(ProcessDef::new(pid, arrival, burst))
    }

    /// Override the non-termination bound.
    pub fn tick_limit(mut self, ticks: Tick) -> Self {
        self.tick_limit = Some(ticks);
        self
    }

    /// Build the scenario.
    pub fn build(self) -> Scenario {
        assert!(self.nr_cpus > 0, "scenario must have at least one CPU");
        Scenario {
            nr_cpus: self.nr_cpus,
            processes: self.processes,
            tick_limit: self.tick_limit,
        }
    }
}
