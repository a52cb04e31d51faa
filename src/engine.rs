//! Discrete-time simulation engine.
//!
//! This is the core of the simulator. Time advances one tick at a time and
//! every tick runs the same fixed sequence of phases:
//!
//! 1. admit processes arriving this tick
//! 2. RR: enqueue the arrivals, then demote occupants whose quantum is used
//!    up; SRTF: preempt until no shorter ready job can take a CPU
//! 3. fill idle CPUs through the active policy
//! 4. snapshot CPU occupancy into the timeline
//! 5. accrue waiting time for arrived, unfinished, non-running processes
//! 6. execute one unit of work on every busy CPU
//!
//! The order is load-bearing: a CPU freed by a quantum expiry is refilled
//! in the same tick, and the timeline shows the occupant that actually runs.

use tracing::{debug, info, warn};

use crate::config::DEFAULT_TIME_QUANTUM;
use crate::cpu::SimCpu;
use crate::fmt::set_sim_tick;
use crate::policy::{srtf_candidate, srtf_target, Algorithm, Policy};
use crate::process::{ProcessRegistry, ProcessState, SimProcess};
use crate::ready_queue::ReadyQueue;
use crate::scenario::Scenario;
use crate::timeline::Timeline;
use crate::trace::{Trace, TraceKind};
use crate::types::{CpuId, Pid, ProcIdx, Tick};

/// How a simulation run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitKind {
    /// Every process completed.
    Completed,
    /// The tick bound was hit with work outstanding.
    TickLimit { limit: Tick },
}

/// Everything a run produced, handed over for reporting.
#[derive(Debug, Clone)]
pub struct SimulationResult {
    pub algorithm: Algorithm,
    /// Quantum in effect (only meaningful for RR).
    pub quantum: Tick,
    pub processes: ProcessRegistry,
    pub cpus: Vec<SimCpu>,
    pub timeline: Timeline,
    pub trace: Trace,
    /// Number of ticks simulated.
    pub total_ticks: Tick,
    pub exit: ExitKind,
    /// Ready-queue entries dropped on overflow.
    pub dropped_enqueues: usize,
}

impl SimulationResult {
    pub fn process(&self, pid: Pid) -> Option<&SimProcess> {
        self.processes.by_pid(pid)
    }

    /// Occupant of `cpu` at `tick`.
    pub fn pid_at(&self, tick: Tick, cpu: CpuId) -> Option<Pid> {
        self.timeline.get(tick, cpu)
    }

    pub fn all_completed(&self) -> bool {
        self.exit == ExitKind::Completed
    }
}

/// Mutable state of one run: the process registry, the CPU pool and the
/// recorded output. Policies only ever see it by reference.
#[derive(Debug)]
pub struct SimState {
    pub procs: ProcessRegistry,
    pub cpus: Vec<SimCpu>,
    pub timeline: Timeline,
    pub trace: Trace,
    /// Current tick.
    pub now: Tick,
    pub completed: usize,
    pub dropped_enqueues: usize,
}

impl SimState {
    pub fn new(scenario: &Scenario) -> Self {
        SimState {
            procs: ProcessRegistry::new(&scenario.processes),
            cpus: (0..scenario.nr_cpus).map(|i| SimCpu::new(CpuId(i))).collect(),
            timeline: Timeline::new(scenario.nr_cpus),
            trace: Trace::new(),
            now: 0,
            completed: 0,
            dropped_enqueues: 0,
        }
    }

    pub fn is_done(&self) -> bool {
        self.completed >= self.procs.len()
    }

    /// Run one full tick and advance the clock.
    pub fn step(&mut self, policy: &mut Policy) {
        set_sim_tick(Some(self.now));

        let arrived = self.admit(policy.algorithm());
        match policy {
            Policy::RoundRobin { quantum, queue } => {
                for idx in arrived {
                    self.requeue(queue, idx);
                }
                self.expire_quanta(*quantum, queue);
            }
            Policy::Srtf => self.preempt_srtf(),
            Policy::Fcfs | Policy::Sjf => {}
        }
        self.fill_idle_cpus(policy);
        self.record_timeline();
        self.accrue_waiting();
        self.execute();

        self.now += 1;
    }

    /// Processes whose arrival is exactly now, in registry order.
    ///
    /// RR and SRTF mark them `Ready`; FCFS and SJF leave them `Waiting` and
    /// rely on the arrival check at selection time.
    pub fn admit(&mut self, algorithm: Algorithm) -> Vec<ProcIdx> {
        let now = self.now;
        let mut arrived = Vec::new();
        for (i, p) in self.procs.iter_mut().enumerate() {
            if p.arrival != now {
                continue;
            }
            if algorithm.admits_as_ready() && p.state == ProcessState::Waiting {
                p.state = ProcessState::Ready;
            }
            debug!(pid = p.pid.0, "arrived");
            arrived.push(ProcIdx(i));
        }
        arrived
    }

    /// Append to the RR queue; an overflow is logged and the entry dropped.
    fn requeue(&mut self, queue: &mut ReadyQueue, idx: ProcIdx) {
        if let Err(e) = queue.enqueue(idx) {
            self.dropped_enqueues += 1;
            warn!(pid = self.procs[idx].pid.0, "{e}");
        }
    }

    /// Demote every occupant that has used a full quantum, in CPU order.
    pub fn expire_quanta(&mut self, quantum: Tick, queue: &mut ReadyQueue) {
        for pos in 0..self.cpus.len() {
            let Some(idx) = self.cpus[pos].current else {
                continue;
            };
            let p = &mut self.procs[idx];
            if p.quantum_used < quantum {
                continue;
            }
            p.state = ProcessState::Ready;
            let pid = p.pid;
            let cpu = self.cpus[pos].id;
            self.cpus[pos].current = None;
            debug!(pid = pid.0, cpu = cpu.0, "quantum expired");
            self.trace
                .record(self.now, cpu, TraceKind::QuantumExpired { pid });
            self.requeue(queue, idx);
        }
    }

    /// Install shorter ready jobs until none can take a CPU.
    ///
    /// Each round moves one `Ready` process to `Running`; the evicted
    /// occupant goes back to `Waiting` and is not requeued.
    pub fn preempt_srtf(&mut self) {
        while let Some(cand) = srtf_candidate(&self.procs, self.now) {
            let Some(pos) = srtf_target(&self.cpus, &self.procs, cand) else {
                break;
            };
            if let Some(victim) = self.cpus[pos].current.take() {
                self.procs[victim].state = ProcessState::Waiting;
                let pid = self.procs[victim].pid;
                let cpu = self.cpus[pos].id;
                debug!(pid = pid.0, cpu = cpu.0, by = self.procs[cand].pid.0, "preempted");
                self.trace
                    .record(self.now, cpu, TraceKind::Preempted { pid });
            }
            self.dispatch(pos, cand);
        }
    }

    /// Give every idle CPU the policy's next choice, in CPU order.
    pub fn fill_idle_cpus(&mut self, policy: &mut Policy) {
        for pos in 0..self.cpus.len() {
            if !self.cpus[pos].is_idle() {
                continue;
            }
            let Some(idx) = policy.select_next(&self.procs, self.now) else {
                break;
            };
            self.dispatch(pos, idx);
        }
    }

    fn dispatch(&mut self, pos: usize, idx: ProcIdx) {
        let cpu = self.cpus[pos].id;
        let p = &mut self.procs[idx];
        debug_assert!(
            !p.is_running() && !p.is_completed(),
            "pid {} dispatched twice",
            p.pid
        );
        p.dispatch(cpu, self.now);
        debug!(pid = p.pid.0, cpu = cpu.0, remaining = p.remaining, "dispatch");
        self.trace
            .record(self.now, cpu, TraceKind::Dispatched { pid: p.pid });
        self.cpus[pos].current = Some(idx);
    }

    pub fn record_timeline(&mut self) {
        let procs = &self.procs;
        self.timeline.record(
            self.now,
            self.cpus.iter().map(|c| c.current.map(|idx| procs[idx].pid)),
        );
    }

    pub fn accrue_waiting(&mut self) {
        let now = self.now;
        for p in self.procs.iter_mut() {
            if p.has_arrived(now) && !p.is_completed() && !p.is_running() {
                p.waiting_time += 1;
            }
        }
    }

    /// One unit of work on every busy CPU; idle CPUs accrue idle time.
    pub fn execute(&mut self) {
        let now = self.now;
        for cpu in &mut self.cpus {
            let Some(idx) = cpu.current else {
                cpu.idle_time += 1;
                continue;
            };
            cpu.busy_time += 1;
            let p = &mut self.procs[idx];
            if p.execute_tick(now) {
                debug!(pid = p.pid.0, cpu = cpu.id.0, "completed");
                self.trace
                    .record(now + 1, cpu.id, TraceKind::Completed { pid: p.pid });
                cpu.current = None;
                self.completed += 1;
            }
        }
    }

    fn into_result(self, algorithm: Algorithm, quantum: Tick, exit: ExitKind) -> SimulationResult {
        SimulationResult {
            algorithm,
            quantum,
            processes: self.procs,
            cpus: self.cpus,
            timeline: self.timeline,
            trace: self.trace,
            total_ticks: self.now,
            exit,
            dropped_enqueues: self.dropped_enqueues,
        }
    }
}

/// The main simulator.
#[derive(Debug, Clone, Copy)]
pub struct Simulator {
    algorithm: Algorithm,
    quantum: Tick,
}

impl Simulator {
    pub fn new(algorithm: Algorithm) -> Self {
        Simulator {
            algorithm,
            quantum: DEFAULT_TIME_QUANTUM,
        }
    }

    /// Set the RR quantum. Zero falls back to the default.
    pub fn with_quantum(mut self, quantum: Tick) -> Self {
        self.quantum = if quantum == 0 {
            DEFAULT_TIME_QUANTUM
        } else {
            quantum
        };
        self
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn quantum(&self) -> Tick {
        self.quantum
    }

    /// Run a scenario to completion (or to its tick limit).
    pub fn run(&self, scenario: &Scenario) -> SimulationResult {
        let mut policy = Policy::new(self.algorithm, self.quantum);
        let mut state = SimState::new(scenario);
        let limit = scenario.tick_limit();

        info!(
            algorithm = %self.algorithm,
            cpus = scenario.nr_cpus,
            processes = scenario.processes.len(),
            "simulation start"
        );

        let mut exit = ExitKind::Completed;
        while !state.is_done() {
            if state.now >= limit {
                warn!(
                    limit,
                    completed = state.completed,
                    total = state.procs.len(),
                    "simulation exceeded maximum expected time, aborting"
                );
                exit = ExitKind::TickLimit { limit };
                break;
            }
            state.step(&mut policy);
        }
        set_sim_tick(None);

        info!(ticks = state.now, completed = state.completed, "simulation end");
        state.into_result(self.algorithm, self.quantum, exit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::ProcessDef;

    #[test]
    fn test_admit_marks_ready_only_for_rr_and_srtf() {
        let scenario = Scenario::builder()
            .process(ProcessDef::new(Pid(1), 0, 2))
            .process(ProcessDef::new(Pid(2), 1, 2))
            .process(ProcessDef::new(Pid(3), 0, 2))
            .build();

        let mut state = SimState::new(&scenario);
        assert_eq!(state.admit(Algorithm::Srtf), [ProcIdx(0), ProcIdx(2)]);
        assert_eq!(state.procs[ProcIdx(0)].state, ProcessState::Ready);
        assert_eq!(state.procs[ProcIdx(1)].state, ProcessState::Waiting);

        let mut state = SimState::new(&scenario);
        assert_eq!(state.admit(Algorithm::Sjf), [ProcIdx(0), ProcIdx(2)]);
        assert_eq!(state.procs[ProcIdx(0)].state, ProcessState::Waiting);

        state.now = 1;
        assert_eq!(state.admit(Algorithm::Sjf), [ProcIdx(1)]);
    }

    #[test]
    fn test_expiry_requeues_in_cpu_order() {
        let scenario = Scenario::builder()
            .cpus(2)
            .add_process(0, 5)
            .add_process(0, 5)
            .add_process(0, 5)
            .build();
        let mut state = SimState::new(&scenario);
        let mut policy = Policy::new(Algorithm::Rr, 1);

        state.step(&mut policy);
        assert_eq!(state.cpus[0].current, Some(ProcIdx(0)));
        assert_eq!(state.cpus[1].current, Some(ProcIdx(1)));

        // Tick 1: both expire; queue was [2], becomes [2, 0, 1].
        state.step(&mut policy);
        assert_eq!(state.cpus[0].current, Some(ProcIdx(2)));
        assert_eq!(state.cpus[1].current, Some(ProcIdx(0)));
        let Policy::RoundRobin { queue, .. } = &policy else {
            unreachable!()
        };
        assert_eq!(queue.iter().copied().collect::<Vec<_>>(), [ProcIdx(1)]);
    }

    #[test]
    fn test_waiting_accrues_only_for_arrived_idle_processes() {
        let scenario = Scenario::builder()
            .add_process(0, 3)
            .add_process(0, 1)
            .add_process(2, 1)
            .build();
        let mut state = SimState::new(&scenario);
        let mut policy = Policy::new(Algorithm::Fcfs, 2);
        state.step(&mut policy);
        state.step(&mut policy);

        assert_eq!(state.procs[ProcIdx(0)].waiting_time, 0);
        assert_eq!(state.procs[ProcIdx(1)].waiting_time, 2);
        assert_eq!(state.procs[ProcIdx(2)].waiting_time, 0);
    }

    #[test]
    fn test_empty_scenario_finishes_immediately() {
        let scenario = Scenario::builder().cpus(2).build();
        let result = Simulator::new(Algorithm::Rr).run(&scenario);
        assert_eq!(result.total_ticks, 0);
        assert!(result.all_completed());
        assert!(result.timeline.is_empty());
    }

    #[test]
    fn test_zero_quantum_uses_default() {
        assert_eq!(Simulator::new(Algorithm::Rr).with_quantum(0).quantum(), 2);
        assert_eq!(Simulator::new(Algorithm::Rr).with_quantum(3).quantum(), 3);
    }
}
