//! Process model for the simulator.
//!
//! A [`ProcessDef`] is the immutable description loaded from the workload;
//! a [`SimProcess`] wraps it with the scheduling state the engine mutates
//! in place. The [`ProcessRegistry`] owns every record for the lifetime of
//! a run and is handed back inside the simulation result so reporting sees
//! exactly the state the engine left behind.

use std::ops::{Index, IndexMut};

use crate::types::{CpuId, Pid, ProcIdx, Tick};

/// The state a simulated process can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    /// Not yet selected. FCFS and SJF keep arrived processes here, and SRTF
    /// parks preempted processes here.
    Waiting,
    /// Admitted and eligible. Used by RR (queued) and SRTF (preemption
    /// candidates).
    Ready,
    /// Executing on the given CPU.
    Running { cpu: CpuId },
    /// All work done. Terminal.
    Completed,
}

/// Definition of a process for scenario creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessDef {
    pub pid: Pid,
    /// First tick at which the process is eligible.
    pub arrival: Tick,
    /// Total CPU ticks required. Always > 0.
    pub burst: Tick,
    /// Higher value = more preferred on ties.
    pub priority: i32,
}

impl ProcessDef {
    pub fn new(pid: Pid, arrival: Tick, burst: Tick) -> Self {
        ProcessDef {
            pid,
            arrival,
            burst,
            priority: 0,
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

/// A simulated process at runtime.
#[derive(Debug, Clone)]
pub struct SimProcess {
    pub pid: Pid,
    pub arrival: Tick,
    pub burst: Tick,
    pub priority: i32,
    /// Ticks of work left. Reaches exactly 0 at completion.
    pub remaining: Tick,
    pub state: ProcessState,
    /// Tick of first dispatch.
    pub start_time: Option<Tick>,
    /// Tick at which the last unit of work ended.
    pub finish_time: Option<Tick>,
    /// Ticks spent arrived but not running.
    pub waiting_time: Tick,
    /// Consecutive ticks run since the last dispatch (RR bookkeeping).
    pub quantum_used: Tick,
    /// `start_time - arrival`, fixed at first dispatch.
    pub response_time: Option<Tick>,
}

impl SimProcess {
    pub fn new(def: &ProcessDef) -> Self {
        SimProcess {
            pid: def.pid,
            arrival: def.arrival,
            burst: def.burst,
            priority: def.priority,
            remaining: def.burst,
            state: ProcessState::Waiting,
            start_time: None,
            finish_time: None,
            waiting_time: 0,
            quantum_used: 0,
            response_time: None,
        }
    }

    pub fn has_arrived(&self, now: Tick) -> bool {
        self.arrival <= now
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, ProcessState::Running { .. })
    }

    pub fn is_completed(&self) -> bool {
        self.state == ProcessState::Completed
    }

    /// Put the process on `cpu` at tick `now`.
    ///
    /// Start and response time are only set on the first dispatch; later
    /// dispatches after preemption or quantum expiry leave them untouched.
    pub fn dispatch(&mut self, cpu: CpuId, now: Tick) {
        self.state = ProcessState::Running { cpu };
        self.quantum_used = 0;
        if self.start_time.is_none() {
            self.start_time = Some(now);
            self.response_time = Some(now - self.arrival);
        }
    }

    /// Run one unit of work ending at `now + 1`. Returns true if the
    /// process completed.
    pub fn execute_tick(&mut self, now: Tick) -> bool {
        debug_assert!(self.remaining > 0, "pid {} ran with no work left", self.pid);
        self.remaining -= 1;
        self.quantum_used += 1;
        if self.remaining == 0 {
            self.state = ProcessState::Completed;
            self.finish_time = Some(now + 1);
            true
        } else {
            false
        }
    }

    /// `finish - arrival`, once completed.
    pub fn turnaround(&self) -> Option<Tick> {
        self.finish_time.map(|finish| finish - self.arrival)
    }

    /// Waiting time as reported: `max(0, turnaround - burst)`.
    pub fn reported_waiting(&self) -> Option<Tick> {
        self.turnaround().map(|t| t.saturating_sub(self.burst))
    }
}

/// Owner of all process records for one simulation.
#[derive(Debug, Clone, Default)]
pub struct ProcessRegistry {
    procs: Vec<SimProcess>,
}

impl ProcessRegistry {
    pub fn new(defs: &[ProcessDef]) -> Self {
        ProcessRegistry {
            procs: defs.iter().map(SimProcess::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.procs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.procs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SimProcess> {
        self.procs.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut SimProcess> {
        self.procs.iter_mut()
    }

    /// Iterate in registry order together with each record's index.
    pub fn indexed(&self) -> impl Iterator<Item = (ProcIdx, &SimProcess)> {
        self.procs.iter().enumerate().map(|(i, p)| (ProcIdx(i), p))
    }

    /// Look up a process by its user-visible id (first match).
    pub fn by_pid(&self, pid: Pid) -> Option<&SimProcess> {
        self.procs.iter().find(|p| p.pid == pid)
    }

    pub fn completed_count(&self) -> usize {
        self.procs.iter().filter(|p| p.is_completed()).count()
    }
}

impl Index<ProcIdx> for ProcessRegistry {
    type Output = SimProcess;

    fn index(&self, idx: ProcIdx) -> &SimProcess {
        &self.procs[idx.0]
    }
}

impl IndexMut<ProcIdx> for ProcessRegistry {
    fn index_mut(&mut self, idx: ProcIdx) -> &mut SimProcess {
        &mut self.procs[idx.0]
    }
}
