//! Scheduling disciplines.
//!
//! [`Algorithm`] is the user-facing selector. [`Policy`] is the runtime
//! strategy the engine drives: a closed set of variants where only Round
//! Robin carries auxiliary state (its quantum and ready queue).
//!
//! All selection scans walk the registry in ascending index order and only
//! replace the current best on a strict improvement, so the first
//! discovered process wins any remaining tie.

use std::fmt;
use std::str::FromStr;

use crate::cpu::SimCpu;
use crate::process::{ProcessRegistry, ProcessState, SimProcess};
use crate::ready_queue::ReadyQueue;
use crate::types::{ProcIdx, Tick};

/// Scheduling algorithm selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Algorithm {
    /// First-Come, First-Served (non-preemptive).
    #[default]
    Fcfs,
    /// Round Robin with a fixed quantum.
    Rr,
    /// Shortest Remaining Time First (preemptive).
    Srtf,
    /// Shortest Job First (non-preemptive).
    Sjf,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [Algorithm::Fcfs, Algorithm::Rr, Algorithm::Srtf, Algorithm::Sjf];

    /// Human-readable name used in report headers.
    pub fn full_name(self) -> &'static str {
        match self {
            Algorithm::Fcfs => "First-Come, First-Served",
            Algorithm::Rr => "Round Robin",
            Algorithm::Srtf => "Shortest Remaining Time First",
            Algorithm::Sjf => "Shortest Job First",
        }
    }

    /// Whether admission flips arrivals to `Ready` rather than leaving
    /// them `Waiting`.
    pub fn admits_as_ready(self) -> bool {
        matches!(self, Algorithm::Rr | Algorithm::Srtf)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Algorithm::Fcfs => "FCFS",
            Algorithm::Rr => "RR",
            Algorithm::Srtf => "SRTF",
            Algorithm::Sjf => "SJF",
        };
        write!(f, "{s}")
    }
}

/// Unknown algorithm name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseAlgorithmError(pub String);

impl fmt::Display for ParseAlgorithmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown algorithm {:?}; expected one of FCFS, RR, SRTF, SJF",
            self.0
        )
    }
}

impl std::error::Error for ParseAlgorithmError {}

impl FromStr for Algorithm {
    type Err = ParseAlgorithmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .into_iter()
            .find(|a| a.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseAlgorithmError(s.to_string()))
    }
}

/// Runtime scheduling strategy.
#[derive(Debug, Clone)]
pub enum Policy {
    Fcfs,
    RoundRobin { quantum: Tick, queue: ReadyQueue },
    Srtf,
    Sjf,
}

impl Policy {
    /// Build the strategy for `algorithm`. `quantum` is only kept for RR.
    pub fn new(algorithm: Algorithm, quantum: Tick) -> Self {
        match algorithm {
            Algorithm::Fcfs => Policy::Fcfs,
            Algorithm::Rr => Policy::RoundRobin {
                quantum,
                queue: ReadyQueue::default(),
            },
            Algorithm::Srtf => Policy::Srtf,
            Algorithm::Sjf => Policy::Sjf,
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        match self {
            Policy::Fcfs => Algorithm::Fcfs,
            Policy::RoundRobin { .. } => Algorithm::Rr,
            Policy::Srtf => Algorithm::Srtf,
            Policy::Sjf => Algorithm::Sjf,
        }
    }

    /// Pick the next process for an idle CPU at tick `now`.
    ///
    /// RR pops the head of its queue. The others scan for the best arrived
    /// `Waiting` process by their own key. The caller must dispatch the
    /// result before asking again so it drops out of the next scan.
    pub fn select_next(&mut self, procs: &ProcessRegistry, now: Tick) -> Option<ProcIdx> {
        match self {
            Policy::RoundRobin { queue, .. } => queue.dequeue(),
            Policy::Fcfs => select_waiting(procs, now, |p| p.arrival),
            Policy::Sjf => select_waiting(procs, now, |p| p.burst),
            Policy::Srtf => select_waiting(procs, now, |p| p.remaining),
        }
    }
}

/// Whether `cand` beats `best` when their keys are equal: higher priority,
/// then earlier arrival. Full ties keep `best`.
fn wins_tie(cand: &SimProcess, best: &SimProcess) -> bool {
    cand.priority > best.priority
        || (cand.priority == best.priority && cand.arrival < best.arrival)
}

/// Best arrived `Waiting` process by smallest `key`, with the tie chain of
/// [`wins_tie`] and registry order as the last resort.
pub fn select_waiting<K>(procs: &ProcessRegistry, now: Tick, key: K) -> Option<ProcIdx>
where
    K: Fn(&SimProcess) -> Tick,
{
    let mut best: Option<(ProcIdx, &SimProcess)> = None;
    for (idx, p) in procs.indexed() {
        if p.state != ProcessState::Waiting || !p.has_arrived(now) {
            continue;
        }
        let better = match best {
            None => true,
            Some((_, b)) => key(p) < key(b) || (key(p) == key(b) && wins_tie(p, b)),
        };
        if better {
            best = Some((idx, p));
        }
    }
    best.map(|(idx, _)| idx)
}

/// SRTF preemption candidate: the arrived `Ready` process with the
/// shortest remaining time, then higher priority, then registry order.
pub fn srtf_candidate(procs: &ProcessRegistry, now: Tick) -> Option<ProcIdx> {
    let mut best: Option<(ProcIdx, &SimProcess)> = None;
    for (idx, p) in procs.indexed() {
        if p.state != ProcessState::Ready || !p.has_arrived(now) {
            continue;
        }
        let better = match best {
            None => true,
            Some((_, b)) => {
                p.remaining < b.remaining
                    || (p.remaining == b.remaining && p.priority > b.priority)
            }
        };
        if better {
            best = Some((idx, p));
        }
    }
    best.map(|(idx, _)| idx)
}

/// CPU the SRTF candidate should take over, by position in `cpus`.
///
/// The lowest-numbered idle CPU wins outright. Otherwise pick among CPUs
/// whose occupant has strictly more remaining time than the candidate the
/// one running the lowest-priority process, lowest CPU number on ties.
pub fn srtf_target(cpus: &[SimCpu], procs: &ProcessRegistry, cand: ProcIdx) -> Option<usize> {
    if let Some(i) = cpus.iter().position(SimCpu::is_idle) {
        return Some(i);
    }
    let remaining = procs[cand].remaining;
    let mut target: Option<(usize, i32)> = None;
    for (i, cpu) in cpus.iter().enumerate() {
        let Some(occupant) = cpu.current else {
            continue;
        };
        let victim = &procs[occupant];
        if remaining >= victim.remaining {
            continue;
        }
        if target.map_or(true, |(_, prio)| victim.priority < prio) {
            target = Some((i, victim.priority));
        }
    }
    target.map(|(i, _)| i)
}
