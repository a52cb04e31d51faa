//! Trace event recording for the simulator.
//!
//! Every scheduling action (dispatch, SRTF preemption, RR quantum expiry,
//! completion) is recorded as a `TraceEvent` with the simulated tick and
//! the CPU it happened on.

use crate::types::{CpuId, Pid, Tick};

/// A single trace event produced by the simulator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEvent {
    /// Tick at which this event occurred. Completions are stamped with the
    /// finish time, i.e. the end of the last executed tick.
    pub tick: Tick,
    /// The CPU on which this event occurred.
    pub cpu: CpuId,
    /// The kind of event.
    pub kind: TraceKind,
}

/// The type of scheduling event recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceKind {
    /// A process was placed on this CPU.
    Dispatched { pid: Pid },
    /// A process was evicted by a shorter SRTF job.
    Preempted { pid: Pid },
    /// A process used up its RR quantum and was requeued.
    QuantumExpired { pid: Pid },
    /// A process finished its last unit of work.
    Completed { pid: Pid },
}

impl TraceKind {
    pub fn pid(self) -> Pid {
        match self {
            TraceKind::Dispatched { pid }
            | TraceKind::Preempted { pid }
            | TraceKind::QuantumExpired { pid }
            | TraceKind::Completed { pid } => pid,
        }
    }
}

/// A complete simulation trace, containing all events in chronological order.
#[derive(Debug, Clone, Default)]
pub struct Trace {
    events: Vec<TraceEvent>,
}

impl Trace {
    pub(crate) fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub(crate) fn record(&mut self, tick: Tick, cpu: CpuId, kind: TraceKind) {
        self.events.push(TraceEvent { tick, cpu, kind });
    }

    /// Get all events in chronological order.
    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    /// Total ticks a process spent on a CPU.
    ///
    /// Sums the intervals between each `Dispatched` and the next
    /// `Preempted`/`QuantumExpired`/`Completed` for that PID.
    pub fn total_runtime(&self, pid: Pid) -> Tick {
        let mut total: Tick = 0;
        let mut running_since: Option<Tick> = None;

        for event in &self.events {
            match event.kind {
                TraceKind::Dispatched { pid: p } if p == pid => {
                    running_since = Some(event.tick);
                }
                TraceKind::Preempted { pid: p }
                | TraceKind::QuantumExpired { pid: p }
                | TraceKind::Completed { pid: p }
                    if p == pid =>
                {
                    if let Some(start) = running_since.take() {
                        total += event.tick - start;
                    }
                }
                _ => {}
            }
        }

        total
    }

    fn count(&self, pred: impl Fn(TraceKind) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e.kind)).count()
    }

    /// Number of times a process was dispatched.
    pub fn dispatch_count(&self, pid: Pid) -> usize {
        self.count(|k| matches!(k, TraceKind::Dispatched { pid: p } if p == pid))
    }

    /// Number of times a process was preempted by SRTF.
    pub fn preempt_count(&self, pid: Pid) -> usize {
        self.count(|k| matches!(k, TraceKind::Preempted { pid: p } if p == pid))
    }

    /// Number of RR quantum expiries for a process.
    pub fn expiry_count(&self, pid: Pid) -> usize {
        self.count(|k| matches!(k, TraceKind::QuantumExpired { pid: p } if p == pid))
    }

    /// Pretty-print the trace for debugging.
    pub fn dump(&self) {
        for event in &self.events {
            let desc = match event.kind {
                TraceKind::Dispatched { pid } => format!("DISPATCH pid={pid}"),
                TraceKind::Preempted { pid } => format!("PREEMPT  pid={pid}"),
                TraceKind::QuantumExpired { pid } => format!("EXPIRE   pid={pid}"),
                TraceKind::Completed { pid } => format!("COMPLETE pid={pid}"),
            };
            eprintln!("[{:>8}] cpu={:<3} {}", event.tick, event.cpu, desc);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_spans_multiple_dispatches() {
        let mut trace = Trace::new();
        let pid = Pid(4);
        trace.record(0, CpuId(0), TraceKind::Dispatched { pid });
        trace.record(2, CpuId(0), TraceKind::QuantumExpired { pid });
        trace.record(3, CpuId(1), TraceKind::Dispatched { pid: Pid(5) });
        trace.record(5, CpuId(0), TraceKind::Dispatched { pid });
        trace.record(6, CpuId(0), TraceKind::Completed { pid });

        assert_eq!(trace.total_runtime(pid), 3);
        assert_eq!(trace.dispatch_count(pid), 2);
        assert_eq!(trace.expiry_count(pid), 1);
        assert_eq!(trace.preempt_count(pid), 0);
        assert_eq!(trace.dispatch_count(Pid(5)), 1);
        assert_eq!(trace.events()[2].kind.pid(), Pid(5));
    }
}
