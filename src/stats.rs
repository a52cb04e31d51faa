//! Derived performance statistics.
//!
//! Turns the final process and CPU state of a run into the numbers the
//! reports show:
//!
//! - **Per process**: start, finish, turnaround, waiting, response
//! - **Per CPU**: busy and idle ticks, utilization
//! - **Aggregate**: distributions over completed processes only
//!
//! Waiting time is reported as `max(0, turnaround - burst)`. The engine's
//! own per-tick waiting counter is carried alongside as `accrued_waiting`.

use crate::engine::SimulationResult;
use crate::types::{CpuId, Pid, Tick};

/// Count, total and range of one metric over completed processes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricSummary {
    pub count: usize,
    pub total: Tick,
    /// `(min, max)`, None until the first sample.
    pub range: Option<(Tick, Tick)>,
}

impl MetricSummary {
    pub fn record(&mut self, value: Tick) {
        self.count += 1;
        self.total = self.total.saturating_add(value);
        self.range = Some(match self.range {
            None => (value, value),
            Some((lo, hi)) => (lo.min(value), hi.max(value)),
        });
    }

    pub fn min(&self) -> Option<Tick> {
        self.range.map(|(lo, _)| lo)
    }

    pub fn max(&self) -> Option<Tick> {
        self.range.map(|(_, hi)| hi)
    }

    /// 0.0 when empty.
    pub fn mean(&self) -> f64 {
        match self.count {
            0 => 0.0,
            n => self.total as f64 / n as f64,
        }
    }
}

impl Extend<Tick> for MetricSummary {
    fn extend<I: IntoIterator<Item = Tick>>(&mut self, iter: I) {
        iter.into_iter().for_each(|v| self.record(v));
    }
}

impl FromIterator<Tick> for MetricSummary {
    fn from_iter<I: IntoIterator<Item = Tick>>(iter: I) -> Self {
        let mut summary = MetricSummary::default();
        summary.extend(iter);
        summary
    }
}

/// Per-process statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessStats {
    pub pid: Pid,
    pub arrival: Tick,
    pub burst: Tick,
    pub priority: i32,
    pub start: Option<Tick>,
    pub finish: Option<Tick>,
    pub turnaround: Option<Tick>,
    pub waiting: Option<Tick>,
    pub response: Option<Tick>,
    /// Ticks counted by the engine while arrived and not running.
    pub accrued_waiting: Tick,
}

impl ProcessStats {
    pub fn is_completed(&self) -> bool {
        self.finish.is_some()
    }
}

/// Per-CPU statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct CpuStats {
    pub cpu: CpuId,
    pub busy: Tick,
    pub idle: Tick,
    /// Busy share of elapsed ticks, in percent.
    pub utilization: f64,
}

/// Averages over completed processes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AverageStats {
    pub turnaround: MetricSummary,
    pub waiting: MetricSummary,
    pub response: MetricSummary,
}

impl AverageStats {
    /// Number of completed processes the averages cover.
    pub fn completed(&self) -> usize {
        self.turnaround.count
    }
}

/// All statistics for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimStats {
    pub processes: Vec<ProcessStats>,
    pub cpus: Vec<CpuStats>,
    /// None when no process completed.
    pub averages: Option<AverageStats>,
    pub total_ticks: Tick,
}

impl SimStats {
    /// Compute statistics from a simulation result.
    pub fn from_result(result: &SimulationResult) -> Self {
        let processes: Vec<ProcessStats> = result
            .processes
            .iter()
            .map(|p| ProcessStats {
                pid: p.pid,
                arrival: p.arrival,
                burst: p.burst,
                priority: p.priority,
                start: p.start_time,
                finish: p.finish_time,
                turnaround: p.turnaround(),
                waiting: p.reported_waiting(),
                response: p.response_time,
                accrued_waiting: p.waiting_time,
            })
            .collect();

        let cpus = result
            .cpus
            .iter()
            .map(|c| CpuStats {
                cpu: c.id,
                busy: c.busy_time,
                idle: c.idle_time,
                utilization: c.utilization(),
            })
            .collect();

        let completed: Vec<_> = processes
            .iter()
            .filter_map(|ps| Some((ps.turnaround?, ps.waiting?, ps.response?)))
            .collect();
        let averages = AverageStats {
            turnaround: completed.iter().map(|c| c.0).collect(),
            waiting: completed.iter().map(|c| c.1).collect(),
            response: completed.iter().map(|c| c.2).collect(),
        };

        SimStats {
            processes,
            cpus,
            averages: (averages.completed() > 0).then_some(averages),
            total_ticks: result.total_ticks,
        }
    }

    /// Total busy ticks across all CPUs.
    pub fn total_busy(&self) -> Tick {
        self.cpus.iter().map(|c| c.busy).sum()
    }
}
