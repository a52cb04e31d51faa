//! Simulated CPU state.

use crate::types::{CpuId, ProcIdx, Tick};

/// A simulated CPU.
#[derive(Debug, Clone)]
pub struct SimCpu {
    /// CPU ID.
    pub id: CpuId,
    /// Registry index of the running process, or None if idle.
    pub current: Option<ProcIdx>,
    /// Ticks spent running a process.
    pub busy_time: Tick,
    /// Ticks spent with nothing to run.
    pub idle_time: Tick,
}

impl SimCpu {
    pub fn new(id: CpuId) -> Self {
        SimCpu {
            id,
            current: None,
            busy_time: 0,
            idle_time: 0,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.current.is_none()
    }

    /// Busy share of elapsed ticks, as a percentage. 0 before any tick.
    pub fn utilization(&self) -> f64 {
        let total = self.busy_time + self.idle_time;
        if total == 0 {
            0.0
        } else {
            100.0 * self.busy_time as f64 / total as f64
        }
    }
}
