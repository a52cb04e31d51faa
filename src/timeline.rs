//! Per-tick, per-CPU occupancy table.
//!
//! Rows are stored densely in one buffer, `nr_cpus` cells per tick. When a
//! tick past the current capacity is recorded the capacity doubles until it
//! fits; existing rows keep their positions.

use tracing::debug;

use crate::types::{CpuId, Pid, Tick};

/// Number of tick rows allocated up front.
pub const INITIAL_TIMELINE_CAPACITY: usize = 1000;

/// Growable `[tick][cpu]` table of occupying PIDs (`None` = idle).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline {
    nr_cpus: usize,
    cells: Vec<Option<Pid>>,
    capacity: usize,
    len: usize,
}

impl Timeline {
    pub fn new(nr_cpus: u32) -> Self {
        Self::with_capacity(nr_cpus, INITIAL_TIMELINE_CAPACITY)
    }

    pub fn with_capacity(nr_cpus: u32, capacity: usize) -> Self {
        let nr_cpus = nr_cpus as usize;
        let capacity = capacity.max(1);
        Timeline {
            nr_cpus,
            cells: vec![None; capacity * nr_cpus],
            capacity,
            len: 0,
        }
    }

    /// Store the occupancy of every CPU at `tick`.
    ///
    /// `row` must yield one entry per CPU in CPU order.
    pub fn record(&mut self, tick: Tick, row: impl IntoIterator<Item = Option<Pid>>) {
        let t = tick as usize;
        if t >= self.capacity {
            self.grow_to_fit(t);
        }
        let base = t * self.nr_cpus;
        let mut n = 0;
        for (slot, pid) in self.cells[base..base + self.nr_cpus].iter_mut().zip(row) {
            *slot = pid;
            n += 1;
        }
        debug_assert_eq!(n, self.nr_cpus, "timeline row has wrong width");
        self.len = self.len.max(t + 1);
    }

    fn grow_to_fit(&mut self, t: usize) {
        let mut capacity = self.capacity;
        while t >= capacity {
            capacity *= 2;
        }
        debug!(from = self.capacity, to = capacity, "timeline grow");
        self.cells.resize(capacity * self.nr_cpus, None);
        self.capacity = capacity;
    }

    /// Occupant of `cpu` at `tick`; None if idle or never recorded.
    pub fn get(&self, tick: Tick, cpu: CpuId) -> Option<Pid> {
        self.row(tick).and_then(|row| row.get(cpu.index()).copied().flatten())
    }

    /// All CPUs at `tick`, or None past the last recorded tick.
    pub fn row(&self, tick: Tick) -> Option<&[Option<Pid>]> {
        let t = tick as usize;
        if t >= self.len {
            return None;
        }
        let base = t * self.nr_cpus;
        Some(&self.cells[base..base + self.nr_cpus])
    }

    /// Occupancy of one CPU over every recorded tick.
    pub fn cpu_column(&self, cpu: CpuId) -> impl Iterator<Item = Option<Pid>> + '_ {
        (0..self.len).map(move |t| self.cells[t * self.nr_cpus + cpu.index()])
    }

    /// Number of recorded ticks.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Allocated rows.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn nr_cpus(&self) -> u32 {
        self.nr_cpus as u32
    }
}
