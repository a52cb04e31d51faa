//! Newtype wrappers and type aliases for domain concepts.
//!
//! Newtypes for identifiers (PIDs, CPU IDs, registry slots) prevent silent
//! type confusion between a process's user-visible id and its position in
//! the registry. Plain quantities (ticks) use a type alias.

use std::fmt;

/// Process identifier as given in the workload description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Pid(pub i32);

/// CPU identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct CpuId(pub u32);

/// Position of a process in the [`ProcessRegistry`](crate::ProcessRegistry).
///
/// CPUs and the ready queue refer to processes through this index; the
/// registry stays the only owner of the records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProcIdx(pub usize);

/// Simulated time, in ticks.
pub type Tick = u64;

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for CpuId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl CpuId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}
