//! schedsim - Deterministic discrete-time simulator for classic CPU
//! scheduling algorithms.
//!
//! Processes with known arrival and burst times are scheduled on a pool of
//! identical CPUs, one tick at a time, under one of four policies:
//! First-Come First-Served, Round Robin, Shortest Remaining Time First and
//! Shortest Job First. A run yields a per-tick occupancy timeline, an event
//! trace and per-process and per-CPU statistics.
//!
//! # Architecture
//!
//! - **Engine**: Fixed-phase tick loop (admit, preempt, fill, record, execute)
//! - **Policy**: Selection rules and the Round Robin ready queue
//! - **Timeline**: Growable tick x CPU occupancy record
//! - **Stats/Report**: Derived metrics, text timeline and CSV datasets
//!
//! # Usage
//!
//! ```rust,no_run
//! use schedsim::*;
//!
//! let scenario = Scenario::builder()
//!     .cpus(2)
//!     .add_process(0, 5)
//!     .add_process(1, 3)
//!     .build();
//!
//! let result = Simulator::new(Algorithm::Rr).with_quantum(2).run(&scenario);
//! result.trace.dump();
//! let stats = SimStats::from_result(&result);
//! ```

pub mod config;
pub mod cpu;
pub mod engine;
pub mod fmt;
pub mod loader;
pub mod policy;
pub mod process;
pub mod ready_queue;
pub mod report;
pub mod scenario;
pub mod stats;
pub mod timeline;
pub mod trace;
pub mod types;
pub mod workloads;

// Re-export the main public types for convenience.
pub use config::{SimConfig, DEFAULT_TIME_QUANTUM};
pub use cpu::SimCpu;
pub use engine::{ExitKind, SimState, SimulationResult, Simulator};
pub use fmt::{sim_tick, FmtTick, SimFormat};
pub use loader::{load_workload, parse_workload, LoadError, Workload};
pub use policy::{Algorithm, ParseAlgorithmError, Policy};
pub use process::{ProcessDef, ProcessRegistry, ProcessState, SimProcess};
pub use ready_queue::{QueueFull, ReadyQueue, MAX_PROCESSES};
pub use report::{write_csv, write_header, write_report, ReportOptions};
pub use scenario::Scenario;
pub use stats::{MetricSummary, SimStats};
pub use timeline::Timeline;
pub use trace::{Trace, TraceEvent, TraceKind};
pub use types::{CpuId, Pid, ProcIdx, Tick};
