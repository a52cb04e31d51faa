#![allow(dead_code)]

use schedsim::*;

/// Initialize tracing from `RUST_LOG` with the simulated-tick formatter.
///
/// `try_init()` is idempotent: first call in the process succeeds,
/// subsequent calls are silently ignored.
pub fn setup_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .event_format(SimFormat)
        .try_init();
}

/// Processes as `(pid, arrival, burst, priority)` tuples.
pub fn defs(specs: &[(i32, Tick, Tick, i32)]) -> Vec<ProcessDef> {
    specs
        .iter()
        .map(|&(pid, arrival, burst, prio)| {
            ProcessDef::new(Pid(pid), arrival, burst).with_priority(prio)
        })
        .collect()
}

pub fn run(algorithm: Algorithm, quantum: Tick, nr_cpus: u32, defs: Vec<ProcessDef>) -> SimulationResult {
    let scenario = Scenario::builder().cpus(nr_cpus).processes(defs).build();
    let result = Simulator::new(algorithm).with_quantum(quantum).run(&scenario);
    result.trace.dump();
    result
}

pub fn start(result: &SimulationResult, pid: i32) -> Tick {
    result
        .process(Pid(pid))
        .and_then(|p| p.start_time)
        .unwrap_or_else(|| panic!("pid {pid} never started"))
}

pub fn finish(result: &SimulationResult, pid: i32) -> Tick {
    result
        .process(Pid(pid))
        .and_then(|p| p.finish_time)
        .unwrap_or_else(|| panic!("pid {pid} never finished"))
}

/// Occupants of one CPU over the whole run.
pub fn cpu_row(result: &SimulationResult, cpu: u32) -> Vec<Option<i32>> {
    result
        .timeline
        .cpu_column(CpuId(cpu))
        .map(|p| p.map(|p| p.0))
        .collect()
}

/// Workloads the property suite runs every algorithm against.
pub fn property_workloads() -> Vec<Vec<ProcessDef>> {
    let mut all = vec![
        workloads::identical(4, 3),
        workloads::staggered(5, 4, 2),
        workloads::convoy(12, 4, 1),
    ];
    all.extend((1..=5).map(|seed| workloads::mixed(12, 15, 6, seed)));
    all
}

/// Generate the common property suite for one algorithm.
///
/// ```ignore
/// #[macro_use]
/// mod common;
/// property_tests!(Algorithm::Sjf);
/// ```
#[macro_export]
macro_rules! property_tests {
    ($algorithm:expr) => {
        const CPU_COUNTS: [u32; 3] = [1, 2, 3];

        fn each_run(mut check: impl FnMut(&SimulationResult, &[ProcessDef], u32)) {
            for nr_cpus in CPU_COUNTS {
                for defs in common::property_workloads() {
                    let result = common::run($algorithm, 2, nr_cpus, defs.clone());
                    assert!(result.all_completed(), "run hit the tick limit");
                    check(&result, &defs, nr_cpus);
                }
            }
        }

        /// Every unit of burst is executed exactly once.
        #[test]
        fn test_work_is_conserved() {
            common::setup_test();
            each_run(|result, defs, _| {
                let busy: Tick = result.cpus.iter().map(|c| c.busy_time).sum();
                let burst: Tick = defs.iter().map(|d| d.burst).sum();
                assert_eq!(busy, burst);
                for cpu in &result.cpus {
                    assert_eq!(cpu.busy_time + cpu.idle_time, result.total_ticks);
                }
            });
        }

        #[test]
        fn test_process_times_are_consistent() {
            common::setup_test();
            each_run(|result, _, _| {
                for p in result.processes.iter() {
                    let start = p.start_time.unwrap();
                    let finish = p.finish_time.unwrap();
                    assert!(start >= p.arrival, "pid {} started before arrival", p.pid);
                    assert!(finish - p.arrival >= p.burst, "pid {} finished too early", p.pid);
                    assert_eq!(p.response_time, Some(start - p.arrival));
                    assert_eq!(p.remaining, 0);
                }
            });
        }

        /// Start time is fixed by the first dispatch and runtime adds up to
        /// the burst, however often a process was dispatched.
        #[test]
        fn test_start_time_is_first_dispatch() {
            common::setup_test();
            each_run(|result, _, _| {
                for p in result.processes.iter() {
                    let first = result
                        .trace
                        .events()
                        .iter()
                        .find(|e| e.kind == TraceKind::Dispatched { pid: p.pid })
                        .map(|e| e.tick);
                    assert_eq!(first, p.start_time);
                    assert_eq!(result.trace.total_runtime(p.pid), p.burst);

                    let ticks_on_cpu = (0..result.total_ticks)
                        .flat_map(|t| result.timeline.row(t).unwrap().iter())
                        .filter(|slot| **slot == Some(p.pid))
                        .count();
                    assert_eq!(ticks_on_cpu as Tick, p.burst);
                }
            });
        }

        /// No CPU sits idle while an arrived, unfinished process is off-CPU.
        #[test]
        fn test_no_idle_cpu_with_pending_work() {
            common::setup_test();
            each_run(|result, _, nr_cpus| {
                for t in 0..result.total_ticks {
                    let busy = result
                        .timeline
                        .row(t)
                        .unwrap()
                        .iter()
                        .filter(|slot| slot.is_some())
                        .count();
                    let pending = result
                        .processes
                        .iter()
                        .filter(|p| p.arrival <= t && p.finish_time.unwrap() > t)
                        .count();
                    assert_eq!(busy, pending.min(nr_cpus as usize), "tick {t}");
                }
            });
        }

        #[test]
        fn test_runs_are_deterministic() {
            common::setup_test();
            for nr_cpus in CPU_COUNTS {
                for defs in common::property_workloads() {
                    let a = common::run($algorithm, 2, nr_cpus, defs.clone());
                    let b = common::run($algorithm, 2, nr_cpus, defs);
                    assert_eq!(a.timeline, b.timeline);
                    assert_eq!(a.trace.events(), b.trace.events());
                }
            }
        }

        /// Indistinguishable processes are served in registry order.
        #[test]
        fn test_ties_follow_registry_order() {
            common::setup_test();
            let result = common::run($algorithm, 2, 1, workloads::identical(3, 2));
            assert_eq!(common::start(&result, 1), 0);
            assert_eq!(common::start(&result, 2), 2);
            assert_eq!(common::start(&result, 3), 4);
        }

        #[test]
        fn test_single_process() {
            common::setup_test();
            let result = common::run($algorithm, 2, 2, common::defs(&[(7, 3, 4, 0)]));
            assert_eq!(common::start(&result, 7), 3);
            assert_eq!(common::finish(&result, 7), 7);
            assert_eq!(result.total_ticks, 7);
            assert_eq!(result.cpus[0].idle_time, 3);
            assert_eq!(result.cpus[1].busy_time, 0);
        }

        #[test]
        fn test_waiting_counter_matches_reported_waiting() {
            common::setup_test();
            each_run(|result, _, _| {
                for p in result.processes.iter() {
                    assert_eq!(Some(p.waiting_time), p.reported_waiting(), "pid {}", p.pid);
                }
            });
        }
    };
}
