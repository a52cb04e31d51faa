use schedsim::*;

#[macro_use]
mod common;

property_tests!(Algorithm::Rr);

/// Two processes alternate every quantum until the shorter one is done.
#[test]
fn test_alternation_with_quantum_two() {
    common::setup_test();
    let result = common::run(
        Algorithm::Rr,
        2,
        1,
        common::defs(&[(1, 0, 5, 0), (2, 0, 3, 0)]),
    );

    assert_eq!(
        common::cpu_row(&result, 0),
        [1, 1, 2, 2, 1, 1, 2, 1].map(Some)
    );
    assert_eq!(common::start(&result, 1), 0);
    assert_eq!(common::start(&result, 2), 2);
    assert_eq!(common::finish(&result, 2), 7);
    assert_eq!(common::finish(&result, 1), 8);

    assert_eq!(result.trace.expiry_count(Pid(1)), 2);
    assert_eq!(result.trace.expiry_count(Pid(2)), 1);
    assert_eq!(result.trace.dispatch_count(Pid(1)), 3);
    assert_eq!(result.trace.dispatch_count(Pid(2)), 2);
}

#[test]
fn test_quantum_one_cycles_through_queue() {
    common::setup_test();
    let result = common::run(Algorithm::Rr, 1, 1, workloads::identical(3, 2));
    assert_eq!(common::cpu_row(&result, 0), [1, 2, 3, 1, 2, 3].map(Some));
}

/// An arrival is queued ahead of the process whose quantum expires in the
/// same tick.
#[test]
fn test_arrival_queued_before_expired() {
    common::setup_test();
    let result = common::run(
        Algorithm::Rr,
        2,
        1,
        common::defs(&[(1, 0, 4, 0), (2, 2, 2, 0)]),
    );
    assert_eq!(common::cpu_row(&result, 0), [1, 1, 2, 2, 1, 1].map(Some));
    assert_eq!(common::finish(&result, 2), 4);
    assert_eq!(common::finish(&result, 1), 6);
}

/// With a quantum longer than any burst nothing is ever demoted.
#[test]
fn test_large_quantum_matches_fcfs() {
    common::setup_test();
    let defs = workloads::staggered(5, 3, 1);
    let rr = common::run(Algorithm::Rr, 100, 2, defs.clone());
    let fcfs = common::run(Algorithm::Fcfs, 2, 2, defs);
    assert_eq!(rr.timeline, fcfs.timeline);
    assert!(rr.trace.events().iter().all(|e| !matches!(e.kind, TraceKind::QuantumExpired { .. })));
}

#[test]
fn test_expired_process_moves_to_free_cpu() {
    common::setup_test();
    // P1 and P2 expire together at tick 2; P3 was queued first and takes
    // CPU 0, P1 follows on CPU 1, P2 waits.
    let result = common::run(Algorithm::Rr, 2, 2, workloads::identical(3, 4));
    assert_eq!(result.pid_at(2, CpuId(0)), Some(Pid(3)));
    assert_eq!(result.pid_at(2, CpuId(1)), Some(Pid(1)));
    assert_eq!(result.process(Pid(2)).unwrap().waiting_time, 2);
}

/// Enqueues beyond the queue capacity are dropped and counted; the run
/// still stops at the tick bound.
#[test]
fn test_ready_queue_overflow_is_recovered() {
    common::setup_test();
    let scenario = Scenario::builder()
        .processes(workloads::identical(MAX_PROCESSES + 1, 1))
        .tick_limit(600)
        .build();
    let result = Simulator::new(Algorithm::Rr).run(&scenario);

    assert_eq!(result.dropped_enqueues, 1);
    assert_eq!(result.exit, ExitKind::TickLimit { limit: 600 });
    assert_eq!(result.total_ticks, 600);
    assert_eq!(result.processes.completed_count(), MAX_PROCESSES);
    let lost = result.process(Pid(MAX_PROCESSES as i32 + 1)).unwrap();
    assert_eq!(lost.start_time, None);
    assert_eq!(lost.state, ProcessState::Ready);
}
