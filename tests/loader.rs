use std::io::Write;

use schedsim::*;

mod common;

fn workload_file(text: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_workload_file() {
    common::setup_test();
    let file = workload_file(
        "# pid arrival burst priority\n\
         1 0 5 2\n\
         \n\
         \t# indented comment\n\
         2 1 3\n\
         3 2 nope\n\
         4 3 0\n\
         5 4 2 1 extra\n",
    );

    let workload = load_workload(file.path()).unwrap();
    assert_eq!(
        workload.processes,
        [
            ProcessDef::new(Pid(1), 0, 5).with_priority(2),
            ProcessDef::new(Pid(2), 1, 3),
            ProcessDef::new(Pid(5), 4, 2).with_priority(1),
        ]
    );
    assert_eq!(workload.skipped, 2);
}

#[test]
fn test_windows_line_endings() {
    common::setup_test();
    let file = workload_file("1 0 2\r\n2 1 1\r\n");
    let workload = load_workload(file.path()).unwrap();
    assert_eq!(workload.processes.len(), 2);
    assert_eq!(workload.skipped, 0);
}

#[test]
fn test_only_comments_is_empty() {
    common::setup_test();
    let file = workload_file("# nothing here\n\n   \n");
    let workload = load_workload(file.path()).unwrap();
    assert!(workload.processes.is_empty());
    assert_eq!(workload.skipped, 0);
}

#[test]
fn test_missing_file_is_an_error() {
    common::setup_test();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.txt");
    let err = load_workload(&path).unwrap_err();
    let LoadError::Io { path: reported, .. } = &err;
    assert_eq!(reported, &path);
    assert!(err.to_string().contains("absent.txt"));
    assert!(std::error::Error::source(&err).is_some());
}

/// A loaded workload runs end to end through the library API.
#[test]
fn test_loaded_workload_runs() {
    common::setup_test();
    let file = workload_file("1 0 5\n2 0 3\n");
    let workload = load_workload(file.path()).unwrap();
    let config = SimConfig::new(file.path()).algorithm(Algorithm::Rr).quantum(2);
    let scenario = Scenario::builder()
        .cpus(config.nr_cpus)
        .processes(workload.processes)
        .build();
    let result = config.simulator().run(&scenario);
    assert!(result.all_completed());
    assert_eq!(result.total_ticks, 8);
}

/// A workload using the largest pid loads, builds and completes.
#[test]
fn test_max_pid_workload_runs() {
    common::setup_test();
    let file = workload_file("2147483647 0 3\n1 1 2\n");
    let workload = load_workload(file.path()).unwrap();
    assert_eq!(workload.skipped, 0);
    let scenario = Scenario::builder().processes(workload.processes).build();
    assert_eq!(scenario.processes[0].pid, Pid(i32::MAX));

    let result = Simulator::new(Algorithm::Fcfs).run(&scenario);
    assert!(result.all_completed());
    assert_eq!(result.total_ticks, 5);
}

/// Huge arrival times are skipped instead of overflowing the tick bound.
#[test]
fn test_huge_arrival_is_skipped() {
    common::setup_test();
    let file = workload_file("1 4000000000000000000 1\n2 0 2\n");
    let workload = load_workload(file.path()).unwrap();
    assert_eq!(workload.skipped, 1);
    let scenario = Scenario::builder().processes(workload.processes).build();
    let result = Simulator::new(Algorithm::Sjf).run(&scenario);
    assert!(result.all_completed());
    assert_eq!(result.total_ticks, 2);
}
