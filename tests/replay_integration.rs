//! Integration tests for trace files, replay and sweeps.
//!
//! These tests go through real files on disk, the way the binary does.

use std::fs;
use std::io::Write;
use std::path::Path;

use epochsim::trace::{InstructionWindow, Replayer, TraceReader, TraceRecord};
use epochsim::{BufferSimulator, Error, SimulatorConfig, SweepPlan};
use tempfile::tempdir;

fn write_trace(path: &Path, records: &[TraceRecord]) {
    let mut file = fs::File::create(path).unwrap();
    for record in records {
        writeln!(file, "{}", record).unwrap();
    }
}

/// Mixed reads and writes over a working set larger than the test buffers.
fn workload(n: u64) -> Vec<TraceRecord> {
    (0..n)
        .map(|i| {
            let address = (i * 7_919) % 300 * 128;
            if i % 4 == 0 {
                TraceRecord::read(address, 3)
            } else {
                TraceRecord::write(address, 2)
            }
        })
        .collect()
}

/// A file replays exactly like the same records held in memory.
#[test]
fn test_file_replay_matches_memory_replay() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("workload.trace");
    let records = workload(5_000);
    write_trace(&path, &records);

    let config = SimulatorConfig::new(32, 7, false);
    let window = InstructionWindow::new(1_000, 6_000);

    let mut from_file = vec![BufferSimulator::new(config).unwrap()];
    let reader = TraceReader::open(&path).unwrap();
    let file_summary = Replayer::new(window).replay(reader, &mut from_file).unwrap();

    let mut from_memory = vec![BufferSimulator::new(config).unwrap()];
    let memory_summary = Replayer::new(window).replay_slice(&records, &mut from_memory);

    assert_eq!(file_summary, memory_summary);
    assert_eq!(
        from_file[0].basic_stats().snapshot(),
        from_memory[0].basic_stats().snapshot()
    );
    assert!(file_summary.writes_in_window > 0);
    assert!(from_file[0].basic_stats().epoch_count() > 0);
}

/// Two reads of the same file agree on the digest.
#[test]
fn test_checksum_stable_across_reads() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.trace");
    write_trace(&path, &workload(500));

    let mut first = TraceReader::open(&path).unwrap();
    let mut second = TraceReader::open(&path).unwrap();
    first.by_ref().for_each(|r| assert!(r.is_ok()));
    second.by_ref().for_each(|r| assert!(r.is_ok()));

    assert_eq!(first.records(), 500);
    assert_eq!(first.checksum(), second.checksum());
}

/// A malformed line stops the sweep with its line number.
#[test]
fn test_malformed_trace_reports_line() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.trace");
    fs::write(&path, "0 64 1\n1 128 1\n0 192\n0 256 1\n").unwrap();

    let plan = SweepPlan::reference(4);
    let reader = TraceReader::open(&path).unwrap();
    let result = plan.run_sequential(reader, InstructionWindow::unbounded());

    match result {
        Err(Error::MalformedRecord { line, .. }) => assert_eq!(line, 3),
        other => panic!("Expected MalformedRecord, got {:?}", other),
    }
}

/// Sequential streaming from a file and parallel replay from memory agree.
#[test]
fn test_sweep_modes_agree_on_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sweep.trace");
    let records = workload(8_000);
    write_trace(&path, &records);

    let plan = SweepPlan::reference(16);
    let window = InstructionWindow::unbounded();

    let sequential = plan
        .run_sequential(TraceReader::open(&path).unwrap(), window)
        .unwrap();
    let loaded: Vec<TraceRecord> = TraceReader::open(&path)
        .unwrap()
        .collect::<epochsim::Result<_>>()
        .unwrap();
    let parallel = plan.run_parallel(&loaded, window).unwrap();

    assert_eq!(sequential, parallel);
    assert_eq!(sequential.rows.len(), 6);

    // Report rows lead with the block exponent, in plan order
    let lines: Vec<String> = sequential.rows.iter().map(|r| r.to_string()).collect();
    let leading: Vec<&str> = lines
        .iter()
        .map(|l| l.split('\t').next().unwrap())
        .collect();
    assert_eq!(leading, vec!["6", "8", "10", "12", "14", "16"]);
    assert!(lines.iter().all(|l| l.split('\t').count() == 4));
}

/// Larger blocks coalesce more writes into fewer misses.
#[test]
fn test_larger_blocks_fewer_misses() {
    let records: Vec<TraceRecord> = (0..4_096u64).map(|i| TraceRecord::write(i * 64, 1)).collect();
    let plan = SweepPlan::new(vec![
        SimulatorConfig::new(64, 6, false),
        SimulatorConfig::new(64, 12, true),
    ]);

    let outcome = plan.run_parallel(&records, InstructionWindow::unbounded()).unwrap();

    let small = outcome.rows[0].counters;
    let large = outcome.rows[1].counters;
    assert_eq!(small.misses, 4_096);
    assert_eq!(large.misses, 64);
    assert_eq!(large.hits, 4_096 - 64);
}
