// tests/runtime_poll_loop.rs
mod common;
use crate::common::{TestResult, init_tracing, with_timeout};

use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

use tokio::sync::oneshot;

use cmdfeed::batch::CommandBatch;
use cmdfeed::config::ConfigFile;
use cmdfeed::engine::{Runtime, TickOutcome};
use cmdfeed::fs::FileSystem;
use cmdfeed::fs::mock::MockFileSystem;
use cmdfeed::session_log::SessionLog;
use cmdfeed_test_utils::builders::ConfigBuilder;
use cmdfeed_test_utils::fake_executor::RecordingExecutor;

const COMMANDS: &str = "/work/commands.txt";
const LOG: &str = "/work/execution.log";

struct Harness {
    fs: MockFileSystem,
    executed: Arc<Mutex<Vec<CommandBatch>>>,
    runtime: Runtime<RecordingExecutor>,
}

fn config() -> ConfigFile {
    ConfigBuilder::new("/opt/bw/bin/bwdesign")
        .commands_file(COMMANDS)
        .log_file(LOG)
        .build()
}

fn harness_with(executor: fn(Arc<Mutex<Vec<CommandBatch>>>) -> RecordingExecutor) -> Harness {
    init_tracing();

    let cfg = config();
    let fs = MockFileSystem::new();
    let shared: Arc<dyn FileSystem> = Arc::new(fs.clone());
    let log = SessionLog::new(LOG, Arc::clone(&shared));
    let executed = Arc::new(Mutex::new(Vec::new()));
    let runtime = Runtime::new(&cfg, shared, executor(Arc::clone(&executed)), log);

    Harness {
        fs,
        executed,
        runtime,
    }
}

fn harness() -> Harness {
    harness_with(RecordingExecutor::new)
}

fn executed_commands(h: &Harness) -> Vec<Vec<String>> {
    h.executed
        .lock()
        .unwrap()
        .iter()
        .map(|b| b.commands().to_vec())
        .collect()
}

#[tokio::test]
async fn missing_command_file_is_skipped_without_a_log_record() -> TestResult {
    let mut h = harness();

    assert_eq!(h.runtime.tick().await, TickOutcome::Missing);
    assert_eq!(h.runtime.tick().await, TickOutcome::Missing);

    assert!(h.executed.lock().unwrap().is_empty());
    assert!(h.fs.contents(LOG).is_none(), "session log must stay untouched");
    assert_eq!(h.runtime.core().last_modified(), None);
    Ok(())
}

#[tokio::test]
async fn unchanged_timestamp_never_runs_a_batch_twice() -> TestResult {
    let mut h = harness();
    h.fs.set_file_at(COMMANDS, "doSomething --flag\n", 100);

    assert!(matches!(h.runtime.tick().await, TickOutcome::Executed(_)));
    for _ in 0..3 {
        assert_eq!(h.runtime.tick().await, TickOutcome::Unchanged);
    }

    // Rewriting the contents without a newer mtime is still "unchanged".
    h.fs.set_file_at(COMMANDS, "somethingElse\n", 100);
    assert_eq!(h.runtime.tick().await, TickOutcome::Unchanged);

    assert_eq!(executed_commands(&h), vec![vec!["doSomething --flag".to_string()]]);
    Ok(())
}

#[tokio::test]
async fn newer_timestamp_runs_the_latest_snapshot() -> TestResult {
    let mut h = harness();
    h.fs.set_file_at(COMMANDS, "first\n", 100);
    h.runtime.tick().await;

    // Two writes between polls: only the latest contents are seen.
    h.fs.set_file_at(COMMANDS, "second\n", 110);
    h.fs.set_file_at(COMMANDS, "third\n", 120);
    assert!(matches!(h.runtime.tick().await, TickOutcome::Executed(_)));

    // An older timestamp (e.g. a restored file) is ignored.
    h.fs.set_file_at(COMMANDS, "stale\n", 50);
    assert_eq!(h.runtime.tick().await, TickOutcome::Unchanged);

    assert_eq!(
        executed_commands(&h),
        vec![vec!["first".to_string()], vec!["third".to_string()]]
    );
    assert_eq!(
        h.runtime.core().last_modified(),
        Some(SystemTime::UNIX_EPOCH + Duration::from_secs(120))
    );
    Ok(())
}

#[tokio::test]
async fn file_reappearing_after_removal_with_same_mtime_is_not_rerun() -> TestResult {
    let mut h = harness();
    h.fs.set_file_at(COMMANDS, "first\n", 100);
    h.runtime.tick().await;

    h.fs.remove(COMMANDS);
    assert_eq!(h.runtime.tick().await, TickOutcome::Missing);

    h.fs.set_file_at(COMMANDS, "first\n", 100);
    assert_eq!(h.runtime.tick().await, TickOutcome::Unchanged);
    assert_eq!(h.executed.lock().unwrap().len(), 1);
    Ok(())
}

#[tokio::test]
async fn empty_batch_is_recorded_but_not_executed() -> TestResult {
    let mut h = harness();
    h.fs.set_file_at(COMMANDS, "# only a comment\n\n", 100);

    assert_eq!(h.runtime.tick().await, TickOutcome::Empty);
    assert!(h.executed.lock().unwrap().is_empty());

    let log = h.fs.contents(LOG).unwrap_or_default();
    assert!(log.contains("No commands found in /work/commands.txt"), "log was: {log}");

    // The snapshot counts as seen.
    assert_eq!(h.runtime.tick().await, TickOutcome::Unchanged);
    Ok(())
}

#[tokio::test]
async fn metadata_errors_are_transient() -> TestResult {
    let mut h = harness();
    h.fs.set_file_at(COMMANDS, "first\n", 100);
    h.fs.break_metadata(COMMANDS);

    assert_eq!(h.runtime.tick().await, TickOutcome::MetadataError);
    assert!(h.executed.lock().unwrap().is_empty());
    assert!(h.fs.contents(LOG).is_none());
    Ok(())
}

#[tokio::test]
async fn executor_errors_do_not_stop_the_loop() -> TestResult {
    let mut h = harness_with(RecordingExecutor::failing);
    h.fs.set_file_at(COMMANDS, "bwdesign -p proj\n", 100);

    assert_eq!(h.runtime.tick().await, TickOutcome::ExecutionFailed);

    h.fs.set_file_at(COMMANDS, "bwdesign -p other\n", 200);
    assert_eq!(h.runtime.tick().await, TickOutcome::ExecutionFailed);

    assert_eq!(h.executed.lock().unwrap().len(), 2);
    Ok(())
}

#[tokio::test]
async fn run_until_polls_on_interval_and_stops_on_shutdown() -> TestResult {
    with_timeout(async {
        let h = harness();
        let fs = h.fs.clone();
        let executed = Arc::clone(&h.executed);
        fs.set_file_at(COMMANDS, "first\n", 100);

        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(h.runtime.run_until(async {
            let _ = stop_rx.await;
        }));

        wait_for(|| executed.lock().unwrap().len() == 1).await;

        fs.set_file_at(COMMANDS, "second\n", 200);
        wait_for(|| executed.lock().unwrap().len() == 2).await;

        stop_tx.send(()).ok();
        handle.await?;

        let batches: Vec<_> = executed
            .lock()
            .unwrap()
            .iter()
            .map(|b| b.commands().to_vec())
            .collect();
        assert_eq!(batches, vec![vec!["first".to_string()], vec!["second".to_string()]]);
        Ok(())
    })
    .await
}

async fn wait_for(mut done: impl FnMut() -> bool) {
    while !done() {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}
