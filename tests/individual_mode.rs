// tests/individual_mode.rs
#![cfg(unix)]

mod common;
use crate::common::{TestResult, init_tracing, with_timeout};

use std::sync::Arc;

use tempfile::tempdir;

use cmdfeed::batch::parse_batch;
use cmdfeed::exec::{BatchExecutor, BatchOutcome, RealBatchExecutor, run_individual};
use cmdfeed::session_log::SessionLog;
use cmdfeed_test_utils::builders::ConfigBuilder;
use cmdfeed_test_utils::tool::{individual_body, read_breadcrumb, write_tool_script};

#[tokio::test]
async fn single_command_batch_runs_once_and_records_success() -> TestResult {
    with_timeout(async {
        init_tracing();

        let dir = tempdir()?;
        let exe = write_tool_script(dir.path(), "bwdesign", individual_body())?;
        let log_path = dir.path().join("execution.log");
        let cfg = Arc::new(ConfigBuilder::new(&exe).log_file(&log_path).build());
        let log = SessionLog::on_disk(&log_path);

        let batch = parse_batch("# comment\n\ndoSomething --flag\n");
        let mut executor = RealBatchExecutor::new(Arc::clone(&cfg), log);
        let outcome = executor.execute(batch).await?;

        match outcome {
            BatchOutcome::Individual(report) => {
                assert_eq!(report.completed, 1);
                assert!(report.failure.is_none());
            }
            other => panic!("expected individual mode, got {:?}", other),
        }

        // Every token, including the first, is passed to the executable.
        assert_eq!(read_breadcrumb(dir.path(), "invocations.txt"), "doSomething --flag\n");

        let log = std::fs::read_to_string(&log_path)?;
        assert!(log.contains("Starting execution of 1 commands at "));
        assert!(log.contains("Command 1 completed successfully: doSomething --flag"));
        assert!(log.contains("Command output: ok doSomething --flag"));
        Ok(())
    })
    .await
}

#[tokio::test]
async fn failure_aborts_the_rest_of_the_batch() -> TestResult {
    with_timeout(async {
        init_tracing();

        let dir = tempdir()?;
        let exe = write_tool_script(dir.path(), "tool", individual_body())?;
        let log_path = dir.path().join("execution.log");
        let cfg = ConfigBuilder::new(&exe)
            .log_file(&log_path)
            .individual_command_delay("10ms")
            .build();
        let log = SessionLog::on_disk(&log_path);

        let batch = parse_batch("first step\nfail second\nthird step\nfourth step\n");
        let report = run_individual(&cfg, &log, &batch).await;

        assert_eq!(report.completed, 1);
        let failure = report.failure.expect("second command must fail");
        assert_eq!(failure.index, 2);
        assert_eq!(failure.command, "fail second");
        assert_eq!(failure.exit_code, Some(3));
        assert!(failure.output.contains("boom: fail second"));

        assert_eq!(
            read_breadcrumb(dir.path(), "invocations.txt"),
            "first step\nfail second\n"
        );

        let log = std::fs::read_to_string(&log_path)?;
        assert!(log.contains("Command 1 completed successfully: first step"));
        assert!(log.contains("Command 2 failed: fail second - "));
        assert!(log.contains("boom: fail second"));
        assert!(!log.contains("Command 3"));
        assert!(!log.contains("third step"));
        Ok(())
    })
    .await
}

#[tokio::test]
async fn spawn_error_counts_as_a_command_failure() -> TestResult {
    with_timeout(async {
        init_tracing();

        let dir = tempdir()?;
        let log_path = dir.path().join("execution.log");
        let cfg = ConfigBuilder::new(dir.path().join("missing-tool"))
            .log_file(&log_path)
            .build();
        let log = SessionLog::on_disk(&log_path);

        let report = run_individual(&cfg, &log, &parse_batch("one\ntwo\n")).await;

        assert_eq!(report.completed, 0);
        let failure = report.failure.expect("spawn must fail");
        assert_eq!(failure.index, 1);
        assert_eq!(failure.exit_code, None);
        assert!(failure.reason.contains("failed to start"));

        let log = std::fs::read_to_string(&log_path)?;
        assert!(log.contains("Command 1 failed: one - failed to start"));
        assert!(!log.contains("Command 2"));
        Ok(())
    })
    .await
}
