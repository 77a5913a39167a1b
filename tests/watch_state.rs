// tests/watch_state.rs
mod common;
use crate::common::{TestResult, init_tracing};

use std::time::{Duration, SystemTime};

use proptest::prelude::*;
use tempfile::tempdir;

use cmdfeed::engine::{Observation, PollDecision, WatchCore};
use cmdfeed::session_log::{SessionLog, timestamp};

fn at(secs: u64) -> Observation {
    Observation::Modified(SystemTime::UNIX_EPOCH + Duration::from_secs(secs))
}

#[test]
fn first_observed_timestamp_always_executes() {
    init_tracing();

    let mut core = WatchCore::new();
    assert_eq!(core.step(&at(0)), PollDecision::Execute);
    assert_eq!(core.last_modified(), Some(SystemTime::UNIX_EPOCH));
}

#[test]
fn missing_and_unreadable_never_move_the_watermark() {
    let mut core = WatchCore::new();
    assert_eq!(core.step(&Observation::Missing), PollDecision::Skip);
    assert_eq!(
        core.step(&Observation::Unreadable("permission denied".into())),
        PollDecision::Skip
    );
    assert_eq!(core.last_modified(), None);

    core.step(&at(10));
    assert_eq!(core.step(&Observation::Missing), PollDecision::Skip);
    assert_eq!(core.step(&at(10)), PollDecision::Unchanged);
}

proptest! {
    #[test]
    fn executes_exactly_on_new_maxima(
        times in proptest::collection::vec(prop_oneof![
            (0u64..50).prop_map(Some),
            Just(None),
        ], 0..40)
    ) {
        let mut core = WatchCore::new();
        let mut best: Option<u64> = None;

        for t in times {
            match t {
                None => {
                    prop_assert_eq!(core.step(&Observation::Missing), PollDecision::Skip);
                }
                Some(t) => {
                    let expected = if best.is_none_or(|b| t > b) {
                        best = Some(t);
                        PollDecision::Execute
                    } else {
                        PollDecision::Unchanged
                    };
                    prop_assert_eq!(core.step(&at(t)), expected);
                }
            }
            prop_assert_eq!(
                core.last_modified(),
                best.map(|b| SystemTime::UNIX_EPOCH + Duration::from_secs(b))
            );
        }
    }
}

#[test]
fn session_log_appends_newline_terminated_records() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join("execution.log");
    let log = SessionLog::on_disk(&path);

    log.append("first record");
    log.append("second record\n");

    assert_eq!(
        std::fs::read_to_string(&path)?,
        "first record\nsecond record\n"
    );
    assert_eq!(log.path(), path.as_path());
    Ok(())
}

#[test]
fn unwritable_session_log_is_not_fatal() -> TestResult {
    let dir = tempdir()?;
    // A directory cannot be opened for appending.
    let log = SessionLog::on_disk(dir.path());
    log.append("lost record");
    Ok(())
}

#[test]
fn timestamps_are_rfc3339_utc() {
    let ts = timestamp();
    assert!(ts.ends_with('Z'), "unexpected timestamp {ts}");
    assert!(ts.contains('T'));
}
