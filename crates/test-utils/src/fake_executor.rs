use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use cmdfeed::batch::CommandBatch;
use cmdfeed::errors::{CmdfeedError, Result};
use cmdfeed::exec::{BatchExecutor, BatchOutcome, IndividualReport};

/// A fake executor that:
/// - records every batch it was handed
/// - immediately reports an individual-mode success for all commands,
///   or a spawn failure when built with [`RecordingExecutor::failing`].
pub struct RecordingExecutor {
    executed: Arc<Mutex<Vec<CommandBatch>>>,
    fail: bool,
}

impl RecordingExecutor {
    pub fn new(executed: Arc<Mutex<Vec<CommandBatch>>>) -> Self {
        Self {
            executed,
            fail: false,
        }
    }

    pub fn failing(executed: Arc<Mutex<Vec<CommandBatch>>>) -> Self {
        Self {
            executed,
            fail: true,
        }
    }
}

impl BatchExecutor for RecordingExecutor {
    fn execute(
        &mut self,
        batch: CommandBatch,
    ) -> Pin<Box<dyn Future<Output = Result<BatchOutcome>> + Send + '_>> {
        let executed = Arc::clone(&self.executed);
        let fail = self.fail;

        Box::pin(async move {
            let completed = batch.len();
            executed.lock().unwrap().push(batch);

            if fail {
                return Err(CmdfeedError::Spawn {
                    tool: "fake".to_string(),
                    reason: "configured to fail".to_string(),
                });
            }

            Ok(BatchOutcome::Individual(IndividualReport {
                completed,
                failure: None,
            }))
        })
    }
}
