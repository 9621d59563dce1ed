//! Crate-level test doubles and BDD tests.

use std::sync::Mutex;

use crate::command::{Executor, Invocation};
use crate::error::CommandError;

mod behaviour;

/// Output returned by [`RecordingExecutor::failing`] on combined-output calls.
pub(crate) const FAILURE_OUTPUT: &str = "✗✗✗ Cannot find a release of package";

#[derive(Default, Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Outcome {
    #[default]
    Succeed,
    Fail,
}

/// Executor that records every invocation and answers with a fixed outcome.
#[derive(Default)]
pub(crate) struct RecordingExecutor {
    outcome: Outcome,
    calls: Mutex<Vec<Invocation>>,
}

impl RecordingExecutor {
    pub(crate) fn succeeding() -> Self {
        Self::default()
    }

    pub(crate) fn failing() -> Self {
        Self {
            outcome: Outcome::Fail,
            calls: Mutex::default(),
        }
    }

    pub(crate) fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub(crate) fn last(&self) -> Invocation {
        self.calls().pop().expect("at least one invocation recorded")
    }

    fn record(&self, invocation: &Invocation) {
        self.calls
            .lock()
            .expect("calls lock")
            .push(invocation.clone());
    }

    fn failure(invocation: &Invocation, output: &str) -> CommandError {
        CommandError::NonZeroExit {
            program: invocation.program().to_owned(),
            status: 1,
            output: output.to_owned(),
        }
    }
}

impl Executor for RecordingExecutor {
    fn combined_output(&self, invocation: &Invocation) -> Result<String, CommandError> {
        self.record(invocation);
        match self.outcome {
            Outcome::Succeed => Ok(invocation.args().join(" ")),
            Outcome::Fail => Err(Self::failure(invocation, FAILURE_OUTPUT)),
        }
    }

    fn run(&self, invocation: &Invocation) -> Result<(), CommandError> {
        self.record(invocation);
        match self.outcome {
            Outcome::Succeed => Ok(()),
            Outcome::Fail => Err(Self::failure(invocation, "")),
        }
    }
}
