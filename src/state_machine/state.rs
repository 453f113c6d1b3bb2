use std::fmt;

use super::run::Run;

/// States of a single hire-event invocation.
///
/// RECEIVED → VALIDATED → FETCHED → PROVISIONED → UPLOAD_ATTEMPTED | UPLOAD_SKIPPED
/// → ACKNOWLEDGED → COMPLETED, with ERRORED reachable from any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Received,
    Validated,
    Fetched,
    Provisioned,
    UploadAttempted,
    UploadSkipped,
    Acknowledged,
    Completed,
    Errored,
}

impl State {
    pub fn is_terminal(self) -> bool {
        matches!(self, State::Completed | State::Errored)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            State::Received => write!(f, "RECEIVED"),
            State::Validated => write!(f, "VALIDATED"),
            State::Fetched => write!(f, "FETCHED"),
            State::Provisioned => write!(f, "PROVISIONED"),
            State::UploadAttempted => write!(f, "UPLOAD_ATTEMPTED"),
            State::UploadSkipped => write!(f, "UPLOAD_SKIPPED"),
            State::Acknowledged => write!(f, "ACKNOWLEDGED"),
            State::Completed => write!(f, "COMPLETED"),
            State::Errored => write!(f, "ERRORED"),
        }
    }
}

/// Result of the step run while in the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Success,
    /// The step had nothing to do (no CV to upload).
    Skipped,
    Failure,
}

/// The result of evaluating a state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Advance to the next state.
    Next(State),
    /// The step failed; the run is now `Errored`.
    Abort { from: State },
    /// The run had already finished; nothing changed.
    Terminal(State),
}

/// Drives a [`Run`] through the hire workflow.
pub struct StateMachine;

impl StateMachine {
    /// Compute and apply the next transition for `run` given the outcome of
    /// the step executed in its current state.
    ///
    /// - A failure aborts to `Errored`, except in `Provisioned`: the CV upload
    ///   is best-effort, so a failed upload still counts as attempted.
    /// - `Skipped` only branches in `Provisioned`; elsewhere it advances like
    ///   a success.
    /// - `Completed` and `Errored` are terminal.
    pub fn next(run: &mut Run, outcome: StepOutcome) -> Transition {
        let current = run.state;
        if current.is_terminal() {
            return Transition::Terminal(current);
        }

        let transition = match (current, outcome) {
            (State::Provisioned, StepOutcome::Skipped) => Transition::Next(State::UploadSkipped),
            (State::Provisioned, _) => Transition::Next(State::UploadAttempted),
            (from, StepOutcome::Failure) => Transition::Abort { from },
            (State::Received, _) => Transition::Next(State::Validated),
            (State::Validated, _) => Transition::Next(State::Fetched),
            (State::Fetched, _) => Transition::Next(State::Provisioned),
            (State::UploadAttempted | State::UploadSkipped, _) => {
                Transition::Next(State::Acknowledged)
            }
            (State::Acknowledged, _) => Transition::Next(State::Completed),
            (State::Completed | State::Errored, _) => Transition::Terminal(current),
        };

        match transition {
            Transition::Next(next) => {
                run.state_history.push(current);
                run.state = next;
            }
            Transition::Abort { from } => {
                run.state_history.push(from);
                run.state = State::Errored;
            }
            Transition::Terminal(_) => {}
        }

        transition
    }
}
