mod run;
mod state;

pub use run::{Run, RunSummary, UploadStatus};
pub use state::{State, StateMachine, StepOutcome, Transition};
