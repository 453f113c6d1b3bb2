use chrono::{DateTime, Utc};

use super::state::State;

/// What happened to the candidate's CV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadStatus {
    /// The application had no CV attachment.
    Skipped,
    Uploaded,
    /// The upload failed; the workflow carried on without it.
    Failed(String),
}

/// A single hire-event invocation as it moves through the state machine.
#[derive(Debug, Clone)]
pub struct Run {
    pub request_id: String,
    pub application_id: Option<String>,
    pub employee_id: Option<String>,
    pub state: State,
    pub state_history: Vec<State>,
    pub upload: Option<UploadStatus>,
    pub started_at: DateTime<Utc>,
}

impl Run {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            application_id: None,
            employee_id: None,
            state: State::Received,
            state_history: Vec::new(),
            upload: None,
            started_at: Utc::now(),
        }
    }
}

/// Record of a finished run, logged once per invocation.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub request_id: String,
    pub application_id: Option<String>,
    pub employee_id: Option<String>,
    pub final_state: State,
    pub state_transitions: Vec<State>,
    pub upload: Option<UploadStatus>,
    pub duration_ms: i64,
}

impl RunSummary {
    pub fn from_run(run: &Run) -> Self {
        let mut transitions = run.state_history.clone();
        transitions.push(run.state);

        Self {
            request_id: run.request_id.clone(),
            application_id: run.application_id.clone(),
            employee_id: run.employee_id.clone(),
            final_state: run.state,
            state_transitions: transitions,
            upload: run.upload.clone(),
            duration_ms: (Utc::now() - run.started_at).num_milliseconds(),
        }
    }

    /// Transitions rendered as `RECEIVED > VALIDATED > ...`.
    pub fn path(&self) -> String {
        self.state_transitions
            .iter()
            .map(State::to_string)
            .collect::<Vec<_>>()
            .join(" > ")
    }

    /// An employee exists in HiBob but the run did not complete.
    pub fn left_orphan(&self) -> bool {
        self.final_state == State::Errored && self.employee_id.is_some()
    }
}
