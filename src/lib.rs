//! Pinpoint → HiBob hire integration.
//!
//! When Pinpoint reports an `application_hired` event, [`HireOrchestrator`]
//! fetches the candidate, creates the employee in HiBob, copies the CV over
//! when there is one, and leaves a confirmation comment on the application.

pub mod cli;
pub mod config;
pub mod error;
pub mod event;
pub mod hibob;
pub mod http;
pub mod orchestrator;
pub mod pinpoint;
pub mod records;
pub mod response;
pub mod server;
pub mod state_machine;
pub mod telemetry;

pub use config::HireSyncConfig;
pub use error::{OperationError, Service};
pub use orchestrator::HireOrchestrator;
pub use response::{HandlerResponse, WorkflowResult};
