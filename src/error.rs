//! Error types shared by every step of the hire workflow.
//!
//! [`OperationError`] is produced by the clients and the provisioner and is
//! classified exactly once, by the orchestrator, into an HTTP status code.

use std::fmt;

use thiserror::Error;

/// The remote system a request was sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Service {
    /// Pinpoint, the applicant-tracking service.
    Pinpoint,
    /// HiBob, the HR platform.
    HiBob,
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Service::Pinpoint => write!(f, "Pinpoint"),
            Service::HiBob => write!(f, "HiBob"),
        }
    }
}

/// Failure of a single workflow step.
#[derive(Debug, Error)]
pub enum OperationError {
    /// The caller sent something we cannot act on.
    #[error("{message}")]
    ClientInput { status: u16, message: String },

    /// A remote service answered with a non-success status, or the request
    /// never got an answer. `status` is `None` for transport failures.
    #[error("{service} request failed{}: {message}", fmt_status(.status))]
    RemoteService {
        service: Service,
        status: Option<u16>,
        message: String,
    },

    /// The connect or request timeout was exceeded.
    #[error("{service} request timed out")]
    RemoteTimeout { service: Service },

    /// A JSON document could not be understood. `service` is `None` when the
    /// document was the inbound webhook payload.
    #[error("failed to parse {}: {message}", fmt_origin(.service))]
    Parse {
        service: Option<Service>,
        message: String,
    },

    /// Every provisioning attempt hit an email conflict.
    #[error("exceeded max attempts ({attempts}) creating employee")]
    ResourceExhausted { attempts: u32 },
}

fn fmt_status(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" with status {code}"),
        None => String::new(),
    }
}

fn fmt_origin(service: &Option<Service>) -> String {
    match service {
        Some(service) => format!("{service} response"),
        None => "request body".to_string(),
    }
}

impl OperationError {
    pub fn client_input(status: u16, message: impl Into<String>) -> Self {
        Self::ClientInput {
            status,
            message: message.into(),
        }
    }

    pub fn invalid_payload(message: impl Into<String>) -> Self {
        Self::Parse {
            service: None,
            message: message.into(),
        }
    }

    pub fn invalid_response(service: Service, message: impl Into<String>) -> Self {
        Self::Parse {
            service: Some(service),
            message: message.into(),
        }
    }

    /// Converts a transport-level `reqwest` failure, keeping timeouts distinct.
    pub fn transport(service: Service, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::RemoteTimeout { service }
        } else {
            Self::RemoteService {
                service,
                status: None,
                message: err.to_string(),
            }
        }
    }

    /// HTTP status the webhook caller receives for this error.
    ///
    /// Upstream parse errors are folded into 500 since the caller did
    /// nothing wrong.
    pub fn status_code(&self) -> u16 {
        match self {
            OperationError::ClientInput { status, .. } => *status,
            OperationError::Parse { service: None, .. } => 400,
            OperationError::Parse { service: Some(_), .. }
            | OperationError::RemoteService { .. }
            | OperationError::RemoteTimeout { .. }
            | OperationError::ResourceExhausted { .. } => 500,
        }
    }

    /// Short, class-level message for the response body.
    pub fn summary(&self) -> &'static str {
        match self {
            OperationError::ClientInput { .. } => "Invalid webhook request",
            OperationError::Parse { service: None, .. } => "Invalid JSON payload",
            OperationError::Parse { service: Some(_), .. } => "Unexpected response from upstream service",
            OperationError::RemoteService { .. } | OperationError::RemoteTimeout { .. } => {
                "Upstream service request failed"
            }
            OperationError::ResourceExhausted { .. } => "Could not create employee",
        }
    }

    /// True when the error is the caller's fault rather than ours.
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}
