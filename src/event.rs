//! The inbound `application_hired` webhook event.

use std::fmt;

use serde_json::Value;

use crate::error::OperationError;

/// The only event type this handler acts on.
pub const HIRED_EVENT: &str = "application_hired";

/// Pinpoint application identifier, normalized to a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(transparent)]
pub struct ApplicationId(String);

impl ApplicationId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ApplicationId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated hire event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HireEvent {
    pub event_type: String,
    pub application_id: ApplicationId,
    pub job_id: Option<String>,
}

impl HireEvent {
    /// Parse and validate a raw webhook body.
    ///
    /// Malformed JSON is a parse error; a wrong event type or a missing
    /// application id is a 400; an id that is present but unusable is a 422.
    pub fn parse(payload: &[u8]) -> Result<Self, OperationError> {
        let value: Value = serde_json::from_slice(payload)
            .map_err(|e| OperationError::invalid_payload(e.to_string()))?;

        let event_type = match value.get("event") {
            Some(Value::String(event)) => event.clone(),
            Some(other) => other.to_string(),
            None => "<missing>".to_string(),
        };
        if event_type != HIRED_EVENT {
            return Err(OperationError::client_input(
                400,
                format!("unsupported event type: {event_type}"),
            ));
        }

        let application_id = match value.pointer("/data/application/id") {
            None | Some(Value::Null) => {
                return Err(OperationError::client_input(
                    400,
                    "missing data.application.id",
                ));
            }
            Some(raw) => id_token(raw).ok_or_else(|| {
                OperationError::client_input(
                    422,
                    format!("invalid data.application.id: {raw}"),
                )
            })?,
        };

        let job_id = value.pointer("/data/job/id").and_then(id_token);

        Ok(Self {
            event_type,
            application_id: ApplicationId(application_id),
            job_id,
        })
    }
}

// Accepts integers and strings made of ASCII alphanumerics, `-` and `_`.
// The id ends up in a URL path, so nothing else gets through.
fn id_token(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let token = s.trim();
            let safe = !token.is_empty()
                && token
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
            safe.then(|| token.to_string())
        }
        Value::Number(n) if n.is_u64() || n.is_i64() => Some(n.to_string()),
        _ => None,
    }
}
