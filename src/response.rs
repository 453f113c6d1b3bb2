//! Webhook response bodies, for both outcomes.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde_json::{Value, json};

use crate::error::OperationError;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Everything a successful run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    pub application_id: String,
    pub employee_id: String,
    pub email: String,
    pub comment_id: String,
    pub cv_uploaded: bool,
    pub cv_upload_failed: bool,
    pub timestamp: DateTime<Utc>,
}

/// Transport-neutral response: the axum route and the `replay` command both
/// render this.
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: Value,
}

impl HandlerResponse {
    pub fn success(request_id: &str, result: &WorkflowResult) -> Self {
        let body = json!({
            "status": "success",
            "message": "Employee created in HiBob and application updated in Pinpoint",
            "request_id": request_id,
            "data": {
                "pinpoint": {
                    "application_id": result.application_id,
                    "comment_id": result.comment_id,
                },
                "hibob": {
                    "employee_id": result.employee_id,
                    "email": result.email,
                    "cv_uploaded": result.cv_uploaded,
                    "cv_upload_failed": result.cv_upload_failed,
                },
                "timestamp": result.timestamp.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            },
        });
        Self::with_body(200, request_id, body)
    }

    pub fn error(request_id: &str, err: &OperationError) -> Self {
        let body = json!({
            "status": "error",
            "message": err.summary(),
            "error": err.to_string(),
            "request_id": request_id,
        });
        Self::with_body(err.status_code(), request_id, body)
    }

    fn with_body(status_code: u16, request_id: &str, body: Value) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());
        headers.insert(REQUEST_ID_HEADER.to_string(), request_id.to_string());
        Self {
            status_code,
            headers,
            body,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Service;
    use chrono::TimeZone;

    fn result() -> WorkflowResult {
        WorkflowResult {
            application_id: "8863880".into(),
            employee_id: "emp1".into(),
            email: "jane@x.com".into(),
            comment_id: "c1".into(),
            cv_uploaded: false,
            cv_upload_failed: false,
            timestamp: Utc.with_ymd_and_hms(2026, 10, 17, 12, 30, 0).unwrap(),
        }
    }

    #[test]
    fn success_body_layout() {
        let response = HandlerResponse::success("req-1", &result());
        assert_eq!(response.status_code, 200);
        assert!(response.is_success());
        assert_eq!(response.body["status"], "success");
        assert_eq!(response.body["request_id"], "req-1");
        assert_eq!(response.body["data"]["pinpoint"]["application_id"], "8863880");
        assert_eq!(response.body["data"]["pinpoint"]["comment_id"], "c1");
        assert_eq!(response.body["data"]["hibob"]["employee_id"], "emp1");
        assert_eq!(response.body["data"]["hibob"]["email"], "jane@x.com");
        assert_eq!(response.body["data"]["hibob"]["cv_uploaded"], false);
        assert_eq!(response.body["data"]["timestamp"], "2026-10-17T12:30:00.000Z");
    }

    #[test]
    fn error_body_layout() {
        let err = OperationError::RemoteService {
            service: Service::Pinpoint,
            status: Some(502),
            message: "bad gateway".into(),
        };
        let response = HandlerResponse::error("req-2", &err);
        assert_eq!(response.status_code, 500);
        assert!(!response.is_success());
        assert_eq!(response.body["status"], "error");
        assert_eq!(response.body["message"], "Upstream service request failed");
        assert_eq!(
            response.body["error"],
            "Pinpoint request failed with status 502: bad gateway"
        );
        assert_eq!(response.body["request_id"], "req-2");
    }

    #[test]
    fn every_response_carries_request_id_header() {
        let ok = HandlerResponse::success("req-3", &result());
        let err = HandlerResponse::error("req-4", &OperationError::invalid_payload("eof"));
        assert_eq!(ok.headers[REQUEST_ID_HEADER], "req-3");
        assert_eq!(err.headers[REQUEST_ID_HEADER], "req-4");
        assert_eq!(err.headers["content-type"], "application/json");
        assert_eq!(err.status_code, 400);
    }
}
