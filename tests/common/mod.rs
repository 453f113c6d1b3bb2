//! Shared fixture: one wiremock server per remote service and an
//! orchestrator wired to both.

#![allow(dead_code)]

use std::time::Duration;

use chrono::NaiveDate;
use serde_json::{Value, json};
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use hire_sync::HireOrchestrator;
use hire_sync::hibob::HibobClient;
use hire_sync::http::Timeouts;
use hire_sync::pinpoint::PinpointClient;

pub const API_KEY: &str = "pp-test-key";
pub const CREDENTIALS: &str = "c2VydmljZTp0b2tlbg==";

pub struct Fixture {
    pub pinpoint: MockServer,
    pub hibob: MockServer,
    pub orchestrator: HireOrchestrator,
}

impl Fixture {
    pub async fn new() -> Self {
        Self::with_timeouts(Timeouts::default()).await
    }

    pub async fn with_timeouts(timeouts: Timeouts) -> Self {
        let pinpoint = MockServer::start().await;
        let hibob = MockServer::start().await;
        let orchestrator = HireOrchestrator::new(
            PinpointClient::with_base_url(API_KEY.into(), pinpoint.uri(), timeouts).unwrap(),
            HibobClient::with_base_url(CREDENTIALS.into(), hibob.uri(), timeouts).unwrap(),
            "Headquarters",
        );
        Self {
            pinpoint,
            hibob,
            orchestrator,
        }
    }

    /// Answer `GET /applications/{id}` with the given attributes.
    pub async fn applicant(&self, id: &str, attributes: Value) {
        Mock::given(method("GET"))
            .and(path(format!("/applications/{id}")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "data": { "id": id, "type": "applications", "attributes": attributes } })),
            )
            .mount(&self.pinpoint)
            .await;
    }

    pub async fn jane_without_cv(&self, id: &str) {
        self.applicant(
            id,
            json!({ "first_name": "Jane", "last_name": "Doe", "email": "jane@x.com" }),
        )
        .await;
    }

    pub async fn jane_with_cv(&self, id: &str, url: &str) {
        self.applicant(
            id,
            json!({
                "first_name": "Jane",
                "last_name": "Doe",
                "email": "jane@x.com",
                "attachments": [{ "context": "pdf_cv", "url": url, "filename": "jane-cv.pdf" }]
            }),
        )
        .await;
    }

    pub async fn employee_created(&self, employee_id: &str) {
        Mock::given(method("POST"))
            .and(path("/people"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": employee_id })))
            .mount(&self.hibob)
            .await;
    }

    pub async fn document_upload(&self, status: u16) {
        Mock::given(method("POST"))
            .and(path_regex(r"^/docs/people/[^/]+/shared$"))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({ "id": 1 })))
            .mount(&self.hibob)
            .await;
    }

    pub async fn comment_created(&self, comment_id: &str) {
        Mock::given(method("POST"))
            .and(path("/comments"))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(json!({ "data": { "id": comment_id, "type": "comments" } })),
            )
            .mount(&self.pinpoint)
            .await;
    }

    pub async fn handle(&self, payload: &Value) -> hire_sync::HandlerResponse {
        let body = serde_json::to_vec(payload).unwrap();
        self.orchestrator.handle_on(&body, "test-request", today()).await
    }

    /// Every request either mock server received, as (method, path).
    pub async fn outbound_calls(&self) -> Vec<(String, String)> {
        let mut calls = Vec::new();
        for server in [&self.pinpoint, &self.hibob] {
            for request in server.received_requests().await.unwrap() {
                calls.push((request.method.to_string(), request.url.path().to_string()));
            }
        }
        calls
    }

    pub async fn calls_to(&self, server: &MockServer, prefix: &str) -> Vec<wiremock::Request> {
        server
            .received_requests()
            .await
            .unwrap()
            .into_iter()
            .filter(|r| r.url.path().starts_with(prefix))
            .collect()
    }

    /// Emails submitted to `POST /people`, in order.
    pub async fn create_emails(&self) -> Vec<String> {
        self.calls_to(&self.hibob, "/people")
            .await
            .into_iter()
            .map(|r| {
                let body: Value = serde_json::from_slice(&r.body).unwrap();
                body["email"].as_str().unwrap().to_string()
            })
            .collect()
    }
}

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
}

pub fn hired(application_id: Value) -> Value {
    json!({ "event": "application_hired", "data": { "application": { "id": application_id } } })
}

pub fn short_timeouts() -> Timeouts {
    Timeouts {
        connect: Duration::from_millis(200),
        read: Duration::from_secs(5),
        request: Duration::from_millis(100),
    }
}
