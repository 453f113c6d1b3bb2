use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, Url};
use serde_json::{Map, Value};
use tracing::debug;

use super::types::{CreatePersonRequest, SharedDocumentRequest, is_email_conflict};
use crate::error::{OperationError, Service};
use crate::http::{self, Timeouts};
use crate::records::EmployeeRecord;

pub const API_URL: &str = "https://api.hibob.com/v1";

/// Outcome of a single create-employee call that HiBob did not reject outright.
#[derive(Debug, Clone, PartialEq)]
pub enum CreateAttempt {
    Created(EmployeeRecord),
    /// HiBob refused the call because the email is already registered.
    EmailInUse,
}

/// Client for the HiBob people and documents APIs.
pub struct HibobClient {
    /// Pre-encoded `user:token` pair for basic auth.
    credentials: String,
    client: Client,
    base_url: String,
}

impl HibobClient {
    /// Create a client for the HiBob API rooted at `base_url`
    /// (normally [`API_URL`]).
    pub fn with_base_url(
        credentials: String,
        base_url: String,
        timeouts: Timeouts,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            credentials,
            client: http::build_client(timeouts)?,
            base_url: http::normalize_base_url(&base_url),
        })
    }

    fn authorization(&self) -> String {
        format!("Basic {}", self.credentials)
    }

    /// Issue one `POST /people`.
    ///
    /// An email conflict is reported as [`CreateAttempt::EmailInUse`]; every
    /// other rejection is an error.
    pub async fn create_employee(
        &self,
        request: &CreatePersonRequest,
    ) -> Result<CreateAttempt, OperationError> {
        let url = http::endpoint(Service::HiBob, &self.base_url, &["people"])?;
        debug!(email = %request.email, "creating HiBob employee");

        let builder = self
            .client
            .post(url)
            .header(AUTHORIZATION, self.authorization())
            .header(ACCEPT, "application/json")
            .json(request);

        let response = http::send(Service::HiBob, builder).await?;
        let status = response.status();
        if !status.is_success() {
            let body = http::read_text(Service::HiBob, response).await?;
            if is_email_conflict(status.as_u16(), &body) {
                return Ok(CreateAttempt::EmailInUse);
            }
            return Err(OperationError::RemoteService {
                service: Service::HiBob,
                status: Some(status.as_u16()),
                message: body,
            });
        }

        let raw_fields: Map<String, Value> = http::read_json(Service::HiBob, response).await?;
        let employee_id = match raw_fields.get("id") {
            Some(Value::String(id)) if !id.is_empty() => id.clone(),
            Some(Value::Number(id)) => id.to_string(),
            _ => {
                return Err(OperationError::invalid_response(
                    Service::HiBob,
                    "invalid response format: missing id",
                ));
            }
        };

        Ok(CreateAttempt::Created(EmployeeRecord {
            employee_id,
            email: request.email.clone(),
            raw_fields,
        }))
    }

    /// Attach a document, by URL, to the employee's shared folder.
    ///
    /// The URL is validated before any request is made.
    pub async fn upload_shared_document(
        &self,
        employee_id: &str,
        document_url: &str,
        document_name: &str,
    ) -> Result<Value, OperationError> {
        validate_document_url(document_url)?;

        let url = http::endpoint(
            Service::HiBob,
            &self.base_url,
            &["docs", "people", employee_id, "shared"],
        )?;
        let body = SharedDocumentRequest {
            document_name: document_name.to_string(),
            document_url: document_url.to_string(),
            tags: Vec::new(),
        };
        debug!(employee_id, document_name, "uploading shared document to HiBob");

        let builder = self
            .client
            .post(url)
            .header(AUTHORIZATION, self.authorization())
            .header(ACCEPT, "application/json")
            .json(&body);

        let response = http::send(Service::HiBob, builder).await?;
        let response = http::ensure_success(Service::HiBob, response).await?;
        let text = http::read_text(Service::HiBob, response).await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| {
            OperationError::invalid_response(Service::HiBob, format!("invalid response format: {e}"))
        })
    }
}

/// Accept only absolute `http`/`https` URLs with a host.
pub fn validate_document_url(document_url: &str) -> Result<Url, OperationError> {
    let invalid = || OperationError::client_input(400, format!("invalid document URL: {document_url:?}"));
    let url = Url::parse(document_url).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(invalid());
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hibob::types::WorkDetails;
    use chrono::NaiveDate;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> HibobClient {
        HibobClient::with_base_url("dXNlcjp0b2tlbg==".into(), server.uri(), Timeouts::default()).unwrap()
    }

    fn person(email: &str) -> CreatePersonRequest {
        CreatePersonRequest {
            first_name: "Jane".into(),
            surname: "Doe".into(),
            email: email.into(),
            work: WorkDetails {
                site: "Headquarters".into(),
                start_date: NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
            },
        }
    }

    #[test]
    fn document_url_validation() {
        assert!(validate_document_url("https://files.example.com/cv.pdf").is_ok());
        assert!(validate_document_url("http://files.example.com/cv.pdf").is_ok());
        for bad in ["", "cv.pdf", "ftp://files.example.com/cv.pdf", "file:///etc/passwd", "https://"] {
            let err = validate_document_url(bad).unwrap_err();
            assert_eq!(err.status_code(), 400, "{bad:?}");
        }
    }

    #[tokio::test]
    async fn create_returns_record_with_raw_fields() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/people"))
            .and(header("authorization", "Basic dXNlcjp0b2tlbg=="))
            .and(body_json(json!({
                "firstName": "Jane",
                "surname": "Doe",
                "email": "jane@x.com",
                "work": { "site": "Headquarters", "startDate": "2026-10-18" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "emp1", "email": "jane@x.com", "displayName": "Jane Doe"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let attempt = client(&server).create_employee(&person("jane@x.com")).await.unwrap();
        match attempt {
            CreateAttempt::Created(record) => {
                assert_eq!(record.employee_id, "emp1");
                assert_eq!(record.email, "jane@x.com");
                assert_eq!(record.raw_fields["displayName"], "Jane Doe");
            }
            CreateAttempt::EmailInUse => panic!("expected Created"),
        }
    }

    #[tokio::test]
    async fn create_conflict_is_email_in_use() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/people"))
            .respond_with(ResponseTemplate::new(400).set_body_string("Email already exists"))
            .mount(&server)
            .await;

        let attempt = client(&server).create_employee(&person("jane@x.com")).await.unwrap();
        assert_eq!(attempt, CreateAttempt::EmailInUse);
    }

    #[tokio::test]
    async fn create_other_rejection_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/people"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let err = client(&server).create_employee(&person("jane@x.com")).await.unwrap_err();
        assert!(matches!(
            err,
            OperationError::RemoteService {
                service: Service::HiBob,
                status: Some(403),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn create_without_id_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "email": "jane@x.com" })))
            .mount(&server)
            .await;

        let err = client(&server).create_employee(&person("jane@x.com")).await.unwrap_err();
        assert!(matches!(
            err,
            OperationError::Parse {
                service: Some(Service::HiBob),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn upload_posts_document_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/docs/people/emp1/shared"))
            .and(body_json(json!({
                "documentName": "cv.pdf",
                "documentUrl": "https://files.example.com/cv.pdf",
                "tags": []
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 991 })))
            .expect(1)
            .mount(&server)
            .await;

        let ack = client(&server)
            .upload_shared_document("emp1", "https://files.example.com/cv.pdf", "cv.pdf")
            .await
            .unwrap();
        assert_eq!(ack["id"], 991);
    }

    #[tokio::test]
    async fn upload_encodes_employee_id_as_one_segment() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/docs/people/emp%2F..%2F1%3Fx/shared"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 1 })))
            .expect(1)
            .mount(&server)
            .await;

        client(&server)
            .upload_shared_document("emp/../1?x", "https://files.example.com/cv.pdf", "cv.pdf")
            .await
            .unwrap();
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests[0].url.query(), None);
    }

    #[tokio::test]
    async fn upload_with_empty_body_acknowledges_null() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let ack = client(&server)
            .upload_shared_document("emp1", "https://files.example.com/cv.pdf", "cv.pdf")
            .await
            .unwrap();
        assert_eq!(ack, Value::Null);
    }

    #[tokio::test]
    async fn upload_rejects_bad_url_without_calling_hibob() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = client(&server)
            .upload_shared_document("emp1", "not a url", "cv.pdf")
            .await
            .unwrap_err();
        assert!(matches!(err, OperationError::ClientInput { status: 400, .. }));
    }
}
