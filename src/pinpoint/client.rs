use reqwest::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use tracing::debug;

use super::types::{ApplicationDocument, CommentDocument, CreatedDocument};
use crate::error::{OperationError, Service};
use crate::event::ApplicationId;
use crate::http::{self, Timeouts};
use crate::records::ApplicantRecord;

pub const API_URL: &str = "https://api.pinpointhq.com/api/v1";

const JSON_API: &str = "application/vnd.api+json";

/// Client for the Pinpoint applicant-tracking API.
pub struct PinpointClient {
    api_key: String,
    client: Client,
    base_url: String,
}

impl PinpointClient {
    /// Create a client for the Pinpoint API rooted at `base_url`
    /// (normally [`API_URL`]).
    pub fn with_base_url(
        api_key: String,
        base_url: String,
        timeouts: Timeouts,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            api_key,
            client: http::build_client(timeouts)?,
            base_url: http::normalize_base_url(&base_url),
        })
    }

    /// Fetch an application with its attachments and normalize the candidate.
    pub async fn fetch_applicant(
        &self,
        application_id: &ApplicationId,
    ) -> Result<ApplicantRecord, OperationError> {
        let url = http::endpoint(
            Service::Pinpoint,
            &self.base_url,
            &["applications", application_id.as_str()],
        )?;
        debug!(%application_id, "fetching Pinpoint application");

        let request = self
            .client
            .get(url)
            .header("X-API-KEY", &self.api_key)
            .header(ACCEPT, JSON_API)
            .query(&[("extra_fields[applications]", "attachments")]);

        let response = http::send(Service::Pinpoint, request).await?;
        let response = http::ensure_success(Service::Pinpoint, response).await?;
        let document: ApplicationDocument = http::read_json(Service::Pinpoint, response).await?;

        document.into_applicant().map_err(|reason| {
            OperationError::invalid_response(
                Service::Pinpoint,
                format!("invalid response format: {reason}"),
            )
        })
    }

    /// Post the hire confirmation comment and return the new comment's id.
    pub async fn post_hire_comment(
        &self,
        application_id: &ApplicationId,
        employee_id: &str,
    ) -> Result<String, OperationError> {
        let url = http::endpoint(Service::Pinpoint, &self.base_url, &["comments"])?;
        let document = CommentDocument::hire_confirmation(application_id.as_str(), employee_id);
        debug!(%application_id, employee_id, "posting Pinpoint comment");

        let request = self
            .client
            .post(url)
            .header("X-API-KEY", &self.api_key)
            .header(ACCEPT, JSON_API)
            .header(CONTENT_TYPE, JSON_API)
            .json(&document);

        let response = http::send(Service::Pinpoint, request).await?;
        let response = http::ensure_success(Service::Pinpoint, response).await?;
        let created: CreatedDocument = http::read_json(Service::Pinpoint, response).await?;

        created.id().ok_or_else(|| {
            OperationError::invalid_response(
                Service::Pinpoint,
                "invalid response format: missing data.id",
            )
        })
    }
}
