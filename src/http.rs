//! Outbound HTTP plumbing shared by the Pinpoint and HiBob clients.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{OperationError, Service};

/// Bounds applied to every outbound call.
///
/// `connect` covers connection establishment and `read` each wait for
/// response data. `request` caps the whole exchange on top of both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub connect: Duration,
    pub read: Duration,
    pub request: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(5),
            read: Duration::from_secs(20),
            request: Duration::from_secs(30),
        }
    }
}

/// Build a `reqwest` client with all three timeouts set.
pub fn build_client(timeouts: Timeouts) -> Result<Client, reqwest::Error> {
    Client::builder()
        .connect_timeout(timeouts.connect)
        .read_timeout(timeouts.read)
        .timeout(timeouts.request)
        .build()
}

/// Append `segments` to `base_url` as individual path segments.
///
/// Each segment is percent-encoded, so `/`, `?` and `#` inside an id can
/// never leave its segment.
pub fn endpoint(service: Service, base_url: &str, segments: &[&str]) -> Result<Url, OperationError> {
    let invalid = |reason: String| OperationError::RemoteService {
        service,
        status: None,
        message: format!("invalid base URL {base_url:?}: {reason}"),
    };
    let mut url = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|()| invalid("cannot carry a path".to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Send a request, mapping transport failures to [`OperationError`].
pub async fn send(service: Service, request: RequestBuilder) -> Result<Response, OperationError> {
    let response = request
        .send()
        .await
        .map_err(|e| OperationError::transport(service, e))?;
    debug!(%service, status = response.status().as_u16(), url = %response.url(), "response received");
    Ok(response)
}

/// Turn a non-success response into a `RemoteService` error carrying the raw body.
pub async fn ensure_success(service: Service, response: Response) -> Result<Response, OperationError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = read_text(service, response).await?;
    Err(OperationError::RemoteService {
        service,
        status: Some(status.as_u16()),
        message,
    })
}

/// Read the body as text. Read timeouts surface as `RemoteTimeout`.
pub async fn read_text(service: Service, response: Response) -> Result<String, OperationError> {
    response
        .text()
        .await
        .map_err(|e| OperationError::transport(service, e))
}

/// Read and deserialize a JSON body; shape mismatches become `Parse` errors.
pub async fn read_json<T: DeserializeOwned>(
    service: Service,
    response: Response,
) -> Result<T, OperationError> {
    let body = read_text(service, response).await?;
    serde_json::from_str(&body).map_err(|e| {
        OperationError::invalid_response(service, format!("invalid response format: {e}"))
    })
}

/// Strip trailing slashes so `format!("{base}/path")` never doubles them.
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}
