//! HttpAdmissionsBackend - REST client for the school admissions API.
//!
//! Implements the four round-trips of [`AdmissionsBackend`] against the
//! prospectus application's `/api/emily/*` endpoints.

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use emily_core::backend::{AdmissionsBackend, BookingRequest, EnquiryOutcome};
use emily_core::enquiry::VerifiedFamily;
use emily_core::error::{EmilyError, Result};
use emily_core::event::OpenDayEvent;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

const DEFAULT_BASE_URL: &str = "http://localhost:3000";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Admissions backend that talks to the prospectus app over HTTP.
#[derive(Clone)]
pub struct HttpAdmissionsBackend {
    client: Client,
    base_url: String,
}

impl HttpAdmissionsBackend {
    /// Creates a new backend against the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Loads the base URL from the `EMILY_API_BASE_URL` environment
    /// variable, falling back to the local development server.
    pub fn try_from_env() -> Self {
        let base_url = env::var("EMILY_API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        Self::new(base_url)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/emily/{path}", self.base_url.trim_end_matches('/'))
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + Sync,
        T: for<'de> Deserialize<'de>,
    {
        let url = self.endpoint(path);
        tracing::debug!(%url, "admissions API request");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(map_transport_error)?;

        Self::read_json(response).await
    }

    async fn get_json<T>(&self, path: &str) -> Result<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let url = self.endpoint(path);
        tracing::debug!(%url, "admissions API request");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(map_transport_error)?;

        Self::read_json(response).await
    }

    async fn read_json<T>(response: reqwest::Response) -> Result<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error body".to_string());
            return Err(map_http_error(status, body));
        }

        response.json::<T>().await.map_err(|err| {
            EmilyError::backend(format!("failed to parse admissions API response: {err}"))
        })
    }
}

#[async_trait]
impl AdmissionsBackend for HttpAdmissionsBackend {
    async fn verify_family(&self, email: &str) -> Result<Option<VerifiedFamily>> {
        let response: VerifyFamilyResponse = self
            .post_json("verify-family", &VerifyFamilyBody { email })
            .await?;

        if response.found {
            // A found=true response without a parent record is a contract
            // violation on the server side.
            let parent = response.parent.ok_or_else(|| {
                EmilyError::backend("verify-family returned found=true without a parent record")
            })?;
            Ok(Some(parent))
        } else {
            Ok(None)
        }
    }

    async fn submit_enquiry(&self, payload: &serde_json::Value) -> Result<EnquiryOutcome> {
        let response: SubmitEnquiryResponse = self.post_json("submit-enquiry", payload).await?;

        if !response.success {
            let message = response
                .error
                .unwrap_or_else(|| "enquiry submission rejected".to_string());
            return Err(EmilyError::backend(message));
        }

        Ok(EnquiryOutcome {
            inquiry_id: response.inquiry_id,
            slug: response.slug,
            prospectus_url: response.prospectus_url,
        })
    }

    async fn list_events(&self) -> Result<Vec<OpenDayEvent>> {
        let response: EventsResponse = self.get_json("get-events").await?;
        Ok(response.events)
    }

    async fn create_booking(&self, request: &BookingRequest) -> Result<serde_json::Value> {
        let response: CreateBookingResponse = self.post_json("create-booking", request).await?;

        match response.booking {
            Some(booking) => Ok(booking),
            None => {
                let message = response
                    .error
                    .unwrap_or_else(|| "booking creation returned no booking record".to_string());
                Err(EmilyError::backend(message))
            }
        }
    }
}

fn map_transport_error(err: reqwest::Error) -> EmilyError {
    if err.is_connect() || err.is_timeout() {
        EmilyError::backend_retryable(format!("admissions API unreachable: {err}"))
    } else {
        EmilyError::backend(format!("admissions API request failed: {err}"))
    }
}

/// Maps a non-success HTTP status to a backend error. Rate limiting and
/// server-side failures are retryable; client errors are not.
fn map_http_error(status: StatusCode, body: String) -> EmilyError {
    let message = format!("admissions API returned {status}: {body}");
    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        EmilyError::backend_retryable(message)
    } else {
        EmilyError::backend(message)
    }
}

#[derive(Serialize)]
struct VerifyFamilyBody<'a> {
    email: &'a str,
}

#[derive(Deserialize)]
struct VerifyFamilyResponse {
    found: bool,
    parent: Option<VerifiedFamily>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitEnquiryResponse {
    success: bool,
    inquiry_id: Option<i64>,
    slug: Option<String>,
    prospectus_url: Option<String>,
    error: Option<String>,
}

#[derive(Deserialize)]
struct EventsResponse {
    events: Vec<OpenDayEvent>,
}

#[derive(Deserialize)]
struct CreateBookingResponse {
    booking: Option<serde_json::Value>,
    error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let backend = HttpAdmissionsBackend::new("https://example.com/");
        assert_eq!(
            backend.endpoint("verify-family"),
            "https://example.com/api/emily/verify-family"
        );
    }

    #[test]
    fn test_http_error_retryability() {
        assert!(map_http_error(StatusCode::TOO_MANY_REQUESTS, String::new()).is_retryable());
        assert!(map_http_error(StatusCode::BAD_GATEWAY, String::new()).is_retryable());
        assert!(!map_http_error(StatusCode::BAD_REQUEST, String::new()).is_retryable());
    }

    #[test]
    fn test_enquiry_response_camel_case() {
        let response: SubmitEnquiryResponse = serde_json::from_str(
            r#"{
                "success": true,
                "inquiryId": 77,
                "slug": "doe-family",
                "prospectusUrl": "https://example.com/p/doe-family"
            }"#,
        )
        .unwrap();

        assert!(response.success);
        assert_eq!(response.inquiry_id, Some(77));
        assert_eq!(response.prospectus_url.as_deref(), Some("https://example.com/p/doe-family"));
    }
}
