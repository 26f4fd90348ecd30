//! Fetch boundary — retrieve the raw advisory record set over HTTP.
//!
//! The core pipeline never performs I/O; this module is the upstream
//! collaborator that materializes the record sequence. Transport or decode
//! failure is fatal to the run and surfaced as a typed error so the CLI can
//! map it to a distinct exit code.

use crate::model::RawRecord;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

/// State Department travel advisories endpoint.
pub const API_URL: &str = "https://cadataapi.state.gov/api/TravelAdvisories";

const USER_AGENT: &str = concat!("AdvisoryReport/", env!("CARGO_PKG_VERSION"));
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Failure to obtain the raw record set. Always fatal: no partial output.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to fetch advisories: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid API response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A source of raw advisory records.
#[async_trait]
pub trait AdvisorySource {
    async fn fetch(&self) -> Result<Vec<RawRecord>, FetchError>;
}

/// HTTP source backed by the State Department API.
pub struct HttpSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSource {
    /// Build a source against the production endpoint.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_url(API_URL)
    }

    /// Build a source against an arbitrary endpoint (tests, mirrors).
    pub fn with_url(url: &str) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(FETCH_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl AdvisorySource for HttpSource {
    /// Fetch and decode the record set.
    ///
    /// The API serves either a bare JSON array or an object wrapping the
    /// array in a `data` field; both shapes are accepted.
    async fn fetch(&self) -> Result<Vec<RawRecord>, FetchError> {
        let body = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let value: serde_json::Value = serde_json::from_str(&body)?;
        let records = decode_records(value)?;
        info!("retrieved {} raw advisories", records.len());
        Ok(records)
    }
}

fn decode_records(value: serde_json::Value) -> Result<Vec<RawRecord>, serde_json::Error> {
    if value.is_array() {
        return serde_json::from_value(value);
    }
    match value.get("data") {
        Some(data) => serde_json::from_value(data.clone()),
        None => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetches_bare_array() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/TravelAdvisories"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {
                    "Title": "Mexico - Level 2: Exercise Increased Caution",
                    "Category": ["MX"],
                    "Summary": "<p>Summary</p>",
                    "Link": "https://example.gov/mx",
                    "Updated": "2024-01-01T00:00:00Z"
                }
            ])))
            .mount(&server)
            .await;

        let source = HttpSource::with_url(&format!("{}/api/TravelAdvisories", server.uri())).unwrap();
        let records = source.fetch().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].category, vec!["MX"]);
    }

    #[tokio::test]
    async fn test_fetches_wrapped_array() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [
                    { "Title": "Somalia - Level 4: Do Not Travel", "Category": ["SO"] }
                ]
            })))
            .mount(&server)
            .await;

        let source = HttpSource::with_url(&server.uri()).unwrap();
        let records = source.fetch().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Somalia - Level 4: Do Not Travel");
    }

    #[tokio::test]
    async fn test_http_error_is_transport_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let source = HttpSource::with_url(&server.uri()).unwrap();
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));
    }

    #[tokio::test]
    async fn test_invalid_json_is_decode_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let source = HttpSource::with_url(&server.uri()).unwrap();
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }
}
