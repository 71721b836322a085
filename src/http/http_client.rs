use std::time::{Duration, Instant};

use async_trait::async_trait;
use log::{debug, trace};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use tokio::sync::RwLock;
use url::Url;

use super::RpcTransport;
use super::error::HttpError;
use crate::log::mask_string;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const PROJECT_KEY_HEADER: &str = "x-api-key";

/// reqwest-backed [`RpcTransport`].
///
/// Requests are sent once. Retrying is left to the caller because a resent
/// broadcast can reorder or duplicate a transaction.
pub struct HttpClient {
    client: reqwest::Client,
    last_latency: RwLock<Option<(Duration, Instant)>>,
}

impl HttpClient {
    pub fn new() -> Result<Self, HttpError> {
        Self::with_config(Duration::from_secs(DEFAULT_TIMEOUT_SECS), None)
    }

    /// Builds a client with a request timeout and an optional project key.
    ///
    /// The project key is attached to every request as the `x-api-key` header.
    pub fn with_config(timeout: Duration, project_key: Option<&str>) -> Result<Self, HttpError> {
        let mut headers = HeaderMap::new();
        if let Some(key) = project_key.filter(|k| !k.is_empty()) {
            debug!(project_key = &*mask_string(key); "HTTP: Attaching project key header");
            let mut value = HeaderValue::from_str(key)?;
            value.set_sensitive(true);
            headers.insert(PROJECT_KEY_HEADER, value);
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            last_latency: RwLock::new(None),
        })
    }

    async fn update_latency(&self, duration: Duration) {
        *self.last_latency.write().await = Some((duration, Instant::now()));
    }

    pub async fn get_latency(&self) -> Option<Duration> {
        self.last_latency.read().await.map(|(d, _)| d)
    }
}

#[async_trait]
impl RpcTransport for HttpClient {
    async fn post(&self, uri: &Url, body: String) -> Result<String, HttpError> {
        let start = Instant::now();
        trace!(uri:% = uri, body = &*body; "HTTP: POST");

        let resp = self
            .client
            .post(uri.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;
        self.update_latency(start.elapsed()).await;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read response body".into());
            return Err(HttpError::ServerError { status, body });
        }

        Ok(resp.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string, header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_post_returns_body_and_records_latency() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(header("Content-Type", "application/json"))
            .and(body_string(r#"{"method":"block"}"#))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"result":{}}"#))
            .mount(&mock_server)
            .await;

        let client = HttpClient::new().unwrap();
        let uri = Url::parse(&mock_server.uri()).unwrap();
        assert!(client.get_latency().await.is_none());

        let body = client.post(&uri, r#"{"method":"block"}"#.to_string()).await.unwrap();

        assert_eq!(body, r#"{"result":{}}"#);
        assert!(client.get_latency().await.is_some());
    }

    #[tokio::test]
    async fn test_post_attaches_project_key() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(header("x-api-key", "project-key-123"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = HttpClient::with_config(Duration::from_secs(5), Some("project-key-123")).unwrap();
        let uri = Url::parse(&mock_server.uri()).unwrap();

        client.post(&uri, "{}".to_string()).await.unwrap();
    }

    #[tokio::test]
    async fn test_post_non_success_status_is_server_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&mock_server)
            .await;

        let client = HttpClient::new().unwrap();
        let uri = Url::parse(&mock_server.uri()).unwrap();

        let err = client.post(&uri, "{}".to_string()).await.unwrap_err();
        match err {
            HttpError::ServerError { status, body } => {
                assert_eq!(status.as_u16(), 502);
                assert_eq!(body, "bad gateway");
            },
            other => panic!("unexpected error: {other}"),
        }
    }
}
