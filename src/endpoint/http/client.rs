//! HTTP client wrapper for endpoint requests.

use crate::endpoint::error::EndpointError;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::multipart::Form;
use serde::{Serialize, de::DeserializeOwned};
use std::time::Duration;
use url::Url;

/// Default total timeout for request/response calls.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
/// Default connection timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeouts applied to outgoing requests.
///
/// `request` bounds the three request/response calls only; event streams
/// stay open for as long as the server keeps sending. `None` disables a timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub request: Option<Duration>,
    pub connect: Option<Duration>,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self {
            request: Some(DEFAULT_REQUEST_TIMEOUT),
            connect: Some(DEFAULT_CONNECT_TIMEOUT),
        }
    }
}

/// HTTP client shared by all endpoint calls.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    request_timeout: Option<Duration>,
}

impl HttpClient {
    /// Create a new HTTP client.
    pub fn new(timeouts: HttpTimeouts) -> Self {
        let mut builder = reqwest::Client::builder();
        if let Some(connect) = timeouts.connect {
            builder = builder.connect_timeout(connect);
        }
        let client = builder.build().unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            request_timeout: timeouts.request,
        }
    }

    fn json_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    /// Make a POST request with JSON body and deserialize the response.
    pub async fn post_json<T: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        url: &str,
        body: &T,
    ) -> Result<R, EndpointError> {
        let body = serde_json::to_vec(body).map_err(|e| EndpointError::Payload(e.to_string()))?;
        let request = self
            .client
            .post(url)
            .headers(Self::json_headers())
            .body(body);

        self.send(request).await
    }

    /// Make a multipart POST request and deserialize the response.
    ///
    /// reqwest sets the `multipart/form-data` content type and boundary.
    pub async fn post_multipart<R: DeserializeOwned>(
        &self,
        url: &str,
        form: Form,
    ) -> Result<R, EndpointError> {
        let request = self.client.post(url).multipart(form);
        self.send(request).await
    }

    /// Build (but do not send) a POST request for an event-stream response.
    ///
    /// Sets `Content-Type: application/json` and `Accept: text/event-stream`.
    pub fn stream_request(&self, url: Url, body: Vec<u8>) -> reqwest::RequestBuilder {
        let mut headers = Self::json_headers();
        headers.insert(ACCEPT, HeaderValue::from_static("text/event-stream"));

        self.client.post(url).headers(headers).body(body)
    }

    async fn send<R: DeserializeOwned>(
        &self,
        mut request: reqwest::RequestBuilder,
    ) -> Result<R, EndpointError> {
        if let Some(timeout) = self.request_timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(EndpointError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text).map_err(|e| EndpointError::Decode {
            message: e.to_string(),
            body: text,
        })
    }
}
