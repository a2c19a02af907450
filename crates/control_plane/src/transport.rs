//! HTTP transport collaborator
//!
//! The services are agnostic to how bytes reach the control plane; they only
//! need a status code and a raw body back. [`Transport`] captures that seam so
//! tests can substitute a double, and [`HttpTransport`] implements it over
//! `reqwest`. Timeouts and cancellation live entirely in this layer.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

/// Errors from the network layer itself.
///
/// A server-returned error status is not a transport error; it comes back as a
/// [`TransportResponse`] and is classified by the caller.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request did not complete within the configured timeout
    #[error("request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout that elapsed, in seconds
        timeout_secs: u64,
    },

    /// Connection-level failure (DNS, refused, TLS, aborted body)
    #[error("connection failed: {0}")]
    Connection(String),

    /// The request could not be constructed, e.g. an unparsable URL
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// HTTP method subset the control plane uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// One outbound call: URL, method, optional bearer token, optional JSON body
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub url: String,
    pub method: HttpMethod,
    pub bearer_token: Option<String>,
    pub body: Option<Vec<u8>>,
}

/// Raw result of a completed call, success status or not
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    /// Whether the status code is in the 2xx range
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Body as UTF-8 text, lossy for diagnostics
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Seam between the resource services and the wire
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue the request and return the raw response.
    ///
    /// Implementations must return `Ok` for any completed HTTP exchange,
    /// including non-success statuses.
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}

/// `reqwest`-backed transport with a fixed per-request timeout
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    timeout_secs: u64,
}

impl HttpTransport {
    /// Create a transport with the given per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be initialized.
    pub fn new(timeout_secs: u64) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("faultline-sdk/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;

        Ok(Self {
            client,
            timeout_secs,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };

        if let Some(token) = &request.bearer_token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = request.body {
            builder = builder
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body);
        }

        debug!(url = %request.url, method = ?request.method, "Dispatching request");

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout {
                    timeout_secs: self.timeout_secs,
                }
            } else if e.is_builder() || e.is_request() {
                TransportError::InvalidRequest(e.to_string())
            } else {
                TransportError::Connection(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))?
            .to_vec();

        Ok(TransportResponse { status, body })
    }
}
