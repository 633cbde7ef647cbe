//! The seam between the request builder and the network.
//!
//! The crate ships [`ReqwestTransport`]. Any other HTTP stack, or a test
//! double, can be plugged in by implementing [`Transport`].

use crate::{
    config::{Config, Headers},
    response::RawResponse,
    Error, Result,
};
use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use std::collections::BTreeMap;
use std::time::Duration;
use url::Url;

/// Everything a transport needs to perform one exchange.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// The HTTP method.
    pub method: Method,
    /// The fully composed URL.
    pub url: String,
    /// Request headers in the order they were configured.
    pub headers: Headers,
    /// The encoded body.
    pub body: Option<Bytes>,
    /// Timeout for the whole exchange.
    pub timeout: Option<Duration>,
    /// Options the crate passes through without interpreting them.
    pub options: BTreeMap<String, serde_json::Value>,
}

impl TransportRequest {
    /// Builds a transport request from a URL and an effective configuration.
    ///
    /// The method defaults to `GET` when the configuration carries none.
    pub fn from_config(url: String, config: &Config) -> Self {
        Self {
            method: config.method.clone().unwrap_or(Method::GET),
            url,
            headers: config.headers.clone(),
            body: config.body.clone(),
            timeout: config.timeout,
            options: config.options.clone(),
        }
    }

    /// Converts the headers into an [`http::HeaderMap`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigurationError`] if a header name or value is invalid.
    pub fn header_map(&self) -> Result<HeaderMap> {
        let mut map = HeaderMap::with_capacity(self.headers.len());
        for (name, value) in &self.headers {
            let name = HeaderName::try_from(name.as_str())
                .map_err(|e| Error::ConfigurationError(format!("Invalid header name: {}", e)))?;
            let value = HeaderValue::try_from(value.as_str())
                .map_err(|e| Error::ConfigurationError(format!("Invalid header value: {}", e)))?;
            map.insert(name, value);
        }
        Ok(map)
    }
}

/// Performs an HTTP exchange.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use chainfetch::transport::{Transport, TransportRequest};
/// use chainfetch::{RawResponse, Result};
/// use http::{HeaderMap, StatusCode};
///
/// struct Echo;
///
/// #[async_trait]
/// impl Transport for Echo {
///     async fn perform(&self, request: TransportRequest) -> Result<RawResponse> {
///         Ok(RawResponse::new(StatusCode::OK, HeaderMap::new(), request.url))
///     }
/// }
/// ```
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends the request and returns the response with its body still unread.
    ///
    /// Connection-level failures are returned as `Err`. A response with an
    /// error status is a successful exchange.
    async fn perform(&self, request: TransportRequest) -> Result<RawResponse>;
}

/// [`Transport`] backed by a shared `reqwest::Client`.
///
/// Passthrough options in [`TransportRequest::options`] are not interpreted;
/// they are logged at debug level and otherwise ignored.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http_client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a transport with a default `reqwest` client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying client cannot be built.
    pub fn new() -> Result<Self> {
        let http_client = reqwest::Client::builder().build().map_err(|e| {
            Error::ConfigurationError(format!("Failed to build HTTP client: {}", e))
        })?;
        Ok(Self { http_client })
    }

    /// Wraps an existing `reqwest` client.
    pub fn with_client(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn perform(&self, request: TransportRequest) -> Result<RawResponse> {
        let url = Url::parse(&request.url)?;
        let headers = request.header_map()?;

        if !request.options.is_empty() {
            tracing::debug!(
                options = ?request.options.keys().collect::<Vec<_>>(),
                "Ignoring transport options not understood by reqwest"
            );
        }

        let mut builder = self
            .http_client
            .request(request.method, url)
            .headers(headers);

        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        Ok(RawResponse::from_reqwest(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_defaults_to_get() {
        let config = Config::new().header("Accept", "text/plain");
        let request = TransportRequest::from_config("http://host/".to_string(), &config);

        assert_eq!(request.method, Method::GET);
        assert_eq!(request.url, "http://host/");
        assert!(request.body.is_none());
        assert_eq!(request.headers.len(), 1);
    }

    #[test]
    fn test_header_map_rejects_invalid_names() {
        let config = Config::new().header("bad header", "x");
        let request = TransportRequest::from_config("http://host/".to_string(), &config);

        match request.header_map() {
            Err(Error::ConfigurationError(msg)) => assert!(msg.contains("Invalid header name")),
            other => panic!("Expected ConfigurationError, got {:?}", other),
        }
    }

    #[test]
    fn test_header_map_last_spelling_wins() {
        let config = Config::new()
            .header("content-type", "text/plain")
            .header("Content-Type", "application/json");
        let request = TransportRequest::from_config("http://host/".to_string(), &config);

        let map = request.header_map().unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map["content-type"], "application/json");
    }

    #[tokio::test]
    async fn test_reqwest_transport_ignores_passthrough_options() {
        use wiremock::matchers::method;
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let config = Config::new().option("mode", "cors").option("credentials", "include");
        let request = TransportRequest::from_config(mock_server.uri(), &config);

        let response = ReqwestTransport::new().unwrap().perform(request).await.unwrap();
        assert!(response.ok());
    }

    #[tokio::test]
    async fn test_reqwest_transport_rejects_relative_url() {
        let transport = ReqwestTransport::new().unwrap();
        let request = TransportRequest::from_config("/relative".to_string(), &Config::new());

        let result = transport.perform(request).await;
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }
}
