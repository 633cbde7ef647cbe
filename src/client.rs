//! The client: a base path bound to a configuration.
//!
//! [`create`] and [`ClientBuilder`] produce a [`Client`]. A client never
//! changes after construction; [`Client::path`] and [`Client::sub`] derive new
//! clients, and the verb methods produce a fresh [`RequestBuilder`] per call.

use crate::{
    config::Config,
    fs::FileSystem,
    payload::{self, Payload},
    request::RequestBuilder,
    transport::{ReqwestTransport, Transport},
    Result,
};
use http::Method;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Creates a client bound to `base_path` and `config`, using the default
/// `reqwest` transport.
///
/// The base path is used verbatim; it should be an absolute URL for the
/// default transport.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built.
///
/// # Examples
///
/// ```no_run
/// use chainfetch::{create, Config};
///
/// # async fn example() -> Result<(), chainfetch::Error> {
/// let api = create("https://api.example.com", Config::new().header("Accept", "application/json"))?;
/// let users = api.path("/users");
///
/// let envelope = users.get("/42").json().await?;
/// println!("success: {}", envelope.success);
/// # Ok(())
/// # }
/// ```
pub fn create(base_path: impl Into<String>, config: Config) -> Result<Client> {
    Ok(Client::with_transport(
        base_path,
        config,
        Arc::new(ReqwestTransport::new()?),
    ))
}

/// A base path bound to a configuration and a transport.
///
/// Cloning is cheap, and every clone shares the same transport.
#[derive(Clone)]
pub struct Client {
    base_path: String,
    config: Config,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_path", &self.base_path)
            .field("config", &self.config)
            .finish()
    }
}

impl Client {
    /// Creates a new `ClientBuilder`.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Creates a client that sends through `transport`.
    pub fn with_transport(
        base_path: impl Into<String>,
        config: Config,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            base_path: base_path.into(),
            config,
            transport,
        }
    }

    /// The base path every request starts from.
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// The client's configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The file-system adapter carried by the configuration, if any.
    pub fn fs(&self) -> Option<&Arc<dyn FileSystem>> {
        self.config.fs.as_ref()
    }

    /// Derives a client whose base path is `self.base_path() + segment`.
    ///
    /// The configuration is shared unchanged.
    ///
    /// ```
    /// # use chainfetch::Client;
    /// # let client = Client::builder().base_path("http://host").build().unwrap();
    /// assert_eq!(
    ///     client.path("/a").path("/b").base_path(),
    ///     client.path("/a/b").base_path()
    /// );
    /// ```
    pub fn path(&self, segment: &str) -> Client {
        Client {
            base_path: format!("{}{}", self.base_path, segment),
            config: self.config.clone(),
            transport: Arc::clone(&self.transport),
        }
    }

    /// Derives a client at `self.base_path() + segment` whose configuration
    /// is `self.config()` merged with `extra`.
    pub fn sub(&self, segment: &str, extra: Config) -> Client {
        Client {
            base_path: format!("{}{}", self.base_path, segment),
            config: self.config.merge(&extra),
            transport: Arc::clone(&self.transport),
        }
    }

    /// Builds a request with an explicit method, payload and per-call configuration.
    ///
    /// The per-call configuration is merged over the client's. Headers implied
    /// by the payload, such as `Content-Type`, are only added when no header
    /// with the same name (ignoring ASCII case) is configured.
    pub fn request(
        &self,
        method: Method,
        path: &str,
        payload: impl Into<Payload>,
        config: Config,
    ) -> RequestBuilder {
        let mut config = self.config.merge(&config);
        config.method = Some(method);

        let encoded = payload::encode(payload.into());
        if encoded.body.is_some() {
            config.body = encoded.body;
        }

        let mut headers: crate::Headers = encoded
            .headers
            .into_iter()
            .filter(|(name, _)| config.header_value(name).is_none())
            .collect();
        let default_headers = headers.keys().cloned().collect();
        headers.extend(std::mem::take(&mut config.headers));
        config.headers = headers;

        RequestBuilder::new(
            Arc::clone(&self.transport),
            format!("{}{}", self.base_path, path),
            config,
        )
        .with_default_headers(default_headers)
    }

    /// Builds a GET request.
    pub fn get(&self, path: &str) -> RequestBuilder {
        self.request(Method::GET, path, Payload::None, Config::default())
    }

    /// Builds a POST request carrying `payload`.
    pub fn post(&self, path: &str, payload: impl Into<Payload>) -> RequestBuilder {
        self.request(Method::POST, path, payload, Config::default())
    }

    /// Builds a PUT request carrying `payload`.
    pub fn put(&self, path: &str, payload: impl Into<Payload>) -> RequestBuilder {
        self.request(Method::PUT, path, payload, Config::default())
    }

    /// Builds a PATCH request carrying `payload`.
    pub fn patch(&self, path: &str, payload: impl Into<Payload>) -> RequestBuilder {
        self.request(Method::PATCH, path, payload, Config::default())
    }

    /// Builds a DELETE request.
    pub fn delete(&self, path: &str) -> RequestBuilder {
        self.request(Method::DELETE, path, Payload::None, Config::default())
    }
}

/// Builder for configuring and creating a [`Client`].
///
/// # Examples
///
/// ```no_run
/// use chainfetch::ClientBuilder;
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), chainfetch::Error> {
/// let client = ClientBuilder::new()
///     .base_path("https://api.example.com/v1")
///     .timeout(Duration::from_secs(30))
///     .header("User-Agent", "my-app/1.0")
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    base_path: String,
    config: Config,
    transport: Option<Arc<dyn Transport>>,
}

impl ClientBuilder {
    /// Creates a builder with base path `/` and an empty configuration.
    pub fn new() -> Self {
        Self {
            base_path: "/".to_string(),
            config: Config::default(),
            transport: None,
        }
    }

    /// Sets the base path.
    pub fn base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    /// Adds a header sent with every request.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.headers.insert(name.into(), value.into());
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Merges `config` over what has been configured so far.
    pub fn config(mut self, config: Config) -> Self {
        self.config = self.config.merge(&config);
        self
    }

    /// Uses `transport` instead of the default `reqwest` transport.
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Builds the configured `Client`.
    ///
    /// # Errors
    ///
    /// Returns an error if no transport was given and the default one cannot
    /// be built.
    pub fn build(self) -> Result<Client> {
        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new()?),
        };
        Ok(Client::with_transport(self.base_path, self.config, transport))
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RawResponse, TransportRequest};
    use async_trait::async_trait;
    use http::{HeaderMap, StatusCode};
    use serde_json::json;

    struct NoopTransport;

    #[async_trait]
    impl Transport for NoopTransport {
        async fn perform(&self, _request: TransportRequest) -> Result<RawResponse> {
            Ok(RawResponse::new(StatusCode::OK, HeaderMap::new(), ""))
        }
    }

    fn client(base: &str, config: Config) -> Client {
        Client::with_transport(base, config, Arc::new(NoopTransport))
    }

    #[test]
    fn test_builder_defaults_to_root_path() {
        let client = Client::builder().transport(NoopTransport).build().unwrap();
        assert_eq!(client.base_path(), "/");
        assert!(client.config().headers.is_empty());
    }

    #[test]
    fn test_path_is_associative() {
        let client = client("http://host", Config::new());
        assert_eq!(
            client.path("/a").path("/b").base_path(),
            client.path("/a/b").base_path()
        );
    }

    #[test]
    fn test_path_does_not_normalize_slashes() {
        let client = client("http://host/", Config::new());
        assert_eq!(client.path("/x").base_path(), "http://host//x");
        assert_eq!(client.path("y").base_path(), "http://host/y");
    }

    #[test]
    fn test_sub_merges_config_without_touching_parent() {
        let parent = client("http://host", Config::new().header("G", "0"));
        let child = parent.sub("/x", Config::new().header("H", "1"));

        assert_eq!(child.base_path(), "http://host/x");
        assert_eq!(child.config().headers.get("G").map(String::as_str), Some("0"));
        assert_eq!(child.config().headers.get("H").map(String::as_str), Some("1"));
        assert_eq!(parent.config().headers.len(), 1);
        assert_eq!(parent.base_path(), "http://host");
    }

    #[test]
    fn test_text_payload_sets_content_type() {
        let request = client("http://host", Config::new()).post("/echo", "hello");

        assert_eq!(request.method(), Method::POST);
        assert_eq!(request.config().body.as_deref(), Some(&b"hello"[..]));
        assert_eq!(request.config().header_value("Content-Type"), Some("text/plain"));
    }

    #[test]
    fn test_configured_content_type_wins_over_payload() {
        let client = client("http://host", Config::new().header("content-type", "text/csv"));
        let request = client.post("/upload", "a,b\n1,2");

        assert_eq!(request.config().headers.len(), 1);
        assert_eq!(request.config().header_value("Content-Type"), Some("text/csv"));
    }

    #[test]
    fn test_builder_header_replaces_payload_content_type() {
        let request = client("http://host", Config::new())
            .post("/upload", "a,b\n1,2")
            .header("content-type", "text/csv");

        assert_eq!(request.config().headers.len(), 1);
        assert_eq!(request.config().header_value("Content-Type"), Some("text/csv"));
    }

    #[test]
    fn test_builder_keeps_caller_headers_with_other_case() {
        let request = client("http://host", Config::new().header("X-Tag", "a"))
            .get("/items")
            .header("x-tag", "b");

        assert_eq!(request.config().headers.len(), 2);
    }

    #[test]
    fn test_with_config_replaces_payload_content_type() {
        let request = client("http://host", Config::new())
            .put("/doc", json!({"title": "new"}))
            .with_config(&Config::new().header("CONTENT-TYPE", "application/merge-patch+json"));

        assert_eq!(request.config().headers.len(), 1);
        assert_eq!(
            request.config().header_value("content-type"),
            Some("application/merge-patch+json")
        );
    }

    #[test]
    fn test_request_merges_per_call_config() {
        let client = client("http://host", Config::new().header("A", "1"));
        let request = client.request(
            Method::OPTIONS,
            "/thing",
            Payload::None,
            Config::new().header("A", "2").timeout(Duration::from_secs(3)),
        );

        assert_eq!(request.method(), Method::OPTIONS);
        assert_eq!(request.url(), "http://host/thing");
        assert_eq!(request.config().header_value("A"), Some("2"));
        assert_eq!(request.config().timeout, Some(Duration::from_secs(3)));
        assert_eq!(client.config().header_value("A"), Some("1"));
    }

    #[test]
    fn test_fs_accessor() {
        let dir = tempfile::tempdir().unwrap();
        let with_fs = client(
            "http://host",
            Config::new().fs(crate::fs::LocalFileSystem::new(dir.path())),
        );

        assert!(with_fs.fs().is_some());
        assert!(with_fs.path("/x").fs().is_some());
        assert!(client("http://host", Config::new()).fs().is_none());
    }
}
