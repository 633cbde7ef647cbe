//! Per-call request builder.
//!
//! A [`RequestBuilder`] is produced by the verb methods of
//! [`Client`](crate::Client). Configuration methods consume and return the
//! builder so they chain; terminal methods borrow it, run the pipeline and
//! return an [`Envelope`]. Terminals keep no "already sent" state: calling a
//! second terminal, or the same one twice, performs another exchange.

use crate::{
    compose::{compose, Query},
    config::Config,
    response::{decode, Data, DecodeKind, Envelope},
    transport::{Transport, TransportRequest},
    Result,
};
use http::Method;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// Accumulates URL, query and header state for one request.
///
/// # Examples
///
/// ```no_run
/// use chainfetch::{create, Config};
///
/// # async fn example() -> Result<(), chainfetch::Error> {
/// let client = create("https://api.example.com", Config::default())?;
///
/// let envelope = client
///     .get("/users")
///     .path("/42")
///     .param("expand", "groups")
///     .header("Accept", "application/json")
///     .json()
///     .await?;
///
/// if envelope.success {
///     println!("{:?}", envelope.data);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RequestBuilder {
    transport: Arc<dyn Transport>,
    base: String,
    segments: Vec<String>,
    query: Query,
    config: Config,
    // Keys in `config.headers` that were implied by the payload.
    default_headers: Vec<String>,
}

impl fmt::Debug for RequestBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestBuilder")
            .field("base", &self.base)
            .field("segments", &self.segments)
            .field("query", &self.query)
            .field("config", &self.config)
            .field("default_headers", &self.default_headers)
            .finish()
    }
}

impl RequestBuilder {
    pub(crate) fn new(transport: Arc<dyn Transport>, base: String, config: Config) -> Self {
        Self {
            transport,
            base,
            segments: Vec::new(),
            query: Query::new(),
            config,
            default_headers: Vec::new(),
        }
    }

    /// Marks `names` as payload defaults that a caller-set header replaces.
    pub(crate) fn with_default_headers(mut self, names: Vec<String>) -> Self {
        self.default_headers = names;
        self
    }

    fn set_header(&mut self, name: String, value: String) {
        self.drop_defaults_named(&name);
        self.config.headers.insert(name, value);
    }

    fn drop_defaults_named(&mut self, name: &str) {
        let headers = &mut self.config.headers;
        self.default_headers.retain(|key| {
            if key.eq_ignore_ascii_case(name) {
                headers.shift_remove(key);
                false
            } else {
                true
            }
        });
    }

    /// Sets a query parameter. A later call with the same key replaces the value.
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.insert(key.into(), value.to_string());
        self
    }

    /// Sets several query parameters.
    pub fn params<K, V>(mut self, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: ToString,
    {
        self.query
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.to_string())));
        self
    }

    /// Sets a header, replacing an entry with the same key.
    ///
    /// A header implied by the payload, such as `Content-Type`, is replaced
    /// regardless of case.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_header(name.into(), value.into());
        self
    }

    /// Sets several headers.
    pub fn headers<K, V>(mut self, headers: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in headers {
            self.set_header(name.into(), value.into());
        }
        self
    }

    /// Appends a path segment verbatim.
    pub fn path(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    /// Merges `config` over the builder's configuration.
    pub fn with_config(mut self, config: &Config) -> Self {
        for name in config.headers.keys() {
            self.drop_defaults_named(name);
        }
        self.config = self.config.merge(config);
        self
    }

    /// The URL the next terminal call would send to, before interception.
    pub fn url(&self) -> String {
        compose(
            &self.base,
            &self.segments,
            &self.query,
            self.config.effective_query_encoding(),
        )
    }

    /// The HTTP method.
    pub fn method(&self) -> Method {
        self.config.method.clone().unwrap_or(Method::GET)
    }

    /// The accumulated query parameters.
    pub fn query(&self) -> &Query {
        &self.query
    }

    /// The effective configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Sends the request and parses the body as JSON.
    pub async fn json(&self) -> Result<Envelope> {
        self.send(DecodeKind::Json).await
    }

    /// Sends the request and deserializes the JSON body into `T`.
    ///
    /// When a response interceptor is configured, its data is converted instead.
    pub async fn json_as<T: DeserializeOwned>(&self) -> Result<Envelope<T>> {
        self.json().await?.try_map(Data::into_json)
    }

    /// Sends the request and reads the body as text.
    pub async fn string(&self) -> Result<Envelope> {
        self.send(DecodeKind::Text).await
    }

    /// Sends the request and reads the body as bytes.
    pub async fn bytes(&self) -> Result<Envelope> {
        self.send(DecodeKind::Bytes).await
    }

    /// Sends the request and reads the body as a [`Blob`](crate::Blob).
    pub async fn blob(&self) -> Result<Envelope> {
        self.send(DecodeKind::Blob).await
    }

    /// Sends the request without reading the body.
    pub async fn void(&self) -> Result<Envelope> {
        self.send(DecodeKind::Void).await
    }

    async fn send(&self, kind: DecodeKind) -> Result<Envelope> {
        let mut url = self.url();
        let mut config = self.config.clone();

        if let Some(interceptor) = self.config.request_interceptor.clone() {
            (url, config) = interceptor.intercept(url, config).await?;
            tracing::debug!(url = %url, "Request rewritten by interceptor");
        }

        let request = TransportRequest::from_config(url, &config);
        tracing::debug!(
            method = %request.method,
            url = %request.url,
            "Executing HTTP request"
        );

        let start_time = Instant::now();
        let response = self.transport.perform(request).await?;

        tracing::info!(
            status = response.status().as_u16(),
            latency_ms = start_time.elapsed().as_millis(),
            "Received HTTP response"
        );

        if let Some(interceptor) = &config.response_interceptor {
            tracing::debug!(kind = ?kind, "Response handled by interceptor");
            return interceptor.intercept(response).await;
        }

        let success = response.ok();
        let data = decode(response, kind).await?;
        Ok(Envelope::new(success, data))
    }
}
