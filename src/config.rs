//! Request configuration and the merge rules that combine configurations.
//!
//! A [`Config`] is layered three times over a request's life: the client's
//! own configuration, the configuration a child client adds through
//! [`Client::sub`](crate::Client::sub), and the per-call configuration given
//! to [`Client::request`](crate::Client::request). Each layer is combined with
//! [`Config::merge`], which never mutates its inputs.

use crate::{
    fs::FileSystem,
    interceptor::{RequestInterceptor, ResponseInterceptor},
};
use bytes::Bytes;
use http::Method;
use indexmap::IndexMap;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Header mapping that keeps insertion order.
///
/// Keys are compared case-sensitively, so `Accept` and `accept` are two
/// distinct entries as far as merging is concerned.
pub type Headers = IndexMap<String, String>;

/// How query parameter keys and values are written into the request URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryEncoding {
    /// Keys and values are appended verbatim.
    ///
    /// Values containing `&`, `=`, `#` or spaces produce a URL that does not
    /// round-trip. Use [`QueryEncoding::Percent`] when values are not trusted.
    #[default]
    Raw,

    /// Keys and values are percent-encoded as `application/x-www-form-urlencoded`.
    Percent,
}

/// Transport options plus the interception and file-system extension slots.
///
/// # Examples
///
/// ```
/// use chainfetch::Config;
/// use std::time::Duration;
///
/// let base = Config::new()
///     .header("Accept", "application/json")
///     .timeout(Duration::from_secs(5));
/// let call = Config::new().header("Authorization", "Bearer token");
///
/// let merged = base.merge(&call);
/// assert_eq!(merged.headers.len(), 2);
/// assert_eq!(merged.timeout, Some(Duration::from_secs(5)));
/// ```
#[derive(Clone, Default)]
pub struct Config {
    /// The HTTP method. Verb methods on the client always set it.
    pub method: Option<Method>,

    /// Request headers.
    pub headers: Headers,

    /// An already encoded request body.
    pub body: Option<Bytes>,

    /// Per-request timeout handed to the transport.
    pub timeout: Option<Duration>,

    /// Query encoding mode. `None` behaves like [`QueryEncoding::Raw`].
    pub query_encoding: Option<QueryEncoding>,

    /// Transport options this crate does not interpret.
    ///
    /// They are merged key by key and handed to the transport untouched.
    pub options: BTreeMap<String, serde_json::Value>,

    /// Hook that may rewrite the URL and configuration before sending.
    pub request_interceptor: Option<Arc<dyn RequestInterceptor>>,

    /// Hook that replaces response decoding entirely.
    pub response_interceptor: Option<Arc<dyn ResponseInterceptor>>,

    /// File-system capability made available to callers.
    ///
    /// Requests never touch it.
    pub fs: Option<Arc<dyn FileSystem>>,
}

impl Config {
    /// Creates an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Combines `self` with `other`, `other` taking precedence.
    ///
    /// Every optional field is taken from `other` when it is set there. Headers
    /// and passthrough options are unioned instead, so keys present only in
    /// `self` survive and keys present in both take `other`'s value.
    pub fn merge(&self, other: &Config) -> Config {
        let mut headers = self.headers.clone();
        headers.extend(other.headers.iter().map(|(k, v)| (k.clone(), v.clone())));

        let mut options = self.options.clone();
        options.extend(other.options.iter().map(|(k, v)| (k.clone(), v.clone())));

        Config {
            method: other.method.clone().or_else(|| self.method.clone()),
            headers,
            body: other.body.clone().or_else(|| self.body.clone()),
            timeout: other.timeout.or(self.timeout),
            query_encoding: other.query_encoding.or(self.query_encoding),
            options,
            request_interceptor: other
                .request_interceptor
                .clone()
                .or_else(|| self.request_interceptor.clone()),
            response_interceptor: other
                .response_interceptor
                .clone()
                .or_else(|| self.response_interceptor.clone()),
            fs: other.fs.clone().or_else(|| self.fs.clone()),
        }
    }

    /// Sets the HTTP method.
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Adds a header, replacing an entry with the same key.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Adds several headers.
    pub fn headers<K, V>(mut self, headers: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Sets a raw request body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the query encoding mode.
    pub fn query_encoding(mut self, encoding: QueryEncoding) -> Self {
        self.query_encoding = Some(encoding);
        self
    }

    /// Adds a passthrough transport option.
    pub fn option(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Installs a request interceptor.
    pub fn request_interceptor(mut self, interceptor: impl RequestInterceptor + 'static) -> Self {
        self.request_interceptor = Some(Arc::new(interceptor));
        self
    }

    /// Installs a response interceptor.
    pub fn response_interceptor(
        mut self,
        interceptor: impl ResponseInterceptor + 'static,
    ) -> Self {
        self.response_interceptor = Some(Arc::new(interceptor));
        self
    }

    /// Installs a file-system adapter.
    pub fn fs(mut self, fs: impl FileSystem + 'static) -> Self {
        self.fs = Some(Arc::new(fs));
        self
    }

    /// The query encoding mode in effect.
    pub fn effective_query_encoding(&self) -> QueryEncoding {
        self.query_encoding.unwrap_or_default()
    }

    /// Looks up a header ignoring ASCII case.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("method", &self.method)
            .field("headers", &self.headers)
            .field("body_len", &self.body.as_ref().map(Bytes::len))
            .field("timeout", &self.timeout)
            .field("query_encoding", &self.query_encoding)
            .field("options", &self.options)
            .field("request_interceptor", &self.request_interceptor.is_some())
            .field("response_interceptor", &self.response_interceptor.is_some())
            .field("fs", &self.fs.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::{Envelope, RawResponse};

    #[test]
    fn test_merge_unions_disjoint_headers() {
        let base = Config::new().header("G", "0");
        let extra = Config::new().header("H", "1");

        let merged = base.merge(&extra);

        assert_eq!(merged.headers.get("G").map(String::as_str), Some("0"));
        assert_eq!(merged.headers.get("H").map(String::as_str), Some("1"));
        assert_eq!(merged.headers.len(), 2);
    }

    #[test]
    fn test_merge_override_wins_on_same_key() {
        let base = Config::new().header("X-Token", "old").header("Accept", "*/*");
        let extra = Config::new().header("X-Token", "new");

        let merged = base.merge(&extra);

        assert_eq!(merged.headers.get("X-Token").map(String::as_str), Some("new"));
        assert_eq!(merged.headers.get("Accept").map(String::as_str), Some("*/*"));
        // Overridden keys keep their original position.
        assert_eq!(merged.headers.get_index(0).map(|(k, _)| k.as_str()), Some("X-Token"));
    }

    #[test]
    fn test_merge_header_keys_are_case_sensitive() {
        let base = Config::new().header("content-type", "text/plain");
        let extra = Config::new().header("Content-Type", "application/json");

        let merged = base.merge(&extra);

        assert_eq!(merged.headers.len(), 2);
    }

    #[test]
    fn test_merge_scalars_take_override_when_set() {
        let base = Config::new()
            .method(Method::GET)
            .timeout(Duration::from_secs(1))
            .query_encoding(QueryEncoding::Percent);
        let extra = Config::new().method(Method::POST);

        let merged = base.merge(&extra);

        assert_eq!(merged.method, Some(Method::POST));
        assert_eq!(merged.timeout, Some(Duration::from_secs(1)));
        assert_eq!(merged.effective_query_encoding(), QueryEncoding::Percent);
    }

    #[test]
    fn test_merge_passes_unknown_options_through() {
        let base = Config::new().option("credentials", "include").option("mode", "cors");
        let extra = Config::new().option("mode", "no-cors");

        let merged = base.merge(&extra);

        assert_eq!(merged.options["credentials"], "include");
        assert_eq!(merged.options["mode"], "no-cors");
    }

    #[test]
    fn test_merge_leaves_inputs_untouched() {
        let base = Config::new().header("G", "0");
        let extra = Config::new().header("H", "1");

        let _ = base.merge(&extra);

        assert_eq!(base.headers.len(), 1);
        assert_eq!(extra.headers.len(), 1);
    }

    #[test]
    fn test_merge_keeps_base_interceptor() {
        let base = Config::new().response_interceptor(
            |_resp: RawResponse| -> crate::Result<Envelope> { Ok(Envelope::new(true, None)) },
        );

        let merged = base.merge(&Config::new().header("A", "b"));

        assert!(merged.response_interceptor.is_some());
        assert!(merged.request_interceptor.is_none());
    }

    #[test]
    fn test_header_value_ignores_case() {
        let config = Config::new().header("Content-Type", "text/plain");

        assert_eq!(config.header_value("content-type"), Some("text/plain"));
        assert_eq!(config.header_value("accept"), None);
    }
}
