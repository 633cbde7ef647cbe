//! Raw responses, decoding, and the result envelope.
//!
//! A [`RawResponse`] is what a [`Transport`](crate::transport::Transport)
//! hands back. Its body readers take `self`, so each response body is read
//! at most once. [`decode`] turns a raw response into [`Data`] according to
//! a [`DecodeKind`], and every terminal method of the request builder wraps
//! the outcome in an [`Envelope`].

use crate::{Error, Result};
use bytes::Bytes;
use http::{header::CONTENT_TYPE, HeaderMap, StatusCode};
use serde::de::DeserializeOwned;
use std::fmt;

/// A response whose body has not been read yet.
pub struct RawResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: ResponseBody,
}

enum ResponseBody {
    Buffered(Bytes),
    Live(reqwest::Response),
}

impl fmt::Debug for RawResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body = match &self.body {
            ResponseBody::Buffered(bytes) => format!("Buffered({} bytes)", bytes.len()),
            ResponseBody::Live(_) => "Live(..)".to_string(),
        };
        f.debug_struct("RawResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .field("body", &body)
            .finish()
    }
}

impl RawResponse {
    /// Creates a response from an already buffered body.
    ///
    /// Custom transports and response interceptors use this to hand back
    /// synthetic responses.
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: ResponseBody::Buffered(body.into()),
        }
    }

    /// Wraps a live `reqwest` response. The body is read on demand.
    pub fn from_reqwest(response: reqwest::Response) -> Self {
        Self {
            status: response.status(),
            headers: response.headers().clone(),
            body: ResponseBody::Live(response),
        }
    }

    /// The HTTP status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Whether the status is in the 200–399 range.
    pub fn ok(&self) -> bool {
        self.status.is_success() || self.status.is_redirection()
    }

    /// The response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns a header value by name, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }

    /// Reads the whole body.
    pub async fn bytes(self) -> Result<Bytes> {
        match self.body {
            ResponseBody::Buffered(bytes) => Ok(bytes),
            ResponseBody::Live(response) => Ok(response.bytes().await?),
        }
    }

    /// Reads the body as text. Invalid UTF-8 sequences are replaced.
    pub async fn text(self) -> Result<String> {
        let bytes = self.bytes().await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Reads the body and parses it as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeserializationFailed`] with the raw body when parsing fails.
    pub async fn json<T: DeserializeOwned>(self) -> Result<T> {
        let status = self.status;
        let bytes = self.bytes().await?;

        serde_json::from_slice(&bytes).map_err(|e| {
            let raw_response = String::from_utf8_lossy(&bytes).into_owned();
            tracing::error!(
                error = %e,
                status = status.as_u16(),
                raw_response = %raw_response,
                "Failed to deserialize response"
            );
            Error::DeserializationFailed {
                raw_response,
                serde_error: e.to_string(),
                status,
            }
        })
    }

    /// Reads the body as a [`Blob`], keeping the declared content type.
    pub async fn blob(self) -> Result<Blob> {
        let content_type = self.header(CONTENT_TYPE.as_str()).map(str::to_string);
        let bytes = self.bytes().await?;
        Ok(Blob {
            bytes,
            content_type,
        })
    }
}

/// Binary content together with its declared media type.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Blob {
    /// The content.
    pub bytes: Bytes,
    /// The `Content-Type` the content was declared with.
    pub content_type: Option<String>,
}

impl Blob {
    /// Creates a blob.
    pub fn new(bytes: impl Into<Bytes>, content_type: Option<&str>) -> Self {
        Self {
            bytes: bytes.into(),
            content_type: content_type.map(str::to_string),
        }
    }

    /// Length of the content in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the content is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// The representation a terminal method asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeKind {
    /// Parse the body as JSON.
    Json,
    /// Read the body as a string.
    Text,
    /// Read the body into a byte buffer.
    Bytes,
    /// Read the body as a [`Blob`].
    Blob,
    /// Do not read the body.
    Void,
}

/// Decoded response data.
#[derive(Debug, Clone, PartialEq)]
pub enum Data {
    /// A parsed JSON document.
    Json(serde_json::Value),
    /// Text.
    Text(String),
    /// Raw bytes.
    Bytes(Bytes),
    /// Raw bytes with their content type.
    Blob(Blob),
}

impl Data {
    /// Returns the JSON document, if this is [`Data::Json`].
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Data::Json(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the text, if this is [`Data::Text`].
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Data::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Returns the raw content of [`Data::Bytes`] or [`Data::Blob`].
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Data::Bytes(bytes) => Some(bytes.as_ref()),
            Data::Blob(blob) => Some(blob.bytes.as_ref()),
            _ => None,
        }
    }

    /// Returns the blob, if this is [`Data::Blob`].
    pub fn as_blob(&self) -> Option<&Blob> {
        match self {
            Data::Blob(blob) => Some(blob),
            _ => None,
        }
    }

    /// Deserializes the data into `T`.
    ///
    /// JSON documents are converted directly; text and binary data are parsed
    /// as JSON first.
    pub fn into_json<T: DeserializeOwned>(self) -> Result<T> {
        let parsed = match self {
            Data::Json(value) => serde_json::from_value(value),
            Data::Text(text) => serde_json::from_str(&text),
            Data::Bytes(bytes) => serde_json::from_slice(&bytes),
            Data::Blob(blob) => serde_json::from_slice(&blob.bytes),
        };
        parsed.map_err(|e| Error::DataConversion(e.to_string()))
    }
}

/// The uniform result of every terminal method.
///
/// `success` mirrors the transport's notion of an ok status unless a response
/// interceptor decided otherwise. A response with an error status is not an
/// `Err`; check `success`.
///
/// # Examples
///
/// ```
/// use chainfetch::{Data, Envelope};
///
/// let envelope = Envelope::new(true, Some(Data::Text("42".to_string())));
/// let parsed = envelope
///     .try_map(|data| data.into_json::<u32>())
///     .unwrap();
///
/// assert!(parsed.success);
/// assert_eq!(parsed.data, Some(42));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope<T = Data> {
    /// Whether the exchange is considered successful.
    pub success: bool,
    /// The decoded data. `None` for `void` and when an interceptor reports none.
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Creates an envelope.
    pub fn new(success: bool, data: Option<T>) -> Self {
        Self { success, data }
    }

    /// Maps the data, keeping `success`.
    pub fn map<U, F>(self, f: F) -> Envelope<U>
    where
        F: FnOnce(T) -> U,
    {
        Envelope {
            success: self.success,
            data: self.data.map(f),
        }
    }

    /// Maps the data with a fallible function, keeping `success`.
    pub fn try_map<U, F>(self, f: F) -> Result<Envelope<U>>
    where
        F: FnOnce(T) -> Result<U>,
    {
        Ok(Envelope {
            success: self.success,
            data: self.data.map(f).transpose()?,
        })
    }
}

/// Reads `response` according to `kind`.
///
/// [`DecodeKind::Void`] drops the response without reading its body and
/// yields `None`.
///
/// # Errors
///
/// Fails when the body cannot be read, or with
/// [`Error::DeserializationFailed`] when a JSON body is malformed.
pub async fn decode(response: RawResponse, kind: DecodeKind) -> Result<Option<Data>> {
    let data = match kind {
        DecodeKind::Json => Data::Json(response.json().await?),
        DecodeKind::Text => Data::Text(response.text().await?),
        DecodeKind::Bytes => Data::Bytes(response.bytes().await?),
        DecodeKind::Blob => Data::Blob(response.blob().await?),
        DecodeKind::Void => return Ok(None),
    };
    Ok(Some(data))
}
