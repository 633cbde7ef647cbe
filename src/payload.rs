//! Outbound payloads and their encoding into a body plus implied headers.

use crate::{config::Headers, Error, Result};
use bytes::Bytes;
use serde::Serialize;

const CONTENT_TYPE: &str = "Content-Type";

/// A request payload, tagged by how it should be encoded.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Payload {
    /// No body.
    #[default]
    None,

    /// Ordered key/value pairs sent as `application/x-www-form-urlencoded`.
    ///
    /// A key may appear more than once.
    Form(Vec<(String, String)>),

    /// A structured value sent as JSON text.
    Json(serde_json::Value),

    /// A string sent verbatim as `text/plain`.
    Text(String),

    /// Raw bytes with an optional content type.
    Binary {
        /// The body.
        bytes: Bytes,
        /// Sent as `Content-Type` when present.
        content_type: Option<String>,
    },
}

impl Payload {
    /// Serializes `value` into a [`Payload::Json`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::SerializationFailed`] if `value` cannot be represented as JSON.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        serde_json::to_value(value)
            .map(Payload::Json)
            .map_err(|e| Error::SerializationFailed(e.to_string()))
    }

    /// Builds a [`Payload::Form`] from key/value pairs.
    pub fn form<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Payload::Form(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Builds a [`Payload::Binary`].
    pub fn binary(bytes: impl Into<Bytes>, content_type: Option<&str>) -> Self {
        Payload::Binary {
            bytes: bytes.into(),
            content_type: content_type.map(str::to_string),
        }
    }
}

impl From<&str> for Payload {
    fn from(s: &str) -> Self {
        Payload::Text(s.to_string())
    }
}

impl From<String> for Payload {
    fn from(s: String) -> Self {
        Payload::Text(s)
    }
}

impl From<serde_json::Value> for Payload {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Payload::None,
            value => Payload::Json(value),
        }
    }
}

impl From<()> for Payload {
    fn from(_: ()) -> Self {
        Payload::None
    }
}

impl From<Option<Payload>> for Payload {
    fn from(payload: Option<Payload>) -> Self {
        payload.unwrap_or_default()
    }
}

/// The result of encoding a [`Payload`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Encoded {
    /// Headers implied by the payload.
    pub headers: Headers,
    /// The encoded body, if any.
    pub body: Option<Bytes>,
}

/// Encodes a payload into a body and the headers it implies.
///
/// The returned headers are defaults: the request builder lets any configured
/// header of the same name take precedence.
///
/// # Examples
///
/// ```
/// use chainfetch::payload::{encode, Payload};
///
/// let encoded = encode(Payload::form([("q", "a b"), ("q", "c")]));
/// assert_eq!(encoded.body.as_deref(), Some(&b"q=a+b&q=c"[..]));
/// assert_eq!(
///     encoded.headers["Content-Type"],
///     "application/x-www-form-urlencoded"
/// );
/// ```
pub fn encode(payload: Payload) -> Encoded {
    let mut headers = Headers::new();

    let body = match payload {
        Payload::None => None,
        Payload::Form(pairs) => {
            headers.insert(
                CONTENT_TYPE.to_string(),
                "application/x-www-form-urlencoded".to_string(),
            );
            let body = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
                .finish();
            Some(Bytes::from(body))
        }
        Payload::Json(value) => {
            headers.insert(CONTENT_TYPE.to_string(), "application/json".to_string());
            Some(Bytes::from(value.to_string()))
        }
        Payload::Text(text) => {
            headers.insert(CONTENT_TYPE.to_string(), "text/plain".to_string());
            Some(Bytes::from(text))
        }
        Payload::Binary {
            bytes,
            content_type,
        } => {
            if let Some(content_type) = content_type {
                headers.insert(CONTENT_TYPE.to_string(), content_type);
            }
            Some(bytes)
        }
    };

    Encoded { headers, body }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_none_adds_nothing() {
        let encoded = encode(Payload::None);
        assert!(encoded.headers.is_empty());
        assert!(encoded.body.is_none());
    }

    #[test]
    fn test_form_is_urlencoded_in_order() {
        let encoded = encode(Payload::form([("name", "Jane Doe"), ("tag", "a&b"), ("tag", "c")]));

        assert_eq!(
            encoded.body.as_deref(),
            Some(&b"name=Jane+Doe&tag=a%26b&tag=c"[..])
        );
        assert_eq!(
            encoded.headers.get(CONTENT_TYPE).map(String::as_str),
            Some("application/x-www-form-urlencoded")
        );
    }

    #[test]
    fn test_json_body_does_not_leak_into_headers() {
        let encoded = encode(Payload::json(&json!({"name": "Alice", "age": 30})).unwrap());

        let body: serde_json::Value =
            serde_json::from_slice(encoded.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"name": "Alice", "age": 30}));
        assert_eq!(encoded.headers.len(), 1);
        assert!(encoded.headers.get("name").is_none());
    }

    #[test]
    fn test_text_is_verbatim() {
        let encoded = encode("hello".into());

        assert_eq!(encoded.body.as_deref(), Some(&b"hello"[..]));
        assert_eq!(
            encoded.headers.get(CONTENT_TYPE).map(String::as_str),
            Some("text/plain")
        );
    }

    #[test]
    fn test_binary_without_content_type() {
        let encoded = encode(Payload::binary(vec![0u8, 159, 146, 150], None));

        assert!(encoded.headers.is_empty());
        assert_eq!(encoded.body.as_deref(), Some(&[0u8, 159, 146, 150][..]));
    }

    #[test]
    fn test_null_json_value_is_no_payload() {
        assert_eq!(Payload::from(serde_json::Value::Null), Payload::None);
    }
}
