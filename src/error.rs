//! Error types for requests issued through a [`Client`](crate::Client).
//!
//! Only failures that prevent an exchange from completing are errors. A
//! response with a non-success status is still a completed exchange and is
//! reported through [`Envelope::success`](crate::Envelope::success).

use http::StatusCode;

/// The main error type of the crate.
///
/// # Examples
///
/// ```no_run
/// use chainfetch::{create, Config, Error};
///
/// # async fn example() -> Result<(), Error> {
/// let client = create("https://api.example.com", Config::default())?;
///
/// match client.get("/endpoint").json().await {
///     Ok(envelope) if envelope.success => println!("data: {:?}", envelope.data),
///     Ok(envelope) => println!("request was not ok: {:?}", envelope.data),
///     Err(Error::DeserializationFailed { raw_response, serde_error, .. }) => {
///         eprintln!("Failed to deserialize. Raw response: {}", raw_response);
///         eprintln!("Serde error: {}", serde_error);
///     }
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A network-level error occurred (connection refused, DNS lookup failed, etc.).
    ///
    /// This wraps the underlying `reqwest::Error` raised by the default transport.
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The request timed out.
    ///
    /// Only raised when a timeout was configured on the request.
    #[error("Request timed out")]
    Timeout,

    /// A custom [`Transport`](crate::transport::Transport) failed to perform the exchange.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Failed to parse the response body as JSON.
    ///
    /// # Fields
    ///
    /// * `raw_response` - The raw response body as a string
    /// * `serde_error` - The error message from serde
    /// * `status` - The HTTP status code of the response
    #[error("Failed to deserialize response (status {status}): {serde_error}")]
    DeserializationFailed {
        /// The raw response body that failed to deserialize
        raw_response: String,
        /// The serde error message
        serde_error: String,
        /// The HTTP status code
        status: StatusCode,
    },

    /// Decoded data could not be converted into the requested type.
    #[error("Failed to convert response data: {0}")]
    DataConversion(String),

    /// Invalid configuration was provided.
    ///
    /// Raised for invalid header names or values and when the default
    /// transport cannot be built.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Failed to serialize a request payload.
    #[error("Failed to serialize request: {0}")]
    SerializationFailed(String),

    /// An invalid URL was provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A request or response interceptor failed.
    #[error("Interceptor error: {0}")]
    Interceptor(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A [`FileSystem`](crate::fs::FileSystem) adapter failed.
    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),
}

impl Error {
    /// Wraps an arbitrary error raised inside an interceptor.
    ///
    /// # Examples
    ///
    /// ```
    /// use chainfetch::Error;
    ///
    /// let err = Error::interceptor("token expired");
    /// assert_eq!(err.to_string(), "Interceptor error: token expired");
    /// ```
    pub fn interceptor(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Error::Interceptor(err.into())
    }

    /// Returns the HTTP status code if this error has one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::DeserializationFailed { status, .. } => Some(*status),
            Error::Network(e) => e.status(),
            _ => None,
        }
    }

    /// Returns the raw response body if this error has one.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Error::DeserializationFailed { raw_response, .. } => Some(raw_response),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout
        } else {
            Error::Network(err)
        }
    }
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialization_error_accessors() {
        let err = Error::DeserializationFailed {
            raw_response: "not json".to_string(),
            serde_error: "expected value".to_string(),
            status: StatusCode::OK,
        };

        assert_eq!(err.status(), Some(StatusCode::OK));
        assert_eq!(err.raw_response(), Some("not json"));
    }

    #[test]
    fn test_interceptor_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let err = Error::interceptor(io);

        assert!(std::error::Error::source(&err).is_some());
        assert!(err.status().is_none());
    }
}
