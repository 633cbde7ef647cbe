//! Hooks that splice into the request pipeline.
//!
//! A [`RequestInterceptor`] sees the composed URL and the effective
//! [`Config`] right before the transport call and returns the pair that is
//! actually sent. A [`ResponseInterceptor`] receives the raw response and
//! returns the [`Envelope`] handed to the caller, so it replaces decoding for
//! every terminal method.
//!
//! Both traits are implemented for plain closures. Implement the traits on a
//! type when the hook has to `.await`.
//!
//! # Examples
//!
//! ```
//! use chainfetch::{Config, Envelope, RawResponse, Result};
//!
//! let config = Config::new()
//!     .request_interceptor(|url: String, config: Config| -> Result<(String, Config)> {
//!         Ok((url, config.header("X-Trace", "1")))
//!     })
//!     .response_interceptor(|resp: RawResponse| -> Result<Envelope> {
//!         Ok(Envelope::new(resp.status().is_success(), None))
//!     });
//! # let _ = config;
//! ```

use crate::{config::Config, response::RawResponse, Envelope, Result};
use async_trait::async_trait;

/// Rewrites the outgoing request.
#[async_trait]
pub trait RequestInterceptor: Send + Sync {
    /// Returns the URL and configuration to send instead of the given ones.
    async fn intercept(&self, url: String, config: Config) -> Result<(String, Config)>;
}

/// Produces the caller-facing [`Envelope`] from a raw response.
#[async_trait]
pub trait ResponseInterceptor: Send + Sync {
    /// Turns the raw response into an envelope.
    ///
    /// The body may be read through the [`RawResponse`] readers.
    async fn intercept(&self, response: RawResponse) -> Result<Envelope>;
}

#[async_trait]
impl<F> RequestInterceptor for F
where
    F: Fn(String, Config) -> Result<(String, Config)> + Send + Sync,
{
    async fn intercept(&self, url: String, config: Config) -> Result<(String, Config)> {
        (self)(url, config)
    }
}

#[async_trait]
impl<F> ResponseInterceptor for F
where
    F: Fn(RawResponse) -> Result<Envelope> + Send + Sync,
{
    async fn intercept(&self, response: RawResponse) -> Result<Envelope> {
        (self)(response)
    }
}
