//! # Chainfetch - a fluent HTTP client builder
//!
//! Chainfetch wraps an HTTP transport (`reqwest` by default) with chainable
//! request configuration and chainable response decoding. Every terminal call
//! resolves to an [`Envelope`] that tells whether the exchange succeeded and
//! carries the decoded data.
//!
//! ## Quick Start
//!
//! ```no_run
//! use chainfetch::{create, Config, Payload};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize)]
//! struct CreateUser {
//!     name: String,
//! }
//!
//! #[derive(Deserialize)]
//! struct User {
//!     id: u64,
//!     name: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), chainfetch::Error> {
//!     let api = create(
//!         "https://api.example.com",
//!         Config::new().header("Accept", "application/json"),
//!     )?;
//!     let users = api.path("/users");
//!
//!     // GET https://api.example.com/users/123?expand=groups
//!     let user = users
//!         .get("/123")
//!         .param("expand", "groups")
//!         .json_as::<User>()
//!         .await?;
//!     if let Some(user) = user.data {
//!         println!("User: {}", user.name);
//!     }
//!
//!     // POST a JSON body
//!     let payload = Payload::json(&CreateUser { name: "Alice".to_string() })?;
//!     let created = users.post("", payload).json_as::<User>().await?;
//!     println!("created: {} {:?}", created.success, created.data.map(|u| u.id));
//!
//!     // Error statuses are not errors: check `success`
//!     let missing = users.get("/does-not-exist").string().await?;
//!     assert!(!missing.success);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Composition model
//!
//! - [`create`] binds a base path to a [`Config`]. [`Client::path`] appends to
//!   the base path, [`Client::sub`] also merges extra configuration.
//! - Verb methods ([`Client::get`], [`Client::post`], ...) merge the client's
//!   configuration with the per-call one, encode the [`Payload`] and return a
//!   [`RequestBuilder`].
//! - Builder methods (`param`, `params`, `header`, `headers`, `path`) chain;
//!   terminals (`json`, `string`, `bytes`, `blob`, `void`) send the request.
//! - A [`RequestInterceptor`] may rewrite the URL and configuration before
//!   sending; a [`ResponseInterceptor`] replaces decoding entirely.
//!
//! Base paths and segments are concatenated literally, and query values are
//! written raw unless [`QueryEncoding::Percent`] is configured.

pub mod compose;
mod client;
mod config;
mod error;
pub mod fs;
pub mod interceptor;
pub mod payload;
mod request;
mod response;
pub mod transport;

pub use client::{create, Client, ClientBuilder};
pub use config::{Config, Headers, QueryEncoding};
pub use error::{Error, Result};
pub use interceptor::{RequestInterceptor, ResponseInterceptor};
pub use payload::Payload;
pub use request::RequestBuilder;
pub use response::{decode, Blob, Data, DecodeKind, Envelope, RawResponse};
pub use transport::{ReqwestTransport, Transport, TransportRequest};
