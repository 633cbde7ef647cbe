//! Example demonstrating request and response interceptors.
//!
//! This example shows how to:
//! - Add an authentication header to every request with a request interceptor
//! - Reshape responses with a response interceptor
//! - Scope interceptors to a child client with `sub`
//!
//! Run with: `cargo run --example interceptors`

use async_trait::async_trait;
use chainfetch::{
    create, Config, Data, Envelope, Error, RawResponse, RequestInterceptor, Result,
};
use serde_json::json;

struct BearerAuth {
    token: String,
}

#[async_trait]
impl RequestInterceptor for BearerAuth {
    async fn intercept(&self, url: String, config: Config) -> Result<(String, Config)> {
        tracing::info!(url = %url, "Attaching credentials");
        let config = config.header("Authorization", format!("Bearer {}", self.token));
        Ok((url, config))
    }
}

#[tokio::main]
async fn main() -> std::result::Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter("chainfetch=debug,interceptors=info")
        .init();

    let api = create(
        "https://jsonplaceholder.typicode.com",
        Config::new().request_interceptor(BearerAuth {
            token: "demo-token".to_string(),
        }),
    )?;

    // Only the summary client reshapes responses.
    let summary = api.sub(
        "/posts",
        Config::new().response_interceptor(|resp: RawResponse| -> Result<Envelope> {
            Ok(Envelope::new(
                resp.ok(),
                Some(Data::Json(json!({
                    "status": resp.status().as_u16(),
                    "content_type": resp.header("content-type"),
                }))),
            ))
        }),
    );

    println!("=== Plain request (request interceptor only) ===");
    let response = api.get("/posts/1").json().await?;
    println!("success = {}, data = {:?}", response.success, response.data);
    println!();

    println!("=== Summarized request (both interceptors) ===");
    let response = summary.get("/1").void().await?;
    println!("success = {}, data = {:?}", response.success, response.data);

    Ok(())
}
