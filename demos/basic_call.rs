//! Basic example demonstrating GET and POST requests through a derived client.
//!
//! This example shows how to:
//! - Create a client bound to a base path
//! - Derive a child client with `path`
//! - Decode responses as typed JSON and as text
//! - Check `success` instead of matching on error statuses
//!
//! Run with: `cargo run --example basic_call`

use chainfetch::{create, Config, Error, Payload};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct Post {
    #[serde(rename = "userId")]
    user_id: u32,
    id: u32,
    title: String,
    body: String,
}

#[derive(Debug, Serialize)]
struct NewPost {
    title: String,
    body: String,
    #[serde(rename = "userId")]
    user_id: u32,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter("chainfetch=debug,basic_call=info")
        .init();

    let api = create(
        "https://jsonplaceholder.typicode.com",
        Config::new().header("Accept", "application/json"),
    )?;
    let posts = api.path("/posts");

    println!("=== GET Request Example ===");
    let response = posts.get("/1").json_as::<Post>().await?;
    if let Some(post) = &response.data {
        println!("Post ID: {}", post.id);
        println!("Title: {}", post.title);
    }
    println!();

    println!("=== GET With Query Parameters ===");
    let response = posts.get("").param("userId", 1).json().await?;
    let count = response
        .data
        .as_ref()
        .and_then(|d| d.as_json())
        .and_then(|v| v.as_array())
        .map(Vec::len);
    println!("Posts by user 1: {:?}", count);
    println!();

    println!("=== POST Request Example ===");
    let new_post = NewPost {
        title: "My New Post".to_string(),
        body: "This is the content of my new post!".to_string(),
        user_id: 1,
    };
    let response = posts
        .post("", Payload::json(&new_post)?)
        .json_as::<Post>()
        .await?;
    println!("Created: {} -> {:?}", response.success, response.data.map(|p| p.id));
    println!();

    println!("=== Error Status Example ===");
    let response = posts.get("/999999").string().await?;
    println!("success = {}, body = {:?}", response.success, response.data);

    Ok(())
}
