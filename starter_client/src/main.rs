//! Demo consumer: checks the API's health and lists its users.
//!
//! Run from repo root: `cargo run -p starter-client`
//! Point it elsewhere with `BASE_URL=http://host:port`.

use serde::Deserialize;
use starter_client::{ApiClient, ClientConfig};

#[derive(Debug, Deserialize)]
struct User {
    name: String,
    email: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("starter_client=info")),
        )
        .init();

    let config = ClientConfig::from_env()?;
    let client = ApiClient::new(&config)?;
    tracing::info!(base_url = %client.base_url(), timeout = ?config.timeout, "starter client");

    println!("Checking API health...");
    match client.fetch_health().await {
        Some(health) => println!("✓ API status: {} at {}", health.status, health.timestamp),
        None => println!("✗ API health unavailable"),
    }

    println!("\nFetching users...");
    let users: Vec<User> = client.fetch_collection("users").await;
    if users.is_empty() {
        println!("✗ No users found");
    } else {
        println!("✓ Found {} users:", users.len());
        for user in &users {
            println!("  - {} ({})", user.name, user.email);
        }
    }

    println!("\n✓ Done!");
    Ok(())
}
