//! Client for the starter API. Every call has a bounded timeout; callers choose between
//! explicit `Result`s (`try_*`) and the degrade-to-empty convenience methods.

pub mod client;
pub mod config;
pub mod error;

pub use client::{ApiClient, HealthStatus};
pub use config::ClientConfig;
pub use error::ClientError;
