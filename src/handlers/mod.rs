//! HTTP handlers for resource CRUD and the discovery/health surface.

pub mod common;
pub mod resource;
pub use common::*;
pub use resource::*;
