//! Starter API: configuration-driven CRUD resources over HTTP, with discovery and health endpoints.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod model;
pub mod response;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;

pub use config::{builtin_config, load_from_file, resolve, FullConfig, ResolvedModel, ResolvedResource, ServerSettings};
pub use error::{AppError, ConfigError};
pub use model::{Attributes, IdStrategy, Resource, ResourceId};
pub use routes::{common_routes, resource_routes, router};
pub use service::CrudService;
pub use state::AppState;
pub use store::{ensure_database_exists, MemoryStore, PgStore, ResourceStore};
