//! Record storage behind the service. One implementation per backend.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::{ensure_database_exists, PgStore};

use crate::config::ResolvedResource;
use crate::error::AppError;
use crate::model::{Attributes, Resource, ResourceId};
use async_trait::async_trait;

/// CRUD persistence for resource collections. Each call is applied atomically;
/// ids handed out by `insert` are never reused within a collection.
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// All records of the collection in insertion order.
    async fn list(&self, resource: &ResolvedResource) -> Result<Vec<Resource>, AppError>;

    async fn get(&self, resource: &ResolvedResource, id: &ResourceId) -> Result<Option<Resource>, AppError>;

    /// Assign a fresh id and persist.
    async fn insert(&self, resource: &ResolvedResource, attributes: Attributes) -> Result<Resource, AppError>;

    /// Replace all attributes. `None` when the id does not exist.
    async fn replace(
        &self,
        resource: &ResolvedResource,
        id: &ResourceId,
        attributes: Attributes,
    ) -> Result<Option<Resource>, AppError>;

    /// Overwrite only the given attributes. `None` when the id does not exist.
    async fn merge(
        &self,
        resource: &ResolvedResource,
        id: &ResourceId,
        attributes: Attributes,
    ) -> Result<Option<Resource>, AppError>;

    /// `false` when the id does not exist.
    async fn delete(&self, resource: &ResolvedResource, id: &ResourceId) -> Result<bool, AppError>;

    /// Readiness check.
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
