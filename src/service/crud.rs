//! Generic CRUD over any `ResourceStore`.

use crate::config::ResolvedResource;
use crate::error::AppError;
use crate::model::{Attributes, Resource, ResourceId};
use crate::service::RequestValidator;
use crate::store::ResourceStore;

pub struct CrudService;

impl CrudService {
    /// List the collection. With `active_only`, keep records whose active field is true or absent;
    /// resources without an active field are returned whole.
    pub async fn list(
        store: &dyn ResourceStore,
        resource: &ResolvedResource,
        active_only: bool,
    ) -> Result<Vec<Resource>, AppError> {
        let rows = store.list(resource).await?;
        Ok(match (&resource.active_field, active_only) {
            (Some(field), true) => rows.into_iter().filter(|r| r.is_active(field)).collect(),
            _ => rows,
        })
    }

    pub async fn read(
        store: &dyn ResourceStore,
        resource: &ResolvedResource,
        id: &ResourceId,
    ) -> Result<Resource, AppError> {
        store
            .get(resource, id)
            .await?
            .ok_or_else(|| not_found(resource, id))
    }

    /// Validate, assign an id, persist. Any `id` in the body is ignored.
    pub async fn create(
        store: &dyn ResourceStore,
        resource: &ResolvedResource,
        body: &Attributes,
    ) -> Result<Resource, AppError> {
        let attributes = RequestValidator::validate(body, &resource.fields)?;
        let created = store.insert(resource, attributes).await?;
        tracing::debug!(resource = %resource.path_segment, id = %created.id, "created");
        Ok(created)
    }

    /// Full replacement (PUT).
    pub async fn replace(
        store: &dyn ResourceStore,
        resource: &ResolvedResource,
        id: &ResourceId,
        body: &Attributes,
    ) -> Result<Resource, AppError> {
        let attributes = RequestValidator::validate(body, &resource.fields)?;
        store
            .replace(resource, id, attributes)
            .await?
            .ok_or_else(|| not_found(resource, id))
    }

    /// Partial update (PATCH).
    pub async fn patch(
        store: &dyn ResourceStore,
        resource: &ResolvedResource,
        id: &ResourceId,
        body: &Attributes,
    ) -> Result<Resource, AppError> {
        let attributes = RequestValidator::validate_partial(body, &resource.fields)?;
        store
            .merge(resource, id, attributes)
            .await?
            .ok_or_else(|| not_found(resource, id))
    }

    /// Deleting an id that is already gone is `NotFound`.
    pub async fn delete(
        store: &dyn ResourceStore,
        resource: &ResolvedResource,
        id: &ResourceId,
    ) -> Result<(), AppError> {
        if !store.delete(resource, id).await? {
            return Err(not_found(resource, id));
        }
        tracing::debug!(resource = %resource.path_segment, id = %id, "deleted");
        Ok(())
    }

    /// Insert the configured seed records when the collection is empty. Returns how many were inserted.
    pub async fn seed(store: &dyn ResourceStore, resource: &ResolvedResource) -> Result<usize, AppError> {
        if resource.seed.is_empty() || !store.list(resource).await?.is_empty() {
            return Ok(0);
        }
        for record in &resource.seed {
            store.insert(resource, record.clone()).await?;
        }
        tracing::info!(resource = %resource.path_segment, count = resource.seed.len(), "seeded");
        Ok(resource.seed.len())
    }
}

fn not_found(resource: &ResolvedResource, id: &ResourceId) -> AppError {
    AppError::NotFound(format!("{} {}", resource.name, id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{builtin_config, resolve, ResolvedModel};
    use crate::store::MemoryStore;
    use serde_json::{json, Value};

    fn model() -> ResolvedModel {
        resolve(&builtin_config().unwrap()).unwrap()
    }

    fn attrs(v: Value) -> Attributes {
        serde_json::from_value(v).unwrap()
    }

    #[tokio::test]
    async fn created_record_can_be_read_back() {
        let model = model();
        let users = model.resource_by_path("users").unwrap();
        let store = MemoryStore::new();

        let created = CrudService::create(
            &store,
            users,
            &attrs(json!({"id": 500, "name": "Ada", "email": "ada@example.com"})),
        )
        .await
        .unwrap();
        assert_eq!(created.id, ResourceId::Seq(1));
        assert_eq!(CrudService::read(&store, users, &created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let model = model();
        let users = model.resource_by_path("users").unwrap();
        let store = MemoryStore::new();
        let err = CrudService::read(&store, users, &ResourceId::Seq(9)).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref m) if m == "User 9"));
    }

    #[tokio::test]
    async fn invalid_create_persists_nothing() {
        let model = model();
        let users = model.resource_by_path("users").unwrap();
        let store = MemoryStore::new();
        let err = CrudService::create(&store, users, &attrs(json!({"name": "Ada"}))).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(CrudService::list(&store, users, false).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn active_filter_returns_active_subset() {
        let model = model();
        let items = model.resource_by_path("items").unwrap();
        let store = MemoryStore::new();
        CrudService::create(&store, items, &attrs(json!({"name": "a"}))).await.unwrap();
        CrudService::create(&store, items, &attrs(json!({"name": "b", "is_active": false}))).await.unwrap();
        CrudService::create(&store, items, &attrs(json!({"name": "c", "is_active": true}))).await.unwrap();

        let all = CrudService::list(&store, items, false).await.unwrap();
        let active = CrudService::list(&store, items, true).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(active.len(), 2);
        assert!(active.iter().all(|r| all.contains(r) && r.attributes["is_active"] == json!(true)));
    }

    #[tokio::test]
    async fn active_filter_ignored_without_active_field() {
        let model = model();
        let users = model.resource_by_path("users").unwrap();
        let store = MemoryStore::new();
        CrudService::seed(&store, users).await.unwrap();
        assert_eq!(
            CrudService::list(&store, users, true).await.unwrap(),
            CrudService::list(&store, users, false).await.unwrap()
        );
    }

    #[tokio::test]
    async fn replace_and_patch() {
        let model = model();
        let posts = model.resource_by_path("posts").unwrap();
        let store = MemoryStore::new();
        let post = CrudService::create(
            &store,
            posts,
            &attrs(json!({"title": "T", "content": "C", "author_id": 1})),
        )
        .await
        .unwrap();

        let patched = CrudService::patch(&store, posts, &post.id, &attrs(json!({"title": "T2"}))).await.unwrap();
        assert_eq!(patched.attributes["title"], json!("T2"));
        assert_eq!(patched.attributes["content"], json!("C"));

        let err = CrudService::replace(&store, posts, &post.id, &attrs(json!({"title": "only"}))).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let replaced = CrudService::replace(
            &store,
            posts,
            &post.id,
            &attrs(json!({"title": "New", "content": "Body", "author_id": 2})),
        )
        .await
        .unwrap();
        assert_eq!(replaced.id, post.id);
        assert_eq!(replaced.attributes["author_id"], json!(2));

        let missing = ResourceId::Seq(42);
        assert!(matches!(
            CrudService::patch(&store, posts, &missing, &attrs(json!({"title": "x"}))).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn delete_is_not_idempotent() {
        let model = model();
        let users = model.resource_by_path("users").unwrap();
        let store = MemoryStore::new();
        let u = CrudService::create(&store, users, &attrs(json!({"name": "A", "email": "a@b.c"})))
            .await
            .unwrap();
        CrudService::delete(&store, users, &u.id).await.unwrap();
        assert!(matches!(CrudService::read(&store, users, &u.id).await, Err(AppError::NotFound(_))));
        assert!(matches!(CrudService::delete(&store, users, &u.id).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn seeds_only_empty_collections() {
        let model = model();
        let users = model.resource_by_path("users").unwrap();
        let store = MemoryStore::new();
        assert_eq!(CrudService::seed(&store, users).await.unwrap(), 2);
        assert_eq!(CrudService::seed(&store, users).await.unwrap(), 0);
        let listed = CrudService::list(&store, users, false).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].attributes["name"], json!("John Doe"));
    }
}
