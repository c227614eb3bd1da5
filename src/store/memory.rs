//! In-process store. Lost on restart; used when no DATABASE_URL is configured.

use super::ResourceStore;
use crate::config::ResolvedResource;
use crate::error::AppError;
use crate::model::{Attributes, IdStrategy, Resource, ResourceId};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Collection {
    /// Insertion counter; doubles as the id for sequential collections.
    next_seq: u64,
    records: BTreeMap<u64, Resource>,
    seq_by_id: HashMap<ResourceId, u64>,
}

impl Collection {
    fn get_mut(&mut self, id: &ResourceId) -> Option<&mut Resource> {
        let seq = self.seq_by_id.get(id)?;
        self.records.get_mut(seq)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResourceStore for MemoryStore {
    async fn list(&self, resource: &ResolvedResource) -> Result<Vec<Resource>, AppError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&resource.path_segment)
            .map(|c| c.records.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn get(&self, resource: &ResolvedResource, id: &ResourceId) -> Result<Option<Resource>, AppError> {
        let collections = self.collections.read().await;
        Ok(collections.get(&resource.path_segment).and_then(|c| {
            c.seq_by_id
                .get(id)
                .and_then(|seq| c.records.get(seq))
                .cloned()
        }))
    }

    async fn insert(&self, resource: &ResolvedResource, attributes: Attributes) -> Result<Resource, AppError> {
        let mut collections = self.collections.write().await;
        let collection = collections.entry(resource.path_segment.clone()).or_default();
        collection.next_seq += 1;
        let seq = collection.next_seq;
        let id = match resource.id_strategy {
            IdStrategy::Sequential => ResourceId::Seq(seq),
            IdStrategy::Uuid => ResourceId::Uuid(Uuid::new_v4()),
        };
        let record = Resource { id: id.clone(), attributes };
        collection.seq_by_id.insert(id, seq);
        collection.records.insert(seq, record.clone());
        Ok(record)
    }

    async fn replace(
        &self,
        resource: &ResolvedResource,
        id: &ResourceId,
        attributes: Attributes,
    ) -> Result<Option<Resource>, AppError> {
        let mut collections = self.collections.write().await;
        let Some(record) = collections.get_mut(&resource.path_segment).and_then(|c| c.get_mut(id)) else {
            return Ok(None);
        };
        record.attributes = attributes;
        Ok(Some(record.clone()))
    }

    async fn merge(
        &self,
        resource: &ResolvedResource,
        id: &ResourceId,
        attributes: Attributes,
    ) -> Result<Option<Resource>, AppError> {
        let mut collections = self.collections.write().await;
        let Some(record) = collections.get_mut(&resource.path_segment).and_then(|c| c.get_mut(id)) else {
            return Ok(None);
        };
        for (k, v) in attributes {
            record.attributes.insert(k, v);
        }
        Ok(Some(record.clone()))
    }

    async fn delete(&self, resource: &ResolvedResource, id: &ResourceId) -> Result<bool, AppError> {
        let mut collections = self.collections.write().await;
        let Some(collection) = collections.get_mut(&resource.path_segment) else {
            return Ok(false);
        };
        match collection.seq_by_id.remove(id) {
            Some(seq) => {
                collection.records.remove(&seq);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{builtin_config, resolve, ResolvedModel};
    use serde_json::json;

    fn model() -> ResolvedModel {
        resolve(&builtin_config().unwrap()).unwrap()
    }

    fn attrs(v: serde_json::Value) -> Attributes {
        serde_json::from_value(v).unwrap()
    }

    #[tokio::test]
    async fn assigns_increasing_ids_and_never_reuses_them() {
        let model = model();
        let users = model.resource_by_path("users").unwrap();
        let store = MemoryStore::new();

        let a = store.insert(users, attrs(json!({"name": "A"}))).await.unwrap();
        let b = store.insert(users, attrs(json!({"name": "B"}))).await.unwrap();
        assert_eq!(a.id, ResourceId::Seq(1));
        assert_eq!(b.id, ResourceId::Seq(2));

        assert!(store.delete(users, &b.id).await.unwrap());
        let c = store.insert(users, attrs(json!({"name": "C"}))).await.unwrap();
        assert_eq!(c.id, ResourceId::Seq(3));

        let names: Vec<_> = store
            .list(users)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.attributes["name"].clone())
            .collect();
        assert_eq!(names, [json!("A"), json!("C")]);
    }

    #[tokio::test]
    async fn collections_are_independent() {
        let model = model();
        let store = MemoryStore::new();
        let users = model.resource_by_path("users").unwrap();
        let posts = model.resource_by_path("posts").unwrap();

        let u = store.insert(users, attrs(json!({"name": "A"}))).await.unwrap();
        let p = store.insert(posts, attrs(json!({"title": "T"}))).await.unwrap();
        assert_eq!(u.id, p.id);
        assert_eq!(store.list(users).await.unwrap().len(), 1);
        assert!(store.delete(posts, &p.id).await.unwrap());
        assert!(store.get(users, &u.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn replace_and_merge() {
        let model = model();
        let items = model.resource_by_path("items").unwrap();
        let store = MemoryStore::new();
        let item = store
            .insert(items, attrs(json!({"name": "Widget", "description": "d", "is_active": true})))
            .await
            .unwrap();

        let merged = store
            .merge(items, &item.id, attrs(json!({"is_active": false})))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            serde_json::Value::Object(merged.attributes),
            json!({"name": "Widget", "description": "d", "is_active": false})
        );

        let replaced = store
            .replace(items, &item.id, attrs(json!({"name": "Gadget"})))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(serde_json::Value::Object(replaced.attributes), json!({"name": "Gadget"}));

        let missing = ResourceId::Seq(77);
        assert!(store.replace(items, &missing, Attributes::new()).await.unwrap().is_none());
        assert!(store.merge(items, &missing, Attributes::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_twice_reports_missing() {
        let model = model();
        let users = model.resource_by_path("users").unwrap();
        let store = MemoryStore::new();
        let u = store.insert(users, attrs(json!({"name": "A"}))).await.unwrap();
        assert!(store.delete(users, &u.id).await.unwrap());
        assert!(!store.delete(users, &u.id).await.unwrap());
        assert!(store.get(users, &u.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn uuid_collections_get_uuid_ids() {
        let config: crate::config::FullConfig = serde_json::from_value(json!({"resources": [
            {"name": "Note", "path_segment": "notes", "id": "uuid", "fields": []}
        ]}))
        .unwrap();
        let model = resolve(&config).unwrap();
        let notes = model.resource_by_path("notes").unwrap();
        let store = MemoryStore::new();
        let n = store.insert(notes, Attributes::new()).await.unwrap();
        assert!(matches!(n.id, ResourceId::Uuid(_)));
        assert_eq!(store.get(notes, &n.id).await.unwrap(), Some(n));
    }
}
