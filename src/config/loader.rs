//! Load config from the built-in resource set or from a JSON file, and resolve it.

use crate::config::resolved::{FieldSpec, ResolvedModel, ResolvedResource};
use crate::config::types::*;
use crate::config::validate;
use crate::error::ConfigError;
use crate::service::RequestValidator;
use regex::Regex;
use serde_json::json;
use std::collections::HashMap;
use std::path::Path;

/// Build resolved model from full config. Validates first.
pub fn resolve(config: &FullConfig) -> Result<ResolvedModel, ConfigError> {
    validate(config)?;

    let mut resources = Vec::with_capacity(config.resources.len());
    let mut resource_by_path = HashMap::new();

    for res in &config.resources {
        let fields = res
            .fields
            .iter()
            .map(|f| {
                let pattern = f
                    .rules
                    .pattern
                    .as_deref()
                    .map(Regex::new)
                    .transpose()
                    .map_err(|e| ConfigError::InvalidField {
                        resource: res.path_segment.clone(),
                        field: f.name.clone(),
                        reason: e.to_string(),
                    })?;
                Ok(FieldSpec {
                    name: f.name.clone(),
                    type_: f.type_,
                    required: f.required,
                    default: f.default.clone(),
                    rules: f.rules.clone(),
                    pattern,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        let mut seed = Vec::with_capacity(res.seed.len());
        for record in &res.seed {
            let normalized = RequestValidator::validate(record, &fields).map_err(|e| {
                ConfigError::Validation(format!("seed record for {}: {}", res.path_segment, e))
            })?;
            seed.push(normalized);
        }

        resource_by_path.insert(res.path_segment.clone(), resources.len());
        resources.push(ResolvedResource {
            name: res.name.clone(),
            path_segment: res.path_segment.clone(),
            id_strategy: res.id,
            fields,
            active_field: res.active_field.clone(),
            operations: res.operations.iter().copied().collect(),
            seed,
        });
    }

    Ok(ResolvedModel {
        service_name: config.name.clone(),
        resources,
        resource_by_path,
    })
}

/// Read a `FullConfig` from a JSON file.
pub async fn load_from_file(path: impl AsRef<Path>) -> Result<FullConfig, ConfigError> {
    let path = path.as_ref();
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))?;
    serde_json::from_str(&raw).map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))
}

/// The users/posts/items resources the starter ships with, with their sample records.
pub fn builtin_config() -> Result<FullConfig, ConfigError> {
    let value = json!({
        "name": "Starter API",
        "resources": [
            {
                "name": "User",
                "path_segment": "users",
                "fields": [
                    {"name": "name", "type": "string", "required": true, "min_length": 1, "max_length": 200},
                    {"name": "email", "type": "string", "required": true, "format": "email"}
                ],
                "seed": [
                    {"name": "John Doe", "email": "john@example.com"},
                    {"name": "Jane Smith", "email": "jane@example.com"}
                ]
            },
            {
                "name": "Post",
                "path_segment": "posts",
                "fields": [
                    {"name": "title", "type": "string", "required": true, "min_length": 1, "max_length": 200},
                    {"name": "content", "type": "string", "required": true},
                    {"name": "author_id", "type": "integer", "required": true, "minimum": 1}
                ],
                "seed": [
                    {"title": "First Post", "content": "Hello World", "author_id": 1},
                    {"title": "Second Post", "content": "Rust is great", "author_id": 1}
                ]
            },
            {
                "name": "Item",
                "path_segment": "items",
                "active_field": "is_active",
                "fields": [
                    {"name": "name", "type": "string", "required": true, "min_length": 1, "max_length": 200},
                    {"name": "description", "type": "string"},
                    {"name": "is_active", "type": "boolean", "default": true}
                ],
                "seed": []
            }
        ]
    });
    serde_json::from_value(value).map_err(|e| ConfigError::Load(format!("builtin config: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::IdStrategy;

    #[test]
    fn resolves_builtin_resources() {
        let model = resolve(&builtin_config().unwrap()).unwrap();
        assert_eq!(model.service_name, "Starter API");
        let paths: Vec<_> = model.resources.iter().map(|r| r.path_segment.as_str()).collect();
        assert_eq!(paths, ["users", "posts", "items"]);

        let users = model.resource_by_path("users").unwrap();
        assert_eq!(users.id_strategy, IdStrategy::Sequential);
        assert_eq!(users.seed.len(), 2);
        assert!(users.allows(Operation::Delete));

        let items = model.resource_by_path("items").unwrap();
        assert_eq!(items.active_field.as_deref(), Some("is_active"));
        assert!(model.resource_by_path("comments").is_none());
    }

    #[test]
    fn rejects_invalid_seed_records() {
        let mut config = builtin_config().unwrap();
        config.resources[0].seed.push(serde_json::from_value(json!({"name": "No Email"})).unwrap());
        let err = resolve(&config).unwrap_err();
        assert!(err.to_string().contains("email is required"));
    }

    #[test]
    fn applies_defaults_to_seed_records() {
        let mut config = builtin_config().unwrap();
        config.resources[2].seed.push(serde_json::from_value(json!({"name": "Widget"})).unwrap());
        let model = resolve(&config).unwrap();
        let seed = &model.resource_by_path("items").unwrap().seed[0];
        assert_eq!(seed.get("is_active"), Some(&json!(true)));
    }

    #[tokio::test]
    async fn loads_config_from_file() {
        let path = std::env::temp_dir().join(format!("starter-api-config-{}.json", uuid::Uuid::new_v4()));
        tokio::fs::write(
            &path,
            r#"{"resources": [{"name": "Note", "path_segment": "notes", "id": "uuid",
                "operations": ["list", "read"],
                "fields": [{"name": "body", "type": "string", "required": true}]}]}"#,
        )
        .await
        .unwrap();
        let config = load_from_file(&path).await.unwrap();
        tokio::fs::remove_file(&path).await.unwrap();

        assert_eq!(config.name, "Starter API");
        let model = resolve(&config).unwrap();
        let notes = model.resource_by_path("notes").unwrap();
        assert_eq!(notes.id_strategy, IdStrategy::Uuid);
        assert!(notes.allows(Operation::Read));
        assert!(!notes.allows(Operation::Create));
    }

    #[tokio::test]
    async fn missing_file_is_a_load_error() {
        let err = load_from_file("/nonexistent/resources.json").await.unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }
}
