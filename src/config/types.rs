//! Raw config types matching the resources JSON file.

use crate::model::{Attributes, IdStrategy};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Integer,
    Number,
    Boolean,
}

impl FieldType {
    pub fn matches(&self, v: &serde_json::Value) -> bool {
        match self {
            FieldType::String => v.is_string(),
            FieldType::Integer => v.is_i64() || v.is_u64(),
            FieldType::Number => v.is_number(),
            FieldType::Boolean => v.is_boolean(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    List,
    Read,
    Create,
    Update,
    Delete,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Operation::List,
        Operation::Read,
        Operation::Create,
        Operation::Update,
        Operation::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::List => "list",
            Operation::Read => "read",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ValidationRule {
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub max_length: Option<u32>,
    #[serde(default)]
    pub min_length: Option<u32>,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub allowed: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub minimum: Option<f64>,
    #[serde(default)]
    pub maximum: Option<f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FieldConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub type_: FieldType,
    #[serde(default)]
    pub required: bool,
    /// Applied on create/replace when the field is missing.
    #[serde(default)]
    pub default: Option<serde_json::Value>,
    #[serde(flatten)]
    pub rules: ValidationRule,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// Singular display name, e.g. "User".
    pub name: String,
    pub path_segment: String,
    #[serde(default)]
    pub id: IdStrategy,
    pub fields: Vec<FieldConfig>,
    /// Boolean field consulted by `?active=true`.
    #[serde(default)]
    pub active_field: Option<String>,
    #[serde(default = "all_operations")]
    pub operations: Vec<Operation>,
    /// Records inserted at startup into an empty collection.
    #[serde(default)]
    pub seed: Vec<Attributes>,
}

fn all_operations() -> Vec<Operation> {
    Operation::ALL.to_vec()
}

fn default_service_name() -> String {
    "Starter API".into()
}

/// Everything the service needs to know about its resources.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FullConfig {
    #[serde(default = "default_service_name")]
    pub name: String,
    pub resources: Vec<ResourceConfig>,
}
