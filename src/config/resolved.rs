//! Resolved resource model: config validated and flattened for runtime use.

use crate::config::{FieldType, Operation, ValidationRule};
use crate::model::{Attributes, IdStrategy};
use regex::Regex;
use std::collections::{HashMap, HashSet};

#[derive(Clone, Debug)]
pub struct FieldSpec {
    pub name: String,
    pub type_: FieldType,
    pub required: bool,
    pub default: Option<serde_json::Value>,
    pub rules: ValidationRule,
    /// `rules.pattern`, compiled once at resolve time.
    pub pattern: Option<Regex>,
}

#[derive(Clone, Debug)]
pub struct ResolvedResource {
    pub name: String,
    pub path_segment: String,
    pub id_strategy: IdStrategy,
    pub fields: Vec<FieldSpec>,
    pub active_field: Option<String>,
    pub operations: HashSet<Operation>,
    pub seed: Vec<Attributes>,
}

impl ResolvedResource {
    pub fn allows(&self, op: Operation) -> bool {
        self.operations.contains(&op)
    }

    pub fn collection_path(&self) -> String {
        format!("/api/{}", self.path_segment)
    }
}

#[derive(Clone, Debug)]
pub struct ResolvedModel {
    pub service_name: String,
    pub resources: Vec<ResolvedResource>,
    pub resource_by_path: HashMap<String, usize>,
}

impl ResolvedModel {
    pub fn resource_by_path(&self, path: &str) -> Option<&ResolvedResource> {
        self.resource_by_path.get(path).and_then(|&i| self.resources.get(i))
    }
}
