//! Resource records as they travel between store, service and wire.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use uuid::Uuid;

/// Field name -> value, kept in schema order.
pub type Attributes = Map<String, Value>;

/// How a resource type assigns ids to new records.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    /// Positive integers, increasing, never reused.
    #[default]
    Sequential,
    /// Random v4 UUIDs.
    Uuid,
}

impl IdStrategy {
    /// Parse a path/text id under this strategy. `None` means no record can carry it.
    pub fn parse(&self, raw: &str) -> Option<ResourceId> {
        match self {
            IdStrategy::Sequential => raw
                .parse::<u64>()
                .ok()
                // only the canonical spelling: no sign, no leading zeros
                .filter(|n| *n > 0 && n.to_string() == raw)
                .map(ResourceId::Seq),
            IdStrategy::Uuid => Uuid::parse_str(raw).ok().map(ResourceId::Uuid),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
    Seq(u64),
    Uuid(Uuid),
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceId::Seq(n) => write!(f, "{}", n),
            ResourceId::Uuid(u) => write!(f, "{}", u),
        }
    }
}

/// One record. Serializes flat: `{"id": 1, "name": "..."}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: ResourceId,
    #[serde(flatten)]
    pub attributes: Attributes,
}

impl Resource {
    /// True when `field` is absent, null, or `true`.
    pub fn is_active(&self, field: &str) -> bool {
        match self.attributes.get(field) {
            None | Some(Value::Null) => true,
            Some(v) => v == &Value::Bool(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_flat_with_id_first() {
        let mut attributes = Attributes::new();
        attributes.insert("name".into(), json!("Ada"));
        attributes.insert("email".into(), json!("ada@example.com"));
        let r = Resource {
            id: ResourceId::Seq(3),
            attributes,
        };
        assert_eq!(
            serde_json::to_string(&r).unwrap(),
            r#"{"id":3,"name":"Ada","email":"ada@example.com"}"#
        );
    }

    #[test]
    fn deserializes_uuid_ids() {
        let r: Resource =
            serde_json::from_value(json!({"id": "67e55044-10b1-426f-9247-bb680e5fe0c8", "title": "x"})).unwrap();
        assert!(matches!(r.id, ResourceId::Uuid(_)));
        assert_eq!(r.attributes.get("title"), Some(&json!("x")));
        assert!(!r.attributes.contains_key("id"));
    }

    #[test]
    fn parses_ids_by_strategy() {
        assert_eq!(IdStrategy::Sequential.parse("42"), Some(ResourceId::Seq(42)));
        assert_eq!(IdStrategy::Sequential.parse("0"), None);
        assert_eq!(IdStrategy::Sequential.parse("abc"), None);
        assert_eq!(IdStrategy::Sequential.parse("+1"), None);
        assert_eq!(IdStrategy::Sequential.parse("01"), None);
        assert_eq!(IdStrategy::Uuid.parse("42"), None);
        assert!(IdStrategy::Uuid.parse("67e55044-10b1-426f-9247-bb680e5fe0c8").is_some());
    }

    #[test]
    fn absent_or_null_flag_counts_as_active() {
        let mut r = Resource {
            id: ResourceId::Seq(1),
            attributes: Attributes::new(),
        };
        assert!(r.is_active("is_active"));
        r.attributes.insert("is_active".into(), Value::Null);
        assert!(r.is_active("is_active"));
        r.attributes.insert("is_active".into(), json!(false));
        assert!(!r.is_active("is_active"));
        r.attributes.insert("is_active".into(), json!(true));
        assert!(r.is_active("is_active"));
    }
}
