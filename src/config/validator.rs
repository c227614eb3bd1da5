//! Config validation: path segments, field declarations, filter field.

use crate::config::{FieldType, FullConfig, ResourceConfig};
use crate::error::ConfigError;
use regex::Regex;
use std::collections::HashSet;

/// Segments under /api that are served by the common routes.
pub const RESERVED_SEGMENTS: &[&str] = &["health", "ready"];

pub fn validate(config: &FullConfig) -> Result<(), ConfigError> {
    if config.resources.is_empty() {
        return Err(ConfigError::Validation("at least one resource required".into()));
    }
    let segment_re = Regex::new("^[a-z][a-z0-9_]*$").map_err(|e| ConfigError::Validation(e.to_string()))?;

    let mut path_segments = HashSet::new();
    for res in &config.resources {
        if !segment_re.is_match(&res.path_segment) || RESERVED_SEGMENTS.contains(&res.path_segment.as_str()) {
            return Err(ConfigError::Validation(format!(
                "invalid path segment '{}'",
                res.path_segment
            )));
        }
        if !path_segments.insert(res.path_segment.as_str()) {
            return Err(ConfigError::DuplicatePathSegment(res.path_segment.clone()));
        }
        validate_fields(res)?;
    }
    Ok(())
}

fn validate_fields(res: &ResourceConfig) -> Result<(), ConfigError> {
    let invalid = |field: &str, reason: String| ConfigError::InvalidField {
        resource: res.path_segment.clone(),
        field: field.to_string(),
        reason,
    };

    let mut names = HashSet::new();
    for f in &res.fields {
        if f.name == "id" {
            return Err(invalid(&f.name, "id is assigned by the service".into()));
        }
        if !names.insert(f.name.as_str()) {
            return Err(invalid(&f.name, "declared twice".into()));
        }
        if let Some(default) = &f.default {
            if !f.type_.matches(default) {
                return Err(invalid(&f.name, format!("default must be a {}", f.type_.as_str())));
            }
        }
        if let Some(pattern) = &f.rules.pattern {
            Regex::new(pattern).map_err(|e| invalid(&f.name, format!("bad pattern: {}", e)))?;
        }
    }

    if let Some(active) = &res.active_field {
        match res.fields.iter().find(|f| &f.name == active) {
            Some(f) if f.type_ == FieldType::Boolean => {}
            Some(_) => return Err(invalid(active, "active field must be boolean".into())),
            None => return Err(invalid(active, "active field is not declared".into())),
        }
    }
    Ok(())
}
