//! Request validation from the resource's field declarations.

use crate::config::{FieldSpec, ValidationRule};
use crate::error::AppError;
use crate::model::Attributes;
use serde_json::Value;

pub struct RequestValidator;

impl RequestValidator {
    /// Validate a full body (create, replace). Required fields must be present and non-null.
    /// Returns the attributes in field order with defaults applied; unknown keys and `id` are dropped.
    pub fn validate(body: &Attributes, fields: &[FieldSpec]) -> Result<Attributes, AppError> {
        let mut out = Attributes::new();
        for field in fields {
            match body.get(&field.name).filter(|v| !v.is_null()) {
                Some(v) => {
                    validate_field(field, v)?;
                    out.insert(field.name.clone(), v.clone());
                }
                None if field.required => {
                    return Err(AppError::Validation(format!("{} is required", field.name)));
                }
                None => {
                    if let Some(default) = &field.default {
                        out.insert(field.name.clone(), default.clone());
                    }
                }
            }
        }
        Ok(out)
    }

    /// Validate only the fields present in body (for PATCH). Required fields may not be set to null.
    pub fn validate_partial(body: &Attributes, fields: &[FieldSpec]) -> Result<Attributes, AppError> {
        let mut out = Attributes::new();
        for field in fields {
            let Some(v) = body.get(&field.name) else {
                continue;
            };
            if v.is_null() {
                if field.required {
                    return Err(AppError::Validation(format!("{} is required", field.name)));
                }
            } else {
                validate_field(field, v)?;
            }
            out.insert(field.name.clone(), v.clone());
        }
        if out.is_empty() {
            return Err(AppError::Validation("no known fields to update".into()));
        }
        Ok(out)
    }
}

fn validate_field(field: &FieldSpec, v: &Value) -> Result<(), AppError> {
    let col = field.name.as_str();
    if !field.type_.matches(v) {
        return Err(AppError::Validation(format!(
            "{} must be of type {}",
            col,
            field.type_.as_str()
        )));
    }
    let rule: &ValidationRule = &field.rules;
    if let Some(format) = &rule.format {
        validate_format(col, v, format)?;
    }
    if let Some(max) = rule.max_length {
        if let Some(s) = v.as_str() {
            if s.chars().count() > max as usize {
                return Err(AppError::Validation(format!(
                    "{} must be at most {} characters",
                    col, max
                )));
            }
        }
    }
    if let Some(min) = rule.min_length {
        if let Some(s) = v.as_str() {
            if s.chars().count() < min as usize {
                return Err(AppError::Validation(format!(
                    "{} must be at least {} characters",
                    col, min
                )));
            }
        }
    }
    if let Some(re) = &field.pattern {
        if let Some(s) = v.as_str() {
            if !re.is_match(s) {
                return Err(AppError::Validation(format!("{} does not match required pattern", col)));
            }
        }
    }
    if let Some(ref allowed) = rule.allowed {
        if !allowed.iter().any(|a| value_eq(v, a)) {
            return Err(AppError::Validation(format!(
                "{} must be one of: {:?}",
                col,
                allowed.iter().take(5).collect::<Vec<_>>()
            )));
        }
    }
    if let Some(min) = rule.minimum {
        if let Some(n) = v.as_f64() {
            if n < min {
                return Err(AppError::Validation(format!("{} must be at least {}", col, min)));
            }
        }
    }
    if let Some(max) = rule.maximum {
        if let Some(n) = v.as_f64() {
            if n > max {
                return Err(AppError::Validation(format!("{} must be at most {}", col, max)));
            }
        }
    }
    Ok(())
}

fn value_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(n), Value::Number(m)) => n.as_f64() == m.as_f64(),
        _ => a == b,
    }
}

fn validate_format(col: &str, v: &Value, format: &str) -> Result<(), AppError> {
    match format.to_lowercase().as_str() {
        "email" => {
            if let Some(s) = v.as_str() {
                let valid = match s.split_once('@') {
                    Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
                    None => false,
                };
                if !valid {
                    return Err(AppError::Validation(format!("{} must be a valid email", col)));
                }
            }
        }
        "uuid" => {
            if let Some(s) = v.as_str() {
                if uuid::Uuid::parse_str(s).is_err() {
                    return Err(AppError::Validation(format!("{} must be a valid UUID", col)));
                }
            }
        }
        _ => {}
    }
    Ok(())
}
