//! JSON object body whose rejections surface as structured validation errors.

use crate::error::AppError;
use crate::model::Attributes;
use async_trait::async_trait;
use axum::{
    extract::{FromRequest, Request},
    http::StatusCode,
    Json,
};
use serde_json::Value;

#[derive(Clone, Debug)]
pub struct JsonObject(pub Attributes);

#[async_trait]
impl<S> FromRequest<S> for JsonObject
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| {
                if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                    AppError::PayloadTooLarge(rejection.body_text())
                } else {
                    AppError::Validation(rejection.body_text())
                }
            })?;
        match value {
            Value::Object(map) => Ok(JsonObject(map)),
            _ => Err(AppError::Validation("body must be a JSON object".into())),
        }
    }
}
