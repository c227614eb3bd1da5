//! Extract the `active` list filter from the query string.

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use std::collections::HashMap;

/// Query parameter consulted by list endpoints.
pub const ACTIVE_PARAM: &str = "active";

/// Raw value of `?active=`. Only the exact token `true` turns filtering on;
/// anything else (absent, `false`, `TRUE`, garbage) lists the whole collection.
#[derive(Clone, Debug, Default)]
pub struct ActiveFilter(pub Option<String>);

impl ActiveFilter {
    pub fn is_requested(&self) -> bool {
        self.0.as_deref() == Some("true")
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ActiveFilter
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = Query::<HashMap<String, String>>::try_from_uri(&parts.uri)
            .ok()
            .and_then(|Query(mut params)| params.remove(ACTIVE_PARAM));
        Ok(ActiveFilter(value))
    }
}
