use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::ClientConfig;
use crate::error::ClientError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// HTTP client for a starter API.
///
/// `try_*` methods report every failure as a `ClientError`. The plain `fetch_*`
/// methods never fail: they log the error and hand back an empty/absent value,
/// which callers cannot tell apart from a legitimately empty collection.
#[derive(Clone, Debug)]
pub struct ApiClient {
    base: Url,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let base = Url::parse(&config.base_url).map_err(|e| ClientError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(config.base_url.clone()));
        }
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .build()?;
        Ok(Self { base, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ClientError> {
        tracing::debug!(url = %url, "GET");
        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(ClientError::Status { status, body });
        }
        Ok(serde_json::from_str(&body)?)
    }

    /// GET /api/<resource>.
    pub async fn try_fetch_collection<T: DeserializeOwned>(&self, resource: &str) -> Result<Vec<T>, ClientError> {
        let url = self.endpoint(&[resource])?;
        self.get_json(url).await
    }

    /// GET /api/<resource>/<id>. `Ok(None)` when the service answers 404.
    pub async fn try_fetch_one<T: DeserializeOwned>(&self, resource: &str, id: &str) -> Result<Option<T>, ClientError> {
        let url = self.endpoint(&[resource, id])?;
        match self.get_json(url).await {
            Ok(v) => Ok(Some(v)),
            Err(ClientError::Status { status: StatusCode::NOT_FOUND, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// GET /api/health.
    pub async fn try_fetch_health(&self) -> Result<HealthStatus, ClientError> {
        let url = self.endpoint(&["health"])?;
        self.get_json(url).await
    }

    /// Like `try_fetch_collection`, but any failure is logged and yields an empty list.
    pub async fn fetch_collection<T: DeserializeOwned>(&self, resource: &str) -> Vec<T> {
        match self.try_fetch_collection(resource).await {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!(resource, error = %e, "error fetching collection");
                Vec::new()
            }
        }
    }

    /// Like `try_fetch_health`, but any failure is logged and yields `None`.
    pub async fn fetch_health(&self) -> Option<HealthStatus> {
        match self.try_fetch_health().await {
            Ok(health) => Some(health),
            Err(e) => {
                tracing::warn!(error = %e, "error checking health");
                None
            }
        }
    }
}
