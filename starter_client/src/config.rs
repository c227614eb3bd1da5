use crate::error::ClientError;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    /// Applied to every request, connect included.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// `BASE_URL` and `CLIENT_TIMEOUT_SECS`; blank values count as unset.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();
        if let Some(base_url) = get("BASE_URL") {
            config.base_url = base_url;
        }
        if let Some(secs) = get("CLIENT_TIMEOUT_SECS") {
            let secs: f64 = secs
                .parse()
                .ok()
                .filter(|s: &f64| s.is_finite() && *s > 0.0)
                .ok_or_else(|| ClientError::Config(format!("CLIENT_TIMEOUT_SECS '{}' is not a positive number", secs)))?;
            config.timeout = Duration::from_secs_f64(secs);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<ClientConfig, ClientError> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        ClientConfig::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn defaults() {
        let c = config(&[]).unwrap();
        assert_eq!(c.base_url, "http://localhost:3000");
        assert_eq!(c.timeout, Duration::from_secs(10));
    }

    #[test]
    fn overrides() {
        let c = config(&[("BASE_URL", "http://api.internal:8000"), ("CLIENT_TIMEOUT_SECS", "2.5")]).unwrap();
        assert_eq!(c.base_url, "http://api.internal:8000");
        assert_eq!(c.timeout, Duration::from_millis(2500));
    }

    #[test]
    fn rejects_bad_timeout() {
        assert!(config(&[("CLIENT_TIMEOUT_SECS", "soon")]).is_err());
        assert!(config(&[("CLIENT_TIMEOUT_SECS", "0")]).is_err());
    }
}
