use reqwest::StatusCode;
use thiserror::Error;

/// Why a call to the API did not produce a payload.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("invalid config: {0}")]
    Config(String),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    /// Connection refused, DNS failure, timeout, broken body stream.
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server answered {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("bad json from server: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Transport(e) if e.is_timeout())
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
