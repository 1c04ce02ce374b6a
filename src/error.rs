use std::path::PathBuf;
use thiserror::Error;

/// Failures reported by (or while talking to) the data provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("app `{app_id}` was not found by the provider")]
    AppNotFound { app_id: String },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("provider returned HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("failed to decode provider response from {url}: {reason}")]
    Decode { url: String, reason: String },

    #[error("provider unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum SerializationError {
    #[error("value of type `{type_name}` at {path} has no JSON representation")]
    Unsupported { type_name: String, path: String },

    #[error("non-finite number {value} at {path} cannot be encoded as JSON")]
    NonFiniteFloat { value: f64, path: String },

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error for one snapshot run, tagged with the step that failed.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("fetching app details failed")]
    FetchAppDetails(#[source] ProviderError),

    #[error("fetching reviews failed")]
    FetchReviews(#[source] ProviderError),

    #[error("serializing snapshot failed")]
    Serialize(#[from] SerializationError),

    #[error("failed to create snapshot directory {}", path.display())]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write snapshot to {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
