use serde::Serialize;
use thiserror::Error;

pub(crate) const UPLOAD_FAILED: &str = "Upload failed. Please try again.";
pub(crate) const UPLOAD_NETWORK: &str =
    "Network error. Please check your connection and ensure the backend is running.";
pub(crate) const INDEXING_FAILED: &str =
    "Failed to process video. Please check your backend connection.";
pub(crate) const SEARCH_FAILED: &str = "Search failed. Please try again.";

pub type Result<T> = std::result::Result<T, Error>;

/// A terminal, per-attempt failure shown to the user. Only one is active at a
/// time; a newer one replaces the older.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum AppError {
    #[error("{0}")]
    Upload(String),

    #[error("{0}")]
    Indexing(String),

    #[error("{0}")]
    Search(String),
}

impl AppError {
    pub fn message(&self) -> &str {
        match self {
            Self::Upload(m) | Self::Indexing(m) | Self::Search(m) => m,
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to load environment: {0}")]
    Env(#[from] envy::Error),
}
