use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP client error: {0}")]
    Http(#[from] vs_http_client::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// True when the backend responded with a non-2xx status, as opposed to
    /// the request never completing.
    pub fn is_status(&self) -> bool {
        matches!(self, Self::Http(e) if e.is_status())
    }
}
