use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub(crate) const UPLOAD_FIELD: &str = "file";

#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub path: PathBuf,
    pub file_name: String,
    pub mime_type: String,
}

#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    pub video_id: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// Body of `GET /process/{video_id}`. Only informational; any 2xx is success.
#[derive(Debug, Default, Deserialize)]
pub struct ProcessResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub video_id: Option<String>,
    #[serde(default)]
    pub segments_count: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub query: String,
    pub video_id: String,
    pub top_k: Option<u32>,
}

/// One transcript segment returned by the backend. `score` is a distance,
/// lower means closer to the query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMatch {
    pub text: String,
    pub start: f64,
    pub score: f64,
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<RawMatch>,
}

pub(crate) fn parse_process_response(bytes: &[u8]) -> ProcessResponse {
    if bytes.is_empty() {
        return ProcessResponse::default();
    }
    serde_json::from_slice(bytes).unwrap_or_default()
}
