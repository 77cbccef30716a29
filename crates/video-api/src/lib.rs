mod client;
mod error;
mod types;

pub use client::VideoSearchClient;
pub use error::Error;
pub use types::*;

pub use vs_http_client::{
    Error as HttpError, HttpClient, ProgressSender, ReqwestHttpClient, UploadProgress,
};

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";
