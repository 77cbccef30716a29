mod error;
mod progress;
mod reqwest_client;

pub use error::Error;
pub use progress::{ProgressSender, UploadProgress};
pub use reqwest_client::ReqwestHttpClient;

use std::future::Future;
use std::path::PathBuf;

/// A local file sent as one part of a `multipart/form-data` body.
#[derive(Debug, Clone)]
pub struct MultipartFile {
    pub field: String,
    pub file_name: String,
    pub mime_type: String,
    pub path: PathBuf,
}

pub trait HttpClient: Send + Sync {
    fn get(&self, path: &str) -> impl Future<Output = Result<Vec<u8>, Error>> + Send;

    /// Uploads `file` and reports bytes handed to the transport on `progress`.
    /// Only length-computable transfers report progress.
    fn post_file(
        &self,
        path: &str,
        file: MultipartFile,
        progress: Option<ProgressSender>,
    ) -> impl Future<Output = Result<Vec<u8>, Error>> + Send;
}
