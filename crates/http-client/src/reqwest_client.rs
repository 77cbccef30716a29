use futures_util::TryStreamExt;
use reqwest::multipart::{Form, Part};
use tokio_util::io::ReaderStream;

use crate::{Error, HttpClient, MultipartFile, ProgressSender, UploadProgress};

#[derive(Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestHttpClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl HttpClient for ReqwestHttpClient {
    async fn get(&self, path: &str) -> Result<Vec<u8>, Error> {
        let response = self.client.get(self.url(path)).send().await?;
        read_body(response).await
    }

    async fn post_file(
        &self,
        path: &str,
        file: MultipartFile,
        progress: Option<ProgressSender>,
    ) -> Result<Vec<u8>, Error> {
        let handle = tokio::fs::File::open(&file.path).await?;
        let total = handle.metadata().await?.len();

        let mut loaded = 0u64;
        let stream = ReaderStream::new(handle).inspect_ok(move |chunk| {
            loaded += chunk.len() as u64;
            if let Some(tx) = &progress {
                let _ = tx.send(UploadProgress {
                    loaded,
                    total: Some(total),
                });
            }
        });

        let part = Part::stream_with_length(reqwest::Body::wrap_stream(stream), total)
            .file_name(file.file_name)
            .mime_str(&file.mime_type)?;
        let form = Form::new().part(file.field, part);

        tracing::debug!(path = %path, bytes = total, "multipart_upload_started");
        let response = self.client.post(self.url(path)).multipart(form).send().await?;
        read_body(response).await
    }
}

async fn read_body(response: reqwest::Response) -> Result<Vec<u8>, Error> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), "unexpected_status");
        return Err(Error::Status {
            status: status.as_u16(),
            body,
        });
    }
    let bytes = response.bytes().await?;
    Ok(bytes.to_vec())
}
