use vs_http_client::{HttpClient, MultipartFile, ProgressSender};

use crate::error::Error;
use crate::types::{
    ProcessResponse, SearchRequest, SearchResponse, UPLOAD_FIELD, UploadRequest, UploadResponse,
    parse_process_response,
};

pub struct VideoSearchClient<C> {
    http: C,
}

impl<C: HttpClient> VideoSearchClient<C> {
    pub fn new(http: C) -> Self {
        Self { http }
    }

    pub async fn upload(
        &self,
        req: UploadRequest,
        progress: Option<ProgressSender>,
    ) -> Result<UploadResponse, Error> {
        let file = MultipartFile {
            field: UPLOAD_FIELD.to_string(),
            file_name: req.file_name,
            mime_type: req.mime_type,
            path: req.path,
        };
        let bytes = self.http.post_file("/upload", file, progress).await?;
        let response: UploadResponse = serde_json::from_slice(&bytes)?;
        Ok(response)
    }

    pub async fn process(&self, video_id: &str) -> Result<ProcessResponse, Error> {
        let path = format!("/process/{}", urlencoding::encode(video_id));
        let bytes = self.http.get(&path).await?;
        Ok(parse_process_response(&bytes))
    }

    pub async fn search(&self, req: &SearchRequest) -> Result<SearchResponse, Error> {
        let mut path = format!(
            "/search?query={}&video_id={}",
            urlencoding::encode(&req.query),
            urlencoding::encode(&req.video_id)
        );
        if let Some(top_k) = req.top_k {
            path.push_str(&format!("&top_k={top_k}"));
        }

        let bytes = self.http.get(&path).await?;
        let response: SearchResponse = serde_json::from_slice(&bytes)?;
        tracing::debug!(count = response.results.len(), "search_response_parsed");
        Ok(response)
    }
}
