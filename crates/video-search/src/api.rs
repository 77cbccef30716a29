use std::future::Future;

use vs_video_api::{
    Error, HttpClient, ProcessResponse, ProgressSender, SearchRequest, SearchResponse,
    UploadRequest, UploadResponse, VideoSearchClient,
};

/// The three backend calls the controllers depend on.
pub trait VideoSearchApi: Send + Sync + 'static {
    fn upload(
        &self,
        req: UploadRequest,
        progress: Option<ProgressSender>,
    ) -> impl Future<Output = Result<UploadResponse, Error>> + Send;

    fn process(&self, video_id: &str) -> impl Future<Output = Result<ProcessResponse, Error>> + Send;

    fn search(
        &self,
        req: &SearchRequest,
    ) -> impl Future<Output = Result<SearchResponse, Error>> + Send;
}

impl<C: HttpClient + 'static> VideoSearchApi for VideoSearchClient<C> {
    async fn upload(
        &self,
        req: UploadRequest,
        progress: Option<ProgressSender>,
    ) -> Result<UploadResponse, Error> {
        VideoSearchClient::upload(self, req, progress).await
    }

    async fn process(&self, video_id: &str) -> Result<ProcessResponse, Error> {
        VideoSearchClient::process(self, video_id).await
    }

    async fn search(&self, req: &SearchRequest) -> Result<SearchResponse, Error> {
        VideoSearchClient::search(self, req).await
    }
}
