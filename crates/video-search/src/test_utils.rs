use std::sync::{Arc, Mutex};

use tokio::sync::Notify;
use vs_video_api::{
    Error, HttpError, ProcessResponse, ProgressSender, RawMatch, SearchRequest, SearchResponse,
    UploadProgress, UploadRequest, UploadResponse,
};

use crate::api::VideoSearchApi;

#[derive(Debug, Clone, Copy)]
pub enum Failure {
    Status(u16),
    Io,
    Malformed,
}

impl Failure {
    fn into_error(self) -> Error {
        match self {
            Self::Status(status) => Error::Http(HttpError::Status {
                status,
                body: "backend error".to_string(),
            }),
            Self::Io => Error::Http(HttpError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no such file",
            ))),
            Self::Malformed => match serde_json::from_str::<serde_json::Value>("<html>") {
                Err(e) => Error::Json(e),
                Ok(_) => unreachable!(),
            },
        }
    }
}

pub fn raw(text: &str, start: f64, score: f64) -> RawMatch {
    RawMatch {
        text: text.to_string(),
        start,
        score,
    }
}

/// Scripted backend. Gates hold a call until the test calls `notify_one`.
#[derive(Default)]
pub struct FakeApi {
    video_id: Option<String>,
    upload_progress: Vec<(u64, Option<u64>)>,
    upload_failure: Option<Failure>,
    upload_gate: Option<Arc<Notify>>,
    process_failure: Option<Failure>,
    process_gate: Option<Arc<Notify>>,
    matches: Vec<RawMatch>,
    search_failure: Option<Failure>,
    search_gate: Option<Arc<Notify>>,
    calls: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn with_video_id(mut self, video_id: &str) -> Self {
        self.video_id = Some(video_id.to_string());
        self
    }

    pub fn with_upload_progress(mut self, events: Vec<(u64, Option<u64>)>) -> Self {
        self.upload_progress = events;
        self
    }

    pub fn with_upload_failure(mut self, failure: Failure) -> Self {
        self.upload_failure = Some(failure);
        self
    }

    pub fn with_upload_gate(mut self, gate: Arc<Notify>) -> Self {
        self.upload_gate = Some(gate);
        self
    }

    pub fn with_process_failure(mut self, failure: Failure) -> Self {
        self.process_failure = Some(failure);
        self
    }

    pub fn with_process_gate(mut self, gate: Arc<Notify>) -> Self {
        self.process_gate = Some(gate);
        self
    }

    pub fn with_matches(mut self, matches: Vec<RawMatch>) -> Self {
        self.matches = matches;
        self
    }

    pub fn with_search_failure(mut self, failure: Failure) -> Self {
        self.search_failure = Some(failure);
        self
    }

    pub fn with_search_gate(mut self, gate: Arc<Notify>) -> Self {
        self.search_gate = Some(gate);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

async fn wait(gate: &Option<Arc<Notify>>) {
    if let Some(gate) = gate {
        gate.notified().await;
    }
}

impl VideoSearchApi for FakeApi {
    async fn upload(
        &self,
        req: UploadRequest,
        progress: Option<ProgressSender>,
    ) -> Result<UploadResponse, Error> {
        self.record(format!("upload {} {}", req.file_name, req.mime_type));

        if let Some(tx) = progress {
            for (loaded, total) in &self.upload_progress {
                let _ = tx.send(UploadProgress {
                    loaded: *loaded,
                    total: *total,
                });
            }
        }

        wait(&self.upload_gate).await;

        if let Some(failure) = self.upload_failure {
            return Err(failure.into_error());
        }
        Ok(UploadResponse {
            video_id: self.video_id.clone().unwrap_or_else(|| "video-1".to_string()),
            status: Some("success".to_string()),
        })
    }

    async fn process(&self, video_id: &str) -> Result<ProcessResponse, Error> {
        self.record(format!("process {video_id}"));
        wait(&self.process_gate).await;

        if let Some(failure) = self.process_failure {
            return Err(failure.into_error());
        }
        Ok(ProcessResponse {
            status: Some("processed".to_string()),
            video_id: Some(video_id.to_string()),
            segments_count: Some(self.matches.len() as u64),
        })
    }

    async fn search(&self, req: &SearchRequest) -> Result<SearchResponse, Error> {
        self.record(format!("search {} {}", req.query, req.video_id));
        wait(&self.search_gate).await;

        if let Some(failure) = self.search_failure {
            return Err(failure.into_error());
        }
        Ok(SearchResponse {
            results: self.matches.clone(),
        })
    }
}
