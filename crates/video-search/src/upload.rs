use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use vs_video_api::{ProgressSender, UploadRequest};

use crate::api::VideoSearchApi;
use crate::error::{AppError, UPLOAD_FAILED, UPLOAD_NETWORK};

/// A file chosen by the user, ready to be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub file_name: String,
    pub mime_type: String,
}

impl SelectedFile {
    fn new(path: PathBuf, mime_type: String) -> Self {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            path,
            file_name,
            mime_type,
        }
    }
}

/// Drag-and-drop path: anything whose MIME type is not `video/*` is ignored.
pub fn select_dropped(path: impl Into<PathBuf>, mime_type: &str) -> Option<SelectedFile> {
    if !vs_video_mime::is_video(mime_type) {
        tracing::debug!(mime_type = %mime_type, "dropped_file_ignored");
        return None;
    }
    Some(SelectedFile::new(path.into(), mime_type.to_string()))
}

/// Browse path: the picker already filtered by type, so nothing is re-checked.
pub fn select_browsed(path: impl Into<PathBuf>) -> SelectedFile {
    let path = path.into();
    let mime_type = vs_video_mime::content_type_for_path(&path).to_string();
    SelectedFile::new(path, mime_type)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedVideo {
    pub local_url: String,
    pub video_id: String,
    pub file_name: String,
}

pub struct UploadController<A> {
    api: Arc<A>,
}

impl<A: VideoSearchApi> UploadController<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    #[cfg(test)]
    pub(crate) fn api(&self) -> &A {
        &self.api
    }

    pub async fn upload(
        &self,
        file: SelectedFile,
        progress: Option<ProgressSender>,
    ) -> Result<UploadedVideo, AppError> {
        let req = UploadRequest {
            path: file.path.clone(),
            file_name: file.file_name.clone(),
            mime_type: file.mime_type.clone(),
        };

        let response = self.api.upload(req, progress).await.map_err(|e| {
            tracing::error!(error = %e, file_name = %file.file_name, "upload_failed");
            match e {
                // Only a transport failure means the backend was unreachable.
                vs_video_api::Error::Http(vs_video_api::HttpError::Request(_)) => {
                    AppError::Upload(UPLOAD_NETWORK.to_string())
                }
                _ => AppError::Upload(UPLOAD_FAILED.to_string()),
            }
        })?;

        tracing::info!(video_id = %response.video_id, file_name = %file.file_name, "upload_completed");

        Ok(UploadedVideo {
            local_url: local_url(&file.path),
            video_id: response.video_id,
            file_name: file.file_name,
        })
    }
}

/// A `file://` URL for immediate local playback, independent of the backend.
pub fn local_url(path: &Path) -> String {
    std::path::absolute(path)
        .ok()
        .and_then(|abs| url::Url::from_file_path(abs).ok())
        .map(|url| url.to_string())
        .unwrap_or_else(|| format!("file://{}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{FakeApi, Failure};

    #[test]
    fn dropped_non_video_is_ignored() {
        assert!(select_dropped("/tmp/song.mp3", "audio/mpeg").is_none());
        assert!(select_dropped("/tmp/notes.txt", "").is_none());

        let file = select_dropped("/tmp/talk.mp4", "video/mp4").unwrap();
        assert_eq!(file.file_name, "talk.mp4");
        assert_eq!(file.mime_type, "video/mp4");
    }

    #[test]
    fn browsed_file_is_not_revalidated() {
        let file = select_browsed("/tmp/readme.txt");
        assert_eq!(file.file_name, "readme.txt");
        assert_eq!(file.mime_type, "application/octet-stream");

        let file = select_browsed("/tmp/clip.webm");
        assert_eq!(file.mime_type, "video/webm");
    }

    #[test]
    fn local_url_is_file_scheme() {
        let url = local_url(Path::new("/videos/my talk.mp4"));
        assert_eq!(url, "file:///videos/my%20talk.mp4");
    }

    #[tokio::test]
    async fn upload_yields_uploaded_video() {
        let api = Arc::new(FakeApi::default().with_video_id("v1"));
        let controller = UploadController::new(api.clone());

        let video = controller
            .upload(select_browsed("/videos/talk.mp4"), None)
            .await
            .unwrap();

        assert_eq!(video.video_id, "v1");
        assert_eq!(video.file_name, "talk.mp4");
        assert_eq!(video.local_url, "file:///videos/talk.mp4");
        assert_eq!(api.calls(), vec!["upload talk.mp4 video/mp4"]);
    }

    #[tokio::test]
    async fn status_failure_uses_upload_message() {
        let api = Arc::new(FakeApi::default().with_upload_failure(Failure::Status(500)));
        let err = UploadController::new(api)
            .upload(select_browsed("/videos/talk.mp4"), None)
            .await
            .unwrap_err();
        assert_eq!(err, AppError::Upload(UPLOAD_FAILED.to_string()));
    }

    #[tokio::test]
    async fn local_file_error_uses_upload_message() {
        let api = Arc::new(FakeApi::default().with_upload_failure(Failure::Io));
        let err = UploadController::new(api)
            .upload(select_browsed("/videos/missing.mp4"), None)
            .await
            .unwrap_err();
        assert_eq!(err, AppError::Upload(UPLOAD_FAILED.to_string()));
    }
}
