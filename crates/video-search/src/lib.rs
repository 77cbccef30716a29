mod api;
mod app;
mod env;
mod error;
mod indexing;
mod presenter;
mod search;
mod state;
mod upload;
mod view;

#[cfg(test)]
pub(crate) mod test_utils;

pub use api::VideoSearchApi;
pub use app::{App, AppBuilder, Rejection, SearchOutcome, UploadOutcome};
pub use env::{ENV_PREFIX, Env};
pub use error::{AppError, Error, Result};
pub use indexing::{
    DEFAULT_TICK_INTERVAL, IncrementFn, IndexingMonitor, IndexingProgress, IndexingStatus,
    MAX_PROGRESS, random_increment, stage_for,
};
pub use presenter::{
    PLAYER_ID, PlaybackSurface, PresentedResult, ResultPresenter, ScoreBucket, format_timestamp,
    match_count_label, present,
};
pub use search::{HalfDistance, ScoreMapper, SearchController, SearchQuery, SearchResult, normalize};
pub use state::{AppPhase, AppState, Event, PhaseKind};
pub use upload::{
    SelectedFile, UploadController, UploadedVideo, local_url, select_browsed, select_dropped,
};
pub use view::{
    AppView, EMPTY_STATE_TITLE, IndexingView, PLACEHOLDER_DISABLED, PLACEHOLDER_ENABLED,
    SEARCHING_LABEL, render,
};

pub use vs_video_api::{ReqwestHttpClient, UploadProgress, VideoSearchClient};

pub type HttpApp = App<VideoSearchClient<ReqwestHttpClient>>;

/// Builds an [`App`] talking to the backend at `env.api_url`.
pub fn connect(env: &Env) -> HttpApp {
    let client = VideoSearchClient::new(ReqwestHttpClient::new(env.api_url.as_str()));
    tracing::debug!(api_url = %env.api_url, "backend_configured");
    App::builder(client).env(env).build()
}
