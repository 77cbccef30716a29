use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tracing::Instrument;
use vs_video_api::UploadProgress;

use crate::api::VideoSearchApi;
use crate::env::Env;
use crate::error::AppError;
use crate::indexing::{
    DEFAULT_TICK_INTERVAL, IncrementFn, IndexingMonitor, IndexingProgress, random_increment,
};
use crate::presenter::ResultPresenter;
use crate::search::{HalfDistance, ScoreMapper, SearchController, SearchQuery};
use crate::state::{AppPhase, AppState, Event};
use crate::upload::{SelectedFile, UploadController, UploadedVideo};
use crate::view::{AppView, render};

#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    /// Uploaded and indexed; search is now enabled.
    Indexed(UploadedVideo),
    /// Another upload or a loaded video is already present.
    Rejected,
    /// The session was cleared before this upload finished.
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    EmptyQuery,
    NotReady,
    Busy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    Applied { count: usize },
    Rejected(Rejection),
    Stale,
}

fn session_span(generation: u64) -> tracing::Span {
    tracing::info_span!("session", generation)
}

/// Wires the three controllers to a single [`AppState`]. Cheap to clone.
pub struct App<A: VideoSearchApi> {
    uploader: Arc<UploadController<A>>,
    monitor: Arc<IndexingMonitor<A>>,
    searcher: Arc<SearchController<A>>,
    presenter: ResultPresenter,
    state: Arc<watch::Sender<AppState>>,
}

impl<A: VideoSearchApi> Clone for App<A> {
    fn clone(&self) -> Self {
        Self {
            uploader: Arc::clone(&self.uploader),
            monitor: Arc::clone(&self.monitor),
            searcher: Arc::clone(&self.searcher),
            presenter: self.presenter.clone(),
            state: Arc::clone(&self.state),
        }
    }
}

impl<A: VideoSearchApi> App<A> {
    pub fn builder(api: A) -> AppBuilder<A> {
        AppBuilder::new(api)
    }

    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> AppState {
        self.state.borrow().clone()
    }

    pub fn indexing_progress(&self) -> watch::Receiver<IndexingProgress> {
        self.monitor.subscribe()
    }

    pub fn presenter(&self) -> &ResultPresenter {
        &self.presenter
    }

    pub fn view(&self) -> AppView {
        render(&self.state.borrow(), self.monitor.progress())
    }

    pub fn on_timestamp_click(&self, timestamp: f64) {
        self.presenter.on_timestamp_click(timestamp);
    }

    /// Uploads `file`, then indexes it. Failures are also recorded in the
    /// state's error slot.
    pub async fn upload(&self, file: SelectedFile) -> Result<UploadOutcome, AppError> {
        let event = Event::UploadStart {
            file_name: file.file_name.clone(),
        };
        let mut generation = None;
        self.state.send_if_modified(|s| {
            let applied = s.apply(event);
            if applied {
                generation = Some(s.generation());
            }
            applied
        });

        let Some(generation) = generation else {
            tracing::debug!(file_name = %file.file_name, "upload_rejected");
            return Ok(UploadOutcome::Rejected);
        };

        async move {
            tracing::info!(file_name = %file.file_name, "upload_started");

            let video = match self.transfer(generation, file).await {
                Ok(video) => video,
                Err(error) => {
                    return if self.dispatch(generation, Event::UploadFailure(error.clone())) {
                        Err(error)
                    } else {
                        Ok(UploadOutcome::Stale)
                    };
                }
            };

            if !self.dispatch(generation, Event::UploadSuccess(video.clone())) {
                return Ok(UploadOutcome::Stale);
            }
            self.index(generation, video).await
        }
        .instrument(session_span(generation))
        .await
    }

    async fn transfer(
        &self,
        generation: u64,
        file: SelectedFile,
    ) -> Result<UploadedVideo, AppError> {
        let (tx, mut rx) = mpsc::unbounded_channel::<UploadProgress>();

        let forward = async {
            while let Some(progress) = rx.recv().await {
                if let Some(percent) = progress.percent() {
                    self.dispatch(generation, Event::UploadProgress { percent });
                }
            }
        };

        let (result, ()) = tokio::join!(self.uploader.upload(file, Some(tx)), forward);
        result
    }

    async fn index(
        &self,
        generation: u64,
        video: UploadedVideo,
    ) -> Result<UploadOutcome, AppError> {
        let run = self.monitor.begin().await;
        if self.generation() != generation {
            self.monitor.stop(run).await;
            return Ok(UploadOutcome::Stale);
        }

        let result = self.monitor.request(&video.video_id).await;

        let (event, outcome) = match result {
            Ok(()) => (Event::IndexSuccess, Ok(UploadOutcome::Indexed(video.clone()))),
            Err(error) => (Event::IndexFailure(error.clone()), Err(error)),
        };

        // The phase leaves Indexing before the ticker resets, so progress
        // never drops while Indexing is observable.
        let applied = self.dispatch(generation, event);
        self.monitor.stop(run).await;

        if applied {
            return outcome;
        }
        tracing::info!(video_id = %video.video_id, "index_result_discarded");
        Ok(UploadOutcome::Stale)
    }

    /// Searches the current video. Rejected without a request unless a video
    /// is indexed, no other search is running, and the query is non-blank.
    pub async fn search(&self, query: &str) -> Result<SearchOutcome, AppError> {
        let mut started = Err(Rejection::NotReady);
        self.state.send_if_modified(|s| {
            let video_id = match &s.phase {
                AppPhase::Ready { video } => video.video_id.clone(),
                AppPhase::Searching { .. } => {
                    started = Err(Rejection::Busy);
                    return false;
                }
                _ => return false,
            };
            let Some(query) = SearchQuery::new(query, Some(&video_id)) else {
                started = Err(Rejection::EmptyQuery);
                return false;
            };
            let applied = s.apply(Event::SearchStart {
                query: query.text.clone(),
            });
            if applied {
                started = Ok((s.generation(), query));
            }
            applied
        });

        let (generation, query) = match started {
            Ok(started) => started,
            Err(rejection) => {
                tracing::debug!(?rejection, "search_rejected");
                return Ok(SearchOutcome::Rejected(rejection));
            }
        };

        async move {
            let (event, outcome) = match self.searcher.run(&query).await {
                Ok(results) => {
                    let count = results.len();
                    (Event::SearchSuccess(results), Ok(SearchOutcome::Applied { count }))
                }
                Err(error) => (Event::SearchFailure(error.clone()), Err(error)),
            };
            if self.dispatch(generation, event) {
                return outcome;
            }
            tracing::info!("search_result_discarded");
            Ok(SearchOutcome::Stale)
        }
        .instrument(session_span(generation))
        .await
    }

    /// Drops the video and every flag, and stops the indexing ticker. Any
    /// response still in flight is discarded when it arrives.
    pub async fn clear(&self) {
        let cleared = self.state.send_if_modified(|s| s.apply(Event::Clear));
        self.monitor.cancel().await;
        if cleared {
            tracing::info!(generation = self.generation(), "session_cleared");
        }
    }

    /// Clears the error slot only. The failed action must be re-triggered.
    pub fn dismiss_error(&self) {
        self.state.send_if_modified(|s| s.apply(Event::DismissError));
    }

    fn generation(&self) -> u64 {
        self.state.borrow().generation()
    }

    /// Applies `event` only if the session it belongs to is still current.
    fn dispatch(&self, generation: u64, event: Event) -> bool {
        self.state.send_if_modified(|s| {
            if s.generation() != generation {
                return false;
            }
            s.apply(event)
        })
    }
}

pub struct AppBuilder<A> {
    api: A,
    tick_interval: Duration,
    increment: IncrementFn,
    mapper: Arc<dyn ScoreMapper>,
    top_k: Option<u32>,
}

impl<A: VideoSearchApi> AppBuilder<A> {
    fn new(api: A) -> Self {
        Self {
            api,
            tick_interval: DEFAULT_TICK_INTERVAL,
            increment: random_increment(),
            mapper: Arc::new(HalfDistance),
            top_k: None,
        }
    }

    pub fn env(self, env: &Env) -> Self {
        Self {
            tick_interval: env.tick_interval(),
            top_k: env.top_k,
            ..self
        }
    }

    pub fn tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    pub fn increment(mut self, increment: IncrementFn) -> Self {
        self.increment = increment;
        self
    }

    pub fn score_mapper(mut self, mapper: Arc<dyn ScoreMapper>) -> Self {
        self.mapper = mapper;
        self
    }

    pub fn top_k(mut self, top_k: u32) -> Self {
        self.top_k = Some(top_k);
        self
    }

    pub fn build(self) -> App<A> {
        let api = Arc::new(self.api);
        let (state, _) = watch::channel(AppState::default());

        App {
            uploader: Arc::new(UploadController::new(Arc::clone(&api))),
            monitor: Arc::new(IndexingMonitor::new(
                Arc::clone(&api),
                self.tick_interval,
                self.increment,
            )),
            searcher: Arc::new(SearchController::new(api, self.mapper, self.top_k)),
            presenter: ResultPresenter::new(),
            state: Arc::new(state),
        }
    }
}
