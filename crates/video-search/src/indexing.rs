use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use rand::Rng;
use serde::Serialize;
use tokio::sync::{Mutex, watch};
use tokio_util::sync::CancellationToken;

use crate::api::VideoSearchApi;
use crate::error::{AppError, INDEXING_FAILED};

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(200);
pub const MAX_PROGRESS: f64 = 100.0;

const STAGES: [(f64, &str); 4] = [
    (25.0, "Extracting audio..."),
    (55.0, "Transcribing speech..."),
    (85.0, "Generating embeddings..."),
    (100.0, "Building search index..."),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IndexingStatus {
    NotStarted,
    Indexing,
    Indexed,
    Failed,
}

pub fn stage_for(progress: f64) -> &'static str {
    STAGES
        .iter()
        .find(|(max, _)| progress <= *max)
        .map(|(_, text)| *text)
        .unwrap_or(STAGES[STAGES.len() - 1].1)
}

/// Cosmetic indexing progress. Not tied to what the backend is doing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndexingProgress {
    pub progress: f64,
    pub stage: &'static str,
}

impl Default for IndexingProgress {
    fn default() -> Self {
        Self {
            progress: 0.0,
            stage: STAGES[0].1,
        }
    }
}

impl IndexingProgress {
    pub fn advanced(&self, increment: f64) -> Self {
        let progress = (self.progress + increment.max(0.0)).min(MAX_PROGRESS);
        Self {
            progress,
            stage: stage_for(progress),
        }
    }

    pub fn percent(&self) -> u32 {
        self.progress.round() as u32
    }

    pub fn label(&self) -> String {
        format!("{}% complete", self.percent())
    }
}

pub type IncrementFn = Arc<dyn Fn() -> f64 + Send + Sync>;

pub fn random_increment() -> IncrementFn {
    Arc::new(|| rand::thread_rng().gen_range(1.0..4.0))
}

/// Owns a running ticker. Dropping it cancels the task and resets progress.
struct TickerGuard {
    token: CancellationToken,
    progress: Arc<watch::Sender<IndexingProgress>>,
}

impl Drop for TickerGuard {
    fn drop(&mut self) {
        self.token.cancel();
        reset(&self.progress);
    }
}

fn reset(progress: &watch::Sender<IndexingProgress>) {
    progress.send_if_modified(|p| {
        let changed = *p != IndexingProgress::default();
        *p = IndexingProgress::default();
        changed
    });
}

struct ActiveTicker {
    run: u64,
    _guard: TickerGuard,
}

pub struct IndexingMonitor<A> {
    api: Arc<A>,
    tick_interval: Duration,
    increment: IncrementFn,
    progress: Arc<watch::Sender<IndexingProgress>>,
    active: Mutex<Option<ActiveTicker>>,
    runs: AtomicU64,
}

impl<A: VideoSearchApi> IndexingMonitor<A> {
    pub fn new(api: Arc<A>, tick_interval: Duration, increment: IncrementFn) -> Self {
        let (progress, _) = watch::channel(IndexingProgress::default());
        Self {
            api,
            tick_interval,
            increment,
            progress: Arc::new(progress),
            active: Mutex::new(None),
            runs: AtomicU64::new(0),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<IndexingProgress> {
        self.progress.subscribe()
    }

    pub fn progress(&self) -> IndexingProgress {
        *self.progress.borrow()
    }

    pub async fn is_indexing(&self) -> bool {
        self.active.lock().await.is_some()
    }

    /// Triggers backend processing and animates progress until it returns.
    pub async fn start_indexing(&self, video_id: &str) -> Result<(), AppError> {
        let run = self.begin().await;
        let result = self.request(video_id).await;
        self.stop(run).await;
        result
    }

    /// Starts a fresh ticker, replacing any previous one. Returns its run id.
    pub(crate) async fn begin(&self) -> u64 {
        let run = self.runs.fetch_add(1, Ordering::SeqCst) + 1;
        let mut active = self.active.lock().await;
        *active = None;
        *active = Some(ActiveTicker {
            run,
            _guard: self.spawn_ticker(),
        });
        run
    }

    /// Stops the ticker only if it still belongs to `run`.
    pub(crate) async fn stop(&self, run: u64) -> bool {
        let mut active = self.active.lock().await;
        if active.as_ref().is_some_and(|a| a.run == run) {
            *active = None;
            return true;
        }
        false
    }

    pub(crate) async fn cancel(&self) {
        self.active.lock().await.take();
    }

    pub(crate) async fn request(&self, video_id: &str) -> Result<(), AppError> {
        match self.api.process(video_id).await {
            Ok(response) => {
                tracing::info!(
                    video_id = %video_id,
                    segments = ?response.segments_count,
                    "indexing_completed"
                );
                Ok(())
            }
            Err(e) => {
                tracing::error!(video_id = %video_id, error = %e, "indexing_failed");
                Err(AppError::Indexing(INDEXING_FAILED.to_string()))
            }
        }
    }

    fn spawn_ticker(&self) -> TickerGuard {
        let token = CancellationToken::new();
        let progress = Arc::clone(&self.progress);
        reset(&progress);

        let task_token = token.clone();
        let task_progress = Arc::clone(&progress);
        let increment = Arc::clone(&self.increment);
        let tick_interval = self.tick_interval;

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick_interval);
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = task_token.cancelled() => break,
                    _ = interval.tick() => {
                        let step = increment();
                        let mut done = false;
                        task_progress.send_if_modified(|p| {
                            if task_token.is_cancelled() {
                                return false;
                            }
                            *p = p.advanced(step);
                            done = p.progress >= MAX_PROGRESS;
                            true
                        });
                        if done || task_token.is_cancelled() {
                            break;
                        }
                    }
                }
            }
        });

        TickerGuard { token, progress }
    }
}
