use serde::Serialize;

use crate::error::AppError;
use crate::indexing::IndexingStatus;
use crate::search::SearchResult;
use crate::upload::UploadedVideo;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum AppPhase {
    /// `video` survives a failed indexing attempt so it can still be played.
    Idle { video: Option<UploadedVideo> },
    Uploading { file_name: String, progress: f64 },
    Indexing { video: UploadedVideo },
    Ready { video: UploadedVideo },
    Searching { video: UploadedVideo, query: String },
}

impl Default for AppPhase {
    fn default() -> Self {
        Self::Idle { video: None }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PhaseKind {
    Idle,
    Uploading,
    Indexing,
    Ready,
    Searching,
}

impl AppPhase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            Self::Idle { .. } => PhaseKind::Idle,
            Self::Uploading { .. } => PhaseKind::Uploading,
            Self::Indexing { .. } => PhaseKind::Indexing,
            Self::Ready { .. } => PhaseKind::Ready,
            Self::Searching { .. } => PhaseKind::Searching,
        }
    }

    pub fn video(&self) -> Option<&UploadedVideo> {
        match self {
            Self::Idle { video } => video.as_ref(),
            Self::Uploading { .. } => None,
            Self::Indexing { video } | Self::Ready { video } | Self::Searching { video, .. } => {
                Some(video)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub enum Event {
    UploadStart { file_name: String },
    UploadProgress { percent: f64 },
    UploadSuccess(UploadedVideo),
    UploadFailure(AppError),
    IndexSuccess,
    IndexFailure(AppError),
    SearchStart { query: String },
    SearchSuccess(Vec<SearchResult>),
    SearchFailure(AppError),
    Clear,
    DismissError,
}

impl Event {
    fn name(&self) -> &'static str {
        match self {
            Self::UploadStart { .. } => "upload_start",
            Self::UploadProgress { .. } => "upload_progress",
            Self::UploadSuccess(_) => "upload_success",
            Self::UploadFailure(_) => "upload_failure",
            Self::IndexSuccess => "index_success",
            Self::IndexFailure(_) => "index_failure",
            Self::SearchStart { .. } => "search_start",
            Self::SearchSuccess(_) => "search_success",
            Self::SearchFailure(_) => "search_failure",
            Self::Clear => "clear",
            Self::DismissError => "dismiss_error",
        }
    }
}

/// Coordinator state. Only [`AppState::apply`] mutates it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AppState {
    pub phase: AppPhase,
    pub results: Vec<SearchResult>,
    pub has_searched: bool,
    pub error: Option<AppError>,
    #[serde(skip)]
    generation: u64,
}

impl AppState {
    /// Session counter. Bumped whenever a session starts or is cleared.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn video(&self) -> Option<&UploadedVideo> {
        self.phase.video()
    }

    pub fn indexing_status(&self) -> IndexingStatus {
        match &self.phase {
            AppPhase::Idle { video: Some(_) } => IndexingStatus::Failed,
            AppPhase::Idle { video: None } | AppPhase::Uploading { .. } => {
                IndexingStatus::NotStarted
            }
            AppPhase::Indexing { .. } => IndexingStatus::Indexing,
            AppPhase::Ready { .. } | AppPhase::Searching { .. } => IndexingStatus::Indexed,
        }
    }

    pub fn is_indexing(&self) -> bool {
        matches!(self.phase, AppPhase::Indexing { .. })
    }

    pub fn is_searching(&self) -> bool {
        matches!(self.phase, AppPhase::Searching { .. })
    }

    pub fn search_enabled(&self) -> bool {
        matches!(self.phase, AppPhase::Ready { .. })
    }

    /// The "no results yet" placeholder. Never shown next to an error.
    pub fn shows_empty_state(&self) -> bool {
        self.results.is_empty() && !self.is_indexing() && !self.is_searching() && self.error.is_none()
    }

    fn is_pristine(&self) -> bool {
        self.phase == AppPhase::default()
            && self.results.is_empty()
            && !self.has_searched
            && self.error.is_none()
    }

    /// Applies `event` if it is legal in the current phase. Returns whether
    /// anything changed.
    pub fn apply(&mut self, event: Event) -> bool {
        let name = event.name();
        let phase = std::mem::take(&mut self.phase);

        let (next, changed) = match (phase, event) {
            (AppPhase::Idle { .. }, Event::UploadStart { file_name }) => {
                self.generation += 1;
                self.results.clear();
                self.has_searched = false;
                self.error = None;
                (
                    AppPhase::Uploading {
                        file_name,
                        progress: 0.0,
                    },
                    true,
                )
            }
            (AppPhase::Uploading { file_name, progress }, Event::UploadProgress { percent }) => {
                let percent = percent.clamp(0.0, 100.0);
                let changed = percent != progress;
                (
                    AppPhase::Uploading {
                        file_name,
                        progress: percent,
                    },
                    changed,
                )
            }
            (AppPhase::Uploading { .. }, Event::UploadSuccess(video)) => {
                (AppPhase::Indexing { video }, true)
            }
            (AppPhase::Uploading { .. }, Event::UploadFailure(error)) => {
                self.error = Some(error);
                (AppPhase::Idle { video: None }, true)
            }
            (AppPhase::Indexing { video }, Event::IndexSuccess) => (AppPhase::Ready { video }, true),
            (AppPhase::Indexing { video }, Event::IndexFailure(error)) => {
                self.error = Some(error);
                (AppPhase::Idle { video: Some(video) }, true)
            }
            (AppPhase::Ready { video }, Event::SearchStart { query }) => {
                self.error = None;
                self.has_searched = true;
                (AppPhase::Searching { video, query }, true)
            }
            (AppPhase::Searching { video, .. }, Event::SearchSuccess(results)) => {
                self.results = results;
                (AppPhase::Ready { video }, true)
            }
            (AppPhase::Searching { video, .. }, Event::SearchFailure(error)) => {
                self.error = Some(error);
                (AppPhase::Ready { video }, true)
            }
            (phase, Event::Clear) => {
                self.phase = phase;
                if self.is_pristine() {
                    return false;
                }
                self.generation += 1;
                self.results.clear();
                self.has_searched = false;
                self.error = None;
                (AppPhase::default(), true)
            }
            (phase, Event::DismissError) => {
                let changed = self.error.take().is_some();
                (phase, changed)
            }
            (phase, _) => {
                tracing::debug!(event = name, phase = ?phase.kind(), "event_ignored");
                (phase, false)
            }
        };

        self.phase = next;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video() -> UploadedVideo {
        UploadedVideo {
            local_url: "file:///videos/talk.mp4".to_string(),
            video_id: "v1".to_string(),
            file_name: "talk.mp4".to_string(),
        }
    }

    fn result(id: &str) -> SearchResult {
        SearchResult {
            id: id.to_string(),
            transcript: "hello".to_string(),
            timestamp: 1.0,
            similarity_score: 0.9,
        }
    }

    fn ready() -> AppState {
        let mut state = AppState::default();
        state.apply(Event::UploadStart {
            file_name: "talk.mp4".to_string(),
        });
        state.apply(Event::UploadSuccess(video()));
        state.apply(Event::IndexSuccess);
        state
    }

    #[test]
    fn happy_path_transitions() {
        let mut state = AppState::default();
        assert_eq!(state.indexing_status(), IndexingStatus::NotStarted);

        assert!(state.apply(Event::UploadStart {
            file_name: "talk.mp4".to_string()
        }));
        assert_eq!(state.phase.kind(), PhaseKind::Uploading);

        assert!(state.apply(Event::UploadProgress { percent: 40.0 }));
        assert!(!state.apply(Event::UploadProgress { percent: 40.0 }));
        assert!(state.apply(Event::UploadSuccess(video())));
        assert_eq!(state.phase, AppPhase::Indexing { video: video() });
        assert_eq!(state.indexing_status(), IndexingStatus::Indexing);
        assert!(!state.search_enabled());

        assert!(state.apply(Event::IndexSuccess));
        assert_eq!(state.indexing_status(), IndexingStatus::Indexed);
        assert!(state.search_enabled());

        assert!(state.apply(Event::SearchStart {
            query: "hello".to_string()
        }));
        assert!(state.is_searching());
        assert!(!state.search_enabled());

        assert!(state.apply(Event::SearchSuccess(vec![result("0")])));
        assert_eq!(state.phase, AppPhase::Ready { video: video() });
        assert_eq!(state.results.len(), 1);
        assert!(state.has_searched);
    }

    #[test]
    fn upload_progress_is_clamped() {
        let mut state = AppState::default();
        state.apply(Event::UploadStart {
            file_name: "talk.mp4".to_string(),
        });
        state.apply(Event::UploadProgress { percent: 140.0 });
        assert_eq!(
            state.phase,
            AppPhase::Uploading {
                file_name: "talk.mp4".to_string(),
                progress: 100.0
            }
        );
    }

    #[test]
    fn upload_failure_returns_to_idle_with_error() {
        let mut state = AppState::default();
        state.apply(Event::UploadStart {
            file_name: "talk.mp4".to_string(),
        });
        state.apply(Event::UploadFailure(AppError::Upload("nope".to_string())));

        assert_eq!(state.phase, AppPhase::Idle { video: None });
        assert_eq!(state.error, Some(AppError::Upload("nope".to_string())));
        assert!(!state.shows_empty_state());
    }

    #[test]
    fn index_failure_keeps_video_but_not_indexed() {
        let mut state = AppState::default();
        state.apply(Event::UploadStart {
            file_name: "talk.mp4".to_string(),
        });
        state.apply(Event::UploadSuccess(video()));
        state.apply(Event::IndexFailure(AppError::Indexing("down".to_string())));

        assert_eq!(state.video(), Some(&video()));
        assert_eq!(state.indexing_status(), IndexingStatus::Failed);
        assert!(!state.search_enabled());
        assert!(!state.apply(Event::SearchStart {
            query: "hello".to_string()
        }));
    }

    #[test]
    fn search_failure_keeps_previous_results() {
        let mut state = ready();
        state.apply(Event::SearchStart {
            query: "one".to_string(),
        });
        state.apply(Event::SearchSuccess(vec![result("0"), result("1")]));
        state.apply(Event::SearchStart {
            query: "two".to_string(),
        });
        state.apply(Event::SearchFailure(AppError::Search("bad".to_string())));

        assert_eq!(state.results.len(), 2);
        assert_eq!(state.phase.kind(), PhaseKind::Ready);
        assert!(state.error.is_some());
    }

    #[test]
    fn search_start_clears_error() {
        let mut state = ready();
        state.apply(Event::SearchStart {
            query: "one".to_string(),
        });
        state.apply(Event::SearchFailure(AppError::Search("bad".to_string())));
        state.apply(Event::SearchStart {
            query: "two".to_string(),
        });
        assert_eq!(state.error, None);
    }

    #[test]
    fn empty_state_rule() {
        let mut state = ready();
        assert!(state.shows_empty_state());

        state.apply(Event::SearchStart {
            query: "q".to_string(),
        });
        assert!(!state.shows_empty_state());

        state.apply(Event::SearchFailure(AppError::Search("bad".to_string())));
        assert!(!state.shows_empty_state());

        assert!(state.apply(Event::DismissError));
        assert!(state.shows_empty_state());
        assert!(!state.apply(Event::DismissError));
    }

    #[test]
    fn illegal_events_are_ignored() {
        let mut state = AppState::default();
        assert!(!state.apply(Event::SearchStart {
            query: "q".to_string()
        }));
        assert!(!state.apply(Event::IndexSuccess));
        assert!(!state.apply(Event::UploadSuccess(video())));
        assert_eq!(state, AppState::default());

        let mut state = ready();
        assert!(!state.apply(Event::UploadStart {
            file_name: "other.mp4".to_string()
        }));
        assert_eq!(state.phase.kind(), PhaseKind::Ready);
    }

    #[test]
    fn clear_resets_and_is_idempotent() {
        let mut state = ready();
        state.apply(Event::SearchStart {
            query: "q".to_string(),
        });
        state.apply(Event::SearchSuccess(vec![result("0")]));
        let before = state.generation();

        assert!(state.apply(Event::Clear));
        let once = state.clone();
        assert!(!state.apply(Event::Clear));

        assert_eq!(state, once);
        assert_eq!(state.generation(), before + 1);
        assert_eq!(state.phase, AppPhase::Idle { video: None });
        assert!(state.results.is_empty());
        assert!(!state.has_searched);
    }

    #[test]
    fn upload_start_begins_new_session() {
        let mut state = AppState::default();
        let before = state.generation();
        state.apply(Event::UploadStart {
            file_name: "talk.mp4".to_string(),
        });
        assert_eq!(state.generation(), before + 1);
    }
}
