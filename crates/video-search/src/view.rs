use serde::Serialize;

use crate::indexing::IndexingProgress;
use crate::presenter::{PresentedResult, match_count_label, present};
use crate::state::{AppPhase, AppState, PhaseKind};
use crate::upload::UploadedVideo;

pub const PLACEHOLDER_DISABLED: &str = "Upload a video first...";
pub const PLACEHOLDER_ENABLED: &str = "Ask something about this video...";
pub const SEARCHING_LABEL: &str = "Searching through video...";
pub const EMPTY_STATE_TITLE: &str = "No results yet";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexingView {
    pub stage: &'static str,
    pub progress: f64,
    pub label: String,
}

/// Everything a front end needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppView {
    pub phase: PhaseKind,
    pub video: Option<UploadedVideo>,
    pub upload_percent: Option<u32>,
    pub indexing: Option<IndexingView>,
    pub search_enabled: bool,
    pub placeholder: &'static str,
    pub searching: bool,
    pub error: Option<String>,
    pub results_header: Option<String>,
    pub results: Vec<PresentedResult>,
    pub empty_state: bool,
}

pub fn render(state: &AppState, progress: IndexingProgress) -> AppView {
    let upload_percent = match &state.phase {
        AppPhase::Uploading { progress, .. } => Some(progress.round() as u32),
        _ => None,
    };

    let indexing = state.is_indexing().then(|| IndexingView {
        stage: progress.stage,
        progress: progress.progress,
        label: progress.label(),
    });

    let search_enabled = state.search_enabled();
    let results = present(&state.results);

    AppView {
        phase: state.phase.kind(),
        video: state.video().cloned(),
        upload_percent,
        indexing,
        search_enabled,
        placeholder: if search_enabled || state.is_searching() {
            PLACEHOLDER_ENABLED
        } else {
            PLACEHOLDER_DISABLED
        },
        searching: state.is_searching(),
        error: state.error.as_ref().map(|e| e.message().to_string()),
        results_header: (!results.is_empty()).then(|| match_count_label(results.len())),
        results,
        empty_state: state.shows_empty_state(),
    }
}
