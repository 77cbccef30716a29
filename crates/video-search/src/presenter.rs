use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde::Serialize;

use crate::search::SearchResult;

pub const PLAYER_ID: &str = "video-player";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScoreBucket {
    Excellent,
    Good,
    Fair,
}

impl ScoreBucket {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.9 {
            Self::Excellent
        } else if score >= 0.7 {
            Self::Good
        } else {
            Self::Fair
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresentedResult {
    pub rank: usize,
    pub id: String,
    pub transcript: String,
    pub timestamp: f64,
    pub timestamp_label: String,
    pub similarity_score: f64,
    pub percent_label: String,
    pub bucket: ScoreBucket,
}

/// `M:SS`, seconds truncated. Minutes are not wrapped into hours.
pub fn format_timestamp(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

pub fn match_count_label(count: usize) -> String {
    if count == 1 {
        "1 match found".to_string()
    } else {
        format!("{count} matches found")
    }
}

/// Ranks by position; the backend's ordering is trusted as-is.
pub fn present(results: &[SearchResult]) -> Vec<PresentedResult> {
    results
        .iter()
        .enumerate()
        .map(|(index, r)| PresentedResult {
            rank: index + 1,
            id: r.id.clone(),
            transcript: r.transcript.clone(),
            timestamp: r.timestamp,
            timestamp_label: format_timestamp(r.timestamp),
            similarity_score: r.similarity_score,
            percent_label: format!("{}%", (r.similarity_score * 100.0).round() as u32),
            bucket: ScoreBucket::from_score(r.similarity_score),
        })
        .collect()
}

/// Something that plays the uploaded video and can be seeked.
pub trait PlaybackSurface: Send + Sync {
    fn set_current_time(&self, seconds: f64);
    fn play(&self);
}

#[derive(Default, Clone)]
pub struct ResultPresenter {
    surfaces: Arc<RwLock<HashMap<String, Arc<dyn PlaybackSurface>>>>,
}

impl ResultPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, id: impl Into<String>, surface: Arc<dyn PlaybackSurface>) {
        if let Ok(mut surfaces) = self.surfaces.write() {
            surfaces.insert(id.into(), surface);
        }
    }

    pub fn unregister(&self, id: &str) {
        if let Ok(mut surfaces) = self.surfaces.write() {
            surfaces.remove(id);
        }
    }

    pub fn present(&self, results: &[SearchResult]) -> Vec<PresentedResult> {
        present(results)
    }

    /// Seeks the `video-player` surface and resumes playback. Does nothing when
    /// no player is registered.
    pub fn on_timestamp_click(&self, timestamp: f64) {
        let surface = self
            .surfaces
            .read()
            .ok()
            .and_then(|surfaces| surfaces.get(PLAYER_ID).cloned());

        match surface {
            Some(surface) => {
                surface.set_current_time(timestamp.max(0.0));
                surface.play();
            }
            None => tracing::debug!(timestamp, "no_playback_surface"),
        }
    }
}
