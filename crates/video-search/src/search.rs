use std::sync::Arc;

use serde::Serialize;
use vs_video_api::{RawMatch, SearchRequest};

use crate::api::VideoSearchApi;
use crate::error::{AppError, SEARCH_FAILED};

/// Converts the backend's distance into a `[0, 1]` display score.
pub trait ScoreMapper: Send + Sync {
    fn similarity(&self, distance: f64) -> f64;
}

/// `clamp(1 - distance / 2, 0, 1)`. A display heuristic, not a property of the
/// backend's metric.
#[derive(Debug, Default, Clone, Copy)]
pub struct HalfDistance;

impl ScoreMapper for HalfDistance {
    fn similarity(&self, distance: f64) -> f64 {
        if !distance.is_finite() {
            return 0.0;
        }
        (1.0 - distance / 2.0).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub id: String,
    pub transcript: String,
    pub timestamp: f64,
    pub similarity_score: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub text: String,
    pub video_id: String,
}

impl SearchQuery {
    /// `None` when there is no video or the trimmed text is empty.
    pub fn new(text: &str, video_id: Option<&str>) -> Option<Self> {
        let text = text.trim();
        let video_id = video_id?;
        if text.is_empty() {
            return None;
        }
        Some(Self {
            text: text.to_string(),
            video_id: video_id.to_string(),
        })
    }
}

pub fn normalize(matches: Vec<RawMatch>, mapper: &dyn ScoreMapper) -> Vec<SearchResult> {
    matches
        .into_iter()
        .enumerate()
        .map(|(index, m)| SearchResult {
            id: index.to_string(),
            transcript: m.text,
            timestamp: if m.start.is_finite() {
                m.start.max(0.0)
            } else {
                0.0
            },
            similarity_score: mapper.similarity(m.score),
        })
        .collect()
}

pub struct SearchController<A> {
    api: Arc<A>,
    mapper: Arc<dyn ScoreMapper>,
    top_k: Option<u32>,
}

impl<A: VideoSearchApi> SearchController<A> {
    pub fn new(api: Arc<A>, mapper: Arc<dyn ScoreMapper>, top_k: Option<u32>) -> Self {
        Self {
            api,
            mapper,
            top_k,
        }
    }

    /// Returns `Ok(None)` without touching the network when the query or the
    /// video id is missing.
    pub async fn search(
        &self,
        query: &str,
        video_id: Option<&str>,
    ) -> Result<Option<Vec<SearchResult>>, AppError> {
        match SearchQuery::new(query, video_id) {
            Some(query) => self.run(&query).await.map(Some),
            None => Ok(None),
        }
    }

    pub(crate) async fn run(&self, query: &SearchQuery) -> Result<Vec<SearchResult>, AppError> {
        let req = SearchRequest {
            query: query.text.clone(),
            video_id: query.video_id.clone(),
            top_k: self.top_k,
        };

        let response = self.api.search(&req).await.map_err(|e| {
            tracing::error!(video_id = %query.video_id, error = %e, "search_failed");
            AppError::Search(SEARCH_FAILED.to_string())
        })?;

        let results = normalize(response.results, self.mapper.as_ref());
        tracing::info!(video_id = %query.video_id, count = results.len(), "search_completed");
        Ok(results)
    }
}
