use std::sync::Arc;

use vs_video_search::{
    Env, HalfDistance, ReqwestHttpClient, SearchController, VideoSearchClient, present,
};

pub async fn run(env: &Env, video_id: &str, query: &str) -> bool {
    let client = VideoSearchClient::new(ReqwestHttpClient::new(env.api_url.as_str()));
    let searcher = SearchController::new(Arc::new(client), Arc::new(HalfDistance), env.top_k);

    match searcher.search(query, Some(video_id)).await {
        Ok(Some(results)) => {
            super::print_results(&present(&results));
            true
        }
        Ok(None) => {
            eprintln!("Query is empty.");
            false
        }
        Err(e) => {
            eprintln!("{}", e.message());
            false
        }
    }
}
