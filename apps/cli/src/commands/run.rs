use std::path::PathBuf;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::LinesStream;
use vs_video_search::{
    Env, HttpApp, PLAYER_ID, Rejection, SearchOutcome, UploadOutcome, connect, present,
    select_browsed,
};

use crate::runtime::{TerminalPlayer, clear_progress_line, spawn_progress_printer};

const HELP: &str = "Type a question to search. `:play N` jumps to result N, `:open` opens the video, `:clear` starts over, `:quit` exits.";

enum Input {
    Query(String),
    Play(usize),
    Open,
    Clear,
    Quit,
    Help,
}

fn parse(line: &str) -> Input {
    let line = line.trim();
    match line.split_once(' ').unwrap_or((line, "")) {
        (":quit" | ":q", _) => Input::Quit,
        (":clear", _) => Input::Clear,
        (":open", _) => Input::Open,
        (":help" | ":h", _) => Input::Help,
        (":play", n) => n.trim().parse().map(Input::Play).unwrap_or(Input::Help),
        _ => Input::Query(line.to_string()),
    }
}

pub async fn run(env: &Env, file: PathBuf) -> bool {
    let app = connect(env);

    if !upload(&app, file).await {
        return false;
    }

    println!("{HELP}");
    let mut lines = LinesStream::new(BufReader::new(tokio::io::stdin()).lines());

    while let Some(Ok(line)) = lines.next().await {
        match parse(&line) {
            Input::Quit => break,
            Input::Help => println!("{HELP}"),
            Input::Clear => {
                app.clear().await;
                app.presenter().unregister(PLAYER_ID);
                println!("Cleared. Run again with another file to start over.");
                break;
            }
            Input::Open => open_video(&app),
            Input::Play(rank) => play(&app, rank),
            Input::Query(query) => search(&app, &query).await,
        }
    }

    true
}

async fn upload(app: &HttpApp, file: PathBuf) -> bool {
    let printer = spawn_progress_printer(app);
    let outcome = app.upload(select_browsed(file)).await;
    printer.abort();
    clear_progress_line();

    match outcome {
        Ok(UploadOutcome::Indexed(video)) => {
            println!("Indexed {} ({})", video.file_name, video.video_id);
            app.presenter()
                .register(PLAYER_ID, Arc::new(TerminalPlayer::new(video.local_url)));
            true
        }
        Ok(other) => {
            tracing::warn!(?other, "upload_not_indexed");
            false
        }
        Err(e) => {
            eprintln!("{}", e.message());
            false
        }
    }
}

async fn search(app: &HttpApp, query: &str) {
    match app.search(query).await {
        Ok(SearchOutcome::Applied { .. }) => {
            super::print_results(&present(&app.state().results));
        }
        Ok(SearchOutcome::Rejected(Rejection::EmptyQuery)) => {}
        Ok(SearchOutcome::Rejected(rejection)) => {
            tracing::debug!(?rejection, "search_not_available");
            println!("Search is not available right now.");
        }
        Ok(SearchOutcome::Stale) => {}
        Err(e) => {
            eprintln!("{}", e.message());
            app.dismiss_error();
        }
    }
}

fn play(app: &HttpApp, rank: usize) {
    let state = app.state();
    match rank.checked_sub(1).and_then(|i| state.results.get(i)) {
        Some(result) => app.on_timestamp_click(result.timestamp),
        None => println!("No result #{rank}."),
    }
}

fn open_video(app: &HttpApp) {
    let Some(video) = app.state().video().cloned() else {
        return;
    };
    if let Err(e) = open::that(&video.local_url) {
        eprintln!("Failed to open video: {e}");
        eprintln!("It is at: {}", video.local_url);
    }
}
