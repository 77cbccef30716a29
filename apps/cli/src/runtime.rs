use std::io::Write;
use std::sync::Mutex;

use tokio::task::JoinHandle;
use vs_video_search::{AppPhase, HttpApp, PlaybackSurface, format_timestamp};

/// Stands in for the video element: remembers the position and reports
/// seeks on stdout.
pub struct TerminalPlayer {
    local_url: String,
    position: Mutex<f64>,
}

impl TerminalPlayer {
    pub fn new(local_url: impl Into<String>) -> Self {
        Self {
            local_url: local_url.into(),
            position: Mutex::new(0.0),
        }
    }
}

impl PlaybackSurface for TerminalPlayer {
    fn set_current_time(&self, seconds: f64) {
        if let Ok(mut position) = self.position.lock() {
            *position = seconds;
        }
    }

    fn play(&self) {
        let position = self.position.lock().map(|p| *p).unwrap_or(0.0);
        println!("▶ {} at {}", self.local_url, format_timestamp(position));
    }
}

/// Prints upload and indexing progress to stderr. Runs until aborted.
pub fn spawn_progress_printer(app: &HttpApp) -> JoinHandle<()> {
    let mut state_rx = app.subscribe();
    let mut progress_rx = app.indexing_progress();

    tokio::spawn(async move {
        loop {
            let line = {
                let state = state_rx.borrow_and_update();
                match &state.phase {
                    AppPhase::Uploading { file_name, progress } => {
                        Some(format!("Uploading {file_name}... {}%", progress.round() as u32))
                    }
                    AppPhase::Indexing { .. } => {
                        let p = *progress_rx.borrow_and_update();
                        Some(format!("{} {}", p.stage, p.label()))
                    }
                    _ => None,
                }
            };

            if let Some(line) = line {
                let mut stderr = std::io::stderr();
                let _ = write!(stderr, "\r\x1b[2K{line}");
                let _ = stderr.flush();
            }

            tokio::select! {
                changed = state_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                changed = progress_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }
    })
}

pub fn clear_progress_line() {
    eprint!("\r\x1b[2K");
}
