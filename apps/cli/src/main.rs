mod commands;
mod runtime;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::prelude::*;
use vs_video_search::Env;

#[derive(Parser)]
#[command(name = "vsearch", about = "Semantic search over a video's transcript")]
struct Cli {
    /// Backend base URL, overrides VIDEO_SEARCH_API_URL
    #[arg(long)]
    api_url: Option<String>,

    /// Results per search, overrides VIDEO_SEARCH_TOP_K
    #[arg(long)]
    top_k: Option<u32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a video, index it, then search it interactively
    Run {
        file: PathBuf,
    },
    /// Search a video the backend has already indexed
    Search {
        #[arg(long)]
        video_id: String,
        #[arg(required = true)]
        query: Vec<String>,
    },
}

impl Cli {
    fn apply(&self, mut env: Env) -> Env {
        if let Some(api_url) = &self.api_url {
            env.api_url = api_url.clone();
        }
        if let Some(top_k) = self.top_k {
            env.top_k = Some(top_k);
        }
        env
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing();

    let env = match Env::load() {
        Ok(env) => cli.apply(env),
        Err(e) => {
            tracing::error!(error = %e, "env_load_failed");
            eprintln!("{e}");
            std::process::exit(2);
        }
    };

    let ok = match cli.command {
        Commands::Run { file } => commands::run::run(&env, file).await,
        Commands::Search { video_id, query } => {
            commands::search::run(&env, &video_id, &query.join(" ")).await
        }
    };

    if !ok {
        std::process::exit(1);
    }
}
