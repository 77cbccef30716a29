use std::time::Duration;

use serde::Deserialize;

pub const ENV_PREFIX: &str = "VIDEO_SEARCH_";

fn default_api_url() -> String {
    vs_video_api::DEFAULT_API_URL.to_string()
}

fn default_tick_interval_ms() -> u64 {
    200
}

#[derive(Debug, Clone, Deserialize)]
pub struct Env {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    #[serde(default)]
    pub top_k: Option<u32>,
}

impl Default for Env {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            tick_interval_ms: default_tick_interval_ms(),
            top_k: None,
        }
    }
}

impl Env {
    /// Reads `VIDEO_SEARCH_*` variables, after loading `.env` if one exists.
    pub fn load() -> crate::Result<Self> {
        let _ = dotenvy::dotenv();
        Ok(envy::prefixed(ENV_PREFIX).from_env()?)
    }

    pub fn from_vars<I>(vars: I) -> crate::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::prefixed(ENV_PREFIX).from_iter(vars)?)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}
