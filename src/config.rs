use anyhow::{Context, Result};
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub fetch_timeout_secs: u64,
    pub status_timeout_secs: u64,
    pub fetch_retries: u32,
    pub geojson_path: Option<String>,
    pub out_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:8000".to_string(),
            fetch_timeout_secs: 5,
            status_timeout_secs: 3,
            fetch_retries: 2,
            geojson_path: None,
            out_dir: "out".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            api_url: std::env::var("API_URL").unwrap_or(d.api_url),
            fetch_timeout_secs: std::env::var("FETCH_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(d.fetch_timeout_secs),
            status_timeout_secs: std::env::var("STATUS_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(d.status_timeout_secs),
            fetch_retries: std::env::var("FETCH_RETRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(d.fetch_retries),
            geojson_path: std::env::var("GEOJSON_PATH").ok().filter(|v| !v.trim().is_empty()),
            out_dir: std::env::var("OUT_DIR").unwrap_or(d.out_dir),
        }
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn status_timeout(&self) -> Duration {
        Duration::from_secs(self.status_timeout_secs)
    }

    /// Resolve an API path (e.g. `api/rating`) against the base URL.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        let mut base = self.api_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base = Url::parse(&base).with_context(|| format!("invalid API_URL {}", self.api_url))?;
        base.join(path.trim_start_matches('/'))
            .with_context(|| format!("invalid endpoint path {path}"))
    }
}
