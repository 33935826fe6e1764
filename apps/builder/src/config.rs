use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;

/// Application configuration loaded from environment variables.
/// Every variable has a default; only malformed values are fatal.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub port: u16,
    pub rust_log: String,
    /// Directory of the file-backed store.
    pub storage_dir: PathBuf,
    /// When set, the document is stored in Redis instead of on disk.
    pub redis_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            storage_dir: optional_env("STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(default_storage_dir),
            redis_url: optional_env("REDIS_URL"),
        })
    }
}

/// Platform data directory, or `./data` when none can be determined.
pub fn default_storage_dir() -> PathBuf {
    ProjectDirs::from("dev", "resume-builder", "ResumeBuilder")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("data"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
