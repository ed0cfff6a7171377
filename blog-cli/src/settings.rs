use std::path::PathBuf;

use anyhow::{Result, anyhow};

const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_SESSION_DIR: &str = ".blog_session";
const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    pub session_dir: PathBuf,
    pub log_level: String,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_url = normalize_server(
            non_empty(&lookup, "BLOG_API_URL")?.unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        );
        let session_dir = non_empty(&lookup, "BLOG_SESSION_DIR")?
            .unwrap_or_else(|| DEFAULT_SESSION_DIR.to_string())
            .into();
        let log_level = lookup("LOG_LEVEL")
            .or_else(|| lookup("RUST_LOG"))
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        Ok(Self {
            api_url,
            session_dir,
            log_level,
        })
    }

    /// Применяет флаги командной строки поверх окружения.
    pub fn with_overrides(mut self, server: Option<String>, session_dir: Option<PathBuf>) -> Self {
        if let Some(server) = server {
            self.api_url = normalize_server(server);
        }
        if let Some(session_dir) = session_dir {
            self.session_dir = session_dir;
        }
        self
    }
}

fn non_empty(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<String>> {
    match lookup(key) {
        None => Ok(None),
        Some(value) => {
            let value = value.trim().to_string();
            if value.is_empty() {
                return Err(anyhow!("{key} must not be empty"));
            }
            Ok(Some(value))
        }
    }
}

pub fn normalize_server(server: String) -> String {
    if server.starts_with("http://") || server.starts_with("https://") {
        return server;
    }

    format!("http://{server}")
}
