//! Runtime settings.
//!
//! Settings are resolved once at startup and passed explicitly to the client
//! and front-ends. Precedence: CLI flag > environment (`.env` included) > default.

use std::path::PathBuf;

/// Backend used when `BASE_URL` is unset or empty.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Directory for the rolling log file when `LOG_DIR` is unset.
pub const DEFAULT_LOG_DIR: &str = "logs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Prediction service host, without a trailing slash.
    pub base_url: String,
    pub log_dir: PathBuf,
}

impl Settings {
    /// Load settings from `.env` and the process environment, then apply the
    /// optional CLI override for the base URL.
    pub fn from_env(base_url_override: Option<&str>) -> Self {
        dotenvy::dotenv().ok();

        let env_url = std::env::var("BASE_URL").ok();
        let base_url = match base_url_override {
            Some(url) if !url.trim().is_empty() => normalize_base_url(url),
            _ => resolve_base_url(env_url.as_deref()),
        };

        let log_dir = std::env::var("LOG_DIR")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR));

        Self { base_url, log_dir }
    }
}

/// Resolve the base URL from a raw `BASE_URL` value.
///
/// Unset and blank values both fall back to [`DEFAULT_BASE_URL`].
pub fn resolve_base_url(raw: Option<&str>) -> String {
    match raw {
        Some(url) if !url.trim().is_empty() => normalize_base_url(url),
        _ => DEFAULT_BASE_URL.to_string(),
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_or_blank_base_url_uses_default() {
        assert_eq!(resolve_base_url(None), DEFAULT_BASE_URL);
        assert_eq!(resolve_base_url(Some("")), DEFAULT_BASE_URL);
        assert_eq!(resolve_base_url(Some("   ")), DEFAULT_BASE_URL);
    }

    #[test]
    fn base_url_is_trimmed() {
        assert_eq!(
            resolve_base_url(Some(" http://api.internal:8005/ ")),
            "http://api.internal:8005"
        );
    }

    #[test]
    fn cli_override_wins() {
        let settings = Settings::from_env(Some("http://override:9000/"));
        assert_eq!(settings.base_url, "http://override:9000");
    }
}
