//! Settings for the desktop shell: defaults layered under an optional
//! `assistant.toml` file and `APP__*` environment variables.

use std::{env, fs, time::Duration};

use anyhow::Context;
use client_core::SessionTiming;
use serde::Deserialize;
use url::Url;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server_url: String,
    pub reveal_delay_ms: u64,
    pub notice_ttl_seconds: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            reveal_delay_ms: 10,
            notice_ttl_seconds: 3,
        }
    }
}

impl Settings {
    pub fn timing(&self) -> SessionTiming {
        SessionTiming {
            reveal_delay: Duration::from_millis(self.reveal_delay_ms),
            notice_ttl: Duration::from_secs(self.notice_ttl_seconds),
        }
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("assistant.toml") {
        match toml::from_str::<Settings>(&raw) {
            Ok(file_settings) => settings = file_settings,
            Err(err) => tracing::warn!("ignoring malformed assistant.toml: {err}"),
        }
    }

    if let Ok(v) = env::var("APP__SERVER_URL") {
        settings.server_url = v;
    }
    if let Ok(v) = env::var("APP__REVEAL_DELAY_MS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.reveal_delay_ms = parsed;
        }
    }
    if let Ok(v) = env::var("APP__NOTICE_TTL_SECONDS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.notice_ttl_seconds = parsed;
        }
    }

    settings
}

/// Parses and normalizes the collaborator base URL. Only absolute `http`
/// and `https` URLs are accepted; a trailing slash is trimmed so endpoint
/// paths can be appended directly.
pub fn normalize_server_url(raw: &str) -> anyhow::Result<String> {
    let raw = raw.trim();
    let parsed = Url::parse(raw).with_context(|| format!("invalid server URL '{raw}'"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        anyhow::bail!("unsupported server URL scheme '{}'", parsed.scheme());
    }
    Ok(raw.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_collaborator_dev_address() {
        let settings = Settings::default();
        assert_eq!(settings.server_url, DEFAULT_SERVER_URL);
        assert_eq!(settings.timing().reveal_delay, Duration::from_millis(10));
        assert_eq!(settings.timing().notice_ttl, Duration::from_secs(3));
    }

    #[test]
    fn partial_settings_files_fall_back_to_defaults() {
        let settings: Settings =
            toml::from_str("server_url = \"https://assistant.example\"").expect("parse");
        assert_eq!(settings.server_url, "https://assistant.example");
        assert_eq!(settings.reveal_delay_ms, 10);
        assert_eq!(settings.notice_ttl_seconds, 3);
    }

    #[test]
    fn server_urls_are_validated_and_trimmed() {
        assert_eq!(
            normalize_server_url("http://127.0.0.1:8000/").expect("valid"),
            "http://127.0.0.1:8000"
        );
        assert_eq!(
            normalize_server_url("  https://assistant.example  ").expect("valid"),
            "https://assistant.example"
        );
        assert!(normalize_server_url("ftp://assistant.example").is_err());
        assert!(normalize_server_url("not a url").is_err());
    }
}
