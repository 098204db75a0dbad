use std::{collections::HashMap, fs, path::Path, time::Duration};

use anyhow::{bail, Context};
use client_core::{DEFAULT_API_KEY, DEFAULT_BASE_URL};
use tracing::warn;
use url::Url;

pub const DEFAULT_CONFIG_PATH: &str = "dashboard.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: String,
    pub api_key: String,
    pub cache_url: String,
    /// `None` leaves the `delay` query parameter off list requests.
    pub request_delay_secs: Option<u32>,
    pub notification_ttl_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            api_key: DEFAULT_API_KEY.into(),
            cache_url: "sqlite://./data/dashboard.db".into(),
            request_delay_secs: Some(1),
            notification_ttl_ms: 3000,
        }
    }
}

impl Settings {
    /// Defaults, overlaid by the config file contents, overlaid by environment variables.
    pub fn from_sources(
        file_contents: Option<&str>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let mut settings = Settings::default();

        if let Some(raw) = file_contents {
            match parse_file(raw) {
                Ok(file_cfg) => settings.apply(|key| file_cfg.get(key).cloned()),
                Err(error) => warn!(%error, "ignoring unreadable config file"),
            }
        }

        if let Some(v) = env("DASHBOARD_BASE_URL") {
            settings.base_url = v;
        }
        settings.apply(|key| env(&format!("APP__{}", key.to_ascii_uppercase())));

        settings
    }

    fn apply(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("base_url") {
            self.base_url = v;
        }
        if let Some(v) = lookup("api_key") {
            self.api_key = v;
        }
        if let Some(v) = lookup("cache_url") {
            self.cache_url = v;
        }
        if let Some(v) = lookup("request_delay_secs") {
            match v.trim().parse::<u32>() {
                Ok(0) => self.request_delay_secs = None,
                Ok(parsed) => self.request_delay_secs = Some(parsed),
                Err(_) => warn!(value = %v, "ignoring invalid request_delay_secs"),
            }
        }
        if let Some(v) = lookup("notification_ttl_ms") {
            match v.trim().parse::<u64>() {
                Ok(parsed) => self.notification_ttl_ms = parsed,
                Err(_) => warn!(value = %v, "ignoring invalid notification_ttl_ms"),
            }
        }
    }

    pub fn notification_ttl(&self) -> Duration {
        Duration::from_millis(self.notification_ttl_ms)
    }

    /// The base URL, checked to be an absolute http(s) URL.
    pub fn validated_base_url(&self) -> anyhow::Result<String> {
        let parsed = Url::parse(self.base_url.trim())
            .with_context(|| format!("invalid base url '{}'", self.base_url))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            bail!("base url '{}' must use http or https", self.base_url);
        }
        Ok(parsed.as_str().trim_end_matches('/').to_string())
    }
}

pub fn load_settings(path: &Path) -> Settings {
    let file_contents = fs::read_to_string(path).ok();
    Settings::from_sources(file_contents.as_deref(), |key| std::env::var(key).ok())
}

/// Flat `key = value` table; non-string values are taken in their TOML spelling.
fn parse_file(raw: &str) -> anyhow::Result<HashMap<String, String>> {
    let table: toml::Table = toml::from_str(raw)?;
    Ok(table
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                toml::Value::String(text) => text,
                other => other.to_string(),
            };
            (key, value)
        })
        .collect())
}

pub fn normalize_cache_url(raw_cache_url: &str) -> String {
    let raw_cache_url = raw_cache_url.trim();

    if raw_cache_url.is_empty() {
        return Settings::default().cache_url;
    }

    if raw_cache_url.starts_with("sqlite::memory:")
        || raw_cache_url.starts_with("sqlite://")
        || raw_cache_url.contains("://")
    {
        return raw_cache_url.to_string();
    }

    if let Some(path) = raw_cache_url.strip_prefix("sqlite:") {
        return format!("sqlite://{}", path.replace('\\', "/"));
    }

    format!("sqlite://{}", raw_cache_url.replace('\\', "/"))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
