use std::{collections::HashMap, fs, path::Path};

use anyhow::{bail, Context};
use tracing::warn;
use url::Url;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/diagnose";
pub const SETTINGS_FILE: &str = "diagnose.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
        }
    }
}

/// Defaults, then `diagnose.toml` in the working directory, then the process
/// environment.
pub fn load_settings() -> Settings {
    load_settings_from(Path::new(SETTINGS_FILE), |name| std::env::var(name).ok())
}

pub fn load_settings_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<HashMap<String, String>>(&raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.get("api_url") {
                    settings.api_url = v.clone();
                }
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "ignoring unreadable settings file");
            }
        }
    }

    if let Some(v) = env("DIAGNOSE_API_URL") {
        settings.api_url = v;
    }
    if let Some(v) = env("APP__API_URL") {
        settings.api_url = v;
    }

    settings
}

pub fn prepare_api_url(raw_api_url: &str) -> anyhow::Result<String> {
    let api_url = normalize_api_url(raw_api_url);
    let parsed =
        Url::parse(&api_url).with_context(|| format!("invalid diagnosis service url '{api_url}'"))?;
    match parsed.scheme() {
        "http" | "https" => Ok(api_url),
        other => bail!("unsupported scheme '{other}' in diagnosis service url '{api_url}'"),
    }
}

fn normalize_api_url(raw_api_url: &str) -> String {
    let raw_api_url = raw_api_url.trim();

    if raw_api_url.is_empty() {
        return Settings::default().api_url;
    }

    if raw_api_url.contains("://") {
        return raw_api_url.to_string();
    }

    format!("http://{raw_api_url}")
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
