use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context};
use chat_core::{CoreSettings, SpeechCapability};
use chat_engine::{FetchSettings, DEFAULT_BASE_URL, DEFAULT_MODEL};
use serde::{Deserialize, Serialize};

use super::logging::LogDestination;

const CONFIG_FILENAME: &str = "chat_widget.ron";
const CONFIG_PATH_ENV: &str = "CHAT_WIDGET_CONFIG";
const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Settings read from `chat_widget.ron`. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub model: String,
    pub reveal_period_ms: u64,
    pub notice_secs: u64,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub log: LogDestination,
    pub verbose: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            reveal_period_ms: 200,
            notice_secs: 3,
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
            log: LogDestination::File,
            verbose: false,
        }
    }
}

impl AppConfig {
    pub fn core_settings(&self, speech: SpeechCapability) -> CoreSettings {
        CoreSettings {
            reveal_period: Duration::from_millis(self.reveal_period_ms),
            notice_ttl: Duration::from_secs(self.notice_secs),
            speech,
        }
    }

    pub fn fetch_settings(&self, api_key: String) -> FetchSettings {
        FetchSettings {
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            api_key,
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}

/// `$CHAT_WIDGET_CONFIG`, or `chat_widget.ron` in the working directory.
pub fn config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME))
}

/// Loads the config file; a missing file means defaults.
pub fn load_config(path: &Path) -> anyhow::Result<AppConfig> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(AppConfig::default()),
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read config {}", path.display()))
        }
    };
    ron::from_str(&content).with_context(|| format!("failed to parse config {}", path.display()))
}

/// The key from the environment, else the one captured when the binary was built.
pub fn resolve_api_key(runtime: Option<String>) -> anyhow::Result<String> {
    let non_empty = |key: &str| {
        let key = key.trim();
        (!key.is_empty()).then(|| key.to_string())
    };
    runtime
        .as_deref()
        .and_then(non_empty)
        .or_else(|| option_env!("GEMINI_API_KEY").and_then(non_empty))
        .ok_or_else(|| anyhow!("no API key: set {API_KEY_ENV} at build time or run time"))
}

pub fn api_key_from_env() -> Option<String> {
    env::var(API_KEY_ENV).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join(CONFIG_FILENAME)).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn partial_file_overrides_only_given_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "(model: \"gemini-pro\", reveal_period_ms: 50, log: Both)").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.model, "gemini-pro");
        assert_eq!(config.reveal_period_ms, 50);
        assert_eq!(config.log, LogDestination::Both);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.notice_secs, 3);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "(model: 42").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("failed to parse config"));
    }

    #[test]
    fn settings_carry_config_values() {
        let config = AppConfig {
            reveal_period_ms: 120,
            request_timeout_secs: 5,
            ..AppConfig::default()
        };
        let core = config.core_settings(SpeechCapability::Available);
        assert_eq!(core.reveal_period, Duration::from_millis(120));
        assert_eq!(core.speech, SpeechCapability::Available);

        let fetch = config.fetch_settings("k".to_string());
        assert_eq!(fetch.api_key, "k");
        assert_eq!(fetch.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn runtime_api_key_wins_and_is_trimmed() {
        assert_eq!(
            resolve_api_key(Some("  abc \n".to_string())).unwrap(),
            "abc"
        );
    }
}
