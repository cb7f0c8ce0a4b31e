use crate::error::{DraftError, Result};
use crate::model::DEFAULT_FALLBACK_TITLE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_PREVIEW_DEBOUNCE_MS: u64 = 300;
const DEFAULT_AUTOSAVE_DEBOUNCE_MS: u64 = 1000;

/// Configuration for draftpad, stored in `<data dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DraftConfig {
    /// Quiet period before the preview is re-rendered
    #[serde(default = "default_preview_debounce")]
    pub preview_debounce_ms: u64,

    /// Quiet period before the buffer is written to the autosave slot
    #[serde(default = "default_autosave_debounce")]
    pub autosave_debounce_ms: u64,

    /// Title used when none can be derived from the content
    #[serde(default = "default_fallback_title")]
    pub fallback_title: String,
}

fn default_preview_debounce() -> u64 {
    DEFAULT_PREVIEW_DEBOUNCE_MS
}

fn default_autosave_debounce() -> u64 {
    DEFAULT_AUTOSAVE_DEBOUNCE_MS
}

fn default_fallback_title() -> String {
    DEFAULT_FALLBACK_TITLE.to_string()
}

impl Default for DraftConfig {
    fn default() -> Self {
        Self {
            preview_debounce_ms: DEFAULT_PREVIEW_DEBOUNCE_MS,
            autosave_debounce_ms: DEFAULT_AUTOSAVE_DEBOUNCE_MS,
            fallback_title: default_fallback_title(),
        }
    }
}

impl DraftConfig {
    pub const KEYS: [&'static str; 3] = ["preview-debounce", "autosave-debounce", "fallback-title"];

    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: DraftConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, content)?;
        Ok(())
    }

    pub fn preview_window(&self) -> Duration {
        Duration::from_millis(self.preview_debounce_ms)
    }

    pub fn autosave_window(&self) -> Duration {
        Duration::from_millis(self.autosave_debounce_ms)
    }

    pub fn get(&self, key: &str) -> Result<String> {
        match key {
            "preview-debounce" => Ok(self.preview_debounce_ms.to_string()),
            "autosave-debounce" => Ok(self.autosave_debounce_ms.to_string()),
            "fallback-title" => Ok(self.fallback_title.clone()),
            _ => Err(unknown_key(key)),
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "preview-debounce" => self.preview_debounce_ms = parse_millis(key, value)?,
            "autosave-debounce" => self.autosave_debounce_ms = parse_millis(key, value)?,
            "fallback-title" => {
                let title = value.trim();
                if title.is_empty() {
                    return Err(DraftError::Config(
                        "fallback-title cannot be empty".to_string(),
                    ));
                }
                self.fallback_title = title.to_string();
            }
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }
}

fn parse_millis(key: &str, value: &str) -> Result<u64> {
    value.trim().parse().map_err(|_| {
        DraftError::Config(format!("{} expects milliseconds, got '{}'", key, value))
    })
}

fn unknown_key(key: &str) -> DraftError {
    DraftError::Config(format!(
        "Unknown config key '{}' (expected one of: {})",
        key,
        DraftConfig::KEYS.join(", ")
    ))
}
