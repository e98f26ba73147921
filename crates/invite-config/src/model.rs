use std::path::PathBuf;

use invite_domain::EditorMode;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Longest accepted autosave debounce.
pub const MAX_DEBOUNCE_MS: u64 = 60_000;

/// Stores user-configurable studio preferences and metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Quiet period in milliseconds before a draft is written.
    #[serde(default = "Config::default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default)]
    pub default_mode: EditorMode,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_opened_template: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom root directory for drafts. Defaults to `<data dir>/InviteStudio/drafts`.
    pub drafts_root: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debounce_ms: Self::default_debounce_ms(),
            default_mode: EditorMode::default(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            log_filter: None,
            last_opened_template: None,
            drafts_root: None,
        }
    }
}

impl Config {
    pub fn default_debounce_ms() -> u64 {
        800
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn resolve_drafts_root(&self) -> PathBuf {
        if let Some(path) = &self.drafts_root {
            return path.clone();
        }

        let base = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        base.join("InviteStudio").join("drafts")
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.debounce_ms > MAX_DEBOUNCE_MS {
            return Err(ConfigError::Invalid(format!(
                "debounce_ms must be at most {MAX_DEBOUNCE_MS}, got {}",
                self.debounce_ms
            )));
        }
        if let Some(filter) = &self.log_filter {
            if filter.trim().is_empty() {
                return Err(ConfigError::Invalid("log_filter must not be blank".into()));
            }
        }
        Ok(())
    }
}
