//! Bridges user preferences into engine and storage settings.

use std::path::PathBuf;

use chrono::Duration;
pub use invite_config::{model::MAX_DEBOUNCE_MS, Config, ConfigError, ConfigManager};
use invite_core::SessionOptions;
use invite_storage_json::JsonDraftStorage;

use crate::StudioError;

/// Session options derived from the user's config.
pub fn session_options(config: &Config) -> SessionOptions {
    let debounce_ms = config.debounce_ms.min(MAX_DEBOUNCE_MS) as i64;
    SessionOptions {
        debounce: Duration::milliseconds(debounce_ms),
        default_mode: config.default_mode,
    }
}

/// Opens the JSON draft store, preferring `override_root` over the configured location.
pub fn open_draft_storage(
    config: &Config,
    override_root: Option<PathBuf>,
) -> Result<JsonDraftStorage, StudioError> {
    let root = override_root.unwrap_or_else(|| config.resolve_drafts_root());
    Ok(JsonDraftStorage::new(root)?)
}

#[cfg(test)]
mod tests {
    use invite_domain::EditorMode;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn session_options_follow_config() {
        let config = Config {
            debounce_ms: 250,
            default_mode: EditorMode::Full,
            ..Config::default()
        };

        let options = session_options(&config);
        assert_eq!(options.debounce, Duration::milliseconds(250));
        assert_eq!(options.default_mode, EditorMode::Full);
    }

    #[test]
    fn override_root_wins_over_config() {
        let dir = tempdir().expect("tempdir");
        let config = Config {
            drafts_root: Some(dir.path().join("configured")),
            ..Config::default()
        };

        let storage = open_draft_storage(&config, Some(dir.path().join("override"))).expect("storage");
        assert_eq!(storage.drafts_dir(), dir.path().join("override"));
    }
}
