//! Dashboard configuration
//!
//! Every field has a default matching the stock page, so an absent or
//! partial configuration object still works.

use serde::{Deserialize, Serialize};
use tracing::Level;

/// Ids of the page elements the dashboard binds to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementIds {
    pub sync_list: String,
    pub add_playlist: String,
    pub save_sync_list: String,
    pub save_sync_list_msg: String,
    pub config_modal: String,
    pub save_changes_button: String,
    pub save_message: String,
    pub sync_start_times: String,
    pub media_server_addresses: String,
    pub media_server_tokens: String,
    pub media_server_library_name: String,
    pub spotify_client_id: String,
    pub spotify_client_secret: String,
    pub theme_switch: String,
    /// Container the edit dialogs are rebuilt into
    pub edit_dialogs: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            sync_list: "sync-list".to_string(),
            add_playlist: "add-playlist".to_string(),
            save_sync_list: "save-sync-list".to_string(),
            save_sync_list_msg: "save-sync-list-msg".to_string(),
            config_modal: "config-modal".to_string(),
            save_changes_button: "save-changes-button".to_string(),
            save_message: "save-message".to_string(),
            sync_start_times: "sync_start_times".to_string(),
            media_server_addresses: "media_server_addresses".to_string(),
            media_server_tokens: "media_server_tokens".to_string(),
            media_server_library_name: "media_server_library_name".to_string(),
            spotify_client_id: "spotify_client_id".to_string(),
            spotify_client_secret: "spotify_client_secret".to_string(),
            theme_switch: "themeSwitch".to_string(),
            edit_dialogs: "edit-modals".to_string(),
        }
    }
}

/// How long each success indicator stays visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoticeDurations {
    pub playlist_saved_ms: u32,
    pub settings_saved_ms: u32,
    pub sync_list_saved_ms: u32,
}

impl Default for NoticeDurations {
    fn default() -> Self {
        Self {
            playlist_saved_ms: 1000,
            settings_saved_ms: 1000,
            sync_list_saved_ms: 3000,
        }
    }
}

/// Full dashboard configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub elements: ElementIds,
    pub notices: NoticeDurations,
    /// Socket.IO endpoint path on the page's origin
    pub socket_path: String,
    /// Document attribute carrying the colour theme
    pub theme_attribute: String,
    pub log_level: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            elements: ElementIds::default(),
            notices: NoticeDurations::default(),
            socket_path: "/socket.io/".to_string(),
            theme_attribute: "data-bs-theme".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl DashboardConfig {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Parse an optional JSON override, falling back to defaults
    ///
    /// The parse error is handed back rather than logged, since the log
    /// level itself comes from this config.
    pub fn load_or_default(json: Option<&str>) -> (Self, Option<serde_json::Error>) {
        match json.map(Self::from_json) {
            None => (Self::default(), None),
            Some(Ok(config)) => (config, None),
            Some(Err(e)) => (Self::default(), Some(e)),
        }
    }

    /// Maximum log level; unknown names mean `info`
    pub fn log_level(&self) -> Level {
        self.log_level.parse().unwrap_or(Level::INFO)
    }
}
