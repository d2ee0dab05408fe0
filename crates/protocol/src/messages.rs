use std::fmt;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::error::{ProtocolError, Result};

/// Sentinel the backend stores for playlists that never synced
pub const NEVER_SYNCED: &str = "Never";

/// Name given to playlists added from the dashboard
pub const NEW_PLAYLIST_NAME: &str = "New Playlist";

/// Event names shared with the backend
pub mod event {
    pub const UPDATE: &str = "Update";
    pub const SETTINGS_LOADED: &str = "settingsLoaded";
    pub const SAVE_PLAYLIST_SETTINGS: &str = "save_playlist_settings";
    pub const SAVE_PLAYLISTS: &str = "save_playlists";
    pub const LOAD_SETTINGS: &str = "loadSettings";
    pub const UPDATE_SETTINGS: &str = "updateSettings";
}

/// Opaque playlist identifier (a UUID for playlists created here)
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaylistId(String);

impl PlaylistId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PlaylistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlaylistId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for PlaylistId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// When a playlist last finished syncing
///
/// The backend formats timestamps as `%d-%m-%y %H:%M:%S`; the dashboard only
/// displays them, so they stay strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LastSynced {
    #[default]
    Never,
    At(String),
}

impl LastSynced {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Never => NEVER_SYNCED,
            Self::At(ts) => ts,
        }
    }
}

impl fmt::Display for LastSynced {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for LastSynced {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LastSynced {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(match raw {
            None => Self::Never,
            Some(s) if s == NEVER_SYNCED => Self::Never,
            Some(s) => Self::At(s),
        })
    }
}

/// Coerce free-form interval input to seconds
///
/// Parses a base-10 integer prefix the way a browser `parseInt` does
/// (leading whitespace, optional sign, digits, trailing junk ignored).
/// Anything without digits becomes 0, negatives clamp to 0 and overflow
/// saturates.
pub fn coerce_interval(input: &str) -> u64 {
    let s = input.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let digits = &digits[..end];

    if digits.is_empty() || negative {
        return 0;
    }

    digits.bytes().fold(0u64, |acc, b| {
        acc.saturating_mul(10).saturating_add(u64::from(b - b'0'))
    })
}

/// Accepts integers, numeric strings, floats and null for counters that the
/// browser may have mangled on a previous round trip.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn lenient_u64<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<u64, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(0),
        Value::Number(n) => {
            if let Some(v) = n.as_u64() {
                Ok(v)
            } else if n.as_i64().is_some() {
                Ok(0)
            } else {
                Ok(n.as_f64().map_or(0, |f| if f.is_finite() && f > 0.0 { f as u64 } else { 0 }))
            }
        }
        Value::String(s) => Ok(coerce_interval(&s)),
        other => Err(de::Error::invalid_type(
            de::Unexpected::Other(&other.to_string()),
            &"an integer",
        )),
    }
}

/// One tracked playlist, in the backend's field naming
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    #[serde(rename = "ID", default)]
    pub id: PlaylistId,
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "Link", default)]
    pub link: String,
    /// Seconds to wait between downloads
    #[serde(rename = "Sleep", default, deserialize_with = "lenient_u64")]
    pub sleep: u64,
    #[serde(rename = "Last_Synced", default)]
    pub last_synced: LastSynced,
    #[serde(rename = "Song_Count", default, deserialize_with = "lenient_u64")]
    pub song_count: u64,
}

impl Playlist {
    /// Fresh playlist as created by the "add" control
    pub fn placeholder(id: PlaylistId) -> Self {
        Self {
            id,
            name: NEW_PLAYLIST_NAME.to_string(),
            link: String::new(),
            sleep: 0,
            last_synced: LastSynced::Never,
            song_count: 0,
        }
    }
}

/// Backend configuration as pushed in `settingsLoaded`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Hours (or time-of-day strings) at which a sync run may start
    #[serde(default, deserialize_with = "start_times")]
    pub sync_start_times: Vec<String>,
    #[serde(default, alias = "plex_address")]
    pub media_server_addresses: String,
    #[serde(default, alias = "plex_token")]
    pub media_server_tokens: String,
    #[serde(default, alias = "plex_library_name")]
    pub media_server_library_name: String,
    #[serde(default)]
    pub spotify_client_id: String,
    #[serde(default)]
    pub spotify_client_secret: String,
}

impl Settings {
    /// Start times as shown in the settings form
    pub fn start_times_text(&self) -> String {
        self.sync_start_times.join(", ")
    }
}

fn start_times<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Vec<String>, D::Error> {
    let raw = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .filter_map(|v| match v {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .collect())
}

/// Flat settings object sent with `updateSettings`
///
/// `sync_start_times` is the raw comma separated form text; the backend
/// parses and normalizes it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub sync_start_times: String,
    pub media_server_addresses: String,
    pub media_server_tokens: String,
    pub media_server_library_name: String,
    pub spotify_client_id: String,
    pub spotify_client_secret: String,
}

impl From<&Settings> for SettingsUpdate {
    fn from(settings: &Settings) -> Self {
        Self {
            sync_start_times: settings.start_times_text(),
            media_server_addresses: settings.media_server_addresses.clone(),
            media_server_tokens: settings.media_server_tokens.clone(),
            media_server_library_name: settings.media_server_library_name.clone(),
            spotify_client_id: settings.spotify_client_id.clone(),
            spotify_client_secret: settings.spotify_client_secret.clone(),
        }
    }
}

/// `Update` payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncListUpdate {
    #[serde(default)]
    pub sync_list: Vec<Playlist>,
}

/// `save_playlist_settings` payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistSave {
    pub playlist: Playlist,
}

/// `save_playlists` payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncListSave {
    #[serde(rename = "Saved_sync_list")]
    pub saved_sync_list: Vec<Playlist>,
}

/// Messages the dashboard sends
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    SavePlaylistSettings(PlaylistSave),
    SavePlaylists(SyncListSave),
    LoadSettings,
    UpdateSettings(SettingsUpdate),
}

impl ClientEvent {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SavePlaylistSettings(_) => event::SAVE_PLAYLIST_SETTINGS,
            Self::SavePlaylists(_) => event::SAVE_PLAYLISTS,
            Self::LoadSettings => event::LOAD_SETTINGS,
            Self::UpdateSettings(_) => event::UPDATE_SETTINGS,
        }
    }

    /// Event arguments following the name in the Socket.IO array
    pub fn args(&self) -> Result<Vec<Value>> {
        let arg = match self {
            Self::SavePlaylistSettings(p) => serde_json::to_value(p)?,
            Self::SavePlaylists(p) => serde_json::to_value(p)?,
            Self::LoadSettings => return Ok(Vec::new()),
            Self::UpdateSettings(p) => serde_json::to_value(p)?,
        };
        Ok(vec![arg])
    }
}

/// Messages the backend pushes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    Update(SyncListUpdate),
    SettingsLoaded(Settings),
    /// Anything the dashboard does not handle
    Other(String),
}

impl ServerEvent {
    /// Interpret a decoded Socket.IO event
    pub fn from_event(name: &str, args: Vec<Value>) -> Result<Self> {
        match name {
            event::UPDATE => Ok(Self::Update(first_arg(name, args)?)),
            event::SETTINGS_LOADED => Ok(Self::SettingsLoaded(first_arg(name, args)?)),
            other => Ok(Self::Other(other.to_string())),
        }
    }
}

fn first_arg<T: for<'de> Deserialize<'de>>(name: &str, args: Vec<Value>) -> Result<T> {
    let value = args
        .into_iter()
        .next()
        .ok_or(ProtocolError::MalformedEvent("missing payload"))?;
    serde_json::from_value(value).map_err(|source| ProtocolError::Payload {
        event: name.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_interval() {
        assert_eq!(coerce_interval("42"), 42);
        assert_eq!(coerce_interval("  7"), 7);
        assert_eq!(coerce_interval("+3"), 3);
        assert_eq!(coerce_interval("12abc"), 12);
        assert_eq!(coerce_interval(""), 0);
        assert_eq!(coerce_interval("abc"), 0);
        assert_eq!(coerce_interval("-5"), 0);
        assert_eq!(coerce_interval("3.9"), 3);
        assert_eq!(coerce_interval("99999999999999999999999"), u64::MAX);
    }

    #[test]
    fn test_playlist_wire_names() {
        let playlist = Playlist {
            id: "abc".into(),
            name: "Foo".into(),
            link: "https://open.spotify.com/playlist/1".into(),
            sleep: 5,
            last_synced: LastSynced::Never,
            song_count: 12,
        };
        let value = serde_json::to_value(&playlist).unwrap();
        assert_eq!(
            value,
            json!({
                "ID": "abc",
                "Name": "Foo",
                "Link": "https://open.spotify.com/playlist/1",
                "Sleep": 5,
                "Last_Synced": "Never",
                "Song_Count": 12,
            })
        );
    }

    #[test]
    fn test_playlist_lenient_fields() {
        let playlist: Playlist = serde_json::from_value(json!({
            "ID": "x",
            "Name": "Bar",
            "Link": "",
            "Sleep": null,
            "Last_Synced": "01-02-24 10:00:00",
        }))
        .unwrap();
        assert_eq!(playlist.sleep, 0);
        assert_eq!(playlist.song_count, 0);
        assert_eq!(playlist.last_synced, LastSynced::At("01-02-24 10:00:00".into()));

        let playlist: Playlist =
            serde_json::from_value(json!({"ID": "y", "Name": "Baz", "Sleep": "15"})).unwrap();
        assert_eq!(playlist.sleep, 15);
        assert_eq!(playlist.last_synced, LastSynced::Never);
    }

    #[test]
    fn test_settings_accepts_hours_and_legacy_names() {
        let settings: Settings = serde_json::from_value(json!({
            "sync_start_times": [0, 6, "18"],
            "plex_address": "http://192.168.1.2:32400",
            "plex_token": "abc123",
            "plex_library_name": "You Tube",
            "spotify_client_id": "id",
            "spotify_client_secret": "secret",
        }))
        .unwrap();
        assert_eq!(settings.sync_start_times, vec!["0", "6", "18"]);
        assert_eq!(settings.start_times_text(), "0, 6, 18");
        assert_eq!(settings.media_server_addresses, "http://192.168.1.2:32400");
        assert_eq!(settings.media_server_library_name, "You Tube");
    }

    #[test]
    fn test_client_event_payloads() {
        let playlist = Playlist::placeholder("id-1".into());
        let save = ClientEvent::SavePlaylistSettings(PlaylistSave {
            playlist: playlist.clone(),
        });
        assert_eq!(save.name(), "save_playlist_settings");
        assert_eq!(save.args().unwrap()[0]["playlist"]["Name"], "New Playlist");

        let bulk = ClientEvent::SavePlaylists(SyncListSave {
            saved_sync_list: vec![playlist],
        });
        assert_eq!(bulk.name(), "save_playlists");
        assert_eq!(bulk.args().unwrap()[0]["Saved_sync_list"][0]["ID"], "id-1");

        assert!(ClientEvent::LoadSettings.args().unwrap().is_empty());
    }

    #[test]
    fn test_server_event_update() {
        let event = ServerEvent::from_event(
            "Update",
            vec![json!({"sync_list": [{"ID": "1", "Name": "Foo", "Link": "", "Sleep": 0,
                                        "Last_Synced": "Never", "Song_Count": 3}]})],
        )
        .unwrap();
        let ServerEvent::Update(update) = event else {
            panic!("expected update");
        };
        assert_eq!(update.sync_list.len(), 1);
        assert_eq!(update.sync_list[0].song_count, 3);
    }

    #[test]
    fn test_server_event_errors() {
        assert!(matches!(
            ServerEvent::from_event("Update", vec![]),
            Err(ProtocolError::MalformedEvent(_))
        ));
        assert!(matches!(
            ServerEvent::from_event("settingsLoaded", vec![json!("nope")]),
            Err(ProtocolError::Payload { .. })
        ));
        assert_eq!(
            ServerEvent::from_event("progress", vec![]).unwrap(),
            ServerEvent::Other("progress".into())
        );
    }
}
