//! Controller for the Syncify playlist dashboard
//!
//! Holds the playlist list mirrored from the backend, turns it into render
//! models for the table and the edit dialogs, and relays user actions as
//! backend events. Nothing here touches the DOM; the wasm crate binds these
//! types to the page.

pub mod channel;
pub mod config;
pub mod controller;
pub mod error;
pub mod notice;
pub mod settings;
pub mod store;
pub mod theme;
pub mod view;

pub use channel::{Channel, RecordingChannel};
pub use config::{DashboardConfig, ElementIds, NoticeDurations};
pub use controller::{Dashboard, Refresh};
pub use error::{DashboardError, Result};
pub use notice::{Notice, NoticeTarget};
pub use settings::SettingsLoader;
pub use store::PlaylistStore;
pub use theme::{MemoryPreferences, PreferenceStore, SavedTheme, Theme};
pub use view::{DialogIds, DialogPlan, EditDialogView, EditForm, RowAction, RowView, TableView};
