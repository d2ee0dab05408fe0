//! The dashboard controller
//!
//! Single owner of the playlist list and the settings round trip. Every
//! user action goes through a method here; server pushes go through
//! [`Dashboard::handle_event`]. Sends are fire-and-forget.

use syncify_protocol::{
    ClientEvent, Playlist, PlaylistId, PlaylistSave, ServerEvent, SettingsUpdate, SyncListSave,
    SyncListUpdate,
};
use tracing::{debug, info};

use crate::channel::Channel;
use crate::config::NoticeDurations;
use crate::error::{DashboardError, Result};
use crate::notice::{Notice, NoticeTarget, SYNC_LIST_SAVED};
use crate::settings::SettingsLoader;
use crate::store::PlaylistStore;
use crate::view::{EditDialogView, EditForm, TableView};

/// What the page has to redraw after a server event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Refresh {
    Nothing,
    /// Table and edit dialogs
    Playlists,
    /// Fill the configuration form
    SettingsForm(SettingsUpdate),
}

pub struct Dashboard<C> {
    store: PlaylistStore,
    channel: C,
    settings: SettingsLoader,
    notices: NoticeDurations,
}

impl<C: Channel> Dashboard<C> {
    pub fn new(channel: C, notices: NoticeDurations) -> Self {
        Self {
            store: PlaylistStore::new(),
            channel,
            settings: SettingsLoader::default(),
            notices,
        }
    }

    pub const fn channel(&self) -> &C {
        &self.channel
    }

    pub fn playlists(&self) -> &[Playlist] {
        self.store.as_slice()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub const fn settings_pending(&self) -> bool {
        self.settings.is_pending()
    }

    /// Table model, rebuilt from scratch
    pub fn table(&self) -> TableView {
        TableView::render(self.store.as_slice())
    }

    /// One dialog per playlist, keyed by id
    pub fn edit_dialogs(&self) -> Vec<EditDialogView> {
        EditDialogView::render_all(self.store.as_slice())
    }

    /// Append a placeholder playlist. Local only until a bulk save.
    pub fn add_playlist(&mut self) -> PlaylistId {
        let id = self.store.push_new();
        debug!("added playlist {id} ({} total)", self.store.len());
        id
    }

    /// Drop a playlist locally. Local only until a bulk save.
    pub fn remove_playlist(&mut self, id: &PlaylistId) -> Result<Playlist> {
        let removed = self
            .store
            .remove(id)
            .ok_or_else(|| DashboardError::UnknownPlaylist(id.clone()))?;
        debug!("removed playlist '{}'", removed.name);
        Ok(removed)
    }

    pub fn remove_at(&mut self, index: usize) -> Result<Playlist> {
        let id = self.id_at(index)?;
        self.remove_playlist(&id)
    }

    /// Apply an edit dialog and send the updated record
    ///
    /// Emits exactly one `save_playlist_settings`. The returned notice is
    /// shown right away, before the backend has seen anything.
    pub fn save_playlist(&mut self, id: &PlaylistId, form: &EditForm) -> Result<Notice> {
        let playlist = self
            .store
            .get_mut(id)
            .ok_or_else(|| DashboardError::UnknownPlaylist(id.clone()))?;
        form.apply_to(playlist);
        let playlist = playlist.clone();

        info!("saving playlist '{}'", playlist.name);
        self.channel
            .emit(ClientEvent::SavePlaylistSettings(PlaylistSave { playlist }));

        Ok(Notice {
            target: NoticeTarget::PlaylistDialog(id.clone()),
            text: None,
            duration_ms: self.notices.playlist_saved_ms,
        })
    }

    pub fn save_playlist_at(&mut self, index: usize, form: &EditForm) -> Result<Notice> {
        let id = self.id_at(index)?;
        self.save_playlist(&id, form)
    }

    /// Commit the whole local list in one `save_playlists`
    pub fn save_all(&self) -> Notice {
        info!("saving {} playlists", self.store.len());
        self.channel.emit(ClientEvent::SavePlaylists(SyncListSave {
            saved_sync_list: self.store.as_slice().to_vec(),
        }));
        Notice {
            target: NoticeTarget::SyncList,
            text: Some(SYNC_LIST_SAVED),
            duration_ms: self.notices.sync_list_saved_ms,
        }
    }

    /// Configuration dialog opened: fetch the current settings
    pub fn open_settings(&mut self) {
        self.settings.request(&self.channel);
    }

    /// Send the configuration form
    pub fn update_settings(&self, form: SettingsUpdate) -> Notice {
        info!("saving settings");
        self.channel.emit(ClientEvent::UpdateSettings(form));
        Notice {
            target: NoticeTarget::Settings,
            text: None,
            duration_ms: self.notices.settings_saved_ms,
        }
    }

    /// Apply a backend push
    pub fn handle_event(&mut self, event: ServerEvent) -> Refresh {
        match event {
            ServerEvent::Update(update) => {
                self.apply_update(update);
                Refresh::Playlists
            }
            ServerEvent::SettingsLoaded(settings) => self
                .settings
                .resolve(&settings)
                .map_or(Refresh::Nothing, Refresh::SettingsForm),
            ServerEvent::Other(name) => {
                debug!("ignoring event '{name}'");
                Refresh::Nothing
            }
        }
    }

    /// Replace the whole list with the backend's copy
    ///
    /// Unsaved local edits, additions and removals are discarded.
    pub fn apply_update(&mut self, update: SyncListUpdate) {
        let count = update.sync_list.len();
        let repaired = self.store.replace(update.sync_list);
        info!("received {count} playlists ({repaired} ids reassigned)");
    }

    fn id_at(&self, index: usize) -> Result<PlaylistId> {
        self.store
            .get_at(index)
            .map(|p| p.id.clone())
            .ok_or(DashboardError::IndexOutOfRange {
                index,
                len: self.store.len(),
            })
    }
}
