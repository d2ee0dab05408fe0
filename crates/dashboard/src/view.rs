//! Render models for the playlist table and the edit dialogs
//!
//! The table is rebuilt from scratch on every structural change, so these
//! are plain snapshots of the list. Dialogs are reconciled by element id so
//! an open one survives a server push.

use std::fmt::Write as _;

use syncify_protocol::{coerce_interval, Playlist, PlaylistId};

/// Encode an id so it is safe inside an element id and a CSS selector
///
/// ASCII letters, digits and `-` pass through; every other byte becomes
/// `_xx` (hex), so distinct ids never share a key.
pub fn dom_key(id: &PlaylistId) -> String {
    let mut key = String::with_capacity(id.as_str().len());
    for byte in id.as_str().bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            key.push(char::from(byte));
        } else {
            let _ = write!(key, "_{byte:02x}");
        }
    }
    key
}

/// Element ids belonging to one playlist's edit dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogIds {
    pub modal: String,
    pub title: String,
    pub message: String,
    pub name_input: String,
    pub link_input: String,
    pub sleep_input: String,
}

impl DialogIds {
    pub fn for_playlist(id: &PlaylistId) -> Self {
        let key = dom_key(id);
        Self {
            modal: format!("editModal-{key}"),
            title: format!("editModalLabel-{key}"),
            message: format!("save-message-playlist-edit-{key}"),
            name_input: format!("playlistName-{key}"),
            link_input: format!("playlistLink-{key}"),
            sleep_input: format!("playlistSleep-{key}"),
        }
    }

    /// Selector used by the row's edit button to open the dialog
    pub fn modal_selector(&self) -> String {
        format!("#{}", self.modal)
    }
}

/// One table row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub position: usize,
    pub id: PlaylistId,
    pub name: String,
    pub last_synced: String,
    pub song_count: String,
    /// Selector of the dialog the edit button opens
    pub dialog_target: String,
}

/// The whole playlist table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableView {
    pub rows: Vec<RowView>,
}

impl TableView {
    pub fn render(playlists: &[Playlist]) -> Self {
        let rows = playlists
            .iter()
            .enumerate()
            .map(|(position, playlist)| RowView {
                position,
                id: playlist.id.clone(),
                name: playlist.name.clone(),
                last_synced: playlist.last_synced.to_string(),
                song_count: playlist.song_count.to_string(),
                dialog_target: DialogIds::for_playlist(&playlist.id).modal_selector(),
            })
            .collect();
        Self { rows }
    }
}

/// A pre-filled edit dialog for one playlist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDialogView {
    pub position: usize,
    pub id: PlaylistId,
    pub ids: DialogIds,
    pub name: String,
    pub link: String,
    pub sleep: String,
}

impl EditDialogView {
    pub fn render_all(playlists: &[Playlist]) -> Vec<Self> {
        playlists
            .iter()
            .enumerate()
            .map(|(position, playlist)| Self {
                position,
                id: playlist.id.clone(),
                ids: DialogIds::for_playlist(&playlist.id),
                name: playlist.name.clone(),
                link: playlist.link.clone(),
                sleep: playlist.sleep.to_string(),
            })
            .collect()
    }
}

/// Button actions, read back from `data-action` by one delegated listener
/// per container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    Delete,
    Save,
}

impl RowAction {
    pub const ATTRIBUTE: &'static str = "data-action";
    /// Carries the raw playlist id of the row or dialog
    pub const ID_ATTRIBUTE: &'static str = "data-playlist-id";

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Delete => "delete",
            Self::Save => "save",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "delete" => Some(Self::Delete),
            "save" => Some(Self::Save),
            _ => None,
        }
    }
}

/// Changes needed to bring the dialog container in line with the list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogPlan {
    /// Modal element ids to remove
    pub remove: Vec<String>,
    /// Indexes into the rendered dialogs that need building
    pub build: Vec<usize>,
}

impl DialogPlan {
    /// Diff the modals currently in the page against a fresh render
    ///
    /// A shown modal is never touched, even when its playlist is gone, and
    /// its replacement is not built while it stays open. Every other modal
    /// is rebuilt so its inputs match the list.
    pub fn reconcile(
        existing: &[String],
        shown: Option<&str>,
        dialogs: &[EditDialogView],
    ) -> Self {
        let remove = existing
            .iter()
            .filter(|modal| Some(modal.as_str()) != shown)
            .cloned()
            .collect();
        let build = dialogs
            .iter()
            .enumerate()
            .filter(|(_, dialog)| Some(dialog.ids.modal.as_str()) != shown)
            .map(|(index, _)| index)
            .collect();
        Self { remove, build }
    }
}

/// Raw values read back from an edit dialog's inputs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditForm {
    pub name: String,
    pub link: String,
    pub sleep: String,
}

impl EditForm {
    /// Write the form into a record, coercing the sleep interval
    pub fn apply_to(&self, playlist: &mut Playlist) {
        playlist.name.clone_from(&self.name);
        playlist.link.clone_from(&self.link);
        playlist.sleep = coerce_interval(&self.sleep);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syncify_protocol::LastSynced;

    #[test]
    fn test_dom_key_escapes() {
        assert_eq!(dom_key(&"6f1c-44aa".into()), "6f1c-44aa");
        assert_eq!(dom_key(&"a b".into()), "a_20b");
        assert_eq!(dom_key(&"a_b".into()), "a_5fb");
        assert_ne!(dom_key(&"a b".into()), dom_key(&"a_20b".into()));
    }

    #[test]
    fn test_table_rows() {
        let mut playlist = Playlist::placeholder("p1".into());
        playlist.song_count = 12;
        playlist.last_synced = LastSynced::At("05-03-24 01:02:03".into());

        let table = TableView::render(&[playlist]);
        assert_eq!(table.rows.len(), 1);
        let row = &table.rows[0];
        assert_eq!(row.name, "New Playlist");
        assert_eq!(row.last_synced, "05-03-24 01:02:03");
        assert_eq!(row.song_count, "12");
        assert_eq!(row.dialog_target, "#editModal-p1");
    }

    #[test]
    fn test_edit_form_apply() {
        let mut playlist = Playlist::placeholder("p1".into());
        EditForm {
            name: "Chill".into(),
            link: "https://open.spotify.com/playlist/x".into(),
            sleep: "oops".into(),
        }
        .apply_to(&mut playlist);
        assert_eq!(playlist.name, "Chill");
        assert_eq!(playlist.sleep, 0);
        assert_eq!(playlist.id, PlaylistId::from("p1"));
    }

    fn dialogs(ids: &[&str]) -> Vec<EditDialogView> {
        let playlists: Vec<Playlist> = ids
            .iter()
            .map(|id| Playlist::placeholder((*id).into()))
            .collect();
        EditDialogView::render_all(&playlists)
    }

    #[test]
    fn test_reconcile_without_open_dialog_rebuilds_everything() {
        let existing = vec!["editModal-a".to_string(), "editModal-b".to_string()];
        let plan = DialogPlan::reconcile(&existing, None, &dialogs(&["a", "c"]));
        assert_eq!(plan.remove, existing);
        assert_eq!(plan.build, vec![0, 1]);
    }

    #[test]
    fn test_reconcile_keeps_open_dialog() {
        let existing = vec!["editModal-a".to_string(), "editModal-b".to_string()];
        let plan =
            DialogPlan::reconcile(&existing, Some("editModal-b"), &dialogs(&["a", "b", "c"]));
        assert_eq!(plan.remove, vec!["editModal-a".to_string()]);
        assert_eq!(plan.build, vec![0, 2]);
    }

    #[test]
    fn test_reconcile_keeps_open_dialog_of_removed_playlist() {
        let existing = vec!["editModal-gone".to_string()];
        let plan = DialogPlan::reconcile(&existing, Some("editModal-gone"), &dialogs(&["a"]));
        assert!(plan.remove.is_empty());
        assert_eq!(plan.build, vec![0]);

        // Once it closes, the next render clears it
        let existing = vec!["editModal-gone".to_string(), "editModal-a".to_string()];
        let plan = DialogPlan::reconcile(&existing, None, &dialogs(&["a"]));
        assert_eq!(plan.remove, existing);
    }

    #[test]
    fn test_row_action_attribute() {
        for action in [RowAction::Delete, RowAction::Save] {
            assert_eq!(RowAction::parse(action.as_str()), Some(action));
        }
        assert_eq!(RowAction::parse("edit"), None);
        assert_eq!(RowAction::parse(""), None);
    }
}
