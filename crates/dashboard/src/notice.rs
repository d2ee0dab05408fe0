use syncify_protocol::PlaylistId;

/// Text shown next to the bulk save control
pub const SYNC_LIST_SAVED: &str = "Saved!";

/// Where a success indicator is shown
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoticeTarget {
    /// The alert inside one playlist's edit dialog
    PlaylistDialog(PlaylistId),
    /// The alert inside the configuration dialog
    Settings,
    /// The message beside the bulk save button
    SyncList,
}

impl NoticeTarget {
    /// CSS `display` value while visible
    pub const fn display(&self) -> &'static str {
        match self {
            Self::SyncList => "inline",
            Self::PlaylistDialog(_) | Self::Settings => "block",
        }
    }
}

/// A success indicator with a fixed display window
///
/// Shown optimistically: it reflects what was sent, not what the backend
/// stored. Hiding is never cancelled, so a later notice on the same target
/// can be cut short by an earlier timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub target: NoticeTarget,
    /// Replacement text, when the element has none of its own
    pub text: Option<&'static str>,
    pub duration_ms: u32,
}
