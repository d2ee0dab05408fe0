//! Configuration dialog round trip: `loadSettings` out, `settingsLoaded` in

use syncify_protocol::{ClientEvent, Settings, SettingsUpdate};
use tracing::debug;

use crate::channel::Channel;

/// One-shot wait for the backend's settings
///
/// Armed by a request, disarmed by the first response. Responses that
/// arrive while disarmed are dropped, so reopening the dialog never fills
/// the form twice.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SettingsLoader {
    pending: bool,
}

impl SettingsLoader {
    pub const fn is_pending(&self) -> bool {
        self.pending
    }

    /// Ask the backend for its settings
    pub fn request(&mut self, channel: &impl Channel) {
        if self.pending {
            debug!("settings already requested, asking again");
        }
        channel.emit(ClientEvent::LoadSettings);
        self.pending = true;
    }

    /// Consume a response, yielding the form values if one was expected
    pub fn resolve(&mut self, settings: &Settings) -> Option<SettingsUpdate> {
        if !self.pending {
            debug!("unsolicited settingsLoaded ignored");
            return None;
        }
        self.pending = false;
        Some(SettingsUpdate::from(settings))
    }
}
